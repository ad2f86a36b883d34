use glam::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Same rectangle with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        let min = self.origin.min(self.origin + self.size);
        Self { origin: min, size: self.size.abs() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extent_is_flipped() {
        let n = Rect::new(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, Rect::new(6.0, 7.0, 4.0, 3.0));
        assert!(!n.is_empty());
    }

    #[test]
    fn zero_width_is_empty() {
        assert!(Rect::new(5.0, 5.0, 0.0, 12.0).is_empty());
    }
}
