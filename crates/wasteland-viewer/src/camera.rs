//! Fly camera driven by WASD, mouse look and scroll zoom.

use glam::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Pitch is kept strictly inside ±90° so the view never flips.
pub const PITCH_LIMIT: f32 = 89.0;
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 45.0;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Look-at from `position` toward `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection from the current zoom, with a 0..1 depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Offsets are in pixels; `y_offset` grows upward.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Adopts a stored front vector as-is and derives yaw/pitch from it, so
    /// later mouse movement continues from the stored orientation.
    ///
    /// Zero or non-finite vectors are ignored.
    pub fn set_front(&mut self, front: Vec3) {
        let Some(dir) = front.try_normalize() else {
            log::warn!("ignoring degenerate camera front {front}");
            return;
        };
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.front = front;
        self.update_basis(dir);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.update_basis(self.front);
    }

    fn update_basis(&mut self, dir: Vec3) {
        self.right = dir.cross(self.world_up).normalize_or(Vec3::X);
        self.up = self.right.cross(dir).normalize_or(Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert!(cam.front.abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(cam.right.abs_diff_eq(Vec3::X, EPS));
        assert!(cam.up.abs_diff_eq(Vec3::Y, EPS));
        assert_eq!(cam.zoom, 45.0);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z_axis() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let target = cam.position + cam.front * 5.0;
        let p = cam.view_matrix().transform_point3(target);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-4), "{p}");
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn keyboard_moves_along_front_and_right() {
        let mut cam = Camera::default();
        cam.process_keyboard(CameraMovement::Forward, 2.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), EPS));
        cam.process_keyboard(CameraMovement::Right, 0.4);
        assert!(cam.position.abs_diff_eq(Vec3::new(1.0, 0.0, -2.0), EPS));
    }

    #[test]
    fn repeated_upward_motion_never_passes_pitch_limit() {
        let mut cam = Camera::default();
        for _ in 0..1000 {
            cam.process_mouse_movement(0.0, 500.0);
            assert!(cam.pitch <= PITCH_LIMIT);
        }
        assert_eq!(cam.pitch, PITCH_LIMIT);
        for _ in 0..1000 {
            cam.process_mouse_movement(0.0, -500.0);
        }
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn scroll_zoom_is_clamped() {
        let mut cam = Camera::default();
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom, ZOOM_MIN);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom, ZOOM_MAX);
        cam.process_mouse_scroll(5.0);
        assert_eq!(cam.zoom, 40.0);
    }

    // ── stored orientation ────────────────────────────────────────────────

    #[test]
    fn stored_front_is_kept_and_orientation_derived() {
        let mut cam = Camera::default();
        let front = Vec3::new(1.0, 0.0, 0.0);
        cam.set_front(front);
        assert_eq!(cam.front, front);
        assert!((cam.yaw - 0.0).abs() < EPS);
        assert!((cam.pitch - 0.0).abs() < EPS);

        // A zero mouse delta recomputes the same direction.
        cam.process_mouse_movement(0.0, 0.0);
        assert!(cam.front.abs_diff_eq(front, EPS));
    }

    #[test]
    fn degenerate_front_is_ignored() {
        let mut cam = Camera::default();
        cam.set_front(Vec3::ZERO);
        assert!(cam.front.abs_diff_eq(Vec3::NEG_Z, EPS));
    }
}
