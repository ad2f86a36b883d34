//! Light descriptions bound to the lighting programs.

use glam::Vec3;

/// Attenuated omni light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(4.0, 4.0, 0.0),
            ambient: Vec3::splat(0.5),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            constant: 1.0,
            linear: 0.005,
            quadratic: 0.005,
        }
    }
}

impl PointLight {
    /// Intensity factor at `distance`: `1 / (c + l·d + q·d²)`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denom > 0.0 { 1.0 / denom } else { 0.0 }
    }

    pub fn at(self, position: Vec3) -> Self {
        Self { position, ..self }
    }
}

/// Sun-style light with no falloff.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl DirectionalLight {
    /// Low evening sun used by the outpost.
    pub fn outpost_sun() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.4),
            specular: Vec3::splat(0.5),
        }
    }

    /// Same light shining the opposite way.
    pub fn flipped(self) -> Self {
        Self { direction: -self.direction, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_point_light_barely_falls_off() {
        let light = PointLight::default();
        assert_eq!(light.attenuation(0.0), 1.0);
        // 1 / (1 + 0.05 + 0.5)
        assert!((light.attenuation(10.0) - 1.0 / 1.55).abs() < 1e-6);
    }

    #[test]
    fn zeroed_constants_do_not_divide_by_zero() {
        let light = PointLight { constant: 0.0, linear: 0.0, quadratic: 0.0, ..PointLight::default() };
        assert_eq!(light.attenuation(3.0), 0.0);
    }

    #[test]
    fn flipping_twice_restores_direction() {
        let sun = DirectionalLight::outpost_sun();
        assert_eq!(sun.flipped().direction, -sun.direction);
        assert_eq!(sun.flipped().flipped(), sun);
    }
}
