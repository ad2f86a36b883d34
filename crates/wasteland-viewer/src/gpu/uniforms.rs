use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::light::{DirectionalLight, PointLight};

/// Byte stride between per-draw uniform snapshots. Multiple of the 256-byte
/// dynamic offset alignment every adapter guarantees.
pub const UNIFORM_SLOT_SIZE: u64 = 512;

/// Uniform block shared by all four programs. Each program reads the fields
/// it cares about.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub view_position: [f32; 4],

    pub point_position: [f32; 4],
    pub point_ambient: [f32; 4],
    pub point_diffuse: [f32; 4],
    pub point_specular: [f32; 4],
    /// constant, linear, quadratic, material shininess
    pub point_attenuation: [f32; 4],

    /// `w` is 1 once a directional light has been bound.
    pub dir_direction: [f32; 4],
    pub dir_ambient: [f32; 4],
    pub dir_diffuse: [f32; 4],
    pub dir_specular: [f32; 4],

    /// x: seconds since startup
    pub params: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<DrawUniforms>() as u64 <= UNIFORM_SLOT_SIZE);

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

impl DrawUniforms {
    pub fn min_binding_size() -> Option<NonZeroU64> {
        NonZeroU64::new(std::mem::size_of::<Self>() as u64)
    }

    pub fn set_view_projection(&mut self, view: Mat4, projection: Mat4, view_position: Vec3) {
        self.view = view.to_cols_array_2d();
        self.projection = projection.to_cols_array_2d();
        self.view_position = vec4(view_position, 1.0);
    }

    pub fn set_model(&mut self, model: Mat4) {
        self.model = model.to_cols_array_2d();
    }

    pub fn set_point_light(&mut self, light: &PointLight) {
        self.point_position = vec4(light.position, 1.0);
        self.point_ambient = vec4(light.ambient, 0.0);
        self.point_diffuse = vec4(light.diffuse, 0.0);
        self.point_specular = vec4(light.specular, 0.0);
        let shininess = self.point_attenuation[3];
        self.point_attenuation = [light.constant, light.linear, light.quadratic, shininess];
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.point_attenuation[3] = shininess;
    }

    pub fn set_directional_light(&mut self, light: &DirectionalLight) {
        self.dir_direction = vec4(light.direction, 1.0);
        self.dir_ambient = vec4(light.ambient, 0.0);
        self.dir_diffuse = vec4(light.diffuse, 0.0);
        self.dir_specular = vec4(light.specular, 0.0);
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.params[0] = seconds;
    }

    pub fn has_directional_light(&self) -> bool {
        self.dir_direction[3] != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<DrawUniforms>() % 16, 0);
        assert_eq!(UNIFORM_SLOT_SIZE % 256, 0);
    }

    #[test]
    fn point_light_keeps_shininess() {
        let mut u = DrawUniforms::zeroed();
        u.set_shininess(32.0);
        u.set_point_light(&PointLight::default());
        assert_eq!(u.point_attenuation, [1.0, 0.005, 0.005, 32.0]);
    }

    #[test]
    fn directional_light_marks_presence() {
        let mut u = DrawUniforms::zeroed();
        assert!(!u.has_directional_light());
        u.set_directional_light(&DirectionalLight::outpost_sun());
        assert!(u.has_directional_light());
    }
}
