//! Hand-placed scene tables.
//!
//! Every placement composes as `T · R · S`: scale first, then rotate, then
//! translate. Mesh paths are relative to the resources root and assume the
//! raw mesh space of each asset (node transforms inside the files are not
//! applied).

use glam::{Mat4, Vec3};

use crate::light::DirectionalLight;

/// Index into [`SceneVariant::meshes`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    /// Need not be unit length.
    pub axis: Vec3,
    pub degrees: f32,
}

impl Rotation {
    pub const fn new(axis: Vec3, degrees: f32) -> Self {
        Self { axis, degrees }
    }

    pub fn matrix(self) -> Mat4 {
        match self.axis.try_normalize() {
            Some(axis) => Mat4::from_axis_angle(axis, self.degrees.to_radians()),
            None => Mat4::IDENTITY,
        }
    }
}

/// `translation(t) · rotation(r) · scale(s)`.
pub fn model_matrix(translation: Vec3, rotation: Option<Rotation>, scale: f32) -> Mat4 {
    let r = rotation.map_or(Mat4::IDENTITY, Rotation::matrix);
    Mat4::from_translation(translation) * r * Mat4::from_scale(Vec3::splat(scale))
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    pub rotation: Option<Rotation>,
    pub scale: f32,
}

impl Placement {
    pub const fn new(translation: Vec3, rotation: Option<Rotation>, scale: f32) -> Self {
        Self { translation, rotation, scale }
    }

    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.translation, self.rotation, self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshSource {
    pub name: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    pub name: &'static str,
    pub mesh: MeshId,
    pub placement: Placement,
    /// Lit by the directional light shining the opposite way.
    pub backlit: bool,
}

impl SceneEntry {
    pub fn model_matrix(&self) -> Mat4 {
        self.placement.model_matrix()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SceneKind {
    Campfire,
    Outpost,
}

/// Everything the composer and the asset loader need for one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneVariant {
    pub kind: SceneKind,
    pub meshes: Vec<MeshSource>,
    pub entries: Vec<SceneEntry>,
    /// Alpha-blended textured quads, drawn after the opaque entries.
    pub billboards: Vec<Placement>,
    pub billboard_texture: Option<&'static str>,
    /// Waving flag drawn at the start of the frame.
    pub flag: Option<Placement>,
    pub flag_texture: Option<&'static str>,
    pub directional_light: Option<DirectionalLight>,
    /// When set, the point light is moved here every frame.
    pub pinned_point_light: Option<Vec3>,
    /// Cubemap faces, uploaded to layers +X, -X, +Y, -Y, +Z, -Z in this order.
    pub skybox_faces: [&'static str; 6],
}

const SKYBOX_FACES: [&str; 6] = [
    "textures/skybox/cocoa_rt.jpg",
    "textures/skybox/cocoa_lf.jpg",
    "textures/skybox/cocoa_dn.jpg",
    "textures/skybox/cocoa_up.jpg",
    "textures/skybox/cocoa_bk.jpg",
    "textures/skybox/cocoa_ft.jpg",
];

const fn rot(x: f32, y: f32, z: f32, degrees: f32) -> Option<Rotation> {
    Some(Rotation::new(Vec3::new(x, y, z), degrees))
}

const fn at(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Builds the mesh table and entry list from `(name, path, placement, backlit)` rows,
/// sharing one mesh per distinct path.
fn build(rows: &[(&'static str, &'static str, Placement, bool)]) -> (Vec<MeshSource>, Vec<SceneEntry>) {
    let mut meshes: Vec<MeshSource> = Vec::new();
    let mut entries = Vec::with_capacity(rows.len());
    for &(name, path, placement, backlit) in rows {
        let mesh = match meshes.iter().position(|m| m.path == path) {
            Some(i) => MeshId(i),
            None => {
                meshes.push(MeshSource { name, path });
                MeshId(meshes.len() - 1)
            }
        };
        entries.push(SceneEntry { name, mesh, placement, backlit });
    }
    (meshes, entries)
}

impl SceneVariant {
    pub fn for_kind(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Campfire => Self::campfire(),
            SceneKind::Outpost => Self::outpost(),
        }
    }

    /// Night camp: eleven props around a bonfire under a pinned point light.
    pub fn campfire() -> Self {
        let (meshes, entries) = build(&[
            ("tree", "objects/tree/scene.gltf",
                Placement::new(at(10.0, 0.74, 1.0), rot(0.0, 0.0, 1.0, 90.0), 2.0), false),
            ("old tree", "objects/old_tree/scene.gltf",
                Placement::new(at(-5.0, 0.4, 1.0), rot(0.0, 1.0, 0.0, 180.0), 1.5), false),
            ("ground", "objects/ground/scene.gltf",
                Placement::new(at(1.0, 0.0, 1.0), rot(1.0, 0.0, 0.0, -90.0), 0.55), false),
            ("fox skull", "objects/fox_skull_obj/Fox skull OBJ/fox_skull.obj",
                Placement::new(at(1.0, 0.85, 1.0), None, 0.012), false),
            ("bonfire", "objects/smoldering_logs_red_light_bonfire_l/scene.gltf",
                Placement::new(at(1.0, 0.72, 3.0), None, 1.5), false),
            ("tumbleweed", "objects/tumbleweed/scene.gltf",
                Placement::new(at(1.0, 1.84, -7.0), None, 0.17), false),
            ("ranger", "objects/ncr_veteran_ranger_fallout_4/scene.gltf",
                Placement::new(at(1.0, 1.06, -3.0), rot(0.0, 1.0, 0.0, -30.0), 0.04), false),
            ("bottle cap", "objects/nuka_cola_bottle_cap/scene.gltf",
                Placement::new(at(3.0, 1.1, -2.0), rot(1.0, 0.0, 0.0, -90.0), 0.005), false),
            ("backpack", "objects/backpack (1)/scene.gltf",
                Placement::new(at(-1.2, 1.0, 4.0), rot(0.0, 1.0, 0.0, 150.0), 0.01), false),
            ("bobblehead", "objects/ncr_veteran_ranger_bobblehead/scene.gltf",
                Placement::new(at(-1.2, 1.0, 4.3), rot(0.0, 1.0, 0.0, -30.0), 0.005), false),
            ("pip-boy", "objects/retro-modernized_pip_boy_editable_screen/scene.gltf",
                Placement::new(at(-0.5, 0.67, 5.0), None, 0.2), false),
        ]);

        Self {
            kind: SceneKind::Campfire,
            meshes,
            entries,
            billboards: Vec::new(),
            billboard_texture: None,
            flag: None,
            flag_texture: None,
            directional_light: None,
            pinned_point_light: Some(at(1.0, 4.0, 4.0)),
            skybox_faces: SKYBOX_FACES,
        }
    }

    /// Daytime outpost: a waving flag, a low sun, two backlit trees and grass tufts.
    pub fn outpost() -> Self {
        let (meshes, entries) = build(&[
            ("ground", "objects/ground/scene.gltf",
                Placement::new(at(1.0, 0.0, 1.0), rot(1.0, 0.0, 0.0, -90.0), 0.55), false),
            ("tree", "objects/tree/scene.gltf",
                Placement::new(at(6.0, 0.74, -2.0), rot(0.0, 0.0, 1.0, 90.0), 2.0), true),
            ("old tree", "objects/old_tree/scene.gltf",
                Placement::new(at(-4.0, 0.4, -1.0), rot(0.0, 1.0, 0.0, 180.0), 1.5), true),
            ("bonfire", "objects/smoldering_logs_red_light_bonfire_l/scene.gltf",
                Placement::new(at(1.0, 0.72, 2.0), None, 1.5), false),
            ("ranger", "objects/ncr_veteran_ranger_fallout_4/scene.gltf",
                Placement::new(at(2.0, 1.06, -1.0), rot(0.0, 1.0, 0.0, -45.0), 0.04), false),
            ("bottle cap", "objects/nuka_cola_bottle_cap/scene.gltf",
                Placement::new(at(0.5, 1.1, 1.5), rot(1.0, 0.0, 0.0, -90.0), 0.005), false),
        ]);

        Self {
            kind: SceneKind::Outpost,
            meshes,
            entries,
            billboards: vec![
                Placement::new(at(-1.5, 1.0, -0.5), None, 0.5),
                Placement::new(at(1.5, 1.0, 0.5), None, 0.5),
                Placement::new(at(0.0, 1.0, -2.5), None, 0.5),
            ],
            billboard_texture: Some("textures/grass.png"),
            flag: Some(Placement::new(at(3.0, 2.5, -3.0), None, 1.0)),
            flag_texture: Some("textures/ncr_flag.png"),
            directional_light: Some(DirectionalLight::outpost_sun()),
            pinned_point_light: None,
            skybox_faces: SKYBOX_FACES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn model_matrix_is_translate_rotate_scale() {
        let m = model_matrix(at(1.0, 2.0, 3.0), rot(0.0, 0.0, 1.0, 90.0), 2.0);
        // (1,0,0) scaled to (2,0,0), rotated about Z to (0,2,0), translated.
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(at(1.0, 4.0, 3.0), 1e-5), "{p}");

        let expected = Mat4::from_translation(at(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(90f32.to_radians())
            * Mat4::from_scale(Vec3::splat(2.0));
        assert!(m.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn missing_rotation_is_identity() {
        let m = model_matrix(at(0.0, 1.0, 0.0), None, 0.5);
        assert_eq!(m * Vec4::new(2.0, 2.0, 2.0, 1.0), Vec4::new(1.0, 2.0, 1.0, 1.0));
    }

    #[test]
    fn unnormalized_axis_matches_unit_axis() {
        let a = model_matrix(Vec3::ZERO, rot(0.0, 3.0, 0.0, 150.0), 1.0);
        let b = model_matrix(Vec3::ZERO, rot(0.0, 1.0, 0.0, 150.0), 1.0);
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    // ── tables ────────────────────────────────────────────────────────────

    #[test]
    fn campfire_has_eleven_front_lit_entries() {
        let scene = SceneVariant::campfire();
        assert_eq!(scene.entries.len(), 11);
        assert_eq!(scene.meshes.len(), 11);
        assert!(scene.entries.iter().all(|e| !e.backlit));
        assert!(scene.flag.is_none() && scene.billboards.is_empty());
        assert_eq!(scene.pinned_point_light, Some(at(1.0, 4.0, 4.0)));
    }

    #[test]
    fn outpost_has_two_backlit_trees_and_three_billboards() {
        let scene = SceneVariant::outpost();
        let backlit: Vec<_> = scene.entries.iter().filter(|e| e.backlit).map(|e| e.name).collect();
        assert_eq!(backlit, vec!["tree", "old tree"]);
        assert_eq!(scene.billboards.len(), 3);
        assert!(scene.flag.is_some());
        assert!(scene.directional_light.is_some());
    }

    #[test]
    fn entries_reference_valid_meshes() {
        for scene in [SceneVariant::campfire(), SceneVariant::outpost()] {
            for entry in &scene.entries {
                assert!(entry.mesh.0 < scene.meshes.len(), "{}", entry.name);
            }
        }
    }
}
