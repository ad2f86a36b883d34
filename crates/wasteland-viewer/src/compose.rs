//! Frame composition.
//!
//! [`FrameComposer::compose`] turns the viewer state into an ordered list of
//! GPU state changes and draws. The list is replayed by [`crate::gpu`], which
//! keeps raster state and per-program uniforms alive across commands and
//! frames the way a classic immediate-mode GPU API would. Nothing here
//! touches the GPU, so the full frame sequence is testable on the CPU.

use glam::{Mat4, Vec3, Vec4};

use crate::light::{DirectionalLight, PointLight};
use crate::scene::{MeshId, SceneVariant};
use crate::state::ViewerState;

/// Specular exponent shared by every lit material.
pub const MATERIAL_SHININESS: f32 = 32.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Program {
    /// Textured meshes lit by the point light (and the sun, when present).
    Lighting,
    /// Waving flag, sun-lit.
    Flag,
    /// Unlit alpha-blended quads.
    Blend,
    /// Cubemap background.
    Skybox,
}

impl Program {
    pub const ALL: [Program; 4] = [Program::Lighting, Program::Flag, Program::Blend, Program::Skybox];

    pub fn index(self) -> usize {
        match self {
            Program::Lighting => 0,
            Program::Flag => 1,
            Program::Blend => 2,
            Program::Skybox => 3,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DepthCompare {
    #[default]
    Less,
    LessEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameCmd {
    /// Clear color (opaque) and depth.
    Clear { color: Vec3 },
    UseProgram(Program),
    SetPointLight(PointLight),
    SetDirectionalLight(DirectionalLight),
    SetShininess(f32),
    SetViewProjection { view: Mat4, projection: Mat4, view_position: Vec3 },
    SetTime(f32),
    SetDepthCompare(DepthCompare),
    /// Back-face culling on/off.
    SetCulling(bool),
    SetModel(Mat4),
    DrawMesh(MeshId),
    DrawBillboard,
    DrawFlag,
    DrawSkybox,
    /// Debug overlay pass, drawn over the finished scene.
    Overlay,
}

impl FrameCmd {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            FrameCmd::DrawMesh(_) | FrameCmd::DrawBillboard | FrameCmd::DrawFlag | FrameCmd::DrawSkybox
        )
    }
}

/// Ordered command stream for one frame. Capacity is kept across frames.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameList {
    cmds: Vec<FrameCmd>,
}

impl FrameList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: FrameCmd) {
        self.cmds.push(cmd);
    }

    pub fn cmds(&self) -> &[FrameCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn has_overlay(&self) -> bool {
        self.cmds.iter().any(|c| matches!(c, FrameCmd::Overlay))
    }

    pub fn draw_count(&self) -> usize {
        self.cmds.iter().filter(|c| c.is_draw()).count()
    }
}

/// Skybox view: the camera view with its last column zeroed, `w` term included.
pub fn skybox_view(view: Mat4) -> Mat4 {
    Mat4::from_cols(view.x_axis, view.y_axis, view.z_axis, Vec4::ZERO)
}

/// Per-frame inputs that do not live in [`ViewerState`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameParams {
    /// Surface width over height.
    pub aspect: f32,
    /// Seconds since startup; animates the flag.
    pub elapsed: f32,
}

pub struct FrameComposer {
    scene: SceneVariant,
}

impl FrameComposer {
    pub fn new(scene: SceneVariant) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &SceneVariant {
        &self.scene
    }

    /// Rebuilds `out` for one frame.
    pub fn compose(&self, state: &ViewerState, params: FrameParams, out: &mut FrameList) {
        out.clear();

        let camera = &state.camera;
        let view = camera.view_matrix();
        let projection = camera.projection_matrix(params.aspect);
        let view_position = camera.position;
        let view_projection = FrameCmd::SetViewProjection { view, projection, view_position };

        out.push(FrameCmd::Clear { color: state.clear_color });

        // Drawn under whatever depth compare the previous frame left behind.
        if let Some(flag) = &self.scene.flag {
            out.push(FrameCmd::UseProgram(Program::Flag));
            if let Some(sun) = self.scene.directional_light {
                out.push(FrameCmd::SetDirectionalLight(sun));
            }
            out.push(view_projection.clone());
            out.push(FrameCmd::SetTime(params.elapsed));
            out.push(FrameCmd::SetModel(flag.model_matrix()));
            out.push(FrameCmd::DrawFlag);
        }

        out.push(FrameCmd::UseProgram(Program::Lighting));
        let point_light = match self.scene.pinned_point_light {
            Some(position) => state.point_light.at(position),
            None => state.point_light,
        };
        out.push(FrameCmd::SetPointLight(point_light));
        if let Some(sun) = self.scene.directional_light {
            out.push(FrameCmd::SetDirectionalLight(sun));
        }
        out.push(FrameCmd::SetShininess(MATERIAL_SHININESS));
        out.push(view_projection.clone());

        out.push(FrameCmd::SetDepthCompare(DepthCompare::LessEqual));
        out.push(FrameCmd::SetCulling(true));

        for entry in &self.scene.entries {
            let backlit_sun = self.scene.directional_light.filter(|_| entry.backlit);
            if let Some(sun) = backlit_sun {
                out.push(FrameCmd::SetDirectionalLight(sun.flipped()));
            }
            out.push(FrameCmd::SetModel(entry.model_matrix()));
            out.push(FrameCmd::DrawMesh(entry.mesh));
            if let Some(sun) = backlit_sun {
                out.push(FrameCmd::SetDirectionalLight(sun));
            }
        }

        if !self.scene.billboards.is_empty() {
            out.push(FrameCmd::SetCulling(false));
            out.push(FrameCmd::UseProgram(Program::Blend));
            out.push(view_projection);
            for billboard in &self.scene.billboards {
                out.push(FrameCmd::SetModel(billboard.model_matrix()));
                out.push(FrameCmd::DrawBillboard);
            }
        }

        out.push(FrameCmd::SetCulling(true));
        out.push(FrameCmd::UseProgram(Program::Skybox));
        out.push(FrameCmd::SetViewProjection {
            view: skybox_view(view),
            projection,
            view_position,
        });
        out.push(FrameCmd::DrawSkybox);
        out.push(FrameCmd::SetDepthCompare(DepthCompare::Less));

        if state.ui_enabled {
            out.push(FrameCmd::Overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneVariant;

    const PARAMS: FrameParams = FrameParams { aspect: 16.0 / 9.0, elapsed: 1.25 };

    fn compose(scene: SceneVariant, state: &ViewerState) -> FrameList {
        let mut out = FrameList::new();
        FrameComposer::new(scene).compose(state, PARAMS, &mut out);
        out
    }

    fn position_of(list: &FrameList, pred: impl Fn(&FrameCmd) -> bool) -> usize {
        list.cmds().iter().position(pred).expect("command present")
    }

    // ── skybox view ───────────────────────────────────────────────────────

    #[test]
    fn skybox_view_keeps_rotation_bits() {
        let state = ViewerState::default();
        let mut cam = state.camera.clone();
        cam.position = Vec3::new(3.0, -2.0, 7.5);
        cam.process_mouse_movement(123.0, -45.0);
        let view = cam.view_matrix();
        let sky = skybox_view(view);

        for (a, b) in [(view.x_axis, sky.x_axis), (view.y_axis, sky.y_axis), (view.z_axis, sky.z_axis)] {
            assert_eq!(a.truncate().to_array().map(f32::to_bits), b.truncate().to_array().map(f32::to_bits));
        }
        assert_eq!(sky.w_axis, Vec4::ZERO);
    }

    // ── campfire sequence ─────────────────────────────────────────────────

    #[test]
    fn campfire_frame_follows_fixed_order() {
        let state = ViewerState::default();
        let list = compose(SceneVariant::campfire(), &state);
        let cmds = list.cmds();

        assert!(matches!(cmds[0], FrameCmd::Clear { .. }));
        assert_eq!(cmds[1], FrameCmd::UseProgram(Program::Lighting));
        assert!(matches!(cmds[2], FrameCmd::SetPointLight(_)));

        let depth = position_of(&list, |c| *c == FrameCmd::SetDepthCompare(DepthCompare::LessEqual));
        let cull = position_of(&list, |c| *c == FrameCmd::SetCulling(true));
        let first_draw = position_of(&list, |c| matches!(c, FrameCmd::DrawMesh(_)));
        let skybox_prog = position_of(&list, |c| *c == FrameCmd::UseProgram(Program::Skybox));
        let skybox = position_of(&list, |c| *c == FrameCmd::DrawSkybox);
        assert!(depth < cull && cull < first_draw && first_draw < skybox_prog && skybox_prog < skybox);

        assert_eq!(cmds[skybox + 1], FrameCmd::SetDepthCompare(DepthCompare::Less));
        assert_eq!(list.draw_count(), 12);
        assert!(!list.has_overlay());
    }

    #[test]
    fn every_mesh_draw_is_preceded_by_its_model() {
        let scene = SceneVariant::campfire();
        let list = compose(scene.clone(), &ViewerState::default());
        let cmds = list.cmds();
        let mut entries = scene.entries.iter();
        for (i, cmd) in cmds.iter().enumerate() {
            if let FrameCmd::DrawMesh(mesh) = cmd {
                let entry = entries.next().expect("one draw per entry");
                assert_eq!(*mesh, entry.mesh);
                assert_eq!(cmds[i - 1], FrameCmd::SetModel(entry.model_matrix()));
            }
        }
        assert!(entries.next().is_none());
    }

    #[test]
    fn campfire_pins_point_light() {
        let mut state = ViewerState::default();
        state.point_light.linear = 0.3;
        let list = compose(SceneVariant::campfire(), &state);
        let light = list
            .cmds()
            .iter()
            .find_map(|c| match c {
                FrameCmd::SetPointLight(l) => Some(*l),
                _ => None,
            })
            .expect("point light");
        assert_eq!(light.position, Vec3::new(1.0, 4.0, 4.0));
        assert_eq!(light.linear, 0.3);
    }

    #[test]
    fn skybox_uses_translation_free_view() {
        let state = ViewerState::default();
        let list = compose(SceneVariant::campfire(), &state);
        let sky_vp = list
            .cmds()
            .iter()
            .skip_while(|c| **c != FrameCmd::UseProgram(Program::Skybox))
            .find_map(|c| match c {
                FrameCmd::SetViewProjection { view, .. } => Some(*view),
                _ => None,
            })
            .expect("skybox view");
        assert_eq!(sky_vp, skybox_view(state.camera.view_matrix()));
    }

    // ── outpost sequence ──────────────────────────────────────────────────

    #[test]
    fn outpost_draws_flag_before_lighting_program() {
        let list = compose(SceneVariant::outpost(), &ViewerState::default());
        let cmds = list.cmds();
        assert_eq!(cmds[1], FrameCmd::UseProgram(Program::Flag));
        let flag = position_of(&list, |c| *c == FrameCmd::DrawFlag);
        let lighting = position_of(&list, |c| *c == FrameCmd::UseProgram(Program::Lighting));
        let depth = position_of(&list, |c| matches!(c, FrameCmd::SetDepthCompare(_)));
        assert!(flag < lighting && flag < depth);
        assert!(cmds[..flag].contains(&FrameCmd::SetTime(1.25)));
    }

    #[test]
    fn backlit_flip_is_local_to_its_entry() {
        let scene = SceneVariant::outpost();
        let sun = scene.directional_light.expect("sun");
        let list = compose(scene.clone(), &ViewerState::default());
        let cmds = list.cmds();

        let mut draws = 0;
        for (i, cmd) in cmds.iter().enumerate() {
            let FrameCmd::DrawMesh(_) = cmd else { continue };
            let entry = &scene.entries[draws];
            draws += 1;
            if entry.backlit {
                assert_eq!(cmds[i - 2], FrameCmd::SetDirectionalLight(sun.flipped()));
                assert_eq!(cmds[i + 1], FrameCmd::SetDirectionalLight(sun));
            } else {
                assert_ne!(cmds[i - 2], FrameCmd::SetDirectionalLight(sun.flipped()));
            }
        }
        assert_eq!(draws, scene.entries.len());
    }

    #[test]
    fn billboards_draw_unculled_with_blend_program() {
        let list = compose(SceneVariant::outpost(), &ViewerState::default());
        let cmds = list.cmds();
        let blend = position_of(&list, |c| *c == FrameCmd::UseProgram(Program::Blend));
        assert_eq!(cmds[blend - 1], FrameCmd::SetCulling(false));
        let billboards = cmds.iter().filter(|c| **c == FrameCmd::DrawBillboard).count();
        assert_eq!(billboards, 3);
        let recull = position_of(&list, |c| *c == FrameCmd::UseProgram(Program::Skybox));
        assert_eq!(cmds[recull - 1], FrameCmd::SetCulling(true));
    }

    // ── overlay ───────────────────────────────────────────────────────────

    #[test]
    fn overlay_pass_runs_last_only_when_enabled() {
        let mut state = ViewerState::default();
        assert!(!compose(SceneVariant::campfire(), &state).has_overlay());

        state.ui_enabled = true;
        let list = compose(SceneVariant::campfire(), &state);
        assert_eq!(list.cmds().last(), Some(&FrameCmd::Overlay));
    }
}
