//! CPU half of frame execution.
//!
//! Replays a [`FrameList`] against persistent raster state and per-program
//! uniform blocks, producing one self-contained [`DrawRecord`] per draw. The
//! machine outlives frames, so state left behind by one frame is what the
//! next frame starts with.

use bytemuck::Zeroable;
use glam::Vec3;

use crate::compose::{DepthCompare, FrameCmd, FrameList, Program};
use crate::scene::MeshId;

use super::DrawUniforms;

/// Fixed-function state baked into a pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RasterState {
    pub depth: DepthCompare,
    /// Back faces culled.
    pub cull: bool,
}

impl Default for RasterState {
    fn default() -> Self {
        Self { depth: DepthCompare::Less, cull: false }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawKind {
    Mesh(MeshId),
    Billboard,
    Flag,
    Skybox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub program: Program,
    pub raster: RasterState,
    pub kind: DrawKind,
    /// Snapshot of the program's uniforms at the time of the draw.
    pub uniforms: DrawUniforms,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolvedFrame {
    /// Last clear color of the frame, if any.
    pub clear: Option<Vec3>,
    pub draws: Vec<DrawRecord>,
    pub overlay: bool,
}

impl ResolvedFrame {
    pub fn clear(&mut self) {
        self.clear = None;
        self.draws.clear();
        self.overlay = false;
    }
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    raster: RasterState,
    program: Option<Program>,
    uniforms: [DrawUniforms; 4],
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            raster: RasterState::default(),
            program: None,
            uniforms: [DrawUniforms::zeroed(); 4],
        }
    }

    pub fn raster(&self) -> RasterState {
        self.raster
    }

    pub fn program(&self) -> Option<Program> {
        self.program
    }

    pub fn uniforms(&self, program: Program) -> &DrawUniforms {
        &self.uniforms[program.index()]
    }

    /// Rebuilds `out` from `list`.
    pub fn resolve(&mut self, list: &FrameList, out: &mut ResolvedFrame) {
        out.clear();

        for cmd in list.cmds() {
            match cmd {
                FrameCmd::Clear { color } => out.clear = Some(*color),
                FrameCmd::UseProgram(program) => self.program = Some(*program),
                FrameCmd::SetDepthCompare(depth) => self.raster.depth = *depth,
                FrameCmd::SetCulling(cull) => self.raster.cull = *cull,
                FrameCmd::Overlay => out.overlay = true,

                FrameCmd::DrawMesh(mesh) => self.draw(DrawKind::Mesh(*mesh), out),
                FrameCmd::DrawBillboard => self.draw(DrawKind::Billboard, out),
                FrameCmd::DrawFlag => self.draw(DrawKind::Flag, out),
                FrameCmd::DrawSkybox => self.draw(DrawKind::Skybox, out),

                uniform => {
                    let Some(u) = self.active_uniforms() else {
                        log::warn!("uniform {uniform:?} set with no program bound; ignored");
                        continue;
                    };
                    match uniform {
                        FrameCmd::SetPointLight(light) => u.set_point_light(light),
                        FrameCmd::SetDirectionalLight(light) => u.set_directional_light(light),
                        FrameCmd::SetShininess(s) => u.set_shininess(*s),
                        FrameCmd::SetViewProjection { view, projection, view_position } => {
                            u.set_view_projection(*view, *projection, *view_position)
                        }
                        FrameCmd::SetTime(t) => u.set_time(*t),
                        FrameCmd::SetModel(m) => u.set_model(*m),
                        _ => {}
                    }
                }
            }
        }

        log::trace!("resolved {} commands into {} draws", list.len(), out.draws.len());
    }

    fn active_uniforms(&mut self) -> Option<&mut DrawUniforms> {
        let program = self.program?;
        Some(&mut self.uniforms[program.index()])
    }

    fn draw(&self, kind: DrawKind, out: &mut ResolvedFrame) {
        let Some(program) = self.program else {
            log::warn!("{kind:?} issued with no program bound; skipped");
            return;
        };
        out.draws.push(DrawRecord {
            program,
            raster: self.raster,
            kind,
            uniforms: self.uniforms[program.index()],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{FrameComposer, FrameParams, skybox_view};
    use crate::light::DirectionalLight;
    use crate::scene::{SceneKind, SceneVariant};
    use crate::state::ViewerState;
    use glam::Mat4;

    const PARAMS: FrameParams = FrameParams { aspect: 16.0 / 9.0, elapsed: 2.0 };

    fn resolve_scene(kind: SceneKind, machine: &mut StateMachine) -> ResolvedFrame {
        let composer = FrameComposer::new(SceneVariant::for_kind(kind));
        let mut list = FrameList::new();
        composer.compose(&ViewerState::default(), PARAMS, &mut list);
        let mut out = ResolvedFrame::default();
        machine.resolve(&list, &mut out);
        out
    }

    // ── state persistence ─────────────────────────────────────────────────

    #[test]
    fn raster_state_carries_into_the_next_frame() {
        let mut machine = StateMachine::new();
        let mut out = ResolvedFrame::default();

        let mut first = FrameList::new();
        first.push(FrameCmd::SetDepthCompare(DepthCompare::LessEqual));
        first.push(FrameCmd::SetCulling(true));
        machine.resolve(&first, &mut out);

        let mut second = FrameList::new();
        second.push(FrameCmd::UseProgram(Program::Flag));
        second.push(FrameCmd::DrawFlag);
        machine.resolve(&second, &mut out);

        assert_eq!(out.draws[0].raster, RasterState { depth: DepthCompare::LessEqual, cull: true });
    }

    #[test]
    fn uniforms_are_kept_per_program() {
        let mut machine = StateMachine::new();
        let mut list = FrameList::new();
        list.push(FrameCmd::UseProgram(Program::Lighting));
        list.push(FrameCmd::SetShininess(32.0));
        list.push(FrameCmd::UseProgram(Program::Blend));
        list.push(FrameCmd::SetShininess(4.0));
        list.push(FrameCmd::UseProgram(Program::Lighting));
        list.push(FrameCmd::DrawMesh(MeshId(0)));

        let mut out = ResolvedFrame::default();
        machine.resolve(&list, &mut out);
        assert_eq!(out.draws[0].uniforms.point_attenuation[3], 32.0);
        assert_eq!(machine.uniforms(Program::Blend).point_attenuation[3], 4.0);
    }

    #[test]
    fn draws_snapshot_the_model_at_draw_time() {
        let mut machine = StateMachine::new();
        let mut list = FrameList::new();
        list.push(FrameCmd::UseProgram(Program::Lighting));
        list.push(FrameCmd::SetModel(Mat4::from_scale(glam::Vec3::splat(2.0))));
        list.push(FrameCmd::DrawMesh(MeshId(0)));
        list.push(FrameCmd::SetModel(Mat4::IDENTITY));
        list.push(FrameCmd::DrawMesh(MeshId(1)));

        let mut out = ResolvedFrame::default();
        machine.resolve(&list, &mut out);
        assert_eq!(out.draws[0].uniforms.model[0][0], 2.0);
        assert_eq!(out.draws[1].uniforms.model[0][0], 1.0);
    }

    #[test]
    fn draw_without_a_program_is_dropped() {
        let mut machine = StateMachine::new();
        let mut list = FrameList::new();
        list.push(FrameCmd::SetModel(Mat4::IDENTITY));
        list.push(FrameCmd::DrawSkybox);
        let mut out = ResolvedFrame::default();
        machine.resolve(&list, &mut out);
        assert!(out.draws.is_empty());
    }

    // ── composed frames ───────────────────────────────────────────────────

    #[test]
    fn campfire_meshes_draw_with_lequal_and_culling() {
        let mut machine = StateMachine::new();
        let frame = resolve_scene(SceneKind::Campfire, &mut machine);

        assert_eq!(frame.draws.len(), 12);
        assert_eq!(frame.clear, Some(Vec3::ZERO));
        for draw in &frame.draws[..11] {
            assert_eq!(draw.program, Program::Lighting);
            assert_eq!(draw.raster, RasterState { depth: DepthCompare::LessEqual, cull: true });
            assert_eq!(draw.uniforms.point_position, [1.0, 4.0, 4.0, 1.0]);
        }
        assert_eq!(machine.raster().depth, DepthCompare::Less);
    }

    #[test]
    fn skybox_draw_uses_the_translation_free_view() {
        let mut machine = StateMachine::new();
        let frame = resolve_scene(SceneKind::Campfire, &mut machine);
        let sky = frame.draws.last().expect("skybox draw");

        assert_eq!(sky.kind, DrawKind::Skybox);
        assert_eq!(sky.program, Program::Skybox);
        assert_eq!(sky.raster.depth, DepthCompare::LessEqual);
        let expected = skybox_view(ViewerState::default().camera.view_matrix());
        assert_eq!(sky.uniforms.view, expected.to_cols_array_2d());
        assert_eq!(sky.uniforms.view[3], [0.0; 4]);
    }

    #[test]
    fn outpost_flag_sees_the_previous_frames_depth_test() {
        let mut machine = StateMachine::new();
        let first = resolve_scene(SceneKind::Outpost, &mut machine);
        let flag = &first.draws[0];
        assert_eq!(flag.kind, DrawKind::Flag);
        assert_eq!(flag.raster.depth, DepthCompare::Less);
        assert_eq!(flag.uniforms.params[0], PARAMS.elapsed);

        // The frame ends by restoring "less" and leaves culling on.
        let second = resolve_scene(SceneKind::Outpost, &mut machine);
        assert_eq!(second.draws[0].raster, RasterState { depth: DepthCompare::Less, cull: true });
    }

    #[test]
    fn backlit_entries_see_the_flipped_sun_only() {
        let scene = SceneVariant::for_kind(SceneKind::Outpost);
        let Some(sun) = scene.directional_light else { panic!("outpost has a sun") };
        let flipped = DirectionalLight::flipped(sun);

        let mut machine = StateMachine::new();
        let frame = resolve_scene(SceneKind::Outpost, &mut machine);

        let mesh_draws = frame.draws.iter().filter(|d| matches!(d.kind, DrawKind::Mesh(_)));
        for (draw, entry) in mesh_draws.zip(&scene.entries) {
            let expected = if entry.backlit { flipped } else { sun };
            assert_eq!(draw.uniforms.dir_direction, expected.direction.extend(1.0).to_array(), "{}", entry.name);
        }
    }

    #[test]
    fn billboards_blend_without_culling() {
        let mut machine = StateMachine::new();
        let frame = resolve_scene(SceneKind::Outpost, &mut machine);
        let billboards: Vec<_> = frame.draws.iter().filter(|d| d.kind == DrawKind::Billboard).collect();
        assert_eq!(billboards.len(), 3);
        for b in billboards {
            assert_eq!(b.program, Program::Blend);
            assert!(!b.raster.cull);
        }
    }
}
