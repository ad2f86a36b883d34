//! Glue between the engine runtime and the viewer.

use std::path::{Path, PathBuf};

use wasteland_engine::canvas::DrawList;
use wasteland_engine::core::{App, AppControl, FrameCtx};
use wasteland_engine::input::{InputFrame, InputState};
use wasteland_engine::paint::Color;
use wasteland_engine::render::canvas::CanvasRenderer;
use wasteland_engine::text::{FontId, FontSystem, SYSTEM_FONT_PATHS};
use wasteland_engine::window::RuntimeCtx;

use crate::assets::SceneAssets;
use crate::compose::{FrameComposer, FrameList, FrameParams};
use crate::gpu::{FrameExecutor, ResolvedFrame, StateMachine};
use crate::overlay::Overlay;
use crate::scene::SceneVariant;
use crate::state::{InputResponse, ViewerState};

/// Font shipped with the resources, tried before the system fonts.
const BUNDLED_FONT: &str = "fonts/DejaVuSans.ttf";

/// Loads the overlay font. Without one the overlay still draws its panels.
pub fn load_overlay_font(resources: &Path) -> (FontSystem, Option<FontId>) {
    let mut fonts = FontSystem::new();
    let mut candidates = vec![resources.join(BUNDLED_FONT)];
    candidates.extend(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));

    match fonts.load_first_available(candidates.as_slice()) {
        Ok(id) => (fonts, Some(id)),
        Err(err) => {
            log::warn!("overlay text disabled: {}", err.0);
            (fonts, None)
        }
    }
}

pub struct ViewerApp {
    state: ViewerState,
    settings_path: PathBuf,

    composer: FrameComposer,
    machine: StateMachine,
    frame_list: FrameList,
    resolved: ResolvedFrame,

    overlay: Overlay,
    overlay_list: DrawList,
    fonts: FontSystem,
    canvas: CanvasRenderer,

    /// CPU assets waiting for the first frame's upload.
    pending_assets: Option<SceneAssets>,
    executor: Option<FrameExecutor>,
}

impl ViewerApp {
    pub fn new(
        state: ViewerState,
        scene: SceneVariant,
        assets: SceneAssets,
        settings_path: PathBuf,
        fonts: FontSystem,
        font: Option<FontId>,
    ) -> Self {
        Self {
            state,
            settings_path,
            composer: FrameComposer::new(scene),
            machine: StateMachine::new(),
            frame_list: FrameList::new(),
            resolved: ResolvedFrame::default(),
            overlay: Overlay::new(font),
            overlay_list: DrawList::new(),
            fonts,
            canvas: CanvasRenderer::new(),
            pending_assets: Some(assets),
            executor: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn frame_list(&self) -> &FrameList {
        &self.frame_list
    }

    pub fn resolved(&self) -> &ResolvedFrame {
        &self.resolved
    }

    /// Input, overlay edits, composition and resolution for one frame.
    /// Everything before the GPU.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32, params: FrameParams) -> InputResponse {
        let response = self.state.handle_input(input, frame, dt);
        if response.quit {
            return response;
        }

        if self.state.ui_enabled {
            self.overlay.handle_input(&mut self.state, input, frame);
        }

        self.composer.compose(&self.state, params, &mut self.frame_list);
        self.machine.resolve(&self.frame_list, &mut self.resolved);
        response
    }

    fn save_settings(&self) {
        match self.state.to_settings().save(&self.settings_path) {
            Ok(()) => log::info!("settings saved to {}", self.settings_path.display()),
            Err(err) => log::warn!("{err:#}"),
        }
    }
}

impl App for ViewerApp {
    fn on_start(&mut self, runtime: &mut RuntimeCtx) {
        log::info!(
            "{:?} scene ready, overlay {}",
            self.composer.scene().kind,
            if self.state.ui_enabled { "shown" } else { "hidden" }
        );
        runtime.set_cursor_mode(self.state.cursor_mode());
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let params = FrameParams {
            aspect: ctx.surface_viewport().aspect(),
            elapsed: ctx.time.elapsed,
        };
        let response = self.update(ctx.input, ctx.input_frame, ctx.time.dt, params);
        if let Some(mode) = response.cursor {
            ctx.runtime.set_cursor_mode(mode);
        }
        if response.quit {
            log::info!("escape pressed");
            return AppControl::Exit;
        }

        if self.resolved.overlay {
            let viewport = ctx.logical_viewport();
            self.overlay.build(&self.state, viewport, &self.fonts, &mut self.overlay_list);
        } else {
            self.overlay_list.clear();
        }

        let clear = self.resolved.clear.unwrap_or(self.state.clear_color);
        let clear = Color::from_straight(clear.x, clear.y, clear.z, 1.0);

        let Self { executor, pending_assets, resolved, canvas, overlay_list, fonts, .. } = self;
        ctx.render(clear, |rctx, target| {
            if executor.is_none() {
                if let Some(assets) = pending_assets.take() {
                    *executor = Some(FrameExecutor::new(rctx, &assets));
                }
            }
            if let Some(executor) = executor.as_mut() {
                executor.encode(rctx, target, resolved);
            }
            canvas.render(rctx, target, overlay_list, fonts);
        })
    }

    fn on_exit(&mut self) {
        self.save_settings();
    }
}
