use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Everything `App::on_frame` may touch during one frame.
///
/// `'a` spans the callback; `'w` is the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Window size in logical pixels, the space the 2D canvas draws in.
    pub fn logical_viewport(&self) -> Viewport {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        Viewport::new(size.width as f32, size.height as f32)
    }

    /// Surface size in physical pixels.
    pub fn surface_viewport(&self) -> Viewport {
        let size = self.gpu.size();
        Viewport::new(size.width as f32, size.height as f32)
    }

    /// Clears to `clear`, hands `draw` a render context and a depth-carrying
    /// target, then presents. A lost frame is skipped; an out-of-memory
    /// surface asks the runtime to exit.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let clear = wgpu::Color { r: clear.r as f64, g: clear.g as f64, b: clear.b as f64, a: clear.a as f64 };
        let mut frame = match self.gpu.begin_frame(clear) {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.recover(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => AppControl::Continue,
                };
            }
        };

        let rctx = self.gpu.render_ctx(self.logical_viewport());
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view).with_depth(self.gpu.depth_view());
        draw(&rctx, &mut target);
        drop(target);

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
