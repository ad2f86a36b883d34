//! Canvas renderers for the 2D overlay.

mod common;

pub mod rect;
pub mod text;

pub use rect::RectRenderer;
pub use text::TextRenderer;

use crate::canvas::DrawList;
use crate::text::FontSystem;

use super::{RenderCtx, RenderTarget};

/// Rect + text renderers driven together, rects first.
#[derive(Default)]
pub struct CanvasRenderer {
    rects: RectRenderer,
    text: TextRenderer,
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        if draw_list.is_empty() {
            return;
        }
        self.rects.render(ctx, target, draw_list);
        self.text.render(ctx, target, draw_list, fonts);
    }
}
