//! Screen-space geometry for the 2D canvas.
//!
//! Canonical space: logical pixels, origin top-left, +X right, +Y down.
//! Renderers convert to NDC in their vertex shaders using a viewport uniform.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::Rect;
pub use viewport::Viewport;
