//! 2D canvas draw stream.
//!
//! The debug overlay records rectangles and text here; `render::canvas`
//! turns the stream into GPU work. Items are painted by layer, then by
//! insertion order within a layer.

mod cmd;
mod list;

pub use cmd::{DrawCmd, RectCmd, TextCmd};
pub use list::{DrawItem, DrawList, Layer};
