//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer.

mod commands;
mod runtime;

pub use commands::{CursorMode, RuntimeCtx};
pub use runtime::{Runtime, RuntimeConfig};
