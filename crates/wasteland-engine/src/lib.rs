//! Wasteland engine crate.
//!
//! Platform and GPU runtime for the scene viewer: window + event loop, wgpu
//! device with a depth buffer, input state, frame timing, logging bootstrap
//! and the 2D canvas used by the debug overlay.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod canvas;
pub mod render;
pub mod text;
