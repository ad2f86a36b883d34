//! Wasteland scene viewer.
//!
//! A fixed, hand-placed scene (campfire or outpost) rendered with a point
//! light, an optional directional light, a skybox and a keyboard-driven
//! debug overlay. Frame composition is renderer-agnostic: [`compose`] emits
//! a [`compose::FrameList`] and [`gpu`] replays it against wgpu.

pub mod app;
pub mod assets;
pub mod camera;
pub mod cli;
pub mod compose;
pub mod gpu;
pub mod light;
pub mod overlay;
pub mod scene;
pub mod settings;
pub mod state;
