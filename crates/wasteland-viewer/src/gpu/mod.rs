//! Replays composed frames on the GPU.
//!
//! [`StateMachine`] resolves a frame's command list into draw records on the
//! CPU; [`FrameExecutor`] turns those records into one render pass.

mod executor;
mod pipelines;
mod resources;
mod state_machine;
mod uniforms;

pub use executor::FrameExecutor;
pub use pipelines::PipelineKey;
pub use state_machine::{DrawKind, DrawRecord, RasterState, ResolvedFrame, StateMachine};
pub use uniforms::{DrawUniforms, UNIFORM_SLOT_SIZE};
