//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - configuring the surface (swapchain) and the matching depth buffer
//! - acquiring frames and mapping surface errors to recovery actions

mod depth;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use depth::DepthBuffer;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
