/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// The viewer turns this off: its colors were authored against a linear
    /// framebuffer.
    pub prefer_srgb: bool,

    /// Present mode. `Fifo` is vsync and is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference; ignored when the surface lacks it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Format of the depth buffer that tracks the surface size.
    pub depth_format: wgpu::TextureFormat,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            depth_format: wgpu::TextureFormat::Depth32Float,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
