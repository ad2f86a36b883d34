use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;
use crate::render::RenderCtx;

use super::surface::{self, Swapchain};
use super::{DepthBuffer, GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue, swapchain and the depth buffer that tracks it.
///
/// `'w` is the window borrow held by the surface.
pub struct Gpu<'w> {
    swapchain: Swapchain<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    depth: DepthBuffer,
    size: PhysicalSize<u32>,
}

async fn open_device(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    init: &GpuInit,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no GPU adapter can present to this window")?;

    let info = adapter.get_info();
    log::info!("adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("wasteland device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("adapter refused the requested device")?;

    Ok((adapter, device, queue))
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).context("failed to create wgpu surface")?;
        let (adapter, device, queue) = open_device(&instance, &surface, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no formats")?;
        log::debug!("surface format {format:?}, present mode {:?}", init.present_mode);

        let swapchain = Swapchain::new(
            surface,
            wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: init.present_mode,
                alpha_mode: surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
                view_formats: vec![],
                desired_maximum_frame_latency: init.desired_maximum_frame_latency,
            },
        );
        swapchain.configure(&device);

        let depth = DepthBuffer::new(&device, init.depth_format, size);
        Ok(Self { swapchain, device, queue, depth, size })
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Context for renderers drawing at `viewport` (logical pixels).
    pub fn render_ctx(&self, viewport: Viewport) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, self.swapchain.format(), self.depth.format(), viewport)
    }

    /// Tracks a new window size. A minimized (0×0) window keeps the old
    /// swapchain and depth buffer until a real size arrives.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.swapchain.set_extent(&self.device, new_size);
        self.depth = DepthBuffer::new(&self.device, self.depth.format(), new_size);
    }

    /// Acquires the next image and records a pass clearing it to `clear` and
    /// depth to 1.0.
    pub fn begin_frame(&self, clear: wgpu::Color) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.swapchain.acquire()?;
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("wasteland frame encoder"),
        });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("wasteland clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear), store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth.view(),
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn recover(&self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        self.swapchain.recover(&self.device, err)
    }
}
