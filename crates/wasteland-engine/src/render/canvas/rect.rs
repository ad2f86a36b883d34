use bytemuck::{Pod, Zeroable};

use crate::canvas::{DrawCmd, DrawList};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    InstanceBuffer, UnitQuad, ViewportBuffer, begin_overlay_pass, overlay_pipeline, viewport_bgl_entry,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Everything tied to one surface format.
struct RectGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport: ViewportBuffer,
    quad: UnitQuad,
}

impl RectGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("wasteland rect bgl"),
            entries: &[viewport_bgl_entry()],
        });
        let pipeline = overlay_pipeline(
            ctx,
            "wasteland rect pipeline",
            include_str!("shaders/rect.wgsl"),
            &bgl,
            RectInstance::layout(),
        );

        let viewport = ViewportBuffer::new(ctx.device, "wasteland rect viewport");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wasteland rect bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: viewport.binding() }],
        });

        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport,
            quad: UnitQuad::new(ctx.device, "wasteland rect quad"),
        }
    }
}

/// Solid rectangles in logical pixels, premultiplied color.
pub struct RectRenderer {
    gpu: Option<RectGpu>,
    instances: InstanceBuffer<RectInstance>,
    scratch: Vec<RectInstance>,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self {
            gpu: None,
            instances: InstanceBuffer::new("wasteland rect instances"),
            scratch: Vec::new(),
        }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Rect` in `draw_list` into `target`, in paint order.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.scratch.clear();
        self.scratch.extend(draw_list.iter_in_paint_order().filter_map(|item| {
            let DrawCmd::Rect(cmd) = &item.cmd else { return None };
            let r = cmd.rect.normalized();
            (!r.is_empty()).then(|| RectInstance {
                origin: r.origin.to_array(),
                size: r.size.to_array(),
                color: cmd.color.to_array(),
            })
        }));
        if self.scratch.is_empty() {
            return;
        }

        if self.gpu.as_ref().is_none_or(|g| g.format != ctx.surface_format) {
            self.gpu = Some(RectGpu::new(ctx));
        }
        let Some(gpu) = self.gpu.as_ref() else { return };
        gpu.viewport.write(ctx);
        let Some(instances) = self.instances.upload(ctx, &self.scratch) else { return };

        let mut pass = begin_overlay_pass(target.encoder, target.color_view, "wasteland rect pass");
        pass.set_pipeline(&gpu.pipeline);
        pass.set_bind_group(0, &gpu.bind_group, &[]);
        gpu.quad.draw(&mut pass, instances, self.scratch.len() as u32);
    }
}
