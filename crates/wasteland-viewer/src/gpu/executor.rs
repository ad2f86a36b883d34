use wasteland_engine::render::{RenderCtx, RenderTarget};

use crate::assets::SceneAssets;
use crate::compose::Program;

use super::pipelines::{Layouts, PipelineCache, PipelineKey};
use super::resources::GpuScene;
use super::{DrawKind, DrawRecord, ResolvedFrame, UNIFORM_SLOT_SIZE};

const MIN_UNIFORM_SLOTS: usize = 32;

/// GPU half of frame execution: uploads the scene once, then encodes each
/// resolved frame into a single depth-tested pass.
pub struct FrameExecutor {
    layouts: Layouts,
    pipelines: PipelineCache,
    scene: GpuScene,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_slots: usize,
    scratch: Vec<u8>,
}

impl FrameExecutor {
    pub fn new(ctx: &RenderCtx<'_>, assets: &SceneAssets) -> Self {
        let layouts = Layouts::new(ctx.device);
        let pipelines = PipelineCache::new(ctx.device, &layouts, ctx.surface_format, ctx.depth_format);
        let scene = GpuScene::upload(ctx.device, ctx.queue, &layouts, assets);
        let (uniform_buffer, uniform_bind_group) = create_uniforms(ctx.device, &layouts, MIN_UNIFORM_SLOTS);

        Self {
            layouts,
            pipelines,
            scene,
            uniform_buffer,
            uniform_bind_group,
            uniform_slots: MIN_UNIFORM_SLOTS,
            scratch: Vec::new(),
        }
    }

    pub fn encode(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &ResolvedFrame) {
        if frame.draws.is_empty() {
            return;
        }
        let Some(depth_view) = target.depth_view else {
            log::warn!("scene pass needs a depth attachment; frame skipped");
            return;
        };

        for draw in &frame.draws {
            self.pipelines.ensure(ctx.device, key_of(draw));
        }
        self.write_uniforms(ctx, &frame.draws);

        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("wasteland scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (slot, draw) in frame.draws.iter().enumerate() {
            let Some(pipeline) = self.pipelines.get(&key_of(draw)) else { continue };
            pass.set_pipeline(pipeline);
            let offset = slot as u64 * UNIFORM_SLOT_SIZE;
            pass.set_bind_group(0, &self.uniform_bind_group, &[offset as u32]);
            self.draw_one(&mut pass, draw);
        }
    }

    fn draw_one(&self, pass: &mut wgpu::RenderPass<'_>, draw: &DrawRecord) {
        let scene = &self.scene;

        if draw.program == Program::Skybox {
            pass.set_bind_group(1, &scene.cubemap, &[]);
            match draw.kind {
                DrawKind::Skybox => scene.skybox.draw(pass),
                DrawKind::Billboard => scene.billboard.geometry.draw(pass),
                DrawKind::Flag => scene.flag.geometry.draw(pass),
                DrawKind::Mesh(id) => scene.mesh(id).iter().for_each(|p| p.geometry.draw(pass)),
            }
            return;
        }

        match draw.kind {
            DrawKind::Mesh(id) => {
                for part in scene.mesh(id) {
                    pass.set_bind_group(1, &part.material, &[]);
                    part.geometry.draw(pass);
                }
            }
            DrawKind::Billboard => {
                pass.set_bind_group(1, &scene.billboard.material, &[]);
                scene.billboard.geometry.draw(pass);
            }
            DrawKind::Flag => {
                pass.set_bind_group(1, &scene.flag.material, &[]);
                scene.flag.geometry.draw(pass);
            }
            DrawKind::Skybox => {
                pass.set_bind_group(1, &scene.blank_material, &[]);
                scene.skybox.draw(pass);
            }
        }
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, draws: &[DrawRecord]) {
        if draws.len() > self.uniform_slots {
            let slots = draws.len().next_power_of_two();
            log::debug!("growing uniform buffer to {slots} draws");
            (self.uniform_buffer, self.uniform_bind_group) = create_uniforms(ctx.device, &self.layouts, slots);
            self.uniform_slots = slots;
        }

        let slot = UNIFORM_SLOT_SIZE as usize;
        self.scratch.clear();
        self.scratch.resize(draws.len() * slot, 0);
        for (chunk, draw) in self.scratch.chunks_exact_mut(slot).zip(draws) {
            let bytes = bytemuck::bytes_of(&draw.uniforms);
            chunk[..bytes.len()].copy_from_slice(bytes);
        }
        ctx.queue.write_buffer(&self.uniform_buffer, 0, &self.scratch);
    }
}

fn key_of(draw: &DrawRecord) -> PipelineKey {
    PipelineKey { program: draw.program, raster: draw.raster }
}

fn create_uniforms(device: &wgpu::Device, layouts: &Layouts, slots: usize) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("wasteland draw uniforms"),
        size: slots as u64 * UNIFORM_SLOT_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("wasteland draw uniforms"),
        layout: &layouts.uniforms,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: super::DrawUniforms::min_binding_size(),
            }),
        }],
    });
    (buffer, bind_group)
}
