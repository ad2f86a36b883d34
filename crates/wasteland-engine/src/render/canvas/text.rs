use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::canvas::{DrawCmd, DrawList, TextCmd};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::FontSystem;

use super::common::{
    InstanceBuffer, UnitQuad, ViewportBuffer, begin_overlay_pass, overlay_pipeline, viewport_bgl_entry,
};

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── shelf packer ──────────────────────────────────────────────────────────

/// Row-based ("shelf") rectangle allocator over a square atlas.
#[derive(Debug, Clone)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    fn is_full(&self) -> bool {
        self.full
    }

    /// Top-left corner for a `w`×`h` cell, or `None` once the atlas is exhausted.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > self.size || w + 2 * GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }
        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

// ── glyph atlas ───────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone)]
struct AtlasSlot {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// R8 coverage atlas. Glyphs are rasterized on first use and kept for the
/// atlas lifetime, keyed by font, glyph index and pixel size.
struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    packer: ShelfPacker,
    slots: HashMap<GlyphRasterConfig, AtlasSlot>,
}

impl GlyphAtlas {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("wasteland glyph atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, packer: ShelfPacker::new(ATLAS_SIZE), slots: HashMap::new() }
    }

    /// Atlas slot for `key`, rasterizing and uploading it when new.
    fn slot(&mut self, queue: &wgpu::Queue, font: &fontdue::Font, key: GlyphRasterConfig) -> Option<AtlasSlot> {
        if let Some(slot) = self.slots.get(&key) {
            return Some(*slot);
        }

        let (metrics, bitmap) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }

        let was_full = self.packer.is_full();
        let Some((x, y)) = self.packer.place(w, h) else {
            if !was_full {
                log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); further glyphs are dropped");
            }
            return None;
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let s = ATLAS_SIZE as f32;
        let slot = AtlasSlot {
            uv_min: [x as f32 / s, y as f32 / s],
            uv_max: [(x + w) as f32 / s, (y + h) as f32 / s],
        };
        self.slots.insert(key, slot);
        Some(slot)
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

struct TextGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport: ViewportBuffer,
    quad: UnitQuad,
    atlas: GlyphAtlas,
}

impl TextGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("wasteland text bgl"),
            entries: &[
                viewport_bgl_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline = overlay_pipeline(
            ctx,
            "wasteland text pipeline",
            include_str!("shaders/text.wgsl"),
            &bgl,
            GlyphInstance::layout(),
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("wasteland glyph sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let atlas = GlyphAtlas::new(ctx.device);
        let viewport = ViewportBuffer::new(ctx.device, "wasteland text viewport");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wasteland text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: viewport.binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&atlas.view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport,
            quad: UnitQuad::new(ctx.device, "wasteland text quad"),
            atlas,
        }
    }
}

/// Renderer for `DrawCmd::Text`, laid out with fontdue.
pub struct TextRenderer {
    gpu: Option<TextGpu>,
    instances: InstanceBuffer<GlyphInstance>,
    scratch: Vec<GlyphInstance>,
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            gpu: None,
            instances: InstanceBuffer::new("wasteland glyph instances"),
            scratch: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        let cmds: Vec<&TextCmd> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(cmd) => Some(cmd),
                DrawCmd::Rect(_) => None,
            })
            .collect();
        if cmds.is_empty() {
            return;
        }

        if self.gpu.as_ref().is_none_or(|g| g.format != ctx.surface_format) {
            self.gpu = Some(TextGpu::new(ctx));
        }
        let Some(gpu) = self.gpu.as_mut() else { return };

        self.scratch.clear();
        for cmd in cmds {
            let Some(font) = fonts.get(cmd.font) else {
                log::warn!("unknown {:?}; text skipped", cmd.font);
                continue;
            };

            self.layout.reset(&LayoutSettings {
                x: cmd.origin.x,
                y: cmd.origin.y,
                max_width: cmd.max_width,
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size, 0));

            let color = cmd.color.to_array();
            for g in self.layout.glyphs() {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }
                let Some(slot) = gpu.atlas.slot(ctx.queue, font, g.key) else { continue };
                self.scratch.push(GlyphInstance {
                    dst_min: [g.x, g.y],
                    dst_max: [g.x + g.width as f32, g.y + g.height as f32],
                    uv_min: slot.uv_min,
                    uv_max: slot.uv_max,
                    color,
                });
            }
        }
        if self.scratch.is_empty() {
            return;
        }

        gpu.viewport.write(ctx);
        let Some(instances) = self.instances.upload(ctx, &self.scratch) else { return };

        let mut pass = begin_overlay_pass(target.encoder, target.color_view, "wasteland text pass");
        pass.set_pipeline(&gpu.pipeline);
        pass.set_bind_group(0, &gpu.bind_group, &[]);
        gpu.quad.draw(&mut pass, instances, self.scratch.len() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_fill_a_row_then_wrap() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(6, 4), Some((1, 1)));
        assert_eq!(p.place(6, 2), Some((8, 1)));
        // 15 + 6 + 1 > 16: next shelf starts below the tallest cell.
        assert_eq!(p.place(6, 3), Some((1, 6)));
    }

    #[test]
    fn exhausted_atlas_stays_full() {
        let mut p = ShelfPacker::new(8);
        assert_eq!(p.place(6, 6), Some((1, 1)));
        assert_eq!(p.place(6, 6), None);
        assert!(p.is_full());
        assert_eq!(p.place(1, 1), None);
    }
}
