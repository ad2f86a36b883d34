//! Bind group layouts and the `(program, raster state)` pipeline cache.

use std::collections::HashMap;

use crate::assets::Vertex;
use crate::compose::{DepthCompare, Program};

use super::{DrawUniforms, RasterState};

// ── layouts ───────────────────────────────────────────────────────────────

pub struct Layouts {
    /// Group 0: per-draw uniform snapshot behind a dynamic offset.
    pub uniforms: wgpu::BindGroupLayout,
    /// Group 1 for textured programs: diffuse, specular, sampler.
    pub material: wgpu::BindGroupLayout,
    /// Group 1 for the skybox: cube texture, sampler.
    pub cubemap: wgpu::BindGroupLayout,
}

fn texture_entry(binding: u32, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("wasteland uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: DrawUniforms::min_binding_size(),
                },
                count: None,
            }],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("wasteland material bgl"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                texture_entry(1, wgpu::TextureViewDimension::D2),
                sampler_entry(2),
            ],
        });

        let cubemap = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("wasteland cubemap bgl"),
            entries: &[texture_entry(0, wgpu::TextureViewDimension::Cube), sampler_entry(1)],
        });

        Self { uniforms, material, cubemap }
    }

    pub fn group1(&self, program: Program) -> &wgpu::BindGroupLayout {
        match program {
            Program::Skybox => &self.cubemap,
            Program::Lighting | Program::Flag | Program::Blend => &self.material,
        }
    }
}

// ── fixed function ────────────────────────────────────────────────────────

/// `src_alpha, one_minus_src_alpha` on both color and alpha.
fn alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

fn compare_function(depth: DepthCompare) -> wgpu::CompareFunction {
    match depth {
        DepthCompare::Less => wgpu::CompareFunction::Less,
        DepthCompare::LessEqual => wgpu::CompareFunction::LessEqual,
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

fn shader_source(program: Program) -> &'static str {
    match program {
        Program::Lighting => include_str!("shaders/lighting.wgsl"),
        Program::Flag => include_str!("shaders/flag.wgsl"),
        Program::Blend => include_str!("shaders/blend.wgsl"),
        Program::Skybox => include_str!("shaders/skybox.wgsl"),
    }
}

fn program_label(program: Program) -> &'static str {
    match program {
        Program::Lighting => "lighting",
        Program::Flag => "flag",
        Program::Blend => "blend",
        Program::Skybox => "skybox",
    }
}

// ── cache ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    pub program: Program,
    pub raster: RasterState,
}

/// Pipelines are built on first use and kept. Shader modules and pipeline
/// layouts are built once per program.
pub struct PipelineCache {
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    modules: Vec<wgpu::ShaderModule>,
    layouts: Vec<wgpu::PipelineLayout>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let modules = Program::ALL
            .iter()
            .map(|&program| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(program_label(program)),
                    source: wgpu::ShaderSource::Wgsl(shader_source(program).into()),
                })
            })
            .collect();

        let pipeline_layouts = Program::ALL
            .iter()
            .map(|&program| {
                device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(program_label(program)),
                    bind_group_layouts: &[&layouts.uniforms, layouts.group1(program)],
                    immediate_size: 0,
                })
            })
            .collect();

        Self {
            color_format,
            depth_format,
            modules,
            layouts: pipeline_layouts,
            pipelines: HashMap::new(),
        }
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    pub fn ensure(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        log::debug!("building {key:?} pipeline ({} cached)", self.pipelines.len());

        let index = key.program.index();
        let module = &self.modules[index];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program_label(key.program)),
            layout: Some(&self.layouts[index]),

            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.raster.cull.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: self.depth_format,
                depth_write_enabled: true,
                depth_compare: compare_function(key.raster.depth),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert(key, pipeline);
    }
}
