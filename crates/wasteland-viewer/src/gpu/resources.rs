//! Scene geometry and textures living on the GPU.

use wgpu::util::DeviceExt;

use crate::assets::{
    CubemapData, MeshData, SceneAssets, TextureData, Vertex, billboard_quad, flag_grid, skybox_cube,
};
use crate::scene::MeshId;

use super::pipelines::Layouts;

const FLAG_COLUMNS: u32 = 40;
const FLAG_ROWS: u32 = 20;

pub struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    count: u32,
}

impl GpuGeometry {
    fn indexed(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vertex_buffer, index_buffer: Some(index_buffer), count: indices.len() as u32 }
    }

    fn unindexed(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { vertex_buffer, index_buffer: None, count: vertices.len() as u32 }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(ib) => {
                pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.count, 0, 0..1);
            }
            None => pass.draw(0..self.count, 0..1),
        }
    }
}

/// Geometry plus the material it is drawn with.
pub struct GpuPart {
    pub geometry: GpuGeometry,
    pub material: wgpu::BindGroup,
}

pub struct GpuScene {
    meshes: Vec<Vec<GpuPart>>,
    pub billboard: GpuPart,
    pub flag: GpuPart,
    pub skybox: GpuGeometry,
    pub cubemap: wgpu::BindGroup,
    /// Black diffuse and specular.
    pub blank_material: wgpu::BindGroup,
}

impl GpuScene {
    pub fn mesh(&self, id: MeshId) -> &[GpuPart] {
        self.meshes.get(id.0).map_or(&[], Vec::as_slice)
    }

    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, layouts: &Layouts, assets: &SceneAssets) -> Self {
        let uploader = Uploader::new(device, queue, layouts);
        let blank = uploader.texture("wasteland blank texture", &TextureData::blank());

        let meshes = assets.meshes.iter().map(|mesh| uploader.mesh(mesh, &blank)).collect();

        let (quad_vertices, quad_indices) = billboard_quad();
        let billboard_tex = assets.billboard.as_ref().map(|t| uploader.texture("wasteland billboard", t));
        let billboard = GpuPart {
            geometry: GpuGeometry::indexed(device, "wasteland billboard", &quad_vertices, &quad_indices),
            material: uploader.material(billboard_tex.as_ref().unwrap_or(&blank), &blank),
        };

        let (flag_vertices, flag_indices) = flag_grid(FLAG_COLUMNS, FLAG_ROWS);
        let flag_tex = assets.flag.as_ref().map(|t| uploader.texture("wasteland flag", t));
        let flag = GpuPart {
            geometry: GpuGeometry::indexed(device, "wasteland flag", &flag_vertices, &flag_indices),
            material: uploader.material(flag_tex.as_ref().unwrap_or(&blank), &blank),
        };

        let cube_vertices: Vec<Vertex> =
            skybox_cube().into_iter().map(|p| Vertex::new(p, [0.0; 3], [0.0; 2])).collect();
        let skybox = GpuGeometry::unindexed(device, "wasteland skybox", &cube_vertices);
        let cubemap = uploader.cubemap(&assets.skybox);

        let blank_material = uploader.material(&blank, &blank);

        log::info!("uploaded {} meshes to the GPU", assets.meshes.len());
        Self { meshes, billboard, flag, skybox, cubemap, blank_material }
    }
}

struct Uploader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    layouts: &'a Layouts,
    repeat_sampler: wgpu::Sampler,
    clamp_sampler: wgpu::Sampler,
}

impl<'a> Uploader<'a> {
    fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, layouts: &'a Layouts) -> Self {
        let sampler = |label, mode| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(label),
                address_mode_u: mode,
                address_mode_v: mode,
                address_mode_w: mode,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            })
        };
        Self {
            device,
            queue,
            layouts,
            repeat_sampler: sampler("wasteland material sampler", wgpu::AddressMode::Repeat),
            clamp_sampler: sampler("wasteland cubemap sampler", wgpu::AddressMode::ClampToEdge),
        }
    }

    fn upload_layers(&self, label: &str, width: u32, height: u32, layers: &[&[u8]]) -> wgpu::Texture {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: layers.len() as u32 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, pixels) in layers.iter().enumerate() {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d { x: 0, y: 0, z: layer as u32 },
                    aspect: wgpu::TextureAspect::All,
                },
                pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            );
        }
        texture
    }

    fn texture(&self, label: &str, data: &TextureData) -> wgpu::TextureView {
        self.upload_layers(label, data.width, data.height, &[&data.rgba])
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn cubemap(&self, data: &CubemapData) -> wgpu::BindGroup {
        let layers: Vec<&[u8]> = data.faces.iter().map(Vec::as_slice).collect();
        let view = self
            .upload_layers("wasteland skybox cubemap", data.size, data.size, &layers)
            .create_view(&wgpu::TextureViewDescriptor {
                dimension: Some(wgpu::TextureViewDimension::Cube),
                ..Default::default()
            });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wasteland cubemap bind group"),
            layout: &self.layouts.cubemap,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.clamp_sampler) },
            ],
        })
    }

    fn material(&self, diffuse: &wgpu::TextureView, specular: &wgpu::TextureView) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wasteland material bind group"),
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(diffuse) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(specular) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&self.repeat_sampler) },
            ],
        })
    }

    fn mesh(&self, mesh: &MeshData, blank: &wgpu::TextureView) -> Vec<GpuPart> {
        mesh.submeshes
            .iter()
            .filter(|s| !s.indices.is_empty())
            .map(|sub| {
                let diffuse = sub.diffuse.as_ref().map(|t| self.texture(&mesh.name, t));
                GpuPart {
                    geometry: GpuGeometry::indexed(self.device, &mesh.name, &sub.vertices, &sub.indices),
                    material: self.material(diffuse.as_ref().unwrap_or(blank), blank),
                }
            })
            .collect()
    }
}
