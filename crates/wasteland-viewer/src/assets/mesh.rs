use std::path::Path;

use glam::Vec3;

use super::{AssetError, TextureData, load_texture};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

/// One glTF primitive or OBJ group: a triangle list plus its diffuse texture.
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub diffuse: Option<TextureData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub submeshes: Vec<SubMesh>,
}

impl MeshData {
    /// Drawn as nothing.
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), submeshes: Vec::new() }
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len() / 3).sum()
    }
}

/// Loads a `.obj` file through [`load_obj`], anything else as glTF.
pub fn load_mesh(path: &Path) -> Result<MeshData, AssetError> {
    let is_obj = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    if is_obj { load_obj(path) } else { load_gltf(path) }
}

/// Loads every triangle primitive reachable from the file's scenes.
///
/// Node transforms are ignored: placements in the scene tables assume raw
/// mesh space.
pub fn load_gltf(path: &Path) -> Result<MeshData, AssetError> {
    let (document, buffers, images) = gltf::import(path)?;
    let name = path.display().to_string();

    let mut submeshes = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            walk_node(&node, &buffers, &images, &mut submeshes)?;
        }
    }

    Ok(MeshData { name, submeshes })
}

/// [`load_mesh`] that logs and degrades to [`MeshData::empty`].
pub fn load_mesh_or_empty(path: &Path) -> MeshData {
    match load_mesh(path) {
        Ok(mesh) => {
            log::info!(
                "loaded mesh {} ({} primitives, {} triangles)",
                path.display(),
                mesh.submeshes.len(),
                mesh.triangle_count()
            );
            mesh
        }
        Err(err) => {
            log::warn!("mesh {} failed to load: {err}", path.display());
            MeshData::empty(path.display().to_string())
        }
    }
}

fn walk_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    out: &mut Vec<SubMesh>,
) -> Result<(), AssetError> {
    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("unnamed");
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("skipping non-triangle primitive in {name}");
                continue;
            }
            out.push(read_primitive(name, &primitive, buffers, images)?);
        }
    }

    for child in node.children() {
        walk_node(&child, buffers, images, out)?;
    }
    Ok(())
}

fn read_primitive(
    name: &str,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<SubMesh, AssetError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingPositions(name.to_string()))?
        .collect();

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(iter) => iter.collect(),
        None => smooth_normals(&positions, &indices),
    };

    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().collect())
        .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

    let vertices = assemble(&positions, &normals, &uvs);

    let diffuse = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_texture()
        .and_then(|info| images.get(info.texture().source().index()))
        .and_then(|data| match TextureData::from_gltf(data) {
            Ok(tex) => Some(tex),
            Err(err) => {
                log::warn!("base color texture of {name} ignored: {err}");
                None
            }
        });

    Ok(SubMesh { vertices, indices, diffuse })
}

/// Loads a Wavefront OBJ, one submesh per object or group. Faces are
/// triangulated and re-indexed so positions, normals and UVs share one index.
///
/// Diffuse maps resolve against the OBJ's directory and are flipped like
/// standalone textures, since OBJ UVs start at the bottom left. A broken
/// material library only costs the textures.
pub fn load_obj(path: &Path) -> Result<MeshData, AssetError> {
    let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("materials of {} ignored: {err}", path.display());
        Vec::new()
    });

    let dir = path.parent().unwrap_or(Path::new(""));
    let diffuse: Vec<Option<TextureData>> = materials.iter().map(|m| obj_diffuse(m, dir)).collect();

    let submeshes = models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            let positions: Vec<[f32; 3]> = mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
            let normals: Vec<[f32; 3]> = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect()
            } else {
                smooth_normals(&positions, &mesh.indices)
            };
            let uvs: Vec<[f32; 2]> = mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect();

            SubMesh {
                vertices: assemble(&positions, &normals, &uvs),
                indices: mesh.indices,
                diffuse: mesh.material_id.and_then(|id| diffuse.get(id).cloned().flatten()),
            }
        })
        .collect();

    Ok(MeshData { name: path.display().to_string(), submeshes })
}

fn obj_diffuse(material: &tobj::Material, dir: &Path) -> Option<TextureData> {
    let file = material.diffuse_texture.as_deref()?;
    match load_texture(&dir.join(file)) {
        Ok(tex) => Some(tex),
        Err(err) => {
            log::warn!("diffuse map of material {} ignored: {err}", material.name);
            None
        }
    }
}

/// Zips per-vertex attributes. Short normal or UV arrays fall back to +Y
/// and the origin.
fn assemble(positions: &[[f32; 3]], normals: &[[f32; 3]], uvs: &[[f32; 2]]) -> Vec<Vertex> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let n = normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            let uv = uvs.get(i).copied().unwrap_or([0.0, 0.0]);
            Vertex::new(p, n, uv)
        })
        .collect()
}

/// Area-weighted vertex normals for meshes that ship without them.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (Vec3::from(positions[a]), Vec3::from(positions[b]), Vec3::from(positions[c]));
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter().map(|n| n.normalize_or(Vec3::Y).to_array()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normals_of_a_ccw_triangle_face_the_viewer() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert_eq!(n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn shared_vertex_averages_adjacent_faces() {
        // Two faces folded 90° along the x axis.
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let normals = smooth_normals(&positions, &[0, 1, 2, 0, 3, 1]);
        let shared = Vec3::from(normals[0]);
        assert!(shared.abs_diff_eq(Vec3::new(0.0, 1.0, 1.0).normalize(), 1e-6));
    }

    #[test]
    fn unreferenced_vertices_get_a_fallback_normal() {
        let normals = smooth_normals(&[[0.0; 3]; 2], &[]);
        assert_eq!(normals, vec![[0.0, 1.0, 0.0]; 2]);
    }

    #[test]
    fn missing_file_degrades_to_an_empty_mesh() {
        let mesh = load_mesh_or_empty(Path::new("/no/such/scene.gltf"));
        assert!(mesh.submeshes.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn missing_file_is_a_gltf_error() {
        assert!(matches!(load_mesh(Path::new("/no/such/scene.gltf")), Err(AssetError::Gltf(_))));
    }

    // ── obj ───────────────────────────────────────────────────────────────

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("wasteland-obj-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    const UNIT_QUAD_OBJ: &str = "\
mtllib quad.mtl
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl bone
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn obj_extension_picks_the_obj_loader() {
        assert!(matches!(load_mesh(Path::new("/no/such/Fox Skull.OBJ")), Err(AssetError::Obj(_))));
    }

    #[test]
    fn obj_quad_is_triangulated_with_its_diffuse_map() {
        let dir = scratch_dir("quad");
        std::fs::write(dir.join("quad.obj"), UNIT_QUAD_OBJ).expect("write obj");
        std::fs::write(dir.join("quad.mtl"), "newmtl bone\nmap_Kd bone.png\n").expect("write mtl");
        let img = image::RgbaImage::from_fn(1, 2, |_, y| image::Rgba(if y == 0 { [255, 0, 0, 255] } else { [0, 0, 255, 255] }));
        img.save(dir.join("bone.png")).expect("write png");

        let mesh = load_mesh(&dir.join("quad.obj")).expect("quad loads");
        assert_eq!(mesh.submeshes.len(), 1);
        assert_eq!(mesh.triangle_count(), 2);

        let quad = &mesh.submeshes[0];
        assert_eq!(quad.vertices.len(), 4);
        assert!(quad.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        let corner = quad.vertices.iter().find(|v| v.position == [1.0, 1.0, 0.0]).expect("corner");
        assert_eq!(corner.uv, [1.0, 1.0]);

        // Flipped: the first row is the image's bottom (blue).
        let tex = quad.diffuse.as_ref().expect("diffuse map");
        assert_eq!((tex.width, tex.height), (1, 2));
        assert_eq!(tex.rgba[..4], [0, 0, 255, 255]);
    }

    #[test]
    fn obj_without_normals_or_materials_still_loads() {
        let dir = scratch_dir("bare");
        let path = dir.join("bare.obj");
        std::fs::write(&path, "mtllib gone.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").expect("write obj");

        let mesh = load_mesh_or_empty(&path);
        assert_eq!(mesh.triangle_count(), 1);
        let tri = &mesh.submeshes[0];
        assert!(tri.diffuse.is_none());
        assert!(tri.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
