//! CPU-side asset loading.
//!
//! Every loader has an `_or_*` twin that logs the failure and hands back an
//! empty mesh or a black texture, so a missing file never stops the viewer.

mod error;
mod mesh;
mod shapes;
mod texture;

use std::path::Path;

pub use error::AssetError;
pub use mesh::{MeshData, SubMesh, Vertex, load_mesh, load_mesh_or_empty, smooth_normals};
pub use shapes::{FLAG_HEIGHT, FLAG_WIDTH, billboard_quad, flag_grid, skybox_cube};
pub use texture::{CubemapData, TextureData, load_cubemap, load_texture, load_texture_or_blank};

use crate::scene::SceneVariant;

/// Everything a scene variant reads from disk, indexed like the variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAssets {
    /// Parallel to [`SceneVariant::meshes`].
    pub meshes: Vec<MeshData>,
    pub billboard: Option<TextureData>,
    pub flag: Option<TextureData>,
    pub skybox: CubemapData,
}

impl SceneAssets {
    pub fn load(resources: &Path, scene: &SceneVariant) -> Self {
        log::info!("loading {:?} scene assets from {}", scene.kind, resources.display());

        let meshes = scene
            .meshes
            .iter()
            .map(|source| load_mesh_or_empty(&resources.join(source.path)))
            .collect();
        let billboard = scene.billboard_texture.map(|p| load_texture_or_blank(&resources.join(p)));
        let flag = scene.flag_texture.map(|p| load_texture_or_blank(&resources.join(p)));
        let skybox = load_cubemap(&scene.skybox_faces.map(|p| resources.join(p)));

        Self { meshes, billboard, flag, skybox }
    }
}
