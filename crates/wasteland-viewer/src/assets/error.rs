use std::path::PathBuf;

/// Why an asset could not be loaded. Callers log it and fall back.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("missing position data in mesh {0}")]
    MissingPositions(String),

    #[error("unsupported pixel format {0:?}")]
    UnsupportedFormat(gltf::image::Format),
}
