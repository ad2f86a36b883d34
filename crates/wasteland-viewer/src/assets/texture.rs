use std::path::Path;

use super::AssetError;

/// Decoded RGBA8 pixels, rows top to bottom as uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// 1×1 transparent black; what a failed load samples as.
    pub fn blank() -> Self {
        Self::zeroed(1, 1)
    }

    pub fn zeroed(width: u32, height: u32) -> Self {
        Self { width, height, rgba: vec![0; (width * height * 4) as usize] }
    }

    pub fn flip_vertically(&mut self) {
        let row = (self.width * 4) as usize;
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.rgba.split_at_mut((h - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// Converts a decoded glTF image. 8-bit formats only.
    pub fn from_gltf(data: &gltf::image::Data) -> Result<Self, AssetError> {
        use gltf::image::Format;

        let rgba = match data.format {
            Format::R8G8B8A8 => data.pixels.clone(),
            Format::R8G8B8 => data.pixels.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
            Format::R8G8 => data.pixels.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
            Format::R8 => data.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
            other => return Err(AssetError::UnsupportedFormat(other)),
        };
        Ok(Self { width: data.width, height: data.height, rgba })
    }
}

/// Loads a standalone 2D texture, flipped so the first row is the image bottom.
pub fn load_texture(path: &Path) -> Result<TextureData, AssetError> {
    let img = image::open(path)
        .map_err(|source| AssetError::Image { path: path.to_path_buf(), source })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let mut tex = TextureData { width, height, rgba: img.into_raw() };
    tex.flip_vertically();
    Ok(tex)
}

/// [`load_texture`] that logs and degrades to [`TextureData::blank`].
pub fn load_texture_or_blank(path: &Path) -> TextureData {
    match load_texture(path) {
        Ok(tex) => {
            log::debug!("loaded texture {} ({}x{})", path.display(), tex.width, tex.height);
            tex
        }
        Err(err) => {
            log::warn!("texture failed to load: {err}");
            TextureData::blank()
        }
    }
}

/// Six square faces of equal size, in upload order.
#[derive(Debug, Clone, PartialEq)]
pub struct CubemapData {
    pub size: u32,
    pub faces: [Vec<u8>; 6],
}

impl CubemapData {
    pub fn blank() -> Self {
        Self { size: 1, faces: std::array::from_fn(|_| vec![0; 4]) }
    }
}

/// Loads six faces. Faces that fail to load, or whose size differs from the
/// first good face, stay black.
pub fn load_cubemap<P: AsRef<Path>>(faces: &[P; 6]) -> CubemapData {
    let mut loaded: [Option<TextureData>; 6] = Default::default();
    for (slot, path) in loaded.iter_mut().zip(faces) {
        let path = path.as_ref();
        match load_texture(path) {
            Ok(tex) => *slot = Some(tex),
            Err(err) => log::warn!("cubemap face failed to load: {err}"),
        }
    }

    let Some(size) = loaded.iter().flatten().map(|t| t.width).next() else {
        return CubemapData::blank();
    };
    let face_len = (size * size * 4) as usize;

    let faces = std::array::from_fn(|i| match loaded[i].take() {
        Some(tex) if tex.width == size && tex.height == size => tex.rgba,
        Some(tex) => {
            log::warn!(
                "cubemap face {} is {}x{}, expected {size}x{size}",
                faces[i].as_ref().display(),
                tex.width,
                tex.height
            );
            vec![0; face_len]
        }
        None => vec![0; face_len],
    });
    CubemapData { size, faces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wasteland-texture-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn write_png(path: &Path, w: u32, h: u32, top: [u8; 4], bottom: [u8; 4]) {
        let img = image::RgbaImage::from_fn(w, h, |_, y| image::Rgba(if y == 0 { top } else { bottom }));
        img.save(path).expect("write png");
    }

    // ── pixels ────────────────────────────────────────────────────────────

    #[test]
    fn flip_swaps_rows() {
        let mut tex = TextureData { width: 1, height: 3, rgba: (0..12).collect() };
        tex.flip_vertically();
        assert_eq!(tex.rgba, vec![8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3]);
    }

    #[test]
    fn gltf_rgb_gains_opaque_alpha() {
        let data = gltf::image::Data {
            pixels: vec![1, 2, 3, 4, 5, 6],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let tex = TextureData::from_gltf(&data).expect("8-bit rgb converts");
        assert_eq!(tex.rgba, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    // ── files ─────────────────────────────────────────────────────────────

    #[test]
    fn loaded_texture_starts_at_the_bottom_row() {
        let dir = scratch_dir("flip");
        let path = dir.join("two_rows.png");
        write_png(&path, 1, 2, [255, 0, 0, 255], [0, 0, 255, 255]);

        let tex = load_texture(&path).expect("png loads");
        assert_eq!((tex.width, tex.height), (1, 2));
        assert_eq!(&tex.rgba[..4], &[0, 0, 255, 255]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_texture_degrades_to_blank() {
        let tex = load_texture_or_blank(Path::new("/definitely/not/here.png"));
        assert_eq!(tex, TextureData::blank());
    }

    #[test]
    fn cubemap_fills_missing_faces_with_black() {
        let dir = scratch_dir("cube");
        let good = dir.join("face.png");
        write_png(&good, 2, 2, [10, 20, 30, 255], [10, 20, 30, 255]);
        let missing = dir.join("missing.png");

        let faces = [&good, &missing, &good, &good, &good, &good];
        let cube = load_cubemap(&faces);
        assert_eq!(cube.size, 2);
        assert!(cube.faces[1].iter().all(|&b| b == 0));
        assert_eq!(&cube.faces[0][..4], &[10, 20, 30, 255]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn cubemap_with_no_faces_is_blank() {
        let p = Path::new("/nope.jpg");
        assert_eq!(load_cubemap(&[p; 6]), CubemapData::blank());
    }
}
