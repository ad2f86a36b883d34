//! Procedural geometry for the billboard, flag and skybox.
//!
//! Texture coordinates put `v = 0` at the bottom of the image, matching the
//! vertical flip applied by [`super::load_texture`].

use super::Vertex;

const FACING_VIEWER: [f32; 3] = [0.0, 0.0, 1.0];

/// Unit quad in the XY plane, `x` in `[0, 1]`, `y` in `[-0.5, 0.5]`.
pub fn billboard_quad() -> (Vec<Vertex>, Vec<u32>) {
    let vertices = vec![
        Vertex::new([0.0, 0.5, 0.0], FACING_VIEWER, [0.0, 1.0]),
        Vertex::new([0.0, -0.5, 0.0], FACING_VIEWER, [0.0, 0.0]),
        Vertex::new([1.0, -0.5, 0.0], FACING_VIEWER, [1.0, 0.0]),
        Vertex::new([1.0, 0.5, 0.0], FACING_VIEWER, [1.0, 1.0]),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

pub const FLAG_WIDTH: f32 = 2.0;
pub const FLAG_HEIGHT: f32 = 1.2;

/// Flag cloth subdivided so the vertex wave has something to bend.
///
/// Hangs from a pole at `x = 0`; spans `[0, FLAG_WIDTH]` by
/// `[-FLAG_HEIGHT / 2, FLAG_HEIGHT / 2]`.
pub fn flag_grid(columns: u32, rows: u32) -> (Vec<Vertex>, Vec<u32>) {
    let (columns, rows) = (columns.max(1), rows.max(1));
    let mut vertices = Vec::with_capacity(((columns + 1) * (rows + 1)) as usize);
    for j in 0..=rows {
        let v = j as f32 / rows as f32;
        for i in 0..=columns {
            let u = i as f32 / columns as f32;
            let position = [u * FLAG_WIDTH, (v - 0.5) * FLAG_HEIGHT, 0.0];
            vertices.push(Vertex::new(position, FACING_VIEWER, [u, v]));
        }
    }

    let stride = columns + 1;
    let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
    for j in 0..rows {
        for i in 0..columns {
            let a = j * stride + i;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }
    (vertices, indices)
}

/// 36 positions of a cube of half-extent 1, every face wound to be seen
/// from inside.
pub fn skybox_cube() -> Vec<[f32; 3]> {
    const FACES: [[[f32; 3]; 4]; 6] = [
        // -Z
        [[-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0]],
        // -X
        [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]],
        // +X
        [[1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
        // +Z
        [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
        // +Y
        [[-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
        // -Y
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0]],
    ];

    let mut out = Vec::with_capacity(36);
    for [a, b, c, d] in FACES {
        out.extend_from_slice(&[a, b, c, c, d, a]);
    }
    out
}
