use bytemuck::{Pod, Zeroable};

/// Interleaved triangle vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;
pub const COLOR_OFFSET: u32 = std::mem::size_of::<[f32; 3]>() as u32;
pub const VERTEX_COUNT: u32 = TRIANGLE.len() as u32;

pub const TRIANGLE: [Vertex; 3] = [
    // top
    Vertex { position: [0.0, 0.3, 0.0], color: [1.0, 0.0, 0.0, 1.0] },
    // bottom left
    Vertex { position: [-0.26, -0.15, 0.0], color: [0.0, 1.0, 0.0, 1.0] },
    // bottom right
    Vertex { position: [0.26, -0.15, 0.0], color: [0.0, 0.0, 1.0, 1.0] },
];

/// Vertex bytes as uploaded to the geometry buffer (native-endian f32).
pub fn triangle_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&TRIANGLE)
}
