//! Static unit-cube mesh shared by every renderer session.

use bytemuck::{Pod, Zeroable};

/// One cube vertex as uploaded to the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

const fn v(x: f32, y: f32, z: f32, r: f32, g: f32, b: f32) -> Vertex {
    Vertex {
        position: [x, y, z],
        color: [r, g, b, 1.0],
    }
}

/// Corners of a cube spanning ±1, each colored by its octant.
static CUBE_VERTICES: [Vertex; 8] = [
    v(-1.0, -1.0, -1.0, 0.0, 0.0, 0.0),
    v(1.0, -1.0, -1.0, 1.0, 0.0, 0.0),
    v(1.0, 1.0, -1.0, 1.0, 1.0, 0.0),
    v(-1.0, 1.0, -1.0, 0.0, 1.0, 0.0),
    v(-1.0, -1.0, 1.0, 0.0, 0.0, 1.0),
    v(1.0, -1.0, 1.0, 1.0, 0.0, 1.0),
    v(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
    v(-1.0, 1.0, 1.0, 0.0, 1.0, 1.0),
];

/// Two triangles per face, wound clockwise when viewed from outside.
/// Draw with CW front faces and back-face culling.
#[rustfmt::skip]
static CUBE_INDICES: [u16; 36] = [
    0, 4, 5, 0, 5, 1,
    1, 5, 6, 1, 6, 2,
    2, 6, 7, 2, 7, 3,
    3, 7, 4, 3, 4, 0,
    4, 7, 6, 4, 6, 5,
    3, 0, 1, 3, 1, 2,
];

/// Immutable vertex/color/index data for the unit cube.
#[derive(Debug, Clone, Copy)]
pub struct MeshAsset {
    vertices: &'static [Vertex],
    indices: &'static [u16],
}

impl MeshAsset {
    pub fn unit_cube() -> Self {
        Self {
            vertices: &CUBE_VERTICES,
            indices: &CUBE_INDICES,
        }
    }

    pub fn vertices(&self) -> &'static [Vertex] {
        self.vertices
    }

    pub fn indices(&self) -> &'static [u16] {
        self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
