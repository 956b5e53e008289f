//! A drawable GPU mesh — write-once vertex/index buffers plus the index
//! count.
//!
//! Meshes are cheaply cloneable because the underlying buffers are `Arc`-
//! wrapped; cloning a mesh (or resolving it into a draw command) never
//! copies GPU memory.  Destruction is explicit: removing the mesh from its
//! [`crate::resources::Assets`] pool drops the last `Arc` and releases the
//! buffers.

use std::sync::Arc;

use crate::resources::buffer;

use super::vertex::Vertex;

#[derive(Clone)]
pub struct Mesh {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_count: u32,
}

impl Mesh {
    /// Uploads `vertices` and `indices` (triangle list) into write-once GPU
    /// buffers.  Empty spans are allowed and produce a zero-length draw.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        Self {
            vertex_buffer: buffer::create_vertex(device, "Mesh Vertices", vertices),
            index_buffer: buffer::create_index(device, "Mesh Indices", indices),
            index_count: indices.len() as u32,
        }
    }

    /// One oversized triangle covering the whole viewport in clip space —
    /// the post-process pass geometry.
    pub fn fullscreen_triangle(device: &wgpu::Device) -> Self {
        Self::new(device, &fullscreen_triangle_vertices(), &[0, 1, 2])
    }
}

/// The three hardcoded clip-space vertices of the fullscreen triangle.
pub fn fullscreen_triangle_vertices() -> [Vertex; 3] {
    [
        Vertex::from_position([-1.0, -1.0, 0.0]),
        Vertex::from_position([-1.0, 3.0, 0.0]),
        Vertex::from_position([3.0, -1.0, 0.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_triangle_covers_clip_space() {
        let verts = fullscreen_triangle_vertices();
        // The triangle must contain the whole [-1, 1] square; check the
        // corners with barycentric sign tests against each edge.
        let contains = |px: f32, py: f32| {
            let (ax, ay) = (verts[0].position[0], verts[0].position[1]);
            let (bx, by) = (verts[1].position[0], verts[1].position[1]);
            let (cx, cy) = (verts[2].position[0], verts[2].position[1]);
            let sign = |x0: f32, y0: f32, x1: f32, y1: f32| {
                (px - x1) * (y0 - y1) - (x0 - x1) * (py - y1)
            };
            let d1 = sign(ax, ay, bx, by);
            let d2 = sign(bx, by, cx, cy);
            let d3 = sign(cx, cy, ax, ay);
            let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
            let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
            !(has_neg && has_pos)
        };
        for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            assert!(contains(x, y), "corner ({x}, {y}) outside fullscreen triangle");
        }
    }
}
