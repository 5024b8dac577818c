//! CPU-side mesh data and generators.

use glam::Vec3;

use super::BoundingBox;

/// Interleaved vertex: position + normal + uv (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// A triangle mesh kept on the CPU until a renderer turns it into a model.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    label: Option<String>,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Generate an axis-aligned box centered on the origin with the given
    /// full dimensions. 24 vertices (4 per face) so every face gets flat normals.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let (x, y, z) = (h.x, h.y, h.z);

        // [px, py, pz, nx, ny, nz, u, v]
        #[rustfmt::skip]
        let verts: [[f32; 8]; 24] = [
            // +X
            [ x,-y,-z,  1.0, 0.0, 0.0, 0.0,1.0], [ x, y,-z,  1.0, 0.0, 0.0, 0.0,0.0],
            [ x, y, z,  1.0, 0.0, 0.0, 1.0,0.0], [ x,-y, z,  1.0, 0.0, 0.0, 1.0,1.0],
            // -X
            [-x,-y, z, -1.0, 0.0, 0.0, 0.0,1.0], [-x, y, z, -1.0, 0.0, 0.0, 0.0,0.0],
            [-x, y,-z, -1.0, 0.0, 0.0, 1.0,0.0], [-x,-y,-z, -1.0, 0.0, 0.0, 1.0,1.0],
            // +Y
            [-x, y,-z,  0.0, 1.0, 0.0, 0.0,1.0], [-x, y, z,  0.0, 1.0, 0.0, 0.0,0.0],
            [ x, y, z,  0.0, 1.0, 0.0, 1.0,0.0], [ x, y,-z,  0.0, 1.0, 0.0, 1.0,1.0],
            // -Y
            [-x,-y, z,  0.0,-1.0, 0.0, 0.0,1.0], [-x,-y,-z,  0.0,-1.0, 0.0, 0.0,0.0],
            [ x,-y,-z,  0.0,-1.0, 0.0, 1.0,0.0], [ x,-y, z,  0.0,-1.0, 0.0, 1.0,1.0],
            // +Z
            [-x,-y, z,  0.0, 0.0, 1.0, 0.0,1.0], [ x,-y, z,  0.0, 0.0, 1.0, 1.0,1.0],
            [ x, y, z,  0.0, 0.0, 1.0, 1.0,0.0], [-x, y, z,  0.0, 0.0, 1.0, 0.0,0.0],
            // -Z
            [ x,-y,-z,  0.0, 0.0,-1.0, 0.0,1.0], [-x,-y,-z,  0.0, 0.0,-1.0, 1.0,1.0],
            [-x, y,-z,  0.0, 0.0,-1.0, 1.0,0.0], [ x, y,-z,  0.0, 0.0,-1.0, 0.0,0.0],
        ];

        let vertices = verts
            .iter()
            .map(|v| MeshVertex {
                position: [v[0], v[1], v[2]],
                normal: [v[3], v[4], v[5]],
                uv: [v[6], v[7]],
            })
            .collect();

        #[rustfmt::skip]
        let indices = vec![
             0, 1, 2,  0, 2, 3,   // +X
             4, 5, 6,  4, 6, 7,   // -X
             8, 9,10,  8,10,11,   // +Y
            12,13,14, 12,14,15,   // -Y
            16,17,18, 16,18,19,   // +Z
            20,21,22, 20,22,23,   // -Z
        ];

        Self::new(vertices, indices).with_label("cuboid")
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    /// Raw vertex bytes, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Local-space bounds of all vertex positions.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }
}
