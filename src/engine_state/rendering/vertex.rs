//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format produced by the mesher and consumed
//! by the mesh sink. There is no index buffer: every quad contributes six
//! vertices directly.

use cgmath::{Point3, Vector3};

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Local UV: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Layer: f32 (4 bytes)
/// - Tile: [f32; 2] (8 bytes)
///
/// Total size: 44 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// UV within the face, in voxel units so textures repeat across merged quads
    pub local_uv: [f32; 2],
    /// Outward face normal
    pub normal: [f32; 3],
    /// Index of the texture in the texture array
    pub layer: f32,
    /// Column and row of the atlas tile the face samples
    pub tile: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `position` - The vertex position in world space
    /// * `local_uv` - UV within the face tile, in voxel units
    /// * `normal` - The outward normal of the face
    /// * `layer` - Index of the texture in the texture array
    /// * `tile` - Atlas tile (column, row)
    pub fn new(
        position: Point3<f32>,
        local_uv: [f32; 2],
        normal: Vector3<f32>,
        layer: u32,
        tile: (u32, u32),
    ) -> Self {
        Vertex {
            position: [position.x, position.y, position.z],
            local_uv,
            normal: [normal.x, normal.y, normal.z],
            layer: layer as f32,
            tile: [tile.0 as f32, tile.1 as f32],
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: local_uv (vec2<f32>)
    /// - `location = 2`: normal (vec3<f32>)
    /// - `location = 3`: layer (f32)
    /// - `location = 4`: tile (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 44);
        assert_eq!(std::mem::size_of::<Vertex>(), 44);
        let last = layout.attributes.last().unwrap();
        assert_eq!(last.offset, 36);
        assert_eq!(last.shader_location, 4);
    }

    #[test]
    fn vertices_cast_to_bytes() {
        let v = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            [0.0, 4.0],
            Vector3::new(0.0, 1.0, 0.0),
            5,
            (1, 2),
        );
        let bytes: &[u8] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(bytes.len(), 44);
        assert_eq!(v.layer, 5.0);
        assert_eq!(v.tile, [1.0, 2.0]);
    }
}
