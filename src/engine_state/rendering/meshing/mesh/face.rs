//! Quad emission for merged faces.
//!
//! A merged rectangle lives on a slice plane perpendicular to one axis and is
//! described by its extent in the two remaining axes. This module turns it
//! into six vertices with counter-clockwise winding seen from outside.

use cgmath::Point3;

use crate::engine_state::{
    rendering::vertex::Vertex,
    voxels::block::{BlockSide, BlockType},
};

/// Maps the canonical corners `Q0..Q3` of a rectangle, taken in (u, v) order
/// as (i, j), (i+w, j), (i+w, j+h), (i, j+h), to the emission order for each
/// face index. Keeps every face wound counter-clockwise around its normal.
pub const FACE_Q_MAP: [[usize; 4]; 6] = [
    [0, 1, 2, 3], // +X
    [3, 2, 1, 0], // -X
    [1, 2, 3, 0], // +Y
    [0, 3, 2, 1], // -Y
    [1, 2, 3, 0], // +Z
    [0, 3, 2, 1], // -Z
];

/// Corner indices of the two triangles of a quad.
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// A merged rectangle of identical faces on one slice plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Axis the plane is perpendicular to (0 = X, 1 = Y, 2 = Z)
    pub axis: usize,
    /// Plane position along `axis`, in chunk-local voxel units (0..=16)
    pub slice: i32,
    /// Start along the first in-plane axis, `(axis + 1) % 3`
    pub i: i32,
    /// Start along the second in-plane axis, `(axis + 2) % 3`
    pub j: i32,
    /// Extent along the first in-plane axis
    pub width: i32,
    /// Extent along the second in-plane axis
    pub height: i32,
    pub block: BlockType,
    pub side: BlockSide,
    pub tile: (u32, u32),
}

impl Quad {
    /// World-space corners in canonical (u, v) order.
    fn canonical_corners(&self, origin: Point3<i32>) -> [Point3<f32>; 4] {
        let u = (self.axis + 1) % 3;
        let v = (self.axis + 2) % 3;
        let corner = |du: i32, dv: i32| {
            let mut p = Point3::new(0, 0, 0);
            p[self.axis] = self.slice;
            p[u] = self.i + du;
            p[v] = self.j + dv;
            Point3::new(
                (origin.x + p.x) as f32,
                (origin.y + p.y) as f32,
                (origin.z + p.z) as f32,
            )
        };
        [
            corner(0, 0),
            corner(self.width, 0),
            corner(self.width, self.height),
            corner(0, self.height),
        ]
    }

    /// Appends the quad's six vertices to `out`.
    ///
    /// Local UVs span `0..width` and `0..height` so the tile repeats once per
    /// voxel instead of stretching across the merged rectangle.
    pub fn emit(&self, origin: Point3<i32>, out: &mut Vec<Vertex>) {
        let q = self.canonical_corners(origin);
        let (w, h) = (self.width as f32, self.height as f32);
        let q_uv = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];

        let map = &FACE_Q_MAP[self.side.index()];
        let normal = self.side.normal();
        let layer = self.block.texture_layer();

        for corner in QUAD_TRIANGLES {
            let c = map[corner];
            out.push(Vertex::new(q[c], q_uv[c], normal, layer, self.tile));
        }
    }
}
