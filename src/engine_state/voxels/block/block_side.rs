//! # Block Side Module
//!
//! This module defines the six faces of a voxel block.
//!
//! The face order is fixed and shared by the mesher, the atlas tile tables
//! and the vertex normals: faces come in pairs along each axis, positive
//! direction first, so `side ^ 1` is always the opposite face.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The right face (facing positive X)
    RIGHT = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Looks a face up by its index (0..6). Indices wrap modulo 6.
    pub fn from_index(index: usize) -> Self {
        Self::all()[index % 6]
    }

    /// The face for a given axis (0 = X, 1 = Y, 2 = Z) and direction.
    pub fn from_axis(axis: usize, positive: bool) -> Self {
        Self::from_index(axis * 2 + if positive { 0 } else { 1 })
    }

    /// The face's index in the canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The axis this face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// Whether the face points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        self.index() % 2 == 0
    }

    /// The face on the other side of the block.
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() ^ 1)
    }

    /// Integer offset to the neighboring voxel across this face.
    pub fn direction(self) -> Vector3<i32> {
        let mut dir = Vector3::new(0, 0, 0);
        dir[self.axis()] = if self.is_positive() { 1 } else { -1 };
        dir
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vector3<f32> {
        self.direction().cast::<f32>().unwrap_or(Vector3::new(0.0, 1.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_faces_pair_up() {
        for side in BlockSide::all() {
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.opposite().axis(), side.axis());
            assert_ne!(side.opposite().is_positive(), side.is_positive());
            assert_eq!(side.direction() + side.opposite().direction(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn axis_lookup_round_trips() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_axis(side.axis(), side.is_positive()), side);
        }
        assert_eq!(BlockSide::from_axis(1, true), BlockSide::TOP);
        assert_eq!(BlockSide::TOP.normal(), Vector3::new(0.0, 1.0, 0.0));
    }
}
