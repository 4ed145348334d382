//! # Block Type Module
//!
//! This module defines the materials a voxel can hold on the planet.
//! It provides the opacity classification used by the mesher and the
//! per-voxel face visibility rule.

use num_derive::FromPrimitive;

use super::{BlockTypeSize, BLOCK_TYPE_TO_LAYER};

/// Enumerates all possible block materials in the voxel world.
///
/// The discriminants are stable and match the compact `BlockTypeSize`
/// storage; `FromPrimitive` allows conversion back from that integer form.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never solid, never rendered.
    #[default]
    AIR = 0,

    /// The surface layer of dry land.
    GRASS,

    /// The shallow layer below the surface.
    DIRT,

    /// Deep rock, and the fallback material at the planet center.
    STONE,

    /// Beaches at or below sea level.
    SAND,

    /// Surface layer near the poles and on high ground.
    SNOW,

    /// Ocean. Rendered in its own transparent pass.
    WATER,
}

impl BlockType {
    /// Every block type, in discriminant order.
    pub const ALL: [BlockType; 7] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::SAND,
        BlockType::SNOW,
        BlockType::WATER,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Unknown values decode as `None`.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Returns the compact integer form of this block type.
    pub fn as_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether the block hides whatever is behind it.
    pub fn is_opaque(self) -> bool {
        self != BlockType::AIR && self != BlockType::WATER
    }

    /// Whether light (and the view) passes through the block.
    pub fn is_transparent(self) -> bool {
        self == BlockType::AIR || self == BlockType::WATER
    }

    /// Whether the block occupies space. Water counts as solid here.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// The texture-array layer sampled by faces of this block.
    pub fn texture_layer(self) -> u32 {
        BLOCK_TYPE_TO_LAYER[self as usize]
    }

    /// Per-voxel face visibility: should `self` draw the face it shares with `neighbor`?
    ///
    /// Water draws against air and against opaque blocks (shorelines), opaque
    /// blocks draw against anything that is not opaque, air never draws.
    pub fn should_render_face(self, neighbor: BlockType) -> bool {
        if self == BlockType::WATER {
            return neighbor == BlockType::AIR || neighbor.is_opaque();
        }
        if self.is_opaque() {
            return !neighbor.is_opaque();
        }
        false
    }
}
