//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block material definitions and the six block faces.

pub mod block_side;
pub mod block_type;

pub use block_side::BlockSide;
pub use block_type::BlockType;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Maps each block type to its texture-array layer.
///
/// Indexed by `BlockType` as a `usize`. Air is never rendered; its entry only
/// keeps the table total.
pub static BLOCK_TYPE_TO_LAYER: [u32; 7] = [
    0, // AIR
    0, // GRASS
    1, // DIRT
    2, // STONE
    3, // SAND
    4, // SNOW
    5, // WATER
];
