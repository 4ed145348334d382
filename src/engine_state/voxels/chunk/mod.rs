//! # Chunk Module
//!
//! This module provides the `Chunk` struct and the coordinate math for
//! addressing 16x16x16 cubes of voxel data.
//!
//! ## Coordinate spaces
//!
//! - **World voxel coordinates**: integer position of a voxel; the voxel
//!   occupies the unit cube `[x, x+1) × [y, y+1) × [z, z+1)`.
//! - **Chunk coordinates** (`ChunkCoord`): position of a chunk on the chunk
//!   grid, in chunk units.
//! - **Local coordinates**: position of a voxel inside its chunk, each
//!   component in `[0, CHUNK_DIMENSION)`.
//!
//! Conversions use floor division and a non-negative modulo so negative
//! world coordinates land in the right chunk.
//!
//! ## Lifecycle
//!
//! A chunk is created empty (all air, `generated == false`) when the streamer
//! first wants it, filled by the generator (`generated`, `dirty`), meshed by
//! the mesh manager (clears `dirty`), and dropped by the unload pass after its
//! GPU meshes are released.

use cgmath::Point3;

use crate::engine_state::rendering::mesh_sink::ChunkMesh;

use super::block::BlockType;

pub mod chunk_iteration;

pub use chunk_iteration::ChunkCellIterator;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Largest voxel coordinate magnitude the streamer works within.
///
/// Chunks around a camera at this bound, and their neighbors, still have
/// voxel coordinates well inside `i32`.
pub const MAX_WORLD_COORD: i32 = 1 << 30;

/// Position of a chunk on the chunk grid.
pub type ChunkCoord = Point3<i32>;

/// Floor division: rounds toward negative infinity.
///
/// `floor_div(a, b) * b + modulo(a, b) == a` for every `a` and positive `b`.
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}

/// Modulo with a result in `[0, b)` for positive `b`.
#[inline]
pub fn modulo(a: i32, b: i32) -> i32 {
    a.rem_euclid(b)
}

/// The chunk that owns the world voxel `world`.
pub fn world_to_chunk(world: Point3<i32>) -> ChunkCoord {
    Point3::new(
        floor_div(world.x, CHUNK_DIMENSION),
        floor_div(world.y, CHUNK_DIMENSION),
        floor_div(world.z, CHUNK_DIMENSION),
    )
}

/// The position of the world voxel `world` inside its chunk.
pub fn world_to_local(world: Point3<i32>) -> Point3<usize> {
    Point3::new(
        modulo(world.x, CHUNK_DIMENSION) as usize,
        modulo(world.y, CHUNK_DIMENSION) as usize,
        modulo(world.z, CHUNK_DIMENSION) as usize,
    )
}

/// World voxel coordinate of the chunk's (0, 0, 0) corner.
pub fn chunk_origin(coord: ChunkCoord) -> Point3<i32> {
    Point3::new(
        coord.x * CHUNK_DIMENSION,
        coord.y * CHUNK_DIMENSION,
        coord.z * CHUNK_DIMENSION,
    )
}

/// Chebyshev distance between two chunks: the largest per-axis difference.
pub fn chebyshev_distance(a: ChunkCoord, b: ChunkCoord) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs()).max((a.z - b.z).abs())
}

/// Linear index of a local position: `x + SIZE * (y + SIZE * z)`.
#[inline]
pub fn chunk_index(x: usize, y: usize, z: usize) -> usize {
    let dim = CHUNK_DIMENSION as usize;
    x + dim * (y + dim * z)
}

/// Represents a 16x16x16 collection of voxel blocks in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkCoord,

    /// One material per cell, addressed by [`chunk_index`].
    pub blocks: Box<[BlockType; CHUNK_SIZE as usize]>,

    /// Set once the blocks have been filled from the planet sampler.
    pub generated: bool,

    /// Set while the meshes lag behind `blocks`.
    pub dirty: bool,

    /// Membership flag for the generation queue.
    pub queued_gen: bool,

    /// Membership flag for the mesh queue.
    pub queued_mesh: bool,

    /// Cached "every cell is air", refreshed whenever the blocks are filled.
    pub all_air: bool,

    /// Mesh for the opaque pass.
    pub opaque: ChunkMesh,

    /// Mesh for the transparent water pass.
    pub water: ChunkMesh,
}

impl Chunk {
    /// Creates a new, ungenerated chunk filled with air.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn new(position: ChunkCoord) -> Self {
        Chunk {
            position,
            blocks: Box::new([BlockType::AIR; CHUNK_SIZE as usize]),
            generated: false,
            dirty: true,
            queued_gen: false,
            queued_mesh: false,
            all_air: true,
            opaque: ChunkMesh::default(),
            water: ChunkMesh::default(),
        }
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get_block_at(&self, cx: usize, cy: usize, cz: usize) -> BlockType {
        self.blocks[chunk_index(cx, cy, cz)]
    }

    /// Sets the block at the specified chunk-relative coordinates.
    ///
    /// This does not touch `dirty` or `all_air`; callers that edit blocks
    /// outside of generation are responsible for both.
    pub fn set_block_at(&mut self, cx: usize, cy: usize, cz: usize, block: BlockType) {
        self.blocks[chunk_index(cx, cy, cz)] = block;
    }

    /// Whether every cell of the chunk holds air.
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| *b == BlockType::AIR)
    }

    /// World voxel coordinate of this chunk's (0, 0, 0) corner.
    pub fn origin(&self) -> Point3<i32> {
        chunk_origin(self.position)
    }

    /// Whether both meshes are ready to draw.
    pub fn is_meshed(&self) -> bool {
        self.generated && !self.dirty
    }

    /// Releases both GPU meshes.
    pub fn release_meshes(&mut self) {
        self.opaque.destroy();
        self.water.destroy();
    }
}
