//! # World Module
//!
//! This module provides the `World` struct which stores the loaded chunks of
//! the planet and answers block queries for any world voxel coordinate.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach: only chunks the streamer asked
//! for are kept in memory, keyed by chunk coordinate. Everything else is
//! answered procedurally.
//!
//! ## Procedural fallback
//!
//! `get_block` reads stored blocks only from generated chunks. For absent or
//! ungenerated chunks it samples the planet at the voxel center instead, the
//! same way generation does, so a chunk meshed against a not-yet-generated
//! neighbor sees exactly what that neighbor will later contain.

use cgmath::Point3;
use log::trace;
use std::collections::HashMap;

use super::block::BlockType;
use super::chunk::{
    chunk_index, world_to_chunk, world_to_local, Chunk, ChunkCellIterator, ChunkCoord,
};
use super::planet::{sample_planet_with_ocean, PlanetParams};

/// Read-only access to block materials by world voxel coordinate.
///
/// The mesher reads neighbors across chunk borders through this trait, so it
/// never needs to know how the blocks are stored.
pub trait BlockSource {
    /// The block at world voxel `(x, y, z)`. Defined for every coordinate.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType;
}

/// Center of the world voxel `world`, the position the sampler is evaluated at.
pub fn voxel_center(world: Point3<i32>) -> Point3<f64> {
    Point3::new(
        world.x as f64 + 0.5,
        world.y as f64 + 0.5,
        world.z as f64 + 0.5,
    )
}

/// Fills every cell of `chunk` from the planet sampler and marks it for meshing.
pub fn fill_blocks(chunk: &mut Chunk, params: &PlanetParams) {
    let origin = chunk.origin();
    let mut all_air = true;
    for local in ChunkCellIterator::new() {
        let world = Point3::new(
            origin.x + local.x as i32,
            origin.y + local.y as i32,
            origin.z + local.z as i32,
        );
        let block = sample_planet_with_ocean(voxel_center(world), params);
        all_air &= block == BlockType::AIR;
        chunk.blocks[chunk_index(local.x, local.y, local.z)] = block;
    }
    chunk.all_air = all_air;
    chunk.generated = true;
    chunk.dirty = true;
}

/// Represents the voxel planet as a sparse map of chunks.
///
/// # Examples
///
/// ```ignore
/// let mut world = World::new(PlanetParams::default());
/// world.get_or_create_chunk(Point3::new(0, 0, 0));
/// world.fill_chunk_blocks(Point3::new(0, 0, 0));
/// let block = world.get_block(3, 4, 5);
/// ```
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    pub chunks: HashMap<ChunkCoord, Chunk>,

    /// Shape of the planet every chunk is sampled from.
    params: PlanetParams,
}

impl World {
    /// Creates a new, empty world for the given planet.
    pub fn new(params: PlanetParams) -> Self {
        World {
            chunks: HashMap::new(),
            params,
        }
    }

    /// The planet parameters chunks are generated with.
    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    /// Returns the chunk at `coord`, inserting a new empty one if needed.
    pub fn get_or_create_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord))
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Retrieves the chunk at the specified chunk coordinates for modification.
    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Whether a chunk (generated or not) is stored at `coord`.
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Removes the chunk at `coord`, releasing its GPU meshes first.
    ///
    /// Returns `false` when no chunk was stored there.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.remove(&coord) {
            Some(mut chunk) => {
                chunk.release_meshes();
                trace!("Evicted chunk {:?}", coord);
                true
            }
            None => false,
        }
    }

    /// Fills the chunk at `coord` from the planet sampler.
    ///
    /// Returns `false` when no chunk is stored there.
    pub fn fill_chunk_blocks(&mut self, coord: ChunkCoord) -> bool {
        let params = self.params;
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                fill_blocks(chunk, &params);
                true
            }
            None => false,
        }
    }

    /// The block at world voxel `(x, y, z)`.
    ///
    /// Stored data is used only for generated chunks; everything else falls
    /// back to sampling the planet at the voxel center.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        let world = Point3::new(x, y, z);
        if let Some(chunk) = self.chunks.get(&world_to_chunk(world)) {
            if chunk.generated {
                let local = world_to_local(world);
                return chunk.get_block_at(local.x, local.y, local.z);
            }
        }
        sample_planet_with_ocean(voxel_center(world), &self.params)
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates over the stored chunks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Iterates over the stored chunks mutably in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    /// Coordinates of every stored chunk.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        self.chunks.keys().copied().collect()
    }

    /// Whether every stored chunk is uniformly air.
    ///
    /// Reads the per-chunk flag cached at generation time. Ungenerated chunks
    /// still hold their initial air and count as air.
    pub fn all_loaded_air(&self) -> bool {
        self.chunks.values().all(|chunk| chunk.all_air)
    }
}

impl BlockSource for World {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.get_block(x, y, z)
    }
}
