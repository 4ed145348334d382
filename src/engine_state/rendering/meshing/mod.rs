//! Mesh generation and management for voxel rendering.
//!
//! This module turns generated chunks into uploaded GPU meshes. The heavy
//! lifting happens in [`mesh`]; the [`MeshManager`] owns the sink factory and
//! wires the mesher's output into each chunk's two mesh slots.
//!
//! # Architecture
//! - `MeshManager`: Main interface for building and uploading chunk meshes
//! - `mesh/`: The greedy meshing algorithm and quad emission
//!
//! Building happens in two steps so the chunk store is only borrowed mutably
//! for the upload: vertices are computed against a shared `&World` (neighbors
//! included), then the target chunk is looked up again and updated.

use log::info;

pub mod mesh;

pub use mesh::*;

use crate::engine_state::{
    rendering::{atlas::AtlasLayout, mesh_sink::MeshSinkFactory},
    voxels::{chunk::ChunkCoord, world::World},
};

/// Central manager for chunk mesh generation and upload.
///
/// # Examples
///
/// ```ignore
/// let manager = MeshManager::new(Box::new(HeadlessMeshSinkFactory::new()), AtlasLayout::default());
/// manager.build_chunk_mesh(&mut world, Point3::new(0, 0, 0));
/// ```
pub struct MeshManager {
    /// Creates a GPU sink the first time a chunk mesh has geometry
    sink_factory: Box<dyn MeshSinkFactory>,
    /// Atlas the emitted tile coordinates refer to
    atlas: AtlasLayout,
}

impl MeshManager {
    /// Creates a new `MeshManager`.
    ///
    /// # Arguments
    ///
    /// * `sink_factory` - Source of GPU mesh sinks
    /// * `atlas` - Layout of the atlas texture shared by every face
    pub fn new(sink_factory: Box<dyn MeshSinkFactory>, atlas: AtlasLayout) -> Self {
        let atlas = atlas.validated();
        info!(
            "Mesh manager using a {}x{} tile atlas ({}x{} px)",
            atlas.columns, atlas.rows, atlas.width, atlas.height
        );
        Self {
            sink_factory,
            atlas,
        }
    }

    pub fn atlas(&self) -> &AtlasLayout {
        &self.atlas
    }

    /// Padded UV rectangle of a vertex's `tile` in this manager's atlas.
    pub fn tile_uv_rect(&self, tile: [f32; 2]) -> [[f32; 2]; 4] {
        self.atlas.tile_uv_rect((tile[0] as u32, tile[1] as u32))
    }

    pub fn sink_factory(&self) -> &dyn MeshSinkFactory {
        self.sink_factory.as_ref()
    }

    /// Meshes the chunk at `coord` and uploads both passes.
    ///
    /// Neighbor blocks come from `world`, falling back to the planet sampler
    /// where neighbors are absent or ungenerated. Clears the chunk's `dirty`
    /// flag.
    ///
    /// # Returns
    ///
    /// `false`, doing nothing, when the chunk is absent or not generated yet.
    pub fn build_chunk_mesh(&self, world: &mut World, coord: ChunkCoord) -> bool {
        match world.get_chunk(coord) {
            Some(chunk) if chunk.generated => {}
            _ => return false,
        }

        let vertices = build_chunk_vertices(&*world, coord);

        let Some(chunk) = world.get_chunk_mut(coord) else {
            return false;
        };
        chunk.opaque.upload(self.sink_factory(), &vertices.opaque);
        chunk.water.upload(self.sink_factory(), &vertices.water);
        chunk.dirty = false;
        true
    }
}
