//! # Engine State Module
//!
//! The core engine module that owns the planet and drives its streaming,
//! meshing and drawing.
//!
//! ## Key Components
//!
//! * `EngineState` - The facade a host application talks to
//! * `camera_state` - The observer chunks are streamed around
//! * `config` - Tunables loaded from JSON
//! * `rendering` - Meshing, mesh sinks and draw ordering
//! * `voxels` - Voxel data, chunks, planet generation and streaming
//!
//! ## Architecture
//!
//! Everything runs on the caller's thread. Once per frame the host hands the
//! engine a camera position and forward vector through [`EngineState::frame`];
//! the engine loads and evicts chunks, spends its generation and meshing
//! budgets, and the host then issues the opaque and water draws. GPU work goes
//! through the [`MeshSinkFactory`] supplied at construction.

use cgmath::{Point3, Vector3};
use log::{debug, info};

use camera_state::{CameraState, CameraUpdates};
use config::EngineConfig;
use rendering::{renderer, MeshManager, MeshSinkFactory};
use voxels::{
    block::BlockType,
    chunk::{floor_div, ChunkCoord, CHUNK_DIMENSION},
    streaming::{StreamStats, StreamingScheduler, StreamingUpdate, TickReport},
    world::World,
};

pub mod camera_state;
pub mod config;
pub mod rendering;
pub mod voxels;

/// The main state container for the voxel planet.
///
/// # Examples
///
/// ```ignore
/// let mut engine = EngineState::new(EngineConfig::default(), Box::new(HeadlessMeshSinkFactory::new()));
///
/// // Main loop
/// loop {
///     engine.frame(camera_position, camera_forward);
///     engine.draw_opaque();
///     engine.draw_water_sorted();
/// }
/// ```
pub struct EngineState {
    /// Loaded chunks and the planet they are sampled from
    pub world: World,
    /// Build queues and streaming distances
    pub scheduler: StreamingScheduler,
    /// Meshes chunks and uploads them through the host's sinks
    pub mesh_manager: MeshManager,
    /// The observer as of the last frame
    pub camera: CameraState,
    config: EngineConfig,
}

impl EngineState {
    /// Creates an engine with no chunks loaded.
    ///
    /// # Arguments
    ///
    /// * `config` - Planet shape, streaming distances and budgets, atlas layout
    /// * `sink_factory` - Creates the GPU-side mesh for each chunk pass
    pub fn new(config: EngineConfig, sink_factory: Box<dyn MeshSinkFactory>) -> Self {
        let config = config.validated();
        info!(
            "Planet radius {} (+{}), sea level offset {}, render distance {} / unload {}",
            config.planet.base_radius,
            config.planet.max_height,
            config.planet.sea_level_offset,
            config.streaming.render_distance,
            config.streaming.unload_distance
        );

        Self {
            world: World::new(config.planet),
            scheduler: StreamingScheduler::new(&config.streaming),
            mesh_manager: MeshManager::new(sink_factory, config.atlas),
            camera: CameraState::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Loads missing chunks around the camera and evicts far ones.
    pub fn update_streaming(
        &mut self,
        camera_pos: Point3<f32>,
        camera_forward: Vector3<f32>,
    ) -> StreamingUpdate {
        if let Some(CameraUpdates {
            old_chunk_position,
            new_chunk_position,
        }) = self.camera.update(camera_pos, camera_forward)
        {
            debug!(
                "Camera moved from chunk {:?} to {:?}",
                old_chunk_position, new_chunk_position
            );
        }
        self.scheduler
            .update_streaming(&mut self.world, camera_pos, camera_forward)
    }

    /// Generates up to `max_gen` and meshes up to `max_mesh` queued chunks.
    pub fn tick_build_queues(&mut self, max_gen: usize, max_mesh: usize) -> TickReport {
        self.scheduler
            .tick_build_queues(&mut self.world, &self.mesh_manager, max_gen, max_mesh)
    }

    /// One streaming update plus one tick with the configured budgets.
    pub fn frame(&mut self, camera_pos: Point3<f32>, camera_forward: Vector3<f32>) -> TickReport {
        self.update_streaming(camera_pos, camera_forward);
        self.tick_build_queues(
            self.config.streaming.max_gen_per_frame,
            self.config.streaming.max_mesh_per_frame,
        )
    }

    /// The block at a world voxel, loaded or not.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.world.get_block(x, y, z)
    }

    pub fn is_stream_ready(&self) -> bool {
        self.scheduler.is_stream_ready(&self.world)
    }

    pub fn stream_stats(&self) -> StreamStats {
        self.scheduler.stream_stats(&self.world)
    }

    pub fn set_render_distance(&mut self, distance: i32) {
        self.scheduler.set_render_distance(distance);
        self.config.streaming.render_distance = self.scheduler.render_distance();
        self.config.streaming.unload_distance = self.scheduler.unload_distance();
    }

    pub fn set_unload_distance(&mut self, distance: i32) {
        self.scheduler.set_unload_distance(distance);
        self.config.streaming.unload_distance = self.scheduler.unload_distance();
    }

    pub fn set_load_distance(&mut self, distance: i32) {
        self.set_render_distance(distance);
    }

    /// Chunk range covering the whole planet on each axis, inclusive.
    fn planet_chunk_range(&self) -> (i32, i32) {
        let params = self.world.params();
        let half = (params.base_radius + params.max_height + 2.0).ceil() as i32;
        (floor_div(-half, CHUNK_DIMENSION), floor_div(half, CHUNK_DIMENSION))
    }

    /// Generates and meshes every chunk the planet can reach, ignoring the
    /// camera. Only practical for small planets.
    ///
    /// # Returns
    ///
    /// The number of chunks meshed.
    pub fn build_planet_once(&mut self) -> usize {
        let start = web_time::Instant::now();
        let (min, max) = self.planet_chunk_range();

        let mut coords: Vec<ChunkCoord> = Vec::new();
        for z in min..=max {
            for y in min..=max {
                for x in min..=max {
                    coords.push(Point3::new(x, y, z));
                }
            }
        }

        for coord in &coords {
            let chunk = self.world.get_or_create_chunk(*coord);
            if chunk.generated {
                continue;
            }
            self.world.fill_chunk_blocks(*coord);
        }

        let meshed = self.rebuild_dirty_meshes();
        info!(
            "Built planet once: {} chunks, {} meshed in {:?}",
            coords.len(),
            meshed,
            start.elapsed()
        );
        meshed
    }

    /// Meshes every generated chunk whose mesh is out of date.
    pub fn rebuild_dirty_meshes(&mut self) -> usize {
        let dirty: Vec<ChunkCoord> = self
            .world
            .iter()
            .filter(|chunk| chunk.generated && chunk.dirty)
            .map(|chunk| chunk.position)
            .collect();

        dirty
            .into_iter()
            .filter(|coord| self.mesh_manager.build_chunk_mesh(&mut self.world, *coord))
            .count()
    }

    /// Draws the opaque pass of every chunk within render distance.
    pub fn draw_opaque(&self) -> usize {
        renderer::draw_opaque(
            &self.world,
            self.camera.chunk,
            self.scheduler.render_distance(),
        )
    }

    /// Draws the water pass unordered.
    pub fn draw_water(&self) -> usize {
        renderer::draw_water(
            &self.world,
            self.camera.chunk,
            self.scheduler.render_distance(),
        )
    }

    /// Draws the water pass far-to-near from the camera.
    pub fn draw_water_sorted(&self) -> usize {
        renderer::draw_water_sorted(
            &self.world,
            self.camera.position,
            self.camera.chunk,
            self.scheduler.render_distance(),
        )
    }
}
