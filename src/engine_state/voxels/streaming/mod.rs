//! # Streaming Module
//!
//! Decides which chunks exist around the camera and spreads their generation
//! and meshing over frames.
//!
//! ## Frame flow
//!
//! 1. [`StreamingScheduler::update_streaming`] creates every missing chunk in
//!    the render cube, queues it for generation, and evicts chunks beyond the
//!    unload distance.
//! 2. [`StreamingScheduler::tick_build_queues`] generates a bounded number of
//!    chunks, queues them and their generated neighbors for meshing, then
//!    meshes a bounded number of chunks.
//!
//! Both queues pop the chunk with the best front-first score, so chunks ahead
//! of the camera are built before chunks behind it. The gap between render
//! and unload distance keeps chunks on the boundary from thrashing.

use cgmath::{Point3, Vector3};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::engine_state::{
    camera_state::{camera_chunk, normalized_forward},
    rendering::MeshManager,
    voxels::{
        block::BlockSide,
        chunk::{chebyshev_distance, ChunkCoord},
        world::World,
    },
};

pub mod build_queue;

pub use build_queue::{score_chunk_front_first, BuildQueue};

/// Streaming distances and per-frame budgets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chebyshev radius, in chunks, that must be loaded around the camera
    pub render_distance: i32,
    /// Chunks farther than this are evicted. Kept above `render_distance`.
    pub unload_distance: i32,
    /// Weight of the facing direction in the load priority
    pub front_bias: f32,
    /// Chunks generated per tick
    pub max_gen_per_frame: usize,
    /// Chunks meshed per tick
    pub max_mesh_per_frame: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            render_distance: 4,
            unload_distance: 6,
            front_bias: 6.0,
            max_gen_per_frame: 8,
            max_mesh_per_frame: 4,
        }
    }
}

impl StreamingConfig {
    /// Returns a copy with a non-negative render distance and an unload
    /// distance strictly beyond it.
    pub fn validated(mut self) -> Self {
        if self.render_distance < 0 {
            warn!("render_distance {} is negative, using 0", self.render_distance);
            self.render_distance = 0;
        }
        if self.unload_distance <= self.render_distance {
            warn!(
                "unload_distance {} must exceed render_distance {}, using {}",
                self.unload_distance,
                self.render_distance,
                self.render_distance + 1
            );
            self.unload_distance = self.render_distance + 1;
        }
        self
    }
}

/// A snapshot of the streamer's progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Chunks in the store, generated or not
    pub loaded: usize,
    /// Chunks whose blocks are filled
    pub generated: usize,
    /// Generated chunks whose meshes are current
    pub meshed: usize,
    /// Chunks waiting for generation
    pub gen_queue: usize,
    /// Chunks waiting for meshing
    pub mesh_queue: usize,
    /// Chunks in the render cube: `(2 * render_distance + 1)³`
    pub target: usize,
}

/// What one [`StreamingScheduler::update_streaming`] call changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingUpdate {
    /// Chunks created and queued for generation
    pub created: usize,
    /// Chunks beyond the unload distance that were removed
    pub evicted: usize,
}

/// What one [`StreamingScheduler::tick_build_queues`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks filled from the sampler
    pub generated: usize,
    /// Chunks meshed and uploaded
    pub meshed: usize,
    /// Meshing was skipped because every loaded chunk is air
    pub skipped_meshing: bool,
}

/// Owns the build queues and the streaming distances.
pub struct StreamingScheduler {
    render_distance: i32,
    unload_distance: i32,
    front_bias: f32,
    /// Camera chunk of the last `update_streaming`
    camera_chunk: ChunkCoord,
    /// Unit forward vector of the last `update_streaming`
    camera_forward: Vector3<f32>,
    gen_queue: BuildQueue,
    mesh_queue: BuildQueue,
}

impl StreamingScheduler {
    pub fn new(config: &StreamingConfig) -> Self {
        let config = config.validated();
        StreamingScheduler {
            render_distance: config.render_distance,
            unload_distance: config.unload_distance,
            front_bias: config.front_bias,
            camera_chunk: Point3::new(0, 0, 0),
            camera_forward: Vector3::new(0.0, 0.0, -1.0),
            gen_queue: BuildQueue::new(),
            mesh_queue: BuildQueue::new(),
        }
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    pub fn unload_distance(&self) -> i32 {
        self.unload_distance
    }

    pub fn camera_chunk(&self) -> ChunkCoord {
        self.camera_chunk
    }

    pub fn camera_forward(&self) -> Vector3<f32> {
        self.camera_forward
    }

    /// Sets the render distance, pushing the unload distance out if needed.
    pub fn set_render_distance(&mut self, distance: i32) {
        self.render_distance = distance.max(0);
        if self.unload_distance <= self.render_distance {
            self.unload_distance = self.render_distance + 1;
        }
    }

    /// Sets the unload distance. Values not beyond the render distance are raised to it plus one.
    pub fn set_unload_distance(&mut self, distance: i32) {
        if distance <= self.render_distance {
            warn!(
                "unload distance {} must exceed render distance {}",
                distance, self.render_distance
            );
            self.unload_distance = self.render_distance + 1;
        } else {
            self.unload_distance = distance;
        }
    }

    /// Sets the radius chunks are loaded in, which is the render distance.
    pub fn set_load_distance(&mut self, distance: i32) {
        self.set_render_distance(distance);
    }

    pub fn set_front_bias(&mut self, front_bias: f32) {
        self.front_bias = front_bias;
    }

    /// Coordinates of the render cube around the current camera chunk.
    fn render_cube(&self) -> impl Iterator<Item = ChunkCoord> {
        let center = self.camera_chunk;
        let r = self.render_distance;
        (-r..=r).flat_map(move |dz| {
            (-r..=r).flat_map(move |dy| {
                (-r..=r).map(move |dx| Point3::new(center.x + dx, center.y + dy, center.z + dz))
            })
        })
    }

    /// Creates and queues missing chunks around the camera and evicts far ones.
    ///
    /// New chunks enter the store immediately, ungenerated, so repeated calls
    /// never queue a chunk twice.
    pub fn update_streaming(
        &mut self,
        world: &mut World,
        camera_pos: Point3<f32>,
        camera_forward: Vector3<f32>,
    ) -> StreamingUpdate {
        self.camera_chunk = camera_chunk(camera_pos);
        self.camera_forward = normalized_forward(camera_forward);

        let mut candidates: Vec<(f32, ChunkCoord)> = self
            .render_cube()
            .map(|coord| {
                let score = score_chunk_front_first(
                    coord,
                    self.camera_chunk,
                    self.camera_forward,
                    self.front_bias,
                );
                (score, coord)
            })
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut update = StreamingUpdate::default();
        for (_, coord) in candidates {
            if world.contains_chunk(coord) {
                continue;
            }
            world.get_or_create_chunk(coord).queued_gen = true;
            self.gen_queue.push(coord);
            update.created += 1;
        }

        let camera = self.camera_chunk;
        let unload = self.unload_distance;
        let far: Vec<ChunkCoord> = world
            .coords()
            .into_iter()
            .filter(|coord| chebyshev_distance(*coord, camera) > unload)
            .collect();
        for coord in &far {
            world.remove_chunk(*coord);
        }
        update.evicted = far.len();

        if update.evicted > 0 {
            self.gen_queue.retain(|coord| world.contains_chunk(*coord));
            self.mesh_queue.retain(|coord| world.contains_chunk(*coord));
        }

        if update.created > 0 || update.evicted > 0 {
            debug!(
                "Streaming around {:?}: {} created, {} evicted, {} loaded",
                self.camera_chunk,
                update.created,
                update.evicted,
                world.len()
            );
        }
        update
    }

    /// Queues a generated chunk for meshing unless it is already queued.
    fn enqueue_mesh(&mut self, world: &mut World, coord: ChunkCoord) {
        if let Some(chunk) = world.get_chunk_mut(coord) {
            if chunk.generated && !chunk.queued_mesh {
                chunk.queued_mesh = true;
                self.mesh_queue.push(coord);
            }
        }
    }

    /// Runs up to `max_gen` generations and then up to `max_mesh` meshings.
    ///
    /// Popped coordinates whose chunk has been evicted are skipped and still
    /// count against the budget.
    pub fn tick_build_queues(
        &mut self,
        world: &mut World,
        mesh_manager: &MeshManager,
        max_gen: usize,
        max_mesh: usize,
    ) -> TickReport {
        let mut report = TickReport::default();
        let start = Instant::now();

        for _ in 0..max_gen {
            let Some(coord) =
                self.gen_queue
                    .pop_best(self.camera_chunk, self.camera_forward, self.front_bias)
            else {
                break;
            };
            let Some(chunk) = world.get_chunk_mut(coord) else {
                continue;
            };
            chunk.queued_gen = false;
            world.fill_chunk_blocks(coord);
            report.generated += 1;

            self.enqueue_mesh(world, coord);
            for side in BlockSide::all() {
                self.enqueue_mesh(world, coord + side.direction());
            }
        }
        let generation_time = start.elapsed();

        if world.all_loaded_air() {
            report.skipped_meshing = true;
            if report.generated > 0 {
                debug!(
                    "Generated {} chunks in {:?}, all air so far; meshing skipped",
                    report.generated, generation_time
                );
            }
            return report;
        }

        let mesh_start = Instant::now();
        for _ in 0..max_mesh {
            let Some(coord) =
                self.mesh_queue
                    .pop_best(self.camera_chunk, self.camera_forward, self.front_bias)
            else {
                break;
            };
            let Some(chunk) = world.get_chunk_mut(coord) else {
                continue;
            };
            chunk.queued_mesh = false;
            if mesh_manager.build_chunk_mesh(world, coord) {
                report.meshed += 1;
            }
        }

        if report.generated > 0 || report.meshed > 0 {
            debug!(
                "Tick: generated {} in {:?}, meshed {} in {:?}, queues {}/{}",
                report.generated,
                generation_time,
                report.meshed,
                mesh_start.elapsed(),
                self.gen_queue.len(),
                self.mesh_queue.len()
            );
        }
        report
    }

    /// Whether every chunk in the render cube is generated and meshed.
    pub fn is_stream_ready(&self, world: &World) -> bool {
        self.render_cube().all(|coord| {
            world
                .get_chunk(coord)
                .is_some_and(|chunk| chunk.generated && !chunk.dirty)
        })
    }

    /// Counts of loaded, generated and meshed chunks and queue depths.
    pub fn stream_stats(&self, world: &World) -> StreamStats {
        let mut stats = StreamStats {
            loaded: world.len(),
            gen_queue: self.gen_queue.len(),
            mesh_queue: self.mesh_queue.len(),
            target: (2 * self.render_distance as usize + 1).pow(3),
            ..StreamStats::default()
        };
        for chunk in world.iter() {
            if chunk.generated {
                stats.generated += 1;
                if !chunk.dirty {
                    stats.meshed += 1;
                }
            }
        }
        stats
    }
}
