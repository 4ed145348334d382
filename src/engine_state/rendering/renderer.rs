//! Draw-call issuing for chunk meshes.
//!
//! A host's render loop calls these once per pass: the opaque pass first,
//! then the water pass with blending enabled. Only chunks within the render
//! distance of the camera chunk are drawn; chunks kept alive by the unload
//! hysteresis stay resident but invisible.

use cgmath::{MetricSpace, Point3};

use crate::engine_state::voxels::{
    chunk::{chebyshev_distance, chunk_origin, Chunk, ChunkCoord, CHUNK_DIMENSION},
    world::World,
};

/// Chunks with something to draw in range, in no particular order.
fn visible_chunks<'a>(
    world: &'a World,
    camera_chunk: ChunkCoord,
    render_distance: i32,
) -> impl Iterator<Item = &'a Chunk> {
    world
        .iter()
        .filter(move |chunk| chebyshev_distance(chunk.position, camera_chunk) <= render_distance)
}

/// World-space center of a chunk.
pub fn chunk_center(coord: ChunkCoord) -> Point3<f32> {
    let origin = chunk_origin(coord);
    let half = CHUNK_DIMENSION as f32 * 0.5;
    Point3::new(
        origin.x as f32 + half,
        origin.y as f32 + half,
        origin.z as f32 + half,
    )
}

/// Draws the opaque mesh of every chunk in range. Returns the number of draws issued.
pub fn draw_opaque(world: &World, camera_chunk: ChunkCoord, render_distance: i32) -> usize {
    let mut draws = 0;
    for chunk in visible_chunks(world, camera_chunk, render_distance) {
        if chunk.opaque.is_empty() {
            continue;
        }
        chunk.opaque.draw();
        draws += 1;
    }
    draws
}

/// Draws the water mesh of every chunk in range, unordered.
pub fn draw_water(world: &World, camera_chunk: ChunkCoord, render_distance: i32) -> usize {
    let mut draws = 0;
    for chunk in visible_chunks(world, camera_chunk, render_distance) {
        if chunk.water.is_empty() {
            continue;
        }
        chunk.water.draw();
        draws += 1;
    }
    draws
}

/// Chunks with water in range, farthest from `camera_pos` first.
pub fn water_draw_order(
    world: &World,
    camera_pos: Point3<f32>,
    camera_chunk: ChunkCoord,
    render_distance: i32,
) -> Vec<ChunkCoord> {
    let mut ordered: Vec<(f32, ChunkCoord)> = visible_chunks(world, camera_chunk, render_distance)
        .filter(|chunk| !chunk.water.is_empty())
        .map(|chunk| (chunk_center(chunk.position).distance2(camera_pos), chunk.position))
        .collect();
    ordered.sort_by(|a, b| b.0.total_cmp(&a.0));
    ordered.into_iter().map(|(_, coord)| coord).collect()
}

/// Draws the water meshes far-to-near so alpha blending composes correctly.
pub fn draw_water_sorted(
    world: &World,
    camera_pos: Point3<f32>,
    camera_chunk: ChunkCoord,
    render_distance: i32,
) -> usize {
    let order = water_draw_order(world, camera_pos, camera_chunk, render_distance);
    for coord in &order {
        if let Some(chunk) = world.get_chunk(*coord) {
            chunk.water.draw();
        }
    }
    order.len()
}
