//! Pending chunk work, popped best-first.
//!
//! Entries keep insertion order, but pops take the entry with the lowest
//! front-first score for the current camera rather than the oldest one. The
//! queue is scanned on every pop; it only ever holds the chunks of one
//! render cube.

use std::collections::VecDeque;

use cgmath::{InnerSpace, Vector3};

use crate::engine_state::voxels::chunk::ChunkCoord;

/// Offsets shorter than this have no direction.
const MIN_OFFSET_LENGTH: f32 = 1e-4;

/// Priority of `coord` seen from `camera_chunk`. Lower is more urgent.
///
/// Squared chunk distance, lowered by up to `front_bias` for chunks straight
/// ahead along `forward` (a unit vector) and raised as much for those behind.
pub fn score_chunk_front_first(
    coord: ChunkCoord,
    camera_chunk: ChunkCoord,
    forward: Vector3<f32>,
    front_bias: f32,
) -> f32 {
    let offset = Vector3::new(
        (coord.x - camera_chunk.x) as f32,
        (coord.y - camera_chunk.y) as f32,
        (coord.z - camera_chunk.z) as f32,
    );
    let dist2 = offset.magnitude2();
    let len = dist2.sqrt();
    let alignment = if len > MIN_OFFSET_LENGTH {
        (offset / len).dot(forward)
    } else {
        0.0
    };
    dist2 - alignment * front_bias
}

/// A queue of chunk coordinates.
///
/// Holds no membership state itself: callers keep each coordinate in at most
/// once through the chunk's `queued_gen` / `queued_mesh` flags.
#[derive(Debug, Default, Clone)]
pub struct BuildQueue {
    entries: VecDeque<ChunkCoord>,
}

impl BuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, coord: ChunkCoord) {
        self.entries.push_back(coord);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.entries.iter()
    }

    /// Removes and returns the entry with the lowest score. Ties go to the
    /// older entry.
    pub fn pop_best(
        &mut self,
        camera_chunk: ChunkCoord,
        forward: Vector3<f32>,
        front_bias: f32,
    ) -> Option<ChunkCoord> {
        let mut best: Option<(usize, f32)> = None;
        for (index, coord) in self.entries.iter().enumerate() {
            let score = score_chunk_front_first(*coord, camera_chunk, forward, front_bias);
            match best {
                Some((_, best_score)) if score >= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        let (index, _) = best?;
        self.entries.remove(index)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain<F: FnMut(&ChunkCoord) -> bool>(&mut self, keep: F) {
        self.entries.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn chunks_ahead_score_lower_than_chunks_behind() {
        let camera = Point3::new(4, 0, -2);
        let forward = Vector3::new(1.0, 0.0, 0.0);
        let ahead = score_chunk_front_first(Point3::new(6, 0, -2), camera, forward, 6.0);
        let behind = score_chunk_front_first(Point3::new(2, 0, -2), camera, forward, 6.0);
        let beside = score_chunk_front_first(Point3::new(4, 2, -2), camera, forward, 6.0);
        assert!(ahead < beside && beside < behind);
        assert_eq!(beside, 4.0);
        assert_eq!(score_chunk_front_first(camera, camera, forward, 6.0), 0.0);
    }

    #[test]
    fn pops_best_first_and_oldest_on_ties() {
        let mut queue = BuildQueue::new();
        let camera = Point3::new(0, 0, 0);
        let forward = Vector3::new(0.0, 0.0, -1.0);
        for coord in [
            Point3::new(0, 0, 3),
            Point3::new(1, 0, 0),
            Point3::new(0, 1, 0),
            Point3::new(0, 0, -1),
        ] {
            queue.push(coord);
        }

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_best(camera, forward, 6.0)).collect();
        assert_eq!(
            order,
            vec![
                Point3::new(0, 0, -1),
                Point3::new(1, 0, 0),
                Point3::new(0, 1, 0),
                Point3::new(0, 0, 3),
            ]
        );
        assert!(queue.is_empty());
        assert_eq!(queue.pop_best(camera, forward, 6.0), None);
    }
}
