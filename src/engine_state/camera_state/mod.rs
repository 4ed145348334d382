//! # Camera State Management
//!
//! This module tracks the observer the streamer loads chunks around:
//! its world position, its facing direction, and the voxel and chunk it is in.
//! Orientation math and input handling belong to the host; it hands the
//! engine a position and a forward vector every frame.

use cgmath::{InnerSpace, Point3, Vector3};

use super::voxels::chunk::{world_to_chunk, ChunkCoord, MAX_WORLD_COORD};

/// Forward vectors shorter than this are treated as undefined.
const MIN_FORWARD_LENGTH: f32 = 1e-4;

/// The world voxel containing `position`, clamped to [`MAX_WORLD_COORD`] on
/// each axis. Non-finite coordinates map to the bound or to zero.
pub fn camera_voxel(position: Point3<f32>) -> Point3<i32> {
    let bound = MAX_WORLD_COORD as f32;
    let axis = |c: f32| c.floor().clamp(-bound, bound) as i32;
    Point3::new(axis(position.x), axis(position.y), axis(position.z))
}

/// The chunk containing `position`.
pub fn camera_chunk(position: Point3<f32>) -> ChunkCoord {
    world_to_chunk(camera_voxel(position))
}

/// Normalizes `forward`, falling back to -Z for (near) zero vectors.
pub fn normalized_forward(forward: Vector3<f32>) -> Vector3<f32> {
    let len = forward.magnitude();
    if len > MIN_FORWARD_LENGTH {
        forward / len
    } else {
        Vector3::new(0.0, 0.0, -1.0)
    }
}

/// The observer as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World-space position, in voxel units
    pub position: Point3<f32>,
    /// Unit facing direction
    pub forward: Vector3<f32>,
    /// Chunk containing `position`
    pub chunk: ChunkCoord,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
    }
}

impl CameraState {
    pub fn new(position: Point3<f32>, forward: Vector3<f32>) -> Self {
        CameraState {
            position,
            forward: normalized_forward(forward),
            chunk: camera_chunk(position),
        }
    }

    /// The world voxel the camera is in.
    pub fn voxel(&self) -> Point3<i32> {
        camera_voxel(self.position)
    }

    /// Moves the camera.
    ///
    /// # Returns
    /// - `Some(CameraUpdates)` if the camera crossed into another chunk
    /// - `None` otherwise
    pub fn update(&mut self, position: Point3<f32>, forward: Vector3<f32>) -> Option<CameraUpdates> {
        self.position = position;
        self.forward = normalized_forward(forward);

        let new_chunk_position = camera_chunk(position);
        if new_chunk_position == self.chunk {
            return None;
        }
        let old_chunk_position = self.chunk;
        self.chunk = new_chunk_position;
        Some(CameraUpdates {
            old_chunk_position,
            new_chunk_position,
        })
    }
}

/// Returned by [`CameraState::update`] when the camera changes chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraUpdates {
    /// The chunk the camera left
    pub old_chunk_position: ChunkCoord,
    /// The chunk the camera entered
    pub new_chunk_position: ChunkCoord,
}
