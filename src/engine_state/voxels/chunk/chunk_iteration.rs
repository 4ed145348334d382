//! # Chunk Iteration Module
//!
//! This module provides an iterator over every local cell of a chunk in
//! storage order (x fastest, then y, then z), so `enumerate()` on it lines
//! up with [`super::chunk_index`].

use cgmath::Point3;

use super::CHUNK_DIMENSION;

/// An iterator over all local positions of a chunk.
///
/// # Examples
///
/// ```ignore
/// for (index, local) in ChunkCellIterator::new().enumerate() {
///     assert_eq!(index, chunk_index(local.x, local.y, local.z));
/// }
/// ```
pub struct ChunkCellIterator {
    /// Current X position within the chunk
    local_x: usize,
    /// Current Y position within the chunk
    local_y: usize,
    /// Current Z position within the chunk; reaching the dimension ends iteration
    local_z: usize,
}

impl ChunkCellIterator {
    /// Creates an iterator positioned at local (0, 0, 0).
    pub fn new() -> Self {
        ChunkCellIterator {
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }
}

impl Default for ChunkCellIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for ChunkCellIterator {
    type Item = Point3<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let dim = CHUNK_DIMENSION as usize;
        if self.local_z == dim {
            return None;
        }

        let position = Point3::new(self.local_x, self.local_y, self.local_z);

        self.local_x += 1;
        if self.local_x == dim {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == dim {
                self.local_y = 0;
                self.local_z += 1;
            }
        }

        Some(position)
    }
}
