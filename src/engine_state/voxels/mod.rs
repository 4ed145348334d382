//! # Voxel Planet Core
//!
//! This module holds the voxel data of the planet and everything that decides
//! what that data is and when it exists.
//!
//! ## Architecture
//!
//! * **Block**: Block types, their classification, and the six face directions
//! * **Noise / Planet**: The deterministic density field every voxel is sampled from
//! * **Chunk**: Fixed 16³ arrays of blocks and their build flags
//! * **World**: The sparse chunk store, answering block queries anywhere
//! * **Streaming**: Which chunks are loaded, and the per-frame build budget
//!
//! ## Data Flow
//!
//! 1. The streamer creates empty chunks around the camera and queues them
//! 2. Generation fills a chunk from the planet sampler
//! 3. The chunk and its generated neighbors are queued for meshing
//! 4. Far chunks are evicted and their meshes destroyed
//!
//! Block queries never fail: outside generated chunks they fall back to the
//! sampler, so the answer for a voxel is the same before and after its chunk
//! loads.

pub mod block;
pub mod chunk;
pub mod noise;
pub mod planet;
pub mod streaming;
pub mod world;
