//! Mesh generation for voxel rendering.
//!
//! Converts a chunk's voxels into triangle lists with greedy face merging.
//!
//! # Architecture
//! - [`greedy`]: slice masks and rectangle merging, one pass per render pass
//! - [`face`]: turns a merged rectangle into six wound vertices

pub mod face;
pub mod greedy;

pub use face::{Quad, FACE_Q_MAP};
pub use greedy::{build_chunk_vertices, greedy_pass, ChunkVertices, FaceKey, MeshPass};
