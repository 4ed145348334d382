//! Rendering side of the voxel engine.
//!
//! This module turns chunk voxels into GPU meshes and issues their draws. It
//! never touches a graphics API itself: uploads and draws go through the
//! [`mesh_sink::MeshSink`] a host supplies, and [`Vertex::desc`] describes the
//! vertex layout the host's pipeline must use.

pub mod atlas;
pub mod mesh_sink;
pub mod meshing;
pub mod renderer;
pub mod vertex;

// Re-export commonly used types
pub use atlas::AtlasLayout;
pub use mesh_sink::{ChunkMesh, HeadlessMeshSinkFactory, MeshSink, MeshSinkFactory};
pub use meshing::MeshManager;
pub use vertex::Vertex;
