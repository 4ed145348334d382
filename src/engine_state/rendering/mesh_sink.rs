//! GPU mesh handles for chunk meshes.
//!
//! The engine never talks to a graphics API directly. A host application
//! provides a [`MeshSinkFactory`] that creates [`MeshSink`]s; the engine
//! uploads vertex lists into them and asks them to draw. A headless sink is
//! provided for tools and tests that run without a GPU.

use std::cell::Cell;
use std::rc::Rc;

use super::vertex::Vertex;

/// A GPU-side vertex buffer owned by one chunk mesh.
pub trait MeshSink {
    /// Replaces the buffer contents with `vertices`.
    fn upload(&mut self, vertices: &[Vertex]);

    /// Issues the draw for the current contents.
    fn draw(&self);

    /// Releases the GPU resources. The sink is not used again afterwards.
    fn destroy(&mut self);
}

/// Creates mesh sinks on demand.
pub trait MeshSinkFactory {
    fn create_sink(&self) -> Box<dyn MeshSink>;
}

/// One mesh slot of a chunk: an optional sink plus the vertex count it holds.
///
/// The sink is created lazily on the first non-empty upload. An empty upload
/// releases it, so chunks without geometry hold no GPU resources.
#[derive(Default)]
pub struct ChunkMesh {
    sink: Option<Box<dyn MeshSink>>,
    vertex_count: usize,
}

impl ChunkMesh {
    /// Uploads `vertices`, creating the sink through `factory` if needed.
    pub fn upload(&mut self, factory: &dyn MeshSinkFactory, vertices: &[Vertex]) {
        if vertices.is_empty() {
            self.destroy();
            return;
        }
        let sink = self.sink.get_or_insert_with(|| factory.create_sink());
        sink.upload(vertices);
        self.vertex_count = vertices.len();
    }

    /// Draws the mesh. Empty meshes are skipped.
    pub fn draw(&self) {
        if self.vertex_count == 0 {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.draw();
        }
    }

    /// Releases the sink, leaving an empty mesh.
    pub fn destroy(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            sink.destroy();
        }
        self.vertex_count = 0;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

/// Counters shared by every sink of one [`HeadlessMeshSinkFactory`].
#[derive(Debug, Default)]
pub struct HeadlessSinkStats {
    pub created: Cell<usize>,
    pub uploads: Cell<usize>,
    pub draws: Cell<usize>,
    pub destroys: Cell<usize>,
    pub uploaded_vertices: Cell<usize>,
}

impl HeadlessSinkStats {
    /// Sinks created and not yet destroyed.
    pub fn live(&self) -> usize {
        self.created.get() - self.destroys.get()
    }

    fn bump(counter: &Cell<usize>, by: usize) {
        counter.set(counter.get() + by);
    }
}

/// A mesh sink that keeps its vertices in memory.
pub struct HeadlessMeshSink {
    stats: Rc<HeadlessSinkStats>,
    vertices: Vec<Vertex>,
}

impl HeadlessMeshSink {
    /// The last uploaded vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl MeshSink for HeadlessMeshSink {
    fn upload(&mut self, vertices: &[Vertex]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        HeadlessSinkStats::bump(&self.stats.uploads, 1);
        HeadlessSinkStats::bump(&self.stats.uploaded_vertices, vertices.len());
    }

    fn draw(&self) {
        HeadlessSinkStats::bump(&self.stats.draws, 1);
    }

    fn destroy(&mut self) {
        self.vertices = Vec::new();
        HeadlessSinkStats::bump(&self.stats.destroys, 1);
    }
}

/// Creates [`HeadlessMeshSink`]s that report into one shared [`HeadlessSinkStats`].
#[derive(Default)]
pub struct HeadlessMeshSinkFactory {
    stats: Rc<HeadlessSinkStats>,
}

impl HeadlessMeshSinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared counters.
    pub fn stats(&self) -> Rc<HeadlessSinkStats> {
        Rc::clone(&self.stats)
    }
}

impl MeshSinkFactory for HeadlessMeshSinkFactory {
    fn create_sink(&self) -> Box<dyn MeshSink> {
        HeadlessSinkStats::bump(&self.stats.created, 1);
        Box::new(HeadlessMeshSink {
            stats: Rc::clone(&self.stats),
            vertices: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Vertex> {
        let zero: Vertex = bytemuck::Zeroable::zeroed();
        vec![zero; 6]
    }

    #[test]
    fn sink_is_created_lazily_and_released_on_empty_upload() {
        let factory = HeadlessMeshSinkFactory::new();
        let stats = factory.stats();
        let mut mesh = ChunkMesh::default();

        mesh.upload(&factory, &[]);
        assert_eq!(stats.created.get(), 0);
        assert!(mesh.is_empty());

        mesh.upload(&factory, &quad());
        mesh.upload(&factory, &quad());
        assert_eq!(stats.created.get(), 1);
        assert_eq!(stats.uploads.get(), 2);
        assert_eq!(mesh.vertex_count(), 6);

        mesh.upload(&factory, &[]);
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn empty_meshes_do_not_draw() {
        let factory = HeadlessMeshSinkFactory::new();
        let stats = factory.stats();
        let mut mesh = ChunkMesh::default();
        mesh.draw();
        assert_eq!(stats.draws.get(), 0);

        mesh.upload(&factory, &quad());
        mesh.draw();
        assert_eq!(stats.draws.get(), 1);

        mesh.destroy();
        mesh.destroy();
        mesh.draw();
        assert_eq!(stats.destroys.get(), 1);
        assert_eq!(stats.draws.get(), 1);
    }
}
