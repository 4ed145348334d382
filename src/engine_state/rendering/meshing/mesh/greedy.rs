//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent
//! coplanar faces with the same block, facing and atlas tile into larger quads.
//!
//! Each pass sweeps the 17 slice planes of every axis. For each plane it builds
//! a 16x16 mask of the faces lying on it, then peels maximal rectangles off
//! the mask: widest run first, then as many full rows as match.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::{
    rendering::{atlas::tile_for_face_on_voxel, vertex::Vertex},
    voxels::{
        block::{BlockSide, BlockType},
        chunk::{chunk_origin, ChunkCoord, CHUNK_DIMENSION},
        world::BlockSource,
    },
};

use super::face::Quad;

const DIM: usize = CHUNK_DIMENSION as usize;

/// Which blocks count as solid while meshing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPass {
    /// Opaque blocks; water counts as empty so terrain renders under it.
    Opaque,
    /// Water only, and only where it touches air.
    Water,
}

impl MeshPass {
    /// Whether `block` is solid in this pass.
    pub fn is_solid(self, block: BlockType) -> bool {
        match self {
            MeshPass::Opaque => block.is_opaque(),
            MeshPass::Water => block == BlockType::WATER,
        }
    }

    /// Whether a solid block shows a face against the empty block `other`.
    fn faces_against(self, other: BlockType) -> bool {
        match self {
            MeshPass::Opaque => true,
            MeshPass::Water => other == BlockType::AIR,
        }
    }
}

/// Faces merge only when all three fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub block: BlockType,
    pub side: BlockSide,
    pub tile: (u32, u32),
}

type SliceMask = [Option<FaceKey>; DIM * DIM];

/// Fills `mask` with the faces of slice `s` along `axis`.
///
/// Only faces whose solid voxel lies inside this chunk are recorded, so every
/// face on a chunk border belongs to exactly one chunk.
fn build_slice_mask<S: BlockSource + ?Sized>(
    source: &S,
    origin: Point3<i32>,
    pass: MeshPass,
    axis: usize,
    s: i32,
    mask: &mut SliceMask,
) {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;

    for j in 0..DIM {
        for i in 0..DIM {
            let mut a = Point3::new(0, 0, 0);
            a[axis] = s - 1;
            a[u] = i as i32;
            a[v] = j as i32;
            let mut b = a;
            b[axis] = s;

            let block_a = source.block_at(origin.x + a.x, origin.y + a.y, origin.z + a.z);
            let block_b = source.block_at(origin.x + b.x, origin.y + b.y, origin.z + b.z);
            let a_solid = pass.is_solid(block_a);
            let b_solid = pass.is_solid(block_b);

            mask[i + DIM * j] = None;
            if a_solid == b_solid {
                continue;
            }

            let (solid_local, block, other) = if a_solid {
                (a, block_a, block_b)
            } else {
                (b, block_b, block_a)
            };
            if solid_local[axis] < 0 || solid_local[axis] >= CHUNK_DIMENSION {
                continue;
            }
            if !pass.faces_against(other) {
                continue;
            }

            let side = BlockSide::from_axis(axis, a_solid);
            let solid_world = Point3::new(
                origin.x + solid_local.x,
                origin.y + solid_local.y,
                origin.z + solid_local.z,
            );
            mask[i + DIM * j] = Some(FaceKey {
                block,
                side,
                tile: tile_for_face_on_voxel(side, solid_world),
            });
        }
    }
}

/// Peels maximal rectangles off `mask` and emits one quad per rectangle.
fn merge_slice_mask(
    mask: &mut SliceMask,
    origin: Point3<i32>,
    axis: usize,
    s: i32,
    out: &mut Vec<Vertex>,
) {
    for j in 0..DIM {
        let mut i = 0;
        while i < DIM {
            let Some(key) = mask[i + DIM * j] else {
                i += 1;
                continue;
            };

            let mut width = 1;
            while i + width < DIM && mask[i + width + DIM * j] == Some(key) {
                width += 1;
            }

            let mut height = 1;
            'rows: while j + height < DIM {
                for k in 0..width {
                    if mask[i + k + DIM * (j + height)] != Some(key) {
                        break 'rows;
                    }
                }
                height += 1;
            }

            Quad {
                axis,
                slice: s,
                i: i as i32,
                j: j as i32,
                width: width as i32,
                height: height as i32,
                block: key.block,
                side: key.side,
                tile: key.tile,
            }
            .emit(origin, out);

            for y in 0..height {
                for x in 0..width {
                    mask[i + x + DIM * (j + y)] = None;
                }
            }

            i += width;
        }
    }
}

/// Runs one meshing pass over the chunk at `coord`, appending to `out`.
///
/// Neighbor voxels across the chunk border are read through `source`.
pub fn greedy_pass<S: BlockSource + ?Sized>(
    source: &S,
    coord: ChunkCoord,
    pass: MeshPass,
    out: &mut Vec<Vertex>,
) {
    let origin = chunk_origin(coord);
    let mut mask: SliceMask = [None; DIM * DIM];

    for axis in 0..3 {
        for s in 0..=CHUNK_DIMENSION {
            build_slice_mask(source, origin, pass, axis, s, &mut mask);
            merge_slice_mask(&mut mask, origin, axis, s, out);
        }
    }
}

/// Vertex lists of one chunk, one per render pass.
#[derive(Debug, Default)]
pub struct ChunkVertices {
    pub opaque: Vec<Vertex>,
    pub water: Vec<Vertex>,
}

/// Builds the opaque and water vertex lists for the chunk at `coord`.
pub fn build_chunk_vertices<S: BlockSource + ?Sized>(source: &S, coord: ChunkCoord) -> ChunkVertices {
    let start = Instant::now();

    let mut vertices = ChunkVertices::default();
    greedy_pass(source, coord, MeshPass::Opaque, &mut vertices.opaque);
    greedy_pass(source, coord, MeshPass::Water, &mut vertices.water);

    debug!(
        "Meshed chunk {:?}: {} opaque, {} water vertices in {:?}",
        coord,
        vertices.opaque.len(),
        vertices.water.len(),
        start.elapsed()
    );

    vertices
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engine_state::voxels::{
        noise::hash3i,
        planet::PlanetParams,
        world::World,
    };

    /// A block source defined by a closure over world coordinates.
    struct FnSource<F: Fn(i32, i32, i32) -> BlockType>(F);

    impl<F: Fn(i32, i32, i32) -> BlockType> BlockSource for FnSource<F> {
        fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
            (self.0)(x, y, z)
        }
    }

    /// One unit face: layer, outward direction, tile, and the minimum corner of the cell.
    type Cell = (u32, [i32; 3], (u32, u32), [i32; 3]);

    fn vertex_point(v: &Vertex) -> [i32; 3] {
        [
            v.position[0].round() as i32,
            v.position[1].round() as i32,
            v.position[2].round() as i32,
        ]
    }

    /// Splits every emitted quad back into unit cells.
    fn rasterize(vertices: &[Vertex]) -> HashMap<Cell, usize> {
        let mut cells = HashMap::new();
        assert_eq!(vertices.len() % 6, 0);
        for quad in vertices.chunks(6) {
            let corners = [&quad[0], &quad[1], &quad[2], &quad[5]];
            let mut min = [i32::MAX; 3];
            let mut max = [i32::MIN; 3];
            for c in corners {
                let p = vertex_point(c);
                for k in 0..3 {
                    min[k] = min[k].min(p[k]);
                    max[k] = max[k].max(p[k]);
                }
            }
            let normal = [
                quad[0].normal[0] as i32,
                quad[0].normal[1] as i32,
                quad[0].normal[2] as i32,
            ];
            let tile = (quad[0].tile[0] as u32, quad[0].tile[1] as u32);
            let layer = quad[0].layer as u32;

            let axis = (0..3).find(|k| min[*k] == max[*k]).unwrap();
            assert_ne!(normal[axis], 0);
            let u = (axis + 1) % 3;
            let v = (axis + 2) % 3;
            for a in min[u]..max[u] {
                for b in min[v]..max[v] {
                    let mut cell = [0; 3];
                    cell[axis] = min[axis];
                    cell[u] = a;
                    cell[v] = b;
                    *cells.entry((layer, normal, tile, cell)).or_insert(0) += 1;
                }
            }
        }
        cells
    }

    /// Per-voxel face culling over the chunk's own voxels.
    fn naive_cells<S: BlockSource>(source: &S, coord: ChunkCoord, pass: MeshPass) -> HashMap<Cell, usize> {
        let origin = chunk_origin(coord);
        let mut cells = HashMap::new();
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let world = Point3::new(origin.x + x, origin.y + y, origin.z + z);
                    let block = source.block_at(world.x, world.y, world.z);
                    for side in BlockSide::all() {
                        let d = side.direction();
                        let neighbor = source.block_at(world.x + d.x, world.y + d.y, world.z + d.z);
                        let visible = match pass {
                            MeshPass::Opaque => block.is_opaque() && block.should_render_face(neighbor),
                            MeshPass::Water => block == BlockType::WATER && neighbor == BlockType::AIR,
                        };
                        if !visible {
                            continue;
                        }
                        let mut cell = [world.x, world.y, world.z];
                        if side.is_positive() {
                            cell[side.axis()] += 1;
                        }
                        let key = (
                            block.texture_layer(),
                            [d.x, d.y, d.z],
                            tile_for_face_on_voxel(side, world),
                            cell,
                        );
                        *cells.entry(key).or_insert(0) += 1;
                    }
                }
            }
        }
        cells
    }

    fn small_planet() -> PlanetParams {
        PlanetParams {
            base_radius: 40.0,
            max_height: 6.0,
            noise_freq: 2.0,
            octaves: 3,
            sea_level_offset: 1.0,
        }
    }

    #[test]
    fn air_chunk_has_no_geometry() {
        let source = FnSource(|_, _, _| BlockType::AIR);
        let vertices = build_chunk_vertices(&source, Point3::new(0, 0, 0));
        assert!(vertices.opaque.is_empty());
        assert!(vertices.water.is_empty());
    }

    #[test]
    fn lone_block_gets_six_faces() {
        let source = FnSource(|x, y, z| {
            if (x, y, z) == (5, 6, 7) {
                BlockType::STONE
            } else {
                BlockType::AIR
            }
        });
        let vertices = build_chunk_vertices(&source, Point3::new(0, 0, 0));
        assert_eq!(vertices.opaque.len(), 36);
        assert!(vertices.water.is_empty());
    }

    #[test]
    fn flat_ground_merges_into_one_quad() {
        // Far above the center along +Y every voxel agrees on the top tile.
        let source = FnSource(|_, y, _| {
            if y < 165 {
                BlockType::GRASS
            } else {
                BlockType::AIR
            }
        });
        let vertices = build_chunk_vertices(&source, Point3::new(0, 10, 0));
        assert_eq!(vertices.opaque.len(), 6);
        assert!(vertices.opaque.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(vertices.opaque.iter().all(|v| v.position[1] == 165.0));
        let max_u = vertices.opaque.iter().map(|v| v.local_uv[0]).fold(0.0, f32::max);
        let max_v = vertices.opaque.iter().map(|v| v.local_uv[1]).fold(0.0, f32::max);
        assert_eq!((max_u, max_v), (16.0, 16.0));
    }

    #[test]
    fn water_faces_only_touch_air() {
        let source = FnSource(|x, y, z| match (x, y, z) {
            (1, 1, 1) => BlockType::WATER,
            (2, 1, 1) => BlockType::STONE,
            _ => BlockType::AIR,
        });
        let vertices = build_chunk_vertices(&source, Point3::new(0, 0, 0));
        assert_eq!(vertices.water.len(), 5 * 6);
        assert_eq!(vertices.opaque.len(), 6 * 6);
        assert!(vertices.water.iter().all(|v| v.normal != [1.0, 0.0, 0.0]));
    }

    #[test]
    fn greedy_covers_exactly_the_naive_faces() {
        let mut world = World::new(small_planet());
        let coords = [
            Point3::new(2, 0, 0),
            Point3::new(-3, -1, 0),
            Point3::new(0, 2, -1),
            Point3::new(-1, -3, 1),
            Point3::new(1, 1, 1),
        ];
        for coord in coords {
            world.get_or_create_chunk(coord);
            world.fill_chunk_blocks(coord);
        }

        for coord in coords {
            let vertices = build_chunk_vertices(&world, coord);
            for (pass, list) in [(MeshPass::Opaque, &vertices.opaque), (MeshPass::Water, &vertices.water)] {
                let greedy = rasterize(list);
                assert!(greedy.values().all(|count| *count == 1), "overlap in {coord:?}");
                assert_eq!(greedy, naive_cells(&world, coord, pass), "{pass:?} {coord:?}");
            }
        }
    }

    #[test]
    fn greedy_matches_naive_on_noisy_blocks() {
        let source = FnSource(|x, y, z| {
            let n = hash3i(x.div_euclid(2), y.div_euclid(3), z);
            if n < 0.3 {
                BlockType::STONE
            } else if n < 0.45 {
                BlockType::DIRT
            } else if n < 0.6 {
                BlockType::WATER
            } else {
                BlockType::AIR
            }
        });
        for coord in [Point3::new(0, 0, 0), Point3::new(-1, 2, -3)] {
            let vertices = build_chunk_vertices(&source, coord);
            assert_eq!(rasterize(&vertices.opaque), naive_cells(&source, coord, MeshPass::Opaque));
            assert_eq!(rasterize(&vertices.water), naive_cells(&source, coord, MeshPass::Water));
        }
    }

    #[test]
    fn shared_border_faces_are_emitted_once() {
        let source = FnSource(|x, y, z| {
            if hash3i(x, y, z) < 0.5 {
                BlockType::STONE
            } else {
                BlockType::AIR
            }
        });
        let left = Point3::new(0, 0, 0);
        let right = Point3::new(1, 0, 0);

        let on_border = |coord: ChunkCoord| -> usize {
            let vertices = build_chunk_vertices(&source, coord);
            rasterize(&vertices.opaque)
                .keys()
                .filter(|cell| cell.1[0] != 0 && cell.3[0] == CHUNK_DIMENSION)
                .count()
        };

        let mut expected = 0;
        for y in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                let inside = source.block_at(CHUNK_DIMENSION - 1, y, z).is_opaque();
                let outside = source.block_at(CHUNK_DIMENSION, y, z).is_opaque();
                if inside != outside {
                    expected += 1;
                }
            }
        }

        assert!(expected > 0);
        assert_eq!(on_border(left) + on_border(right), expected);
    }

    #[test]
    fn solid_wall_on_the_border_belongs_to_its_owner() {
        let source = FnSource(|x, _, _| {
            if x < CHUNK_DIMENSION {
                BlockType::STONE
            } else {
                BlockType::AIR
            }
        });
        let owner = build_chunk_vertices(&source, Point3::new(0, 0, 0));
        let neighbor = build_chunk_vertices(&source, Point3::new(1, 0, 0));
        assert!(neighbor.opaque.is_empty());
        let border: usize = rasterize(&owner.opaque)
            .keys()
            .filter(|cell| cell.1 == [1, 0, 0] && cell.3[0] == CHUNK_DIMENSION)
            .count();
        assert_eq!(border, (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize);
    }
}
