//! Texture atlas tile selection.
//!
//! Faces sample a 4x3 cube-net atlas. Which tile a face uses depends on where
//! its voxel sits on the planet: the face pointing most directly away from the
//! planet center is the top, its opposite is the bottom, and the remaining four
//! use fixed side tiles.

use cgmath::{InnerSpace, Point3, Vector3};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::BlockSide;

/// Tile sampled by the outward-facing face.
pub const TILE_TOP: (u32, u32) = (1, 2);
/// Tile sampled by the inward-facing face.
pub const TILE_BOTTOM: (u32, u32) = (1, 0);
/// Tile sampled by each face when it is neither top nor bottom, by face index.
pub const SIDE_TILE: [(u32, u32); 6] = [(2, 1), (0, 1), (1, 1), (1, 1), (1, 1), (3, 1)];

/// Every tile the mesher can put on a face.
pub fn mesher_tiles() -> impl Iterator<Item = (u32, u32)> {
    [TILE_TOP, TILE_BOTTOM].into_iter().chain(SIDE_TILE)
}

/// Grid and pixel dimensions of the atlas texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasLayout {
    pub columns: u32,
    pub rows: u32,
    /// Texture width in pixels
    pub width: u32,
    /// Texture height in pixels
    pub height: u32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        AtlasLayout {
            columns: 4,
            rows: 3,
            width: 128,
            height: 96,
        }
    }
}

impl AtlasLayout {
    /// UV rectangle of `tile`, shrunk by half a texel on each edge to avoid
    /// bleeding between neighboring tiles.
    ///
    /// Corners come in the order (u0,v0), (u0,v1), (u1,v1), (u1,v0).
    pub fn tile_uv_rect(&self, tile: (u32, u32)) -> [[f32; 2]; 4] {
        let tile_w = 1.0 / self.columns.max(1) as f32;
        let tile_h = 1.0 / self.rows.max(1) as f32;
        let pad_u = 0.5 / self.width.max(1) as f32;
        let pad_v = 0.5 / self.height.max(1) as f32;

        let u0 = tile.0 as f32 * tile_w + pad_u;
        let v0 = tile.1 as f32 * tile_h + pad_v;
        let u1 = (tile.0 + 1) as f32 * tile_w - pad_u;
        let v1 = (tile.1 + 1) as f32 * tile_h - pad_v;

        [[u0, v0], [u0, v1], [u1, v1], [u1, v0]]
    }

    /// Whether `tile` lies inside the grid.
    pub fn contains(&self, tile: (u32, u32)) -> bool {
        tile.0 < self.columns && tile.1 < self.rows
    }

    /// Whether every mesher tile fits the grid with at least one texel per tile.
    pub fn holds_mesher_tiles(&self) -> bool {
        self.width >= self.columns
            && self.height >= self.rows
            && mesher_tiles().all(|tile| self.contains(tile))
    }

    /// Returns this layout, or the default cube-net layout when the mesher's
    /// tiles do not fit it.
    pub fn validated(self) -> Self {
        if self.holds_mesher_tiles() {
            return self;
        }
        let fallback = AtlasLayout::default();
        warn!(
            "atlas {}x{} ({}x{} px) cannot hold the cube-net tiles, using {}x{} ({}x{} px)",
            self.columns,
            self.rows,
            self.width,
            self.height,
            fallback.columns,
            fallback.rows,
            fallback.width,
            fallback.height
        );
        fallback
    }
}

/// The face of `voxel` that points most directly away from the planet center.
///
/// Uses the voxel center. Ties go to X over Y over Z, and to the positive side.
pub fn dominant_top_side(voxel: Point3<i32>) -> BlockSide {
    let center = Vector3::new(
        voxel.x as f64 + 0.5,
        voxel.y as f64 + 0.5,
        voxel.z as f64 + 0.5,
    );
    let dir = center.normalize();
    let a = Vector3::new(dir.x.abs(), dir.y.abs(), dir.z.abs());

    if a.x >= a.y && a.x >= a.z {
        BlockSide::from_axis(0, dir.x >= 0.0)
    } else if a.y >= a.z {
        BlockSide::from_axis(1, dir.y >= 0.0)
    } else {
        BlockSide::from_axis(2, dir.z >= 0.0)
    }
}

/// The atlas tile for `side` of the voxel at world coordinate `voxel`.
pub fn tile_for_face_on_voxel(side: BlockSide, voxel: Point3<i32>) -> (u32, u32) {
    let top = dominant_top_side(voxel);
    if side == top {
        TILE_TOP
    } else if side == top.opposite() {
        TILE_BOTTOM
    } else {
        SIDE_TILE[side.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_follows_the_radial_direction() {
        assert_eq!(dominant_top_side(Point3::new(0, 100, 3)), BlockSide::TOP);
        assert_eq!(dominant_top_side(Point3::new(0, -100, 3)), BlockSide::BOTTOM);
        assert_eq!(dominant_top_side(Point3::new(-100, 3, 3)), BlockSide::LEFT);
        assert_eq!(dominant_top_side(Point3::new(5, 3, 90)), BlockSide::FRONT);
        assert_eq!(dominant_top_side(Point3::new(5, 3, -90)), BlockSide::BACK);
    }

    #[test]
    fn tiles_for_a_voxel_on_the_north_pole() {
        let voxel = Point3::new(0, 64, 0);
        assert_eq!(tile_for_face_on_voxel(BlockSide::TOP, voxel), TILE_TOP);
        assert_eq!(tile_for_face_on_voxel(BlockSide::BOTTOM, voxel), TILE_BOTTOM);
        assert_eq!(tile_for_face_on_voxel(BlockSide::RIGHT, voxel), SIDE_TILE[0]);
        assert_eq!(tile_for_face_on_voxel(BlockSide::BACK, voxel), SIDE_TILE[5]);
    }

    #[test]
    fn tiles_for_a_voxel_on_the_equator() {
        let voxel = Point3::new(64, 0, 0);
        assert_eq!(tile_for_face_on_voxel(BlockSide::RIGHT, voxel), TILE_TOP);
        assert_eq!(tile_for_face_on_voxel(BlockSide::LEFT, voxel), TILE_BOTTOM);
        assert_eq!(tile_for_face_on_voxel(BlockSide::TOP, voxel), SIDE_TILE[2]);
    }

    #[test]
    fn every_tile_fits_the_default_grid() {
        let layout = AtlasLayout::default();
        assert!(layout.contains(TILE_TOP));
        assert!(layout.contains(TILE_BOTTOM));
        assert!(SIDE_TILE.iter().all(|t| layout.contains(*t)));
        assert!(layout.holds_mesher_tiles());
        assert_eq!(layout.validated(), layout);
    }

    #[test]
    fn layouts_too_small_for_the_cube_net_fall_back() {
        let tiny = AtlasLayout {
            columns: 1,
            rows: 1,
            width: 16,
            height: 16,
        };
        assert!(!tiny.holds_mesher_tiles());
        assert_eq!(tiny.validated(), AtlasLayout::default());

        let no_texels = AtlasLayout {
            width: 2,
            ..AtlasLayout::default()
        };
        assert_eq!(no_texels.validated(), AtlasLayout::default());

        let larger = AtlasLayout {
            columns: 8,
            rows: 6,
            width: 256,
            height: 192,
        };
        assert_eq!(larger.validated(), larger);
    }

    #[test]
    fn uv_rect_is_padded_by_half_a_texel() {
        let layout = AtlasLayout::default();
        let rect = layout.tile_uv_rect((1, 2));
        let eps = 1e-6;
        assert!((rect[0][0] - (0.25 + 0.5 / 128.0)).abs() < eps);
        assert!((rect[0][1] - (2.0 / 3.0 + 0.5 / 96.0)).abs() < eps);
        assert!((rect[2][0] - (0.5 - 0.5 / 128.0)).abs() < eps);
        assert!((rect[2][1] - (1.0 - 0.5 / 96.0)).abs() < eps);
        assert_eq!(rect[1][0], rect[0][0]);
        assert_eq!(rect[3][1], rect[0][1]);
    }
}
