//! # Planet Module
//!
//! Maps a world position to a block material for a sphere-shaped planet.
//!
//! The planet is a ball of radius `base_radius` whose surface is displaced
//! along the radial direction by fractal noise sampled on the unit sphere.
//! Everything outside the displaced surface is air, or water when it lies
//! below sea level. Inside, the material is chosen by depth below the surface,
//! with caves carved out of the deep rock.
//!
//! All functions here are pure. The chunk generator and the procedural
//! fallback for ungenerated chunks call the same sampler and must agree
//! exactly.

use cgmath::{InnerSpace, Point3, Vector3};
use noise::{NoiseFn, ScalePoint};
use serde::{Deserialize, Serialize};

use super::block::BlockType;
use super::noise::Fbm;

/// Below this distance from the center a position counts as the center itself.
const CENTER_EPSILON: f64 = 1e-5;

/// Frequency of the cave noise field, in voxels⁻¹.
pub const CAVE_FREQUENCY: f64 = 0.06;
/// Octaves of the cave noise field.
pub const CAVE_OCTAVES: u32 = 4;
/// Cave noise values above this threshold are carved to air.
pub const CAVE_THRESHOLD: f64 = 0.35;
/// Caves never reach closer to the surface than this depth.
pub const CAVE_MIN_DEPTH: f64 = 4.0;

/// Depth of the surface layer (grass, sand or snow).
pub const SURFACE_LAYER_DEPTH: f64 = 1.0;
/// Depth where dirt gives way to stone.
pub const DIRT_LAYER_DEPTH: f64 = 4.0;

/// `|dir.y|` above which the surface counts as polar.
pub const POLAR_LATITUDE: f64 = 0.65;
/// Fraction of `max_height` above which the surface counts as high ground.
pub const HIGH_GROUND_FRACTION: f64 = 0.35;
/// Surfaces this close above sea level become beaches.
pub const BEACH_MARGIN: f64 = 0.5;

/// Shape parameters of the planet.
///
/// Set once before the first chunk is generated. Changing them invalidates
/// every chunk already generated; regenerating is the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetParams {
    /// Radius of the undisplaced sphere, in voxels.
    pub base_radius: f64,
    /// Largest radial displacement of the surface, in voxels.
    pub max_height: f64,
    /// Frequency of the height noise on the unit sphere.
    pub noise_freq: f64,
    /// Octaves of the height noise.
    pub octaves: u32,
    /// Sea level relative to `base_radius`, in voxels.
    pub sea_level_offset: f64,
}

impl Default for PlanetParams {
    fn default() -> Self {
        PlanetParams {
            base_radius: 1024.0,
            max_height: 512.0,
            noise_freq: 16.0,
            octaves: 16,
            sea_level_offset: -2.0,
        }
    }
}

impl PlanetParams {
    /// Radius of the sea surface.
    pub fn sea_radius(&self) -> f64 {
        self.base_radius + self.sea_level_offset
    }

    /// Radius no terrain can exceed.
    pub fn max_radius(&self) -> f64 {
        self.base_radius + self.max_height.abs()
    }
}

/// Normalizes `v`, falling back to +Y for vectors of (near) zero length.
pub fn radial_direction(v: Vector3<f64>) -> Vector3<f64> {
    let len = v.magnitude();
    if len < CENTER_EPSILON {
        return Vector3::unit_y();
    }
    v / len
}

/// Height field on the unit sphere, before scaling by `max_height`.
pub fn height_noise(params: &PlanetParams) -> ScalePoint<Fbm> {
    ScalePoint::new(Fbm::new(params.octaves)).set_scale(params.noise_freq)
}

/// Cave density field over world positions.
pub fn cave_noise() -> ScalePoint<Fbm> {
    ScalePoint::new(Fbm::new(CAVE_OCTAVES)).set_scale(CAVE_FREQUENCY)
}

/// Radial surface displacement for a unit direction from the planet center.
pub fn height_on_sphere(dir: Vector3<f64>, params: &PlanetParams) -> f64 {
    height_noise(params).get([dir.x, dir.y, dir.z]) * params.max_height
}

/// Whether the voxel at `p`, `depth` voxels below the surface, is carved out as a cave.
///
/// Always `false` above [`CAVE_MIN_DEPTH`], whatever the noise says.
pub fn should_carve_cave(p: Point3<f64>, depth: f64) -> bool {
    if depth < CAVE_MIN_DEPTH {
        return false;
    }
    cave_noise().get([p.x, p.y, p.z]) > CAVE_THRESHOLD
}

/// Samples the planet without an ocean: air outside the surface, grass, dirt
/// and stone inside.
pub fn sample_planet(p: Point3<f64>, params: &PlanetParams) -> BlockType {
    let offset = p - Point3::new(0.0, 0.0, 0.0);
    let d = offset.magnitude();
    if d < CENTER_EPSILON {
        return BlockType::STONE;
    }

    let dir = offset / d;
    let surface_r = params.base_radius + height_on_sphere(dir, params);
    let depth = surface_r - d;
    if depth <= 0.0 {
        return BlockType::AIR;
    }

    if should_carve_cave(p, depth) {
        return BlockType::AIR;
    }

    if depth < SURFACE_LAYER_DEPTH {
        BlockType::GRASS
    } else if depth < DIRT_LAYER_DEPTH {
        BlockType::DIRT
    } else {
        BlockType::STONE
    }
}

/// Samples the planet with oceans filling everything below sea level.
///
/// `p` is a world position in voxel units, usually a voxel center.
pub fn sample_planet_with_ocean(p: Point3<f64>, params: &PlanetParams) -> BlockType {
    let offset = p - Point3::new(0.0, 0.0, 0.0);
    let d = offset.magnitude();
    if d < CENTER_EPSILON {
        return BlockType::STONE;
    }

    let dir = offset / d;
    let height = height_on_sphere(dir, params);
    let surface_r = params.base_radius + height;
    let sea_r = params.sea_radius();

    if d > surface_r {
        if d < sea_r {
            return BlockType::WATER;
        }
        return BlockType::AIR;
    }

    let depth = surface_r - d;

    if should_carve_cave(p, depth) {
        return BlockType::AIR;
    }

    if depth < SURFACE_LAYER_DEPTH {
        if surface_r < sea_r + BEACH_MARGIN {
            return BlockType::SAND;
        }

        let polar = dir.y.abs() > POLAR_LATITUDE;
        let high = height > params.max_height * HIGH_GROUND_FRACTION;
        if polar || high {
            return BlockType::SNOW;
        }
        return BlockType::GRASS;
    }

    if depth < DIRT_LAYER_DEPTH {
        return BlockType::DIRT;
    }
    BlockType::STONE
}
