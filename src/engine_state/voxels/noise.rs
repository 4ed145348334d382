//! # Noise Module
//!
//! Deterministic lattice value noise and a fractal sum over it.
//!
//! Both sources are pure functions of position. Neighboring chunks sample the
//! same world positions independently, so identical inputs must always give
//! identical outputs. The sources implement [`noise::NoiseFn`] so they can be
//! combined with the adapters of the `noise` crate.

use noise::NoiseFn;

/// Integer avalanche hash (xorshift-multiply finalizer).
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Hashes an integer lattice corner into `[0, 1)`.
///
/// FNV-1a style mixing of the three coordinates followed by [`hash_u32`];
/// the low 24 bits become the fraction.
#[inline]
pub fn hash3i(x: i32, y: i32, z: i32) -> f64 {
    let mut h: u32 = 2_166_136_261;
    h = (h ^ x as u32).wrapping_mul(16_777_619);
    h = (h ^ y as u32).wrapping_mul(16_777_619);
    h = (h ^ z as u32).wrapping_mul(16_777_619);
    h = hash_u32(h);
    (h & 0x00FF_FFFF) as f64 / 0x0100_0000 as f64
}

/// Smoothstep weight `3t² - 2t³`.
#[inline]
pub fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Trilinear value noise in `[0, 1)`.
pub fn value_noise3(p: [f64; 3]) -> f64 {
    let cell = [p[0].floor(), p[1].floor(), p[2].floor()];
    let (ix, iy, iz) = (cell[0] as i32, cell[1] as i32, cell[2] as i32);

    let sx = smooth(p[0] - cell[0]);
    let sy = smooth(p[1] - cell[1]);
    let sz = smooth(p[2] - cell[2]);

    let corner = |dx: i32, dy: i32, dz: i32| hash3i(ix + dx, iy + dy, iz + dz);

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), sx);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), sx);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), sx);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), sx);

    let y0 = lerp(x00, x10, sy);
    let y1 = lerp(x01, x11, sy);

    lerp(y0, y1, sz)
}

/// Fractal sum of `octaves` layers of value noise, roughly in `[-1, 1]`.
///
/// Each octave doubles the frequency and halves the amplitude, starting at
/// amplitude 0.5. Every layer is remapped to the signed range before summing.
pub fn fbm(p: [f64; 3], octaves: u32) -> f64 {
    Fbm::new(octaves).get(p)
}

/// Stateless value noise source.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueNoise;

impl NoiseFn<f64, 3> for ValueNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        value_noise3(point)
    }
}

/// Fractal value noise with a fixed octave count.
#[derive(Clone, Copy, Debug)]
pub struct Fbm {
    /// Number of summed layers; zero yields a constant 0.
    pub octaves: u32,
    source: ValueNoise,
}

impl Fbm {
    /// Creates a source summing `octaves` layers.
    pub fn new(octaves: u32) -> Self {
        Fbm {
            octaves,
            source: ValueNoise,
        }
    }
}

impl NoiseFn<f64, 3> for Fbm {
    fn get(&self, point: [f64; 3]) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = 0.5;
        let mut frequency = 1.0;
        for _ in 0..self.octaves {
            let layer = self.source.get([
                point[0] * frequency,
                point[1] * frequency,
                point[2] * frequency,
            ]);
            sum += (layer * 2.0 - 1.0) * amplitude;
            frequency *= 2.0;
            amplitude *= 0.5;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_noise_stays_in_unit_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..2000 {
            let p = [
                rng.f64() * 200.0 - 100.0,
                rng.f64() * 200.0 - 100.0,
                rng.f64() * 200.0 - 100.0,
            ];
            let n = value_noise3(p);
            assert!((0.0..1.0).contains(&n), "{n} at {p:?}");
        }
    }

    #[test]
    fn value_noise_hits_lattice_hashes_at_integer_points() {
        assert_eq!(value_noise3([3.0, -4.0, 5.0]), hash3i(3, -4, 5));
        assert_eq!(value_noise3([0.0, 0.0, 0.0]), hash3i(0, 0, 0));
    }

    #[test]
    fn value_noise_is_continuous_across_cells() {
        let below = value_noise3([0.999_999, 0.5, 0.5]);
        let above = value_noise3([1.000_001, 0.5, 0.5]);
        assert!((below - above).abs() < 1e-4);
    }

    #[test]
    fn fbm_is_bounded_and_deterministic() {
        let source = Fbm::new(6);
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..500 {
            let p = [rng.f64() * 50.0, rng.f64() * 50.0, rng.f64() * 50.0];
            let a = source.get(p);
            assert_eq!(a, fbm(p, 6));
            assert!((-1.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn zero_octaves_is_flat() {
        assert_eq!(fbm([1.5, 2.5, 3.5], 0), 0.0);
        assert_eq!(ValueNoise.get([2.0, 2.0, 2.0]), hash3i(2, 2, 2));
    }
}
