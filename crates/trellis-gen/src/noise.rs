//! Deterministic gradient-noise field.
//!
//! Classic improved Perlin noise over a 256-entry permutation table. The
//! table is shuffled once with the pass RNG when a field is first touched
//! at a call-site; sampling is pure thereafter, so a field resampled at
//! the same coordinates always agrees with itself within a pass and
//! across passes with the same seed.
//!
//! A 2D section of the field stays within ±√2/2, which is what the
//! mapped noise operator assumes when it rescales samples into a target
//! range.

use trellis_types::SharedRng;

/// A sampled noise field. Construction shuffles the permutation table;
/// sampling never mutates.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    /// Shuffle a fresh permutation table with the pass RNG. The table is
    /// what the state store caches per call-site.
    pub fn shuffled_table(rng: &SharedRng) -> Vec<u8> {
        let identity: Vec<u8> = (0..=255).collect();
        rng.shuffle(identity)
    }

    /// Rebuild a field from a cached 256-entry table. Short tables are
    /// padded with the identity tail (fail-soft; only reachable if a
    /// caller hand-rolls a table).
    pub fn from_table(table: &[u8]) -> Self {
        let mut perm = [0u8; 512];
        for i in 0..256 {
            let v = table.get(i).copied().unwrap_or(i as u8);
            perm[i] = v;
            perm[i + 256] = v;
        }
        Self { perm }
    }

    /// Fresh field straight from the pass RNG.
    pub fn new(rng: &SharedRng) -> Self {
        Self::from_table(&Self::shuffled_table(rng))
    }

    /// Sample the field at (x, y, z).
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa], xf, yf, zf),
                    grad(p[ba], xf - 1.0, yf, zf),
                ),
                lerp(
                    u,
                    grad(p[ab], xf, yf - 1.0, zf),
                    grad(p[bb], xf - 1.0, yf - 1.0, zf),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], xf, yf, zf - 1.0),
                    grad(p[ba + 1], xf - 1.0, yf, zf - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], xf, yf - 1.0, zf - 1.0),
                    grad(p[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
                ),
            ),
        )
    }
}

/// Quintic interpolation (smootherstep).
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Gradient dot product over the 12 edge vectors.
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
