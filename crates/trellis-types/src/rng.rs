//! Seeded randomness for one rendering pass.
//!
//! A single `SmallRng` instance is shared by every operator in a pass, so
//! the draw order is part of the determinism contract: the same seed and
//! the same evaluation order reproduce identical output. Textual seeds are
//! reduced to a 64-bit state with SHA-256 so any host-supplied string maps
//! stably onto the PRNG.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::rc::Rc;

/// Derive a 64-bit RNG seed from a textual seed.
pub fn seed_from_text(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Shared handle to the pass RNG.
///
/// Cloning the handle shares the underlying generator; all clones draw
/// from one stream.
#[derive(Debug, Clone)]
pub struct SharedRng {
    inner: Rc<RefCell<SmallRng>>,
}

impl SharedRng {
    /// Create from a numeric seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SmallRng::seed_from_u64(seed))),
        }
    }

    /// Create from a textual seed (hashed through [`seed_from_text`]).
    pub fn from_text(seed: &str) -> Self {
        Self::from_seed(seed_from_text(seed))
    }

    /// Uniform draw in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.inner.borrow_mut().gen::<f64>()
    }

    /// Uniform draw in `[a, b]` (order-insensitive).
    pub fn between(&self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        lo + (hi - lo) * self.fraction()
    }

    /// Uniform index into a list of `len` elements. `len` of zero
    /// returns zero.
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.borrow_mut().gen_range(0..len)
    }

    /// A raw draw used as a per-expansion signature value.
    pub fn signature(&self) -> u64 {
        self.inner.borrow_mut().gen::<u64>()
    }

    /// Fisher–Yates shuffle with the shared stream.
    pub fn shuffle<T>(&self, mut items: Vec<T>) -> Vec<T> {
        let mut rng = self.inner.borrow_mut();
        for i in (1..items.len()).rev() {
            let j = rng.gen_range(0..=i);
            items.swap(i, j);
        }
        items
    }
}
