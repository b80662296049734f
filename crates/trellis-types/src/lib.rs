//! Shared types for the trellis engine.
//!
//! This crate defines the evaluation context, the produced `Value` type,
//! the per-pass state store with its history stacks, the seeded RNG, and
//! the loud configuration errors of the operator table.

mod error;
mod rng;
mod value;
pub mod context;
pub mod state;

pub use context::{Context, Grid, SeqFrame, SiteId};
pub use error::TableError;
pub use rng::{seed_from_text, SharedRng};
pub use state::{HistoryStack, SiteKey, StateStore};
pub use value::Value;

/// Format a number the way values surface in style output: integral
/// values drop the fraction, everything else prints the shortest float.
pub fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// True for a single ASCII letter — the trigger for character-code
/// interpolation in the random operators.
pub fn is_letter(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}

/// Linear interpolation between `a` and `b` at parameter `t`.
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp `v` into `[min, max]`.
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    v.max(min).min(max)
}
