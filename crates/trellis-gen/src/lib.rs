//! Generators for the trellis engine.
//!
//! Three sub-generators sit behind the operator layer: a deterministic
//! noise field, a shape-point sampler with a set of named built-in
//! shapes, and the SVG serialization chain (markup generation,
//! normalization, data-URL packaging).

pub mod noise;
pub mod shapes;
pub mod svg;

pub use noise::NoiseField;
pub use shapes::{named_shape, sample_points, RadiusEval};
pub use svg::{generate, normalize, to_url};
