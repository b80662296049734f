//! Boundary parsers for the trellis engine.
//!
//! Everything here is pure and fail-soft at the value level: malformed
//! input degrades to the most useful total answer (empty token lists,
//! `valid: false` paths) rather than erroring. The one exception is the
//! SVG mini-syntax parser, which reports structural mistakes through
//! [`SvgError`] so callers can fall back explicitly.

pub mod shape_commands;
pub mod svg_path;
pub mod svg_tree;
pub mod value_group;

pub use shape_commands::ShapeConfig;
pub use svg_path::{PathCommand, SvgPath};
pub use svg_tree::{ParseOptions, SvgError, SvgNode};
