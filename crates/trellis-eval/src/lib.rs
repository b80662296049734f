//! Operator table and evaluation semantics for the trellis engine.
//!
//! The engine exposes two things to the upstream template evaluator:
//! the name→operator table ([`OperatorTable`] / [`OpKind`]) and the
//! per-cell [`Context`] contract re-exported from `trellis-types`.
//! Operators are invoked with [`Arg`] lists — pre-evaluated text or
//! deferred sub-expressions — and always return a [`Value`], never an
//! error: evaluation is fail-soft by design, and the only loud failure
//! is a misconfigured alias table at startup.

mod args;
mod calc;
mod context_ops;
mod geometry;
mod markup;
mod sample;
mod select;
mod sequence;
mod table;
mod transform;

pub use args::{expand, named_args, values, Arg, ExprThunk};
pub use table::{OpKind, OperatorTable};
pub use trellis_types::{
    seed_from_text, Context, Grid, HistoryStack, SeqFrame, SharedRng, SiteId, StateStore,
    TableError, Value,
};

/// Evaluate an arithmetic expression against a variable environment —
/// the `calc` collaborator, exposed for hosts that feed it directly.
pub fn calc(text: &str, vars: &[(&str, f64)]) -> f64 {
    calc::eval(text, vars)
}
