//! Construction-time errors.
//!
//! Runtime evaluation is fail-soft and never surfaces errors; the only
//! loud failures in the engine are configuration mistakes in the operator
//! table itself, caught when the table is built.

use thiserror::Error;

/// Operator-table configuration error. These indicate a programming
/// mistake in the table definition, not bad user input, and are surfaced
/// immediately from `OperatorTable::new`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// An alias points at a name that is not a canonical operator.
    /// Aliases must resolve directly to canonical names — never to
    /// another alias — so this also rejects transitive chains.
    #[error("alias '{alias}' targets unknown canonical operator '{target}'")]
    UnknownTarget { alias: String, target: String },

    /// The same alias name is declared twice.
    #[error("duplicate alias '{alias}'")]
    DuplicateAlias { alias: String },

    /// An alias shadows a canonical operator name.
    #[error("alias '{alias}' collides with a canonical operator name")]
    AliasShadowsCanonical { alias: String },
}
