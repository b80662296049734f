//! The value type produced by every operator invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of an operator invocation: a single piece of text, or an
/// ordered list of pieces (cycle rotations, mirrored argument lists,
/// decoded code points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

impl Value {
    /// The empty text value — the universal fail-soft result.
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    /// Collapse to plain text. Lists join with commas, matching how the
    /// upstream template evaluator consumes multi-valued results.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::List(items) => items.join(","),
        }
    }

    /// True when the value carries no content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}
