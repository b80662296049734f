//! Operator arguments.
//!
//! The upstream template evaluator hands operators either pre-evaluated
//! text or deferred sub-expressions. Deferred arguments exist for the
//! sequence operators, which re-evaluate their nested expressions once
//! per repetition under a fresh [`SeqFrame`]; every other operator
//! evaluates them frame-less exactly once.

use std::collections::HashMap;
use trellis_types::{SeqFrame, Value};

/// A thunk for a deferred sub-expression.
pub type ExprThunk<'a> = &'a mut dyn FnMut(Option<&SeqFrame>) -> Value;

/// One operator argument.
pub enum Arg<'a> {
    /// Already-evaluated literal text.
    Text(String),
    /// Deferred sub-expression, re-evaluated per sequence repetition.
    Expr(ExprThunk<'a>),
}

impl<'a> Arg<'a> {
    pub fn text(s: impl Into<String>) -> Self {
        Arg::Text(s.into())
    }

    /// Evaluate without an active frame.
    pub fn value(&mut self) -> String {
        match self {
            Arg::Text(s) => s.clone(),
            Arg::Expr(f) => f(None).to_text(),
        }
    }

    /// Evaluate under a sequence frame.
    pub fn eval_in(&mut self, frame: &SeqFrame) -> String {
        match self {
            Arg::Text(s) => s.clone(),
            Arg::Expr(f) => f(Some(frame)).to_text(),
        }
    }
}

/// Evaluate every argument frame-less, in order.
pub fn values(args: &mut [Arg]) -> Vec<String> {
    args.iter_mut().map(Arg::value).collect()
}

/// Expansion cap: a runaway range shorthand stays a literal.
const MAX_RANGE: i64 = 65536;

/// Expand range shorthand in a literal argument list: `1-5` becomes
/// `1,2,3,4,5` and `a-e` becomes `a,b,c,d,e` (descending ranges count
/// down). Tokens that are not ranges pass through unchanged.
pub fn expand(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(range) = numeric_range(&token) {
            out.extend(range);
        } else if let Some(range) = letter_range(&token) {
            out.extend(range);
        } else {
            out.push(token);
        }
    }
    out
}

fn numeric_range(token: &str) -> Option<Vec<String>> {
    // split at a '-' that is not the leading sign
    for (i, _) in token.char_indices().filter(|&(i, c)| c == '-' && i > 0) {
        let (left, right) = (&token[..i], &token[i + 1..]);
        if let (Ok(a), Ok(b)) = (left.parse::<i64>(), right.parse::<i64>()) {
            if (a - b).abs() >= MAX_RANGE {
                return None;
            }
            let values: Vec<String> = if a <= b {
                (a..=b).map(|v| v.to_string()).collect()
            } else {
                (b..=a).rev().map(|v| v.to_string()).collect()
            };
            return Some(values);
        }
    }
    None
}

fn letter_range(token: &str) -> Option<Vec<String>> {
    let chars: Vec<char> = token.chars().collect();
    match chars.as_slice() {
        [a, '-', b]
            if a.is_ascii_alphabetic()
                && b.is_ascii_alphabetic()
                && a.is_lowercase() == b.is_lowercase() =>
        {
            let (a, b) = (*a as u32, *b as u32);
            let values: Vec<String> = if a <= b {
                (a..=b).filter_map(char::from_u32).map(String::from).collect()
            } else {
                (b..=a).rev().filter_map(char::from_u32).map(String::from).collect()
            };
            Some(values)
        }
        _ => None,
    }
}

/// Resolve a mixed positional/named argument list against a name list.
/// `["from 2", ".8"]` with names `[from, to]` reads as `from=2, to=.8`;
/// a plain value at position i binds to `names[i]`.
pub fn named_args(args: &[String], names: &[&str]) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (i, arg) in args.iter().enumerate() {
        let arg = arg.trim();
        let mut bound = false;
        if let Some((head, rest)) = arg.split_once(char::is_whitespace) {
            let head = head.trim_end_matches(':');
            if names.contains(&head) {
                out.insert(head.to_string(), rest.trim().to_string());
                bound = true;
            }
        }
        if !bound {
            if let Some(name) = names.get(i) {
                out.insert(name.to_string(), arg.to_string());
            }
        }
    }
    out
}
