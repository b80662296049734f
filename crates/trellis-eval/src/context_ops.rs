//! Context-derived arithmetic operators: cell coordinates, grid totals,
//! nested-loop values, cell ids.
//!
//! Each operator anchors suffix/prefix arithmetic on a contextual base
//! value, so template authors can write `@x+2` or `@x2+` and always get
//! the base on the expected side:
//!   `+3` (suffix form)  → base + 3
//!   `2-` (prefix form)  → 2 − base
//! The asymmetry is deliberate and preserved exactly.

use crate::args::Arg;
use trellis_types::{fmt_num, Context, Value};

/// Which contextual base the operator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Base {
    Count,
    X,
    Y,
    Z,
    GridCount,
    GridX,
    GridY,
    GridZ,
    LoopIndex,
    LoopX,
    LoopY,
    LoopTotal,
}

impl Base {
    /// The literal the loop operators echo when no expansion is active.
    fn token(self) -> Option<&'static str> {
        match self {
            Base::LoopIndex => Some("@n"),
            Base::LoopX => Some("@nx"),
            Base::LoopY => Some("@ny"),
            Base::LoopTotal => Some("@N"),
            _ => None,
        }
    }
}

pub(crate) fn apply(base: Base, ctx: &Context, args: &mut [Arg]) -> Value {
    let value = match base {
        Base::Count => ctx.count as f64,
        Base::X => ctx.x as f64,
        Base::Y => ctx.y as f64,
        Base::Z => ctx.z as f64,
        Base::GridCount => ctx.grid.count as f64,
        Base::GridX => ctx.grid.x as f64,
        Base::GridY => ctx.grid.y as f64,
        Base::GridZ => ctx.grid.z as f64,
        Base::LoopIndex | Base::LoopX | Base::LoopY | Base::LoopTotal => {
            let Some(frame) = ctx.last_frame() else {
                // outside any expansion the operator echoes its token
                return Value::Text(base.token().unwrap().to_string());
            };
            match base {
                Base::LoopIndex => frame.index,
                Base::LoopX => frame.x,
                Base::LoopY => frame.y,
                _ => frame.total,
            }
        }
    };
    let input = args.first_mut().map(Arg::value).unwrap_or_default();
    Value::Text(fmt_num(anchored(value, &input)))
}

/// The cell-id operator ignores its input entirely.
pub(crate) fn cell_id(ctx: &Context) -> Value {
    Value::Text(ctx.cell_id())
}

/// Combine `base` with a trailing/leading arithmetic suffix/prefix.
fn anchored(base: f64, input: &str) -> f64 {
    let mut chars = input.chars();
    let (first, second) = (chars.next(), chars.next());
    let last = input.chars().last();

    // suffix form: `OP num` applies with the base on the left
    if let (Some(op), Some(c)) = (first, second) {
        if is_op(op) && (c.is_ascii_digit() || c == '.' || c == ' ') {
            let num = input[op.len_utf8()..].trim().parse::<f64>().unwrap_or(0.0);
            return finite_or(combine(base, op, num), base);
        }
    }
    // prefix form: `num OP` applies with the base on the right
    if let Some(op) = last {
        if is_op(op) {
            let num = input[..input.len() - op.len_utf8()]
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0);
            return finite_or(combine(num, op, base), base);
        }
    }
    base + input.trim().parse::<f64>().unwrap_or(0.0)
}

fn is_op(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%')
}

fn combine(left: f64, op: char, right: f64) -> f64 {
    match op {
        '+' => left + right,
        '-' => left - right,
        '*' => left * right,
        '/' => left / right,
        _ => left % right,
    }
}

/// Division/modulo by zero keeps the render alive: the base passes
/// through unchanged.
fn finite_or(result: f64, base: f64) -> f64 {
    if result.is_finite() {
        result
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_form_keeps_base_left() {
        assert_eq!(anchored(5.0, "+3"), 8.0);
        assert_eq!(anchored(5.0, "*2"), 10.0);
        assert_eq!(anchored(5.0, "% 3"), 2.0);
    }

    #[test]
    fn prefix_form_keeps_base_right() {
        assert_eq!(anchored(5.0, "2-"), -3.0);
        assert_eq!(anchored(5.0, "10/"), 2.0);
        assert_eq!(anchored(5.0, "3+"), 8.0);
    }

    #[test]
    fn plain_numbers_add() {
        assert_eq!(anchored(5.0, "4"), 9.0);
        assert_eq!(anchored(5.0, "abc"), 5.0);
        assert_eq!(anchored(5.0, ""), 5.0);
    }

    #[test]
    fn zero_divisor_keeps_base() {
        assert_eq!(anchored(5.0, "/0"), 5.0);
    }
}
