//! Sequence expansion: the `m` / `M` / `µ` operators.
//!
//! The first argument is the repeat count; every further argument is a
//! deferred sub-expression evaluated once per repetition under a fresh
//! [`SeqFrame`]. Repetitions join with the operator's separator (comma,
//! space, or nothing); multiple sub-expressions within one repetition
//! always join with commas.

use crate::args::Arg;
use crate::calc;
use trellis_types::{fmt_num, Context, SeqFrame, Value};

/// Hard ceiling on repetitions per expansion.
const MAX_REPS: usize = 65536;

pub(crate) fn expand(ctx: &Context, separator: &str, args: &mut [Arg]) -> Value {
    let Some((count_arg, actions)) = args.split_first_mut() else {
        return Value::empty();
    };
    if actions.is_empty() {
        return Value::empty();
    }
    let count_text = count_arg.value();
    if count_text.is_empty() {
        return Value::empty();
    }

    // Dynamic counts go through the arithmetic evaluator; simple range
    // patterns (`3x2`, `2-5`) are used as-is. A dynamic count that
    // evaluates to zero falls back to the literal text — it must not
    // suppress the sequence.
    let mut resolved = count_text.clone();
    let has_non_digit = count_text.chars().any(|c| !c.is_ascii_digit());
    if has_non_digit && !is_range_pattern(&count_text) {
        let evaluated = calc::eval(&count_text, &[]);
        if evaluated != 0.0 {
            resolved = fmt_num(evaluated);
        }
    }

    let plan = CountPlan::parse(&resolved);
    if plan.reps.is_empty() {
        return Value::empty();
    }
    let sig = ctx.rng().signature();

    let mut pieces = Vec::with_capacity(plan.reps.len());
    for &(index, x, y) in &plan.reps {
        let frame = SeqFrame {
            index,
            x,
            y,
            total: plan.total,
            cols: plan.cols,
            rows: plan.rows,
            sig,
        };
        let parts: Vec<String> = actions
            .iter_mut()
            .map(|action| action.eval_in(&frame))
            .collect();
        pieces.push(parts.join(","));
    }
    Value::Text(pieces.join(separator))
}

/// `\d+[x-]\d+` — the two simple range patterns that bypass calc.
fn is_range_pattern(text: &str) -> bool {
    let Some(at) = text.find(['x', '-']) else {
        return false;
    };
    let (left, right) = (&text[..at], &text[at + 1..]);
    !left.is_empty()
        && !right.is_empty()
        && left.bytes().all(|b| b.is_ascii_digit())
        && right.bytes().all(|b| b.is_ascii_digit())
}

/// A resolved repetition plan.
struct CountPlan {
    cols: f64,
    rows: f64,
    total: f64,
    /// (index, x, y) per repetition.
    reps: Vec<(f64, f64, f64)>,
}

impl CountPlan {
    fn parse(count: &str) -> Self {
        let count = count.trim();
        if let Some((a, b)) = split_pair(count, 'x') {
            return Self::grid(a, b);
        }
        if let Some((a, b)) = split_pair(count, '-') {
            return Self::range(a, b);
        }
        Self::linear(leading_number(count).max(0.0) as usize)
    }

    /// `N`: N repetitions along one row.
    fn linear(n: usize) -> Self {
        let n = n.min(MAX_REPS);
        Self {
            cols: n as f64,
            rows: 1.0,
            total: n as f64,
            reps: (1..=n).map(|i| (i as f64, i as f64, 1.0)).collect(),
        }
    }

    /// `AxB`: a row-major grid of repetitions.
    fn grid(a: i64, b: i64) -> Self {
        let cols = (a.max(0) as usize).min(MAX_REPS);
        let rows = (b.max(0) as usize).min(MAX_REPS);
        let total = (cols * rows).min(MAX_REPS);
        let mut reps = Vec::with_capacity(total);
        'fill: for y in 1..=rows {
            for x in 1..=cols {
                if reps.len() == total {
                    break 'fill;
                }
                let index = ((y - 1) * cols + x) as f64;
                reps.push((index, x as f64, y as f64));
            }
        }
        Self {
            cols: cols as f64,
            rows: rows as f64,
            total: total as f64,
            reps,
        }
    }

    /// `A-B`: one repetition per range value; `index` carries the value
    /// itself while x tracks the 1-based position.
    fn range(a: i64, b: i64) -> Self {
        let values: Vec<i64> = if a <= b {
            (a..=b).take(MAX_REPS).collect()
        } else {
            (b..=a).rev().take(MAX_REPS).collect()
        };
        let total = values.len() as f64;
        Self {
            cols: total,
            rows: 1.0,
            total,
            reps: values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (v as f64, i as f64 + 1.0, 1.0))
                .collect(),
        }
    }
}

/// Split `AxB` / `A-B` where both halves are bare digit runs — the same
/// strict shape [`is_range_pattern`] recognizes.
fn split_pair(count: &str, sep: char) -> Option<(i64, i64)> {
    let (left, right) = count.split_once(sep)?;
    if left.is_empty()
        || right.is_empty()
        || !left.bytes().all(|b| b.is_ascii_digit())
        || !right.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some((left.parse().ok()?, right.parse().ok()?))
}

/// Leading numeric prefix of a literal count (`"2 - 2"` → 2), matching
/// how a fallen-back dynamic count is consumed.
fn leading_number(count: &str) -> f64 {
    let digits: String = count
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().map(|n: f64| n.floor()).unwrap_or(0.0)
}
