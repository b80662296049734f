//! Stateful selection operators: the pick family.
//!
//! Every variant expands range shorthand in its argument list, chooses
//! one element, and pushes the choice onto the shared `last_pick`
//! history. What varies is *how* the element is chosen: uniformly,
//! uniformly-excluding-the-previous-winner, round-robin, or from a
//! per-site shuffled copy.

use crate::args::{self, Arg};
use trellis_types::{Context, SiteKey, Value};

/// `p` — uniform pick. A no-argument call replays the most recent
/// non-empty argument list from this call-site.
pub(crate) fn pick(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let mut list = args::expand(args::values(op_args));
    if list.is_empty() {
        list = ctx
            .state()
            .pick_args(ctx.site)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
    }
    let picked = choose(ctx, &list);
    let mut state = ctx.state();
    state.set_pick_args(ctx.site, list);
    state.last_pick.push(picked.clone());
    Value::Text(picked)
}

/// `P` — pick excluding the previous winner for this call-site binding.
pub(crate) fn pick_unique(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let fresh = !op_args.is_empty();
    let mut list = args::expand(args::values(op_args));
    let key = SiteKey::new("P", ctx.site);

    let last = {
        let state = ctx.state();
        if !fresh {
            list = state
                .pick_args(ctx.site)
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            // replayed calls compare against the shared history instead
            // of the per-site binding
            state.last_pick.last(1).map(str::to_string)
        } else {
            state.site_pick(&key).map(str::to_string)
        }
    };

    // drop at most one occurrence, and only while an alternative remains
    if list.len() > 1 {
        if let Some(last) = &last {
            if let Some(at) = list.iter().position(|v| v == last) {
                list.remove(at);
            }
        }
    }

    let picked = choose(ctx, &list);
    let mut state = ctx.state();
    state.set_pick_args(ctx.site, list);
    if fresh {
        state.set_site_pick(key, picked.clone());
    }
    state.last_pick.push(picked.clone());
    Value::Text(picked)
}

/// `pl` / `pr` — deterministic round-robin, forward or from the end.
pub(crate) fn pick_by_turn(ctx: &Context, op_args: &mut [Arg], reverse: bool) -> Value {
    let list = args::expand(args::values(op_args));
    let op = if reverse { "pr" } else { "pl" };
    let Some(pos) = turn_position(ctx, op, list.len()) else {
        return push_pick(ctx, String::new());
    };
    let value = if reverse {
        list[list.len() - pos - 1].clone()
    } else {
        list[pos].clone()
    };
    push_pick(ctx, value)
}

/// `pd` — round-robin over a per-site shuffled copy of the list.
pub(crate) fn pick_shuffled(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let list = args::expand(args::values(op_args));
    let Some(pos) = turn_position(ctx, "pd", list.len()) else {
        return push_pick(ctx, String::new());
    };
    let key = SiteKey::scoped("pd", ctx.site, scope_of(ctx));
    let cached = ctx.state().shuffled(&key).map(<[String]>::to_vec);
    let shuffled = match cached {
        Some(items) => items,
        None => {
            let items = ctx.rng().shuffle(list);
            ctx.state().set_shuffled(key, items.clone());
            items
        }
    };
    let value = shuffled.get(pos).cloned().unwrap_or_default();
    push_pick(ctx, value)
}

/// `lp` — n positions back in the shared pick history.
pub(crate) fn last_pick(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let n = history_depth(op_args);
    let state = ctx.state();
    Value::Text(
        state
            .last_pick
            .last(n)
            .map(str::to_string)
            .unwrap_or_default(),
    )
}

/// Shared depth parsing for `lp`/`lr`: default 1, malformed input reads
/// as depth 0 (beyond any stack).
pub(crate) fn history_depth(op_args: &mut [Arg]) -> usize {
    match op_args.first_mut() {
        None => 1,
        Some(arg) => {
            let text = arg.value();
            if text.trim().is_empty() {
                1
            } else {
                text.trim().parse().unwrap_or(0)
            }
        }
    }
}

/// Advance the per-(site, expansion) counter and resolve the 1-based
/// turn index into a list position. `None` for an empty list.
fn turn_position(ctx: &Context, op: &'static str, len: usize) -> Option<usize> {
    let key = SiteKey::scoped(op, ctx.site, scope_of(ctx));
    let counter = ctx.state().next_counter(key);
    if len == 0 {
        return None;
    }
    // an active expansion indexes by position instead of call order
    let idx = match ctx.last_frame() {
        Some(frame) => frame.index as i64,
        None => counter as i64,
    };
    Some((idx - 1).rem_euclid(len as i64) as usize)
}

fn scope_of(ctx: &Context) -> u64 {
    ctx.last_frame().map(|f| f.sig).unwrap_or(0)
}

fn choose(ctx: &Context, list: &[String]) -> String {
    if list.is_empty() {
        return String::new();
    }
    list[ctx.rng().index(list.len())].clone()
}

fn push_pick(ctx: &Context, value: String) -> Value {
    ctx.state().last_pick.push(value.clone());
    Value::Text(value)
}
