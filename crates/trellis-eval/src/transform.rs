//! Path and list transforms, plus the small numeric helpers
//! (`calc`, `hex`).
//!
//! Path transforms parse their input as a command sequence and return
//! the input unchanged when it does not parse — the fail-soft contract.
//! `reverse` and the mirrors fall back to plain list manipulation
//! instead.

use crate::args::{self, Arg};
use crate::calc;
use trellis_parser::{svg_path, value_group, PathCommand};
use trellis_types::{fmt_num, Value};

/// `invert` — swap horizontal and vertical line commands.
pub(crate) fn invert(op_args: &mut [Arg]) -> Value {
    map_path(op_args, |command| {
        let name = match command.name {
            'v' => 'h',
            'V' => 'H',
            'h' => 'v',
            'H' => 'V',
            other => other,
        };
        PathCommand {
            name,
            values: command.values.clone(),
        }
    })
}

/// `flipH` / `flipV` — negate the horizontal (resp. vertical) line
/// command values.
pub(crate) fn flip(op_args: &mut [Arg], horizontal: bool, vertical: bool) -> Value {
    map_path(op_args, |command| {
        let flips = match command.name {
            'h' | 'H' => horizontal,
            'v' | 'V' => vertical,
            _ => false,
        };
        let values = if flips {
            command.values.iter().map(|v| negate(v)).collect()
        } else {
            command.values.clone()
        };
        PathCommand {
            name: command.name,
            values,
        }
    })
}

fn negate(value: &str) -> String {
    fmt_num(-value.parse::<f64>().unwrap_or(0.0))
}

fn map_path(op_args: &mut [Arg], f: impl Fn(&PathCommand) -> PathCommand) -> Value {
    let input = args::values(op_args).join(",");
    let parsed = svg_path::parse(&input);
    if !parsed.valid {
        return Value::Text(input);
    }
    let out: Vec<String> = parsed.commands.iter().map(|c| f(c).render()).collect();
    Value::Text(out.join(" "))
}

/// `reverse` — reverse the command order of a valid path, else reverse
/// the argument list.
pub(crate) fn reverse(op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let parsed = svg_path::parse(&vals.join(","));
    if parsed.valid {
        let out: Vec<String> = parsed
            .commands
            .iter()
            .rev()
            .map(PathCommand::render)
            .collect();
        return Value::Text(out.join(" "));
    }
    let mut vals = vals;
    vals.reverse();
    Value::List(vals)
}

/// `cycle` — every rotation of the argument list, one full period. The
/// single-argument form splits and joins on spaces, the list form on
/// commas.
pub(crate) fn cycle(op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let (symbol, mut list) = if vals.len() == 1 {
        (" ", value_group::parse(&vals[0], ' '))
    } else {
        (",", value_group::parse(&vals.join(","), ','))
    };
    if list.is_empty() {
        return Value::List(Vec::new());
    }
    let mut rotations = vec![list.join(symbol)];
    for _ in 1..list.len() {
        let head = list.remove(0);
        list.push(head);
        rotations.push(list.join(symbol));
    }
    Value::List(rotations)
}

/// `mirror` — append the reversed list including the pivot
/// (a,b,c → a,b,c,c,b,a).
pub(crate) fn mirror(op_args: &mut [Arg]) -> Value {
    let mut vals = args::values(op_args);
    for i in (0..vals.len()).rev() {
        vals.push(vals[i].clone());
    }
    Value::List(vals)
}

/// `Mirror` — mirror without repeating the pivot (a,b,c → a,b,c,b,a).
pub(crate) fn mirror_extend(op_args: &mut [Arg]) -> Value {
    let mut vals = args::values(op_args);
    for i in (0..vals.len().saturating_sub(1)).rev() {
        vals.push(vals[i].clone());
    }
    Value::List(vals)
}

/// `unicode` — numeric code points (decimal or 0x-hex) to characters.
pub(crate) fn unicode(op_args: &mut [Arg]) -> Value {
    let chars: Vec<String> = args::values(op_args)
        .iter()
        .map(|code| {
            parse_codepoint(code)
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .collect();
    Value::List(chars)
}

fn parse_codepoint(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok();
    }
    text.parse().ok()
}

/// `calc` — the arithmetic evaluator as an operator.
pub(crate) fn calc_op(op_args: &mut [Arg]) -> Value {
    let text = op_args.first_mut().map(Arg::value).unwrap_or_default();
    Value::Text(fmt_num(calc::eval(&text, &[])))
}

/// `hex` — the leading integer of the input in hexadecimal.
pub(crate) fn hex(op_args: &mut [Arg]) -> Value {
    let text = op_args.first_mut().map(Arg::value).unwrap_or_default();
    let n = leading_int(&text);
    let out = if n < 0 {
        format!("-{:x}", n.unsigned_abs())
    } else {
        format!("{n:x}")
    };
    Value::Text(out)
}

fn leading_int(text: &str) -> i64 {
    let text = text.trim();
    let negative = text.starts_with('-');
    let digits: String = text
        .trim_start_matches(['-', '+'])
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let n: i64 = digits.parse().unwrap_or(0);
    if negative {
        -n
    } else {
        n
    }
}
