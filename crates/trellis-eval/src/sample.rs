//! Field sampling operators: seeded random draws and noise lookups.

use crate::args::{self, Arg};
use crate::calc;
use crate::select::history_depth;
use trellis_gen::NoiseField;
use trellis_types::{clamp, is_letter, lerp, Context, SiteKey, Value};

/// `r` — uniform draw between two endpoints. Single-letter endpoints
/// interpolate by character code; numeric endpoints carry the first
/// unit found through to the result.
pub(crate) fn random(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let out = if !vals.is_empty() && vals.iter().all(|v| is_letter(v)) {
        let codes: Vec<f64> = vals
            .iter()
            .map(|v| v.chars().next().unwrap() as u32 as f64)
            .collect();
        let (a, b) = endpoints(&codes);
        code_to_char(ctx.rng().between(a, b))
    } else {
        let parsed: Vec<(f64, String)> = vals.iter().map(|v| split_unit(v)).collect();
        let numbers: Vec<f64> = parsed.iter().map(|(n, _)| *n).collect();
        let unit = parsed
            .iter()
            .map(|(_, u)| u.as_str())
            .find(|u| !u.is_empty())
            .unwrap_or("");
        let (a, b) = endpoints(&numbers);
        format!("{}{unit}", ctx.rng().between(a, b))
    };
    ctx.state().last_rand.push(out.clone());
    Value::Text(out)
}

/// `rn` — mapped 2D noise with named options.
pub(crate) fn mapped_noise(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let named = args::named_args(&vals, &["from", "to", "frequency", "amplitude"]);

    let mut from = named.get("from").cloned().unwrap_or_else(|| "0".into());
    let mut to = named.get("to").cloned().unwrap_or_else(|| from.clone());
    if vals.len() == 1 {
        to = from;
        from = "0".into();
    }
    let frequency = clamp(parse_option(named.get("frequency"), 1.0), 0.0, f64::INFINITY);
    let amplitude = clamp(parse_option(named.get("amplitude"), 1.0), 0.0, f64::INFINITY);

    // one field per call-site, lazily created, pass-lifetime
    let field = site_field(ctx, SiteKey::new("rn", ctx.site));

    // an active expansion samples by loop position, the default by cell
    let seq = ctx
        .last_frame()
        .filter(|f| f.index != 0.0 && f.total != 0.0)
        .copied();
    let t = match seq {
        Some(f) => field.sample(
            (f.x - 1.0) / f.cols * frequency,
            (f.y - 1.0) / f.rows * frequency,
            0.0,
        ),
        None => field.sample(
            (ctx.x as f64 - 1.0) / ctx.grid.x as f64 * frequency,
            (ctx.y as f64 - 1.0) / ctx.grid.y as f64 * frequency,
            0.0,
        ),
    };

    let out = if is_letter(&from) && is_letter(&to) {
        let a = from.chars().next().unwrap() as u32 as f64;
        let b = to.chars().next().unwrap() as u32 as f64;
        code_to_char(map_planar(t * amplitude, a, b, amplitude))
    } else {
        let (a, unit_a) = split_unit(&from);
        let (b, unit_b) = split_unit(&to);
        let unit = if unit_a.is_empty() { unit_b } else { unit_a };
        format!("{}{unit}", map_planar(t * amplitude, a, b, amplitude))
    };
    ctx.state().last_rand.push(out.clone());
    Value::Text(out)
}

/// `lr` — n positions back in the shared random history.
pub(crate) fn last_rand(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let n = history_depth(op_args);
    let state = ctx.state();
    Value::Text(
        state
            .last_rand
            .last(n)
            .map(str::to_string)
            .unwrap_or_default(),
    )
}

/// `noise` — raw 3D field sampling; each coordinate argument is an
/// arithmetic expression over the cell/grid variable environment.
pub(crate) fn raw_noise(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let vars: [(&str, f64); 8] = [
        ("i", ctx.count as f64),
        ("I", ctx.grid.count as f64),
        ("x", ctx.x as f64),
        ("X", ctx.grid.x as f64),
        ("y", ctx.y as f64),
        ("Y", ctx.grid.y as f64),
        ("z", ctx.z as f64),
        ("Z", ctx.grid.z as f64),
    ];
    let coord = |i: usize| calc::eval(vals.get(i).map(String::as_str).unwrap_or(""), &vars);
    let field = site_field(ctx, SiteKey::new("noise", ctx.site));
    let sample = field.sample(coord(0), coord(1), coord(2));
    Value::Text(format!("{sample}"))
}

/// Fetch (or lazily create) the cached noise field for a call-site.
fn site_field(ctx: &Context, key: SiteKey) -> NoiseField {
    let cached = ctx.state().noise_table(&key).map(<[u8]>::to_vec);
    let table = match cached {
        Some(table) => table,
        None => {
            let table = NoiseField::shuffled_table(ctx.rng());
            ctx.state().set_noise_table(key, table.clone());
            table
        }
    };
    NoiseField::from_table(&table)
}

/// Map a planar noise sample (±√2/2 · amp) into [from·amp, to·amp].
fn map_planar(value: f64, from: f64, to: f64, amplitude: f64) -> f64 {
    let half_span = (2.0f64 / 4.0).sqrt() * amplitude;
    let ratio = if half_span > 0.0 {
        (value + half_span) / (2.0 * half_span)
    } else {
        0.5
    };
    lerp(ratio, from * amplitude, to * amplitude)
}

/// Numeric option value: leading number of the text, or the default
/// when the option is absent.
fn parse_option(value: Option<&String>, default: f64) -> f64 {
    value.map(|v| split_unit(v).0).unwrap_or(default)
}

/// First / second endpoints with the zero-, one- and two-argument rules.
fn endpoints(numbers: &[f64]) -> (f64, f64) {
    match numbers {
        [] => (0.0, 1.0),
        [only] => (0.0, *only),
        [a, b, ..] => (*a, *b),
    }
}

/// Split a value into its leading number and trailing unit.
fn split_unit(text: &str) -> (f64, String) {
    let text = text.trim();
    let split = text
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_digit() || *c == '.' || ((*c == '+' || *c == '-') && *i == 0))
        })
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let number = text[..split].parse().unwrap_or(0.0);
    (number, text[split..].trim().to_string())
}

/// Round an interpolated character code back to a character.
fn code_to_char(code: f64) -> String {
    let code = code.round();
    if code < 0.0 {
        return String::new();
    }
    char::from_u32(code as u32)
        .map(String::from)
        .unwrap_or_default()
}
