//! Geometry operators: gradient stripes, polygon shapes, plotted points.

use crate::args::{self, Arg};
use crate::calc;
use trellis_gen::{named_shape, sample_points};
use trellis_parser::{shape_commands, value_group, ShapeConfig};
use trellis_types::{Context, SiteKey, Value};

/// `stripe` — a cumulative gradient-stop list. Colors with an explicit
/// size keep it; the rest share the remainder of 100% evenly.
pub(crate) fn stripe(op_args: &mut [Arg]) -> Value {
    let colors = args::values(op_args);
    if colors.is_empty() {
        return Value::empty();
    }
    let max = colors.len();

    let mut custom_sizes = Vec::new();
    let mut default_count = 0usize;
    for step in &colors {
        match explicit_size(step) {
            Some(size) => custom_sizes.push(size),
            None => default_count += 1,
        }
    }

    if custom_sizes.is_empty() {
        let stops: Vec<String> = colors
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{step} 0 {}%", 100.0 / max as f64 * (i + 1) as f64))
            .collect();
        return Value::Text(stops.join(","));
    }

    let default_size = format!(
        "(100% - {}) / {default_count}",
        custom_sizes.join(" - ")
    );
    let mut boundary = String::new();
    let stops: Vec<String> = colors
        .iter()
        .map(|step| {
            let tokens = value_group::parse(step, ' ');
            let color = tokens.first().cloned().unwrap_or_default();
            let size = tokens.get(1).cloned().unwrap_or_else(|| default_size.clone());
            boundary = if boundary.is_empty() {
                size
            } else {
                format!("{boundary} + {size}")
            };
            format!("{color} 0 calc({boundary})")
        })
        .collect();
    Value::Text(stops.join(","))
}

fn explicit_size(step: &str) -> Option<String> {
    value_group::parse(step, ' ').get(1).cloned()
}

/// `shape` — memoized polygon generation: a named built-in, else shape
/// commands sampled into [3, 3600] points.
pub(crate) fn shape(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let signature = format!("shape:{}", vals.join(","));
    if let Some(cached) = ctx.state().memo(&signature).map(str::to_string) {
        return Value::Text(cached);
    }

    let kind = vals.first().map(|v| v.trim()).unwrap_or("");
    let points = if kind.is_empty() {
        Vec::new()
    } else if let Some(points) = named_shape(kind, &vals[1..]) {
        points
    } else {
        let commands = vals.join(",");
        let config = shape_commands::parse(&commands);
        sample_points(&config, 3, 3600, &|expr, vars| calc::eval(expr, vars))
    };

    let out = format!("polygon({})", points.join(","));
    ctx.state().set_memo(signature, out.clone());
    Value::Text(out)
}

/// `plot` / `Plot` — one point of a sampled shape per cell. The command
/// string parses once per call-site; the point count follows the active
/// expansion total (else the grid total).
pub(crate) fn plot(ctx: &Context, op_args: &mut [Arg], raw_unit: bool) -> Value {
    let commands = args::values(op_args).join(",");
    let frame = ctx.last_frame().copied();
    let idx = frame.map(|f| f.index).unwrap_or(ctx.count as f64);
    let max = frame.map(|f| f.total).unwrap_or(ctx.grid.count as f64);

    let op = if raw_unit { "Plot" } else { "plot" };
    let key = SiteKey::new(op, ctx.site);
    let cached = ctx.state().plotted(&key).map(<[String]>::to_vec);
    let points = match cached {
        Some(points) => points,
        None => {
            let points = sample_plot(&commands, max, raw_unit);
            ctx.state().set_plotted(key, points.clone());
            points
        }
    };

    let at = idx as i64 - 1;
    if at < 0 || at as usize >= points.len() {
        return Value::empty();
    }
    Value::Text(points[at as usize].clone())
}

fn sample_plot(commands: &str, count: f64, raw_unit: bool) -> Vec<String> {
    let mut config: ShapeConfig = shape_commands::parse(commands);
    if config.is_empty() {
        return Vec::new();
    }
    // plotted points have no fill concept
    config.remove("fill");
    config.remove("fill-rule");
    config.remove("frame");
    config.remove("points");
    config.set_default("points", &format!("{}", count as i64));
    if raw_unit {
        config.set_default("unit", "none");
    }
    sample_points(&config, 1, 65536, &|expr, vars| calc::eval(expr, vars))
}
