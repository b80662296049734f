//! Shape-point generation.
//!
//! Two entry points: [`named_shape`] resolves the built-in shape table
//! (regular polygons, star, heart, clover, …) and [`sample_points`]
//! samples a parsed shape-command config. Both produce CSS polygon point
//! strings — percentage coordinates in a 100×100 box, or raw unit-circle
//! coordinates when the config asks for `unit: none`.
//!
//! Custom `r:` radius expressions are evaluated through an injected
//! arithmetic evaluator so this crate stays independent of the operator
//! layer. The evaluator receives the variables `t` (angle in radians),
//! `i` (1-based point index) and `I` (total point count).

use std::f64::consts::TAU;
use trellis_parser::ShapeConfig;

/// Injected arithmetic evaluator: `(expression, variables) → number`.
pub type RadiusEval<'a> = &'a dyn Fn(&str, &[(&'static str, f64)]) -> f64;

/// Sample a shape-command config into polygon points.
///
/// The point count comes from the `points` command (default 60),
/// clamped into `[min, max]`. Recognized commands: `points`, `r`
/// (radius expression, default `1`), `rotate` (degrees), `unit`
/// (`none` for raw coordinates).
pub fn sample_points(
    config: &ShapeConfig,
    min: usize,
    max: usize,
    eval: RadiusEval,
) -> Vec<String> {
    let count = config
        .get("points")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v as usize)
        .unwrap_or(60)
        .clamp(min, max);
    let rotate = config
        .get("rotate")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
        .to_radians();
    let r_expr = config.get("r").unwrap_or("1");
    let raw_unit = matches!(config.get("unit"), Some("none"));

    let points = (0..count)
        .map(|k| {
            let t = TAU * k as f64 / count as f64;
            let r = eval(
                r_expr,
                &[("t", t), ("i", k as f64 + 1.0), ("I", count as f64)],
            );
            let angle = t + rotate;
            (r * angle.sin(), -r * angle.cos())
        })
        .collect();
    format_points(points, raw_unit)
}

/// Resolve a named built-in shape. `args` may refine the shape (petal
/// count for clover, cusp count for hypocycloid, point count for star).
/// Unknown names return `None` so the caller can fall through to the
/// command parser.
pub fn named_shape(name: &str, args: &[String]) -> Option<Vec<String>> {
    let k = args
        .first()
        .and_then(|v| v.trim().parse::<f64>().ok());
    let unit = |points: Vec<(f64, f64)>| Some(format_points(points, false));
    match name {
        "circle" => unit(polygon_points(60, 1.0)),
        "triangle" => unit(polygon_points(3, 1.0)),
        "rhombus" | "diamond" => unit(polygon_points(4, 1.0)),
        "pentagon" => unit(polygon_points(5, 1.0)),
        "hexagon" => unit(polygon_points(6, 1.0)),
        "heptagon" => unit(polygon_points(7, 1.0)),
        "octagon" => unit(polygon_points(8, 1.0)),
        "star" => unit(star_points(k.unwrap_or(5.0) as usize)),
        "cross" => unit(cross_points()),
        "heart" => unit(parametric(60, heart)),
        "drop" => unit(parametric(60, drop)),
        "infinity" => unit(parametric(60, infinity)),
        "clover" => {
            let petals = k.unwrap_or(3.0);
            unit(parametric(120, move |t| {
                let r = (petals * t).cos().abs();
                (r * t.sin(), -r * t.cos())
            }))
        }
        "hypocycloid" => {
            let cusps = k.unwrap_or(4.0).max(3.0);
            unit(parametric(120, move |t| {
                let k = cusps;
                let x = ((k - 1.0) * t.cos() + ((k - 1.0) * t).cos()) / k;
                let y = ((k - 1.0) * t.sin() - ((k - 1.0) * t).sin()) / k;
                (x, y)
            }))
        }
        _ => None,
    }
}

// ── Built-in curves ──────────────────────────────────────────────────

/// Regular n-gon starting at the top, clockwise.
fn polygon_points(n: usize, r: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            let t = TAU * k as f64 / n as f64;
            (r * t.sin(), -r * t.cos())
        })
        .collect()
}

/// Five-pointed (by default) star alternating outer and inner radius.
fn star_points(points: usize) -> Vec<(f64, f64)> {
    let n = points.max(3) * 2;
    (0..n)
        .map(|k| {
            let r = if k % 2 == 0 { 1.0 } else { 0.382 };
            let t = TAU * k as f64 / n as f64;
            (r * t.sin(), -r * t.cos())
        })
        .collect()
}

/// Plus-shaped dodecagon.
fn cross_points() -> Vec<(f64, f64)> {
    let a = 1.0 / 3.0;
    vec![
        (-a, -1.0),
        (a, -1.0),
        (a, -a),
        (1.0, -a),
        (1.0, a),
        (a, a),
        (a, 1.0),
        (-a, 1.0),
        (-a, a),
        (-1.0, a),
        (-1.0, -a),
        (-a, -a),
    ]
}

fn parametric(n: usize, f: impl Fn(f64) -> (f64, f64)) -> Vec<(f64, f64)> {
    let raw: Vec<(f64, f64)> = (0..n).map(|k| f(TAU * k as f64 / n as f64)).collect();
    normalize_extent(raw)
}

fn heart(t: f64) -> (f64, f64) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x / 17.0, -y / 17.0)
}

fn drop(t: f64) -> (f64, f64) {
    // circle pinched to a point at the top
    (t.sin() * (1.0 - t.cos()) / 2.0, -t.cos())
}

fn infinity(t: f64) -> (f64, f64) {
    let d = 1.0 + t.sin() * t.sin();
    (t.cos() / d, (t.sin() * t.cos()) / d)
}

/// Rescale arbitrary parametric output into the unit box, preserving
/// aspect ratio.
fn normalize_extent(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let extent = points
        .iter()
        .map(|(x, y)| x.abs().max(y.abs()))
        .fold(0.0f64, f64::max);
    if extent <= f64::EPSILON {
        return points;
    }
    points
        .into_iter()
        .map(|(x, y)| (x / extent, y / extent))
        .collect()
}

// ── Formatting ───────────────────────────────────────────────────────

/// Map unit-box coordinates to point strings. Percentage output centers
/// the unit box on (50%, 50%); raw output keeps the coordinates.
fn format_points(points: Vec<(f64, f64)>, raw_unit: bool) -> Vec<String> {
    points
        .into_iter()
        .map(|(x, y)| {
            if raw_unit {
                format!("{} {}", fmt_coord(x), fmt_coord(y))
            } else {
                format!(
                    "{}% {}%",
                    fmt_coord(50.0 + x * 50.0),
                    fmt_coord(50.0 + y * 50.0)
                )
            }
        })
        .collect()
}

/// Two-decimal coordinate with trailing zeros trimmed.
fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_parser::shape_commands;

    fn no_eval(_: &str, _: &[(&'static str, f64)]) -> f64 {
        1.0
    }

    #[test]
    fn triangle_has_three_points() {
        let points = named_shape("triangle", &[]).expect("triangle");
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], "50% 0%");
    }

    #[test]
    fn star_defaults_to_ten_vertices() {
        assert_eq!(named_shape("star", &[]).expect("star").len(), 10);
        assert_eq!(
            named_shape("star", &["7".to_string()]).expect("star").len(),
            14
        );
    }

    #[test]
    fn unknown_name_falls_through() {
        assert!(named_shape("dodecahedron", &[]).is_none());
    }

    #[test]
    fn point_count_clamps() {
        let config = shape_commands::parse("points: 100000");
        assert_eq!(sample_points(&config, 3, 3600, &no_eval).len(), 3600);
        let config = shape_commands::parse("points: 1");
        assert_eq!(sample_points(&config, 3, 3600, &no_eval).len(), 3);
    }

    #[test]
    fn unit_none_emits_raw_coordinates() {
        let config = shape_commands::parse("points: 4; unit: none");
        let points = sample_points(&config, 1, 65536, &no_eval);
        assert_eq!(points[0], "0 -1");
        assert!(!points[0].contains('%'));
    }

    #[test]
    fn radius_expression_receives_variables() {
        let config = shape_commands::parse("points: 8; r: i / I");
        let seen = std::cell::RefCell::new(Vec::new());
        let eval = |expr: &str, vars: &[(&'static str, f64)]| {
            assert_eq!(expr, "i / I");
            let i = vars.iter().find(|(n, _)| *n == "i").unwrap().1;
            let total = vars.iter().find(|(n, _)| *n == "I").unwrap().1;
            seen.borrow_mut().push(i);
            i / total
        };
        let points = sample_points(&config, 3, 3600, &eval);
        assert_eq!(points.len(), 8);
        assert_eq!(*seen.borrow(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }
}
