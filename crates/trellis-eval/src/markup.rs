//! Markup assembly operators: svg, filter, svg-pattern.
//!
//! Input already shaped like markup (leading `<`) passes straight to
//! normalization; anything else goes through the SVG mini-syntax parser
//! first. A failed parse falls back to the raw text — the operators
//! never abort the render over bad markup.

use crate::args::{self, Arg};
use trellis_gen::svg;
use trellis_parser::{svg_tree, value_group, ParseOptions};
use trellis_types::{Context, Value};

/// `svg` — assembled markup packaged as a data URL.
pub(crate) fn svg_url(op_args: &mut [Arg]) -> Value {
    Value::Text(svg::to_url(&assemble(op_args, &ParseOptions::default()), None))
}

/// `Svg` — assembled markup itself.
pub(crate) fn svg_markup(op_args: &mut [Arg]) -> Value {
    Value::Text(assemble(op_args, &ParseOptions::default()))
}

fn assemble(op_args: &mut [Arg], options: &ParseOptions) -> String {
    let value = args::values(op_args).join(",");
    let markup = realize(value, options);
    svg::normalize(&markup)
}

/// Mini-syntax → markup, markup → itself, junk → itself.
fn realize(value: String, options: &ParseOptions) -> String {
    if value.trim_start().starts_with('<') {
        return value;
    }
    match svg_tree::parse(&value, options) {
        Ok(tree) => svg::generate(&tree),
        Err(_) => value,
    }
}

/// `filter` — an SVG filter packaged as a data URL with a pass-unique
/// id injected and referenced by the URL fragment. A shorthand
/// numeric/named form expands into a canonical turbulence +
/// displacement + morphology + blur chain.
pub(crate) fn filter(ctx: &Context, op_args: &mut [Arg]) -> Value {
    let vals = args::values(op_args);
    let id = ctx.state().unique_id("filter-");

    let mut value = vals.join(",");
    if is_shorthand(&vals) {
        value = shorthand_body(ctx, &vals);
    }
    let markup = realize(value, &ParseOptions::block("filter"));
    let markup = inject_filter_id(&svg::normalize(&markup), &id);
    Value::Text(svg::to_url(&markup, Some(&id)))
}

/// Shorthand form: every argument is numeric-leading or a brace-free
/// name/value word.
fn is_shorthand(vals: &[String]) -> bool {
    !vals.is_empty()
        && vals.iter().all(|v| {
            let v = v.trim();
            let numeric = v.starts_with(|c: char| c.is_ascii_digit() || c == '.');
            let word = v.starts_with(|c: char| c.is_alphanumeric() || c == '_')
                && !v.contains(['{', '}', '<', '>']);
            numeric || word
        })
}

fn shorthand_body(ctx: &Context, vals: &[String]) -> String {
    let named = args::named_args(
        vals,
        &["frequency", "scale", "octave", "seed", "blur", "erode", "dilate"],
    );
    let mut body = String::from("x: -20%; y: -20%; width: 140%; height: 140%;");
    if let Some(dilate) = named.get("dilate") {
        body.push_str(&format!(
            "feMorphology {{ operator: dilate; radius: {dilate}; }}"
        ));
    }
    if let Some(erode) = named.get("erode") {
        body.push_str(&format!(
            "feMorphology {{ operator: erode; radius: {erode}; }}"
        ));
    }
    if let Some(blur) = named.get("blur") {
        body.push_str(&format!("feGaussianBlur {{ stdDeviation: {blur}; }}"));
    }
    if let Some(frequency) = named.get("frequency") {
        let freq = value_group::parse(frequency, ' ');
        let bx = freq.first().cloned().unwrap_or_default();
        let by = freq.get(1).cloned().unwrap_or_else(|| bx.clone());
        let seed = named
            .get("seed")
            .cloned()
            .unwrap_or_else(|| ctx.seed.to_string());
        let octave = named
            .get("octave")
            .map(|o| format!("numOctaves: {o};"))
            .unwrap_or_default();
        let scale = named.get("scale").cloned().unwrap_or_else(|| "1".into());
        body.push_str(&format!(
            "feTurbulence {{ type: fractalNoise; baseFrequency: {bx} {by}; seed: {seed}; {octave} }}\
             feDisplacementMap {{ in: SourceGraphic; scale: {scale}; }}"
        ));
    }
    body
}

/// Insert `id="…"` into the first `<filter>` tag.
fn inject_filter_id(markup: &str, id: &str) -> String {
    if let Some(at) = markup.find("<filter") {
        let insert = at + "<filter".len();
        let boundary = markup[insert..].chars().next();
        if matches!(boundary, Some(c) if c.is_whitespace() || c == '>' || c == '/') {
            return format!(
                "{} id=\"{id}\"{}",
                &markup[..insert],
                &markup[insert..]
            );
        }
    }
    markup.to_string()
}

/// `svg-pattern` — arguments wrapped in a unit viewBox whose rect fill
/// references a hoisted `<defs><pattern>`.
pub(crate) fn svg_pattern(op_args: &mut [Arg]) -> Value {
    let value = args::values(op_args).join(",");
    let doc = format!(
        "viewBox: 0 0 1 1; \
         preserveAspectRatio: xMidYMid slice; \
         rect {{ width, height: 100%; fill: defs pattern {{ {value} }} }}"
    );
    let markup = realize(doc, &ParseOptions::default());
    Value::Text(svg::to_url(&svg::normalize(&markup), None))
}
