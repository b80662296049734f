//! Operator behavior tests: context arithmetic, the pick family,
//! stripes, cycles, plots, markup assembly.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_eval::{
    seed_from_text, Arg, Context, Grid, OpKind, OperatorTable, SeqFrame, SharedRng, SiteId,
    StateStore, Value,
};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn pass_context(seed: &str) -> Context {
    cell(seed, Grid::new(3, 2, 1), 2, 2)
}

fn cell(seed: &str, grid: Grid, x: u32, y: u32) -> Context {
    Context::cell(
        grid,
        x,
        y,
        1,
        seed_from_text(seed),
        SharedRng::from_text(seed),
        Rc::new(RefCell::new(StateStore::new())),
    )
}

fn invoke(kind: OpKind, ctx: &Context, inputs: &[&str]) -> String {
    let mut args: Vec<Arg> = inputs.iter().map(|s| Arg::text(*s)).collect();
    kind.invoke(ctx, &mut args).to_text()
}

// ─────────────────────────────────────────────────────────────────────
// Context-derived arithmetic
// ─────────────────────────────────────────────────────────────────────

#[test]
fn index_suffix_form_anchors_base_left() {
    // cell (2,2) of a 3×2 grid: linear index 5
    let ctx = pass_context("s");
    assert_eq!(invoke(OpKind::Index, &ctx, &["+3"]), "8");
}

#[test]
fn index_prefix_form_anchors_base_right() {
    let ctx = pass_context("s");
    assert_eq!(invoke(OpKind::Index, &ctx, &["2-"]), "-3");
}

#[test]
fn coordinates_and_grid_totals() {
    let ctx = pass_context("s");
    assert_eq!(invoke(OpKind::Col, &ctx, &[]), "2");
    assert_eq!(invoke(OpKind::Row, &ctx, &[]), "2");
    assert_eq!(invoke(OpKind::Depth, &ctx, &[]), "1");
    assert_eq!(invoke(OpKind::GridCount, &ctx, &[]), "6");
    assert_eq!(invoke(OpKind::GridCols, &ctx, &["*2"]), "6");
}

#[test]
fn plain_input_coerces_and_adds() {
    let ctx = pass_context("s");
    assert_eq!(invoke(OpKind::Col, &ctx, &["4"]), "6");
    assert_eq!(invoke(OpKind::Col, &ctx, &["wat"]), "2");
}

#[test]
fn loop_operators_echo_without_a_frame() {
    let ctx = pass_context("s");
    assert_eq!(invoke(OpKind::LoopIndex, &ctx, &[]), "@n");
    assert_eq!(invoke(OpKind::LoopTotal, &ctx, &[]), "@N");
}

#[test]
fn loop_operators_read_the_innermost_frame() {
    let ctx = pass_context("s").with_frame(SeqFrame {
        index: 4.0,
        x: 1.0,
        y: 2.0,
        total: 6.0,
        cols: 3.0,
        rows: 2.0,
        sig: 1,
    });
    assert_eq!(invoke(OpKind::LoopIndex, &ctx, &["+1"]), "5");
    assert_eq!(invoke(OpKind::LoopRow, &ctx, &[]), "2");
    assert_eq!(invoke(OpKind::LoopTotal, &ctx, &[]), "6");
}

#[test]
fn cell_id_is_coordinate_stable() {
    let ctx = pass_context("s");
    assert_eq!(invoke(OpKind::CellId, &ctx, &[]), "cell-2-2-1");
}

// ─────────────────────────────────────────────────────────────────────
// Pick family
// ─────────────────────────────────────────────────────────────────────

#[test]
fn pick_draws_from_arguments_and_records_history() {
    let ctx = pass_context("pick").at_site(SiteId(1));
    let picked = invoke(OpKind::Pick, &ctx, &["a", "b", "c"]);
    assert!(["a", "b", "c"].contains(&picked.as_str()));
    assert_eq!(invoke(OpKind::LastPick, &ctx, &[]), picked);
}

#[test]
fn pick_replays_previous_arguments_when_called_empty() {
    let ctx = pass_context("replay").at_site(SiteId(1));
    invoke(OpKind::Pick, &ctx, &["only"]);
    assert_eq!(invoke(OpKind::Pick, &ctx, &[]), "only");
}

#[test]
fn pick_expands_range_shorthand() {
    let ctx = pass_context("range").at_site(SiteId(1));
    let picked = invoke(OpKind::Pick, &ctx, &["1-4"]);
    assert!(["1", "2", "3", "4"].contains(&picked.as_str()));
}

#[test]
fn pick_unique_never_repeats_with_one_alternative() {
    let ctx = pass_context("unique").at_site(SiteId(9));
    // bind the site's last pick to "a"
    assert_eq!(invoke(OpKind::PickUnique, &ctx, &["a"]), "a");
    // the only non-repeating candidate must win, deterministically
    assert_eq!(invoke(OpKind::PickUnique, &ctx, &["a", "b"]), "b");
    assert_eq!(invoke(OpKind::PickUnique, &ctx, &["a", "b"]), "a");
}

#[test]
fn pick_by_turn_cycles_in_argument_order() {
    let ctx = pass_context("turn").at_site(SiteId(3));
    let picks: Vec<String> = (0..5)
        .map(|_| invoke(OpKind::PickByTurn, &ctx, &["a", "b", "c"]))
        .collect();
    assert_eq!(picks, vec!["a", "b", "c", "a", "b"]);
}

#[test]
fn pick_by_turn_counters_are_per_site() {
    let ctx = pass_context("turn2");
    let first = ctx.at_site(SiteId(1));
    let second = ctx.at_site(SiteId(2));
    assert_eq!(invoke(OpKind::PickByTurn, &first, &["a", "b"]), "a");
    assert_eq!(invoke(OpKind::PickByTurn, &first, &["a", "b"]), "b");
    // a different call-site starts its own rotation
    assert_eq!(invoke(OpKind::PickByTurn, &second, &["a", "b"]), "a");
}

#[test]
fn pick_reverse_indexes_from_the_end() {
    let ctx = pass_context("rev").at_site(SiteId(4));
    let picks: Vec<String> = (0..3)
        .map(|_| invoke(OpKind::PickReverse, &ctx, &["a", "b", "c"]))
        .collect();
    assert_eq!(picks, vec!["c", "b", "a"]);
}

#[test]
fn pick_shuffled_caches_one_permutation_per_site() {
    let ctx = pass_context("shuf").at_site(SiteId(5));
    let items = ["a", "b", "c", "d"];
    let round_one: Vec<String> = (0..4)
        .map(|_| invoke(OpKind::PickShuffled, &ctx, &items))
        .collect();
    let round_two: Vec<String> = (0..4)
        .map(|_| invoke(OpKind::PickShuffled, &ctx, &items))
        .collect();
    // the cached permutation replays identically
    assert_eq!(round_one, round_two);
    let mut sorted = round_one.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["a", "b", "c", "d"]);
}

#[test]
fn last_pick_depth_and_missing_history() {
    let ctx = pass_context("lp").at_site(SiteId(6));
    assert_eq!(invoke(OpKind::LastPick, &ctx, &[]), "");
    invoke(OpKind::Pick, &ctx, &["x"]);
    invoke(OpKind::Pick, &ctx, &["y"]);
    assert_eq!(invoke(OpKind::LastPick, &ctx, &[]), "y");
    assert_eq!(invoke(OpKind::LastPick, &ctx, &["2"]), "x");
    assert_eq!(invoke(OpKind::LastPick, &ctx, &["9"]), "");
}

// ─────────────────────────────────────────────────────────────────────
// Random / noise
// ─────────────────────────────────────────────────────────────────────

#[test]
fn random_carries_units() {
    let ctx = pass_context("r").at_site(SiteId(1));
    let value = invoke(OpKind::Rand, &ctx, &["10px"]);
    assert!(value.ends_with("px"));
    let number: f64 = value.trim_end_matches("px").parse().expect("numeric");
    assert!((0.0..=10.0).contains(&number));
}

#[test]
fn random_interpolates_character_codes() {
    let ctx = pass_context("r2").at_site(SiteId(1));
    let value = invoke(OpKind::Rand, &ctx, &["a", "e"]);
    assert_eq!(value.len(), 1);
    let c = value.chars().next().unwrap();
    assert!(('a'..='e').contains(&c));
}

#[test]
fn last_rand_mirrors_the_random_stack() {
    let ctx = pass_context("lr").at_site(SiteId(1));
    assert_eq!(invoke(OpKind::LastRand, &ctx, &[]), "");
    let drawn = invoke(OpKind::Rand, &ctx, &["5"]);
    assert_eq!(invoke(OpKind::LastRand, &ctx, &[]), drawn);
}

#[test]
fn mapped_noise_stays_in_range_and_repeats_per_site() {
    let ctx = pass_context("noise").at_site(SiteId(2));
    let first = invoke(OpKind::MappedNoise, &ctx, &["from 10", "to 20"]);
    let n: f64 = first.parse().expect("numeric");
    assert!((10.0..=20.0).contains(&n));
    // the cached field makes resampling the same cell agree
    let again = invoke(OpKind::MappedNoise, &ctx, &["from 10", "to 20"]);
    assert_eq!(first, again);
}

#[test]
fn mapped_noise_single_argument_means_zero_to_value() {
    let ctx = pass_context("noise1").at_site(SiteId(4));
    let v: f64 = invoke(OpKind::MappedNoise, &ctx, &["8"])
        .parse()
        .expect("numeric");
    assert!((0.0..=8.0).contains(&v));
}

#[test]
fn raw_noise_evaluates_coordinate_expressions() {
    let ctx = pass_context("raw").at_site(SiteId(3));
    let a = invoke(OpKind::RawNoise, &ctx, &["x / X", "y / Y", "0"]);
    let b = invoke(OpKind::RawNoise, &ctx, &["x / X", "y / Y", "0"]);
    assert_eq!(a, b);
    let v: f64 = a.parse().expect("numeric");
    assert!(v.abs() <= 1.0);
}

// ─────────────────────────────────────────────────────────────────────
// Stripe
// ─────────────────────────────────────────────────────────────────────

#[test]
fn stripe_without_sizes_divides_evenly() {
    let ctx = pass_context("st");
    assert_eq!(
        invoke(OpKind::Stripe, &ctx, &["red", "blue", "green", "gold"]),
        "red 0 25%,blue 0 50%,green 0 75%,gold 0 100%"
    );
}

#[test]
fn stripe_with_explicit_sizes_shares_the_remainder() {
    let ctx = pass_context("st2");
    let expected = "red 0 calc((100% - 20px) / 2),\
                    blue 0 calc((100% - 20px) / 2 + 20px),\
                    green 0 calc((100% - 20px) / 2 + 20px + (100% - 20px) / 2)";
    assert_eq!(
        invoke(OpKind::Stripe, &ctx, &["red", "blue 20px", "green"]),
        expected
    );
}

#[test]
fn stripe_of_nothing_is_empty() {
    let ctx = pass_context("st3");
    assert_eq!(invoke(OpKind::Stripe, &ctx, &[]), "");
}

// ─────────────────────────────────────────────────────────────────────
// Transforms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn cycle_produces_every_rotation() {
    let ctx = pass_context("cy");
    let mut args = vec![Arg::text("a"), Arg::text("b"), Arg::text("c")];
    let value = OpKind::Cycle.invoke(&ctx, &mut args);
    assert_eq!(
        value,
        Value::List(vec!["a,b,c".into(), "b,c,a".into(), "c,a,b".into()])
    );
}

#[test]
fn cycle_single_argument_splits_on_spaces() {
    let ctx = pass_context("cy2");
    let mut args = vec![Arg::text("a b c")];
    let value = OpKind::Cycle.invoke(&ctx, &mut args);
    assert_eq!(
        value,
        Value::List(vec!["a b c".into(), "b c a".into(), "c a b".into()])
    );
}

// ─────────────────────────────────────────────────────────────────────
// Shape / plot
// ─────────────────────────────────────────────────────────────────────

#[test]
fn shape_resolves_named_generators() {
    let ctx = pass_context("sh").at_site(SiteId(1));
    let polygon = invoke(OpKind::Shape, &ctx, &["triangle"]);
    assert!(polygon.starts_with("polygon("));
    assert_eq!(polygon.matches('%').count(), 6);
}

#[test]
fn shape_memoizes_by_argument_signature() {
    let ctx = pass_context("sh2").at_site(SiteId(1));
    let a = invoke(OpKind::Shape, &ctx, &["points: 12"]);
    let b = invoke(OpKind::Shape, &ctx, &["points: 12"]);
    assert_eq!(a, b);
    let c = invoke(OpKind::Shape, &ctx, &["points: 13"]);
    assert_ne!(a, c);
}

#[test]
fn shape_of_nothing_is_an_empty_polygon() {
    let ctx = pass_context("sh3").at_site(SiteId(2));
    assert_eq!(invoke(OpKind::Shape, &ctx, &[]), "polygon()");
}

#[test]
fn plot_returns_the_cell_point_and_caches_the_sweep() {
    let grid = Grid::new(2, 2, 1);
    let state = Rc::new(RefCell::new(StateStore::new()));
    let rng = SharedRng::from_text("plot");
    let points: Vec<String> = (1..=2)
        .flat_map(|y| (1..=2).map(move |x| (x, y)))
        .map(|(x, y)| {
            let ctx = Context::cell(grid, x, y, 1, 0, rng.clone(), Rc::clone(&state))
                .at_site(SiteId(1));
            invoke(OpKind::Plot, &ctx, &["r: 1"])
        })
        .collect();
    assert_eq!(points.len(), 4);
    // four distinct points of one circle sweep
    assert_eq!(
        points.iter().collect::<std::collections::HashSet<_>>().len(),
        4
    );
    assert!(points.iter().all(|p| p.contains('%')));
}

#[test]
fn plot_raw_unit_emits_bare_coordinates() {
    let ctx = pass_context("plot2").at_site(SiteId(8));
    let point = invoke(OpKind::PlotRaw, &ctx, &["r: 1"]);
    assert!(!point.is_empty());
    assert!(!point.contains('%'));
}

// ─────────────────────────────────────────────────────────────────────
// Markup
// ─────────────────────────────────────────────────────────────────────

#[test]
fn svg_assembles_mini_syntax_into_a_data_url() {
    let ctx = pass_context("svg");
    let url = invoke(OpKind::SvgUrl, &ctx, &["circle { r: 4; }"]);
    assert!(url.starts_with("url(\"data:image/svg+xml;utf8,"));
    assert!(url.contains("circle"));
}

#[test]
fn svg_markup_form_normalizes_namespaces() {
    let ctx = pass_context("svg2");
    let markup = invoke(OpKind::SvgMarkup, &ctx, &["rect { width, height: 100%; }"]);
    assert!(markup.starts_with("<svg xmlns="));
    assert!(markup.contains("<rect width=\"100%\" height=\"100%\"/>"));
}

#[test]
fn svg_passes_ready_markup_through() {
    let ctx = pass_context("svg3");
    let markup = invoke(OpKind::SvgMarkup, &ctx, &["<svg xmlns=\"x\"><g/></svg>"]);
    assert_eq!(markup, "<svg xmlns=\"x\"><g/></svg>");
}

#[test]
fn filter_shorthand_builds_a_turbulence_chain() {
    let ctx = pass_context("f").at_site(SiteId(1));
    let url = invoke(OpKind::Filter, &ctx, &["frequency .5", "scale 20"]);
    assert!(url.contains("feTurbulence"));
    assert!(url.contains("feDisplacementMap"));
    assert!(url.ends_with("#filter-1\")"));
    // ids are pass-unique
    let url2 = invoke(OpKind::Filter, &ctx, &["frequency .5"]);
    assert!(url2.ends_with("#filter-2\")"));
}

#[test]
fn filter_markup_form_gets_an_id_injected() {
    let ctx = pass_context("f2");
    let url = invoke(OpKind::Filter, &ctx, &["feGaussianBlur { stdDeviation: 2; }"]);
    assert!(url.contains("filter%20id%3D%22filter-1%22"));
}

#[test]
fn svg_pattern_hoists_a_defs_pattern() {
    let ctx = pass_context("pat");
    let url = invoke(OpKind::SvgPattern, &ctx, &["width: 2; height: 2;"]);
    assert!(url.contains("defs"));
    assert!(url.contains("pattern"));
    assert!(url.contains("viewBox"));
}

// ─────────────────────────────────────────────────────────────────────
// Table
// ─────────────────────────────────────────────────────────────────────

#[test]
fn every_alias_resolves_to_a_canonical_operator() {
    let table = OperatorTable::new().expect("valid table");
    for name in ["index", "pick", "rand", "size-row", "repeat", "Offset"] {
        assert!(table.lookup(name).is_some(), "alias '{name}' must resolve");
    }
}
