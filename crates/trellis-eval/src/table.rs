//! The operator table: canonical names, aliases, dispatch.
//!
//! The table is built once at startup and never mutated. Operators are a
//! closed enum; the upstream template evaluator resolves a name to an
//! [`OpKind`] and invokes it against the current cell context. Alias
//! resolution happens at construction and is transitive-free: every
//! alias maps directly to a canonical name, and a duplicate alias or an
//! alias with an unknown target is a loud [`TableError`].

use crate::args::Arg;
use crate::context_ops::{self, Base};
use crate::{geometry, markup, sample, select, sequence, transform};
use std::collections::{HashMap, HashSet};
use trellis_types::{Context, TableError, Value};

/// Every operator the engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    // context-derived arithmetic
    Index,
    Col,
    Row,
    Depth,
    GridCount,
    GridCols,
    GridRows,
    GridDepth,
    CellId,
    LoopIndex,
    LoopCol,
    LoopRow,
    LoopTotal,
    // sequence expansion
    SeqComma,
    SeqSpace,
    SeqJoined,
    // selection
    Pick,
    PickUnique,
    PickByTurn,
    PickReverse,
    PickShuffled,
    LastPick,
    // field sampling
    Rand,
    MappedNoise,
    LastRand,
    RawNoise,
    // geometry & markup
    Stripe,
    Shape,
    Plot,
    PlotRaw,
    SvgUrl,
    SvgMarkup,
    Filter,
    SvgPattern,
    // transforms & numeric helpers
    Invert,
    FlipH,
    FlipV,
    FlipBoth,
    Reverse,
    Cycle,
    Mirror,
    MirrorExtend,
    Unicode,
    Calc,
    Hex,
}

/// Canonical name → operator.
const CANONICAL: &[(&str, OpKind)] = &[
    ("i", OpKind::Index),
    ("x", OpKind::Col),
    ("y", OpKind::Row),
    ("z", OpKind::Depth),
    ("I", OpKind::GridCount),
    ("X", OpKind::GridCols),
    ("Y", OpKind::GridRows),
    ("Z", OpKind::GridDepth),
    ("id", OpKind::CellId),
    ("n", OpKind::LoopIndex),
    ("nx", OpKind::LoopCol),
    ("ny", OpKind::LoopRow),
    ("N", OpKind::LoopTotal),
    ("m", OpKind::SeqComma),
    ("M", OpKind::SeqSpace),
    ("µ", OpKind::SeqJoined),
    ("p", OpKind::Pick),
    ("P", OpKind::PickUnique),
    ("pl", OpKind::PickByTurn),
    ("pr", OpKind::PickReverse),
    ("pd", OpKind::PickShuffled),
    ("lp", OpKind::LastPick),
    ("r", OpKind::Rand),
    ("rn", OpKind::MappedNoise),
    ("lr", OpKind::LastRand),
    ("noise", OpKind::RawNoise),
    ("stripe", OpKind::Stripe),
    ("shape", OpKind::Shape),
    ("plot", OpKind::Plot),
    ("Plot", OpKind::PlotRaw),
    ("svg", OpKind::SvgUrl),
    ("Svg", OpKind::SvgMarkup),
    ("filter", OpKind::Filter),
    ("svg-pattern", OpKind::SvgPattern),
    ("invert", OpKind::Invert),
    ("flipH", OpKind::FlipH),
    ("flipV", OpKind::FlipV),
    ("flip", OpKind::FlipBoth),
    ("reverse", OpKind::Reverse),
    ("cycle", OpKind::Cycle),
    ("mirror", OpKind::Mirror),
    ("Mirror", OpKind::MirrorExtend),
    ("unicode", OpKind::Unicode),
    ("calc", OpKind::Calc),
    ("hex", OpKind::Hex),
];

/// Alias → canonical name. Aliases must target canonical names only.
const ALIASES: &[(&str, &str)] = &[
    ("index", "i"),
    ("col", "x"),
    ("row", "y"),
    ("depth", "z"),
    ("rand", "r"),
    ("pick", "p"),
    ("pn", "pl"),
    ("pnr", "pr"),
    // error prone
    ("stripes", "stripe"),
    ("strip", "stripe"),
    ("flipv", "flipV"),
    ("fliph", "flipH"),
    // legacy names
    ("svg-filter", "filter"),
    ("last-rand", "lr"),
    ("last-pick", "lp"),
    ("multiple", "m"),
    ("multi", "m"),
    ("rep", "µ"),
    ("repeat", "µ"),
    ("ms", "M"),
    ("s", "I"),
    ("size", "I"),
    ("sx", "X"),
    ("size-x", "X"),
    ("size-col", "X"),
    ("max-col", "X"),
    ("sy", "Y"),
    ("size-y", "Y"),
    ("size-row", "Y"),
    ("max-row", "Y"),
    ("sz", "Z"),
    ("size-z", "Z"),
    ("size-depth", "Z"),
    ("pick-by-turn", "pl"),
    ("pick-n", "pl"),
    ("pick-d", "pd"),
    ("offset", "plot"),
    ("point", "plot"),
    ("Offset", "Plot"),
    ("Point", "Plot"),
];

/// Immutable name → operator map, aliases resolved.
#[derive(Debug)]
pub struct OperatorTable {
    entries: HashMap<&'static str, OpKind>,
}

impl OperatorTable {
    /// Build the table, validating the alias configuration.
    pub fn new() -> Result<Self, TableError> {
        Self::build(CANONICAL, ALIASES)
    }

    /// Build from explicit definitions (exposed for configuration
    /// tests).
    pub fn build(
        canonical: &[(&'static str, OpKind)],
        aliases: &[(&'static str, &'static str)],
    ) -> Result<Self, TableError> {
        let mut entries: HashMap<&'static str, OpKind> =
            canonical.iter().copied().collect();
        let canonical_names: HashSet<&str> =
            canonical.iter().map(|(name, _)| *name).collect();

        let mut seen = HashSet::new();
        for &(alias, target) in aliases {
            if canonical_names.contains(alias) {
                return Err(TableError::AliasShadowsCanonical {
                    alias: alias.to_string(),
                });
            }
            if !seen.insert(alias) {
                return Err(TableError::DuplicateAlias {
                    alias: alias.to_string(),
                });
            }
            // resolving against canonical names only keeps aliases
            // transitive-free: alias → alias cannot sneak in
            let Some(kind) = canonical_names
                .contains(target)
                .then(|| entries[target])
            else {
                return Err(TableError::UnknownTarget {
                    alias: alias.to_string(),
                    target: target.to_string(),
                });
            };
            entries.insert(alias, kind);
        }
        Ok(Self { entries })
    }

    /// Resolve a name (canonical or alias).
    pub fn lookup(&self, name: &str) -> Option<OpKind> {
        self.entries.get(name).copied()
    }

    /// Number of resolvable names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OpKind {
    /// Invoke the operator against a cell context.
    pub fn invoke(self, ctx: &Context, args: &mut [Arg]) -> Value {
        match self {
            OpKind::Index => context_ops::apply(Base::Count, ctx, args),
            OpKind::Col => context_ops::apply(Base::X, ctx, args),
            OpKind::Row => context_ops::apply(Base::Y, ctx, args),
            OpKind::Depth => context_ops::apply(Base::Z, ctx, args),
            OpKind::GridCount => context_ops::apply(Base::GridCount, ctx, args),
            OpKind::GridCols => context_ops::apply(Base::GridX, ctx, args),
            OpKind::GridRows => context_ops::apply(Base::GridY, ctx, args),
            OpKind::GridDepth => context_ops::apply(Base::GridZ, ctx, args),
            OpKind::CellId => context_ops::cell_id(ctx),
            OpKind::LoopIndex => context_ops::apply(Base::LoopIndex, ctx, args),
            OpKind::LoopCol => context_ops::apply(Base::LoopX, ctx, args),
            OpKind::LoopRow => context_ops::apply(Base::LoopY, ctx, args),
            OpKind::LoopTotal => context_ops::apply(Base::LoopTotal, ctx, args),
            OpKind::SeqComma => sequence::expand(ctx, ",", args),
            OpKind::SeqSpace => sequence::expand(ctx, " ", args),
            OpKind::SeqJoined => sequence::expand(ctx, "", args),
            OpKind::Pick => select::pick(ctx, args),
            OpKind::PickUnique => select::pick_unique(ctx, args),
            OpKind::PickByTurn => select::pick_by_turn(ctx, args, false),
            OpKind::PickReverse => select::pick_by_turn(ctx, args, true),
            OpKind::PickShuffled => select::pick_shuffled(ctx, args),
            OpKind::LastPick => select::last_pick(ctx, args),
            OpKind::Rand => sample::random(ctx, args),
            OpKind::MappedNoise => sample::mapped_noise(ctx, args),
            OpKind::LastRand => sample::last_rand(ctx, args),
            OpKind::RawNoise => sample::raw_noise(ctx, args),
            OpKind::Stripe => geometry::stripe(args),
            OpKind::Shape => geometry::shape(ctx, args),
            OpKind::Plot => geometry::plot(ctx, args, false),
            OpKind::PlotRaw => geometry::plot(ctx, args, true),
            OpKind::SvgUrl => markup::svg_url(args),
            OpKind::SvgMarkup => markup::svg_markup(args),
            OpKind::Filter => markup::filter(ctx, args),
            OpKind::SvgPattern => markup::svg_pattern(args),
            OpKind::Invert => transform::invert(args),
            OpKind::FlipH => transform::flip(args, true, false),
            OpKind::FlipV => transform::flip(args, false, true),
            OpKind::FlipBoth => transform::flip(args, true, true),
            OpKind::Reverse => transform::reverse(args),
            OpKind::Cycle => transform::cycle(args),
            OpKind::Mirror => transform::mirror(args),
            OpKind::MirrorExtend => transform::mirror_extend(args),
            OpKind::Unicode => transform::unicode(args),
            OpKind::Calc => transform::calc_op(args),
            OpKind::Hex => transform::hex(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_and_alias_resolution() {
        let table = OperatorTable::new().expect("default table is valid");
        assert_eq!(table.lookup("i"), Some(OpKind::Index));
        assert_eq!(table.lookup("index"), Some(OpKind::Index));
        assert_eq!(table.lookup("pick-by-turn"), Some(OpKind::PickByTurn));
        assert_eq!(table.lookup("svg-filter"), Some(OpKind::Filter));
        assert_eq!(table.lookup("Offset"), Some(OpKind::PlotRaw));
        assert_eq!(table.lookup("nope"), None);
        assert_eq!(table.len(), CANONICAL.len() + ALIASES.len());
    }

    #[test]
    fn duplicate_alias_is_loud() {
        let result = OperatorTable::build(
            &[("i", OpKind::Index)],
            &[("index", "i"), ("index", "i")],
        );
        assert_eq!(
            result.unwrap_err(),
            TableError::DuplicateAlias {
                alias: "index".into()
            }
        );
    }

    #[test]
    fn unknown_target_is_loud() {
        let result = OperatorTable::build(&[("i", OpKind::Index)], &[("idx", "j")]);
        assert!(matches!(
            result.unwrap_err(),
            TableError::UnknownTarget { .. }
        ));
    }

    #[test]
    fn alias_chains_cannot_form() {
        // "second" targets another alias, not a canonical name
        let result = OperatorTable::build(
            &[("i", OpKind::Index)],
            &[("first", "i"), ("second", "first")],
        );
        assert!(matches!(
            result.unwrap_err(),
            TableError::UnknownTarget { .. }
        ));
    }

    #[test]
    fn alias_shadowing_canonical_is_loud() {
        let result = OperatorTable::build(
            &[("i", OpKind::Index), ("x", OpKind::Col)],
            &[("x", "i")],
        );
        assert!(matches!(
            result.unwrap_err(),
            TableError::AliasShadowsCanonical { .. }
        ));
    }
}
