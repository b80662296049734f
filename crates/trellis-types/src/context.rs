//! Per-cell evaluation context.
//!
//! A `Context` is constructed once per cell evaluation (and re-derived per
//! call-site / per sequence expansion with [`Context::at_site`] and
//! [`Context::with_frame`]). It is immutable except for the state store
//! and RNG it references, which are shared across the whole pass.

use crate::rng::SharedRng;
use crate::state::StateStore;
use serde::{Deserialize, Serialize};
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Grid geometry totals for one rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    /// Total cell count, `x * y * z`.
    pub count: u32,
}

impl Grid {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self {
            x,
            y,
            z,
            count: x * y * z,
        }
    }
}

/// Stable identifier for one operator invocation's position within a
/// template. The upstream evaluator assigns these; the engine only uses
/// them to scope accumulated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Nested-loop tuple: the descriptor of one active sequence-expansion
/// scope. Selection and sampling operators use the innermost frame to key
/// state and to choose between sequential and by-position indexing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeqFrame {
    /// Repetition index (1-based; for range counts, the range value).
    pub index: f64,
    /// 1-based column within the expansion.
    pub x: f64,
    /// 1-based row within the expansion.
    pub y: f64,
    /// Total repetition count of the expansion.
    pub total: f64,
    /// Expansion width.
    pub cols: f64,
    /// Expansion height.
    pub rows: f64,
    /// Signature shared by every repetition of one expansion, drawn once
    /// from the pass RNG. Distinguishes separate expansions of the same
    /// template position in state keys.
    pub sig: u64,
}

/// Per-cell evaluation context.
#[derive(Debug, Clone)]
pub struct Context {
    /// 1-based cell coordinates.
    pub x: u32,
    pub y: u32,
    pub z: u32,
    /// 1-based linear cell index.
    pub count: u32,
    /// Grid totals.
    pub grid: Grid,
    /// Pass seed (also the default seed of the filter shorthand).
    pub seed: u64,
    /// Nested-loop tuples from enclosing sequence expansions, innermost
    /// last.
    pub extra: Vec<SeqFrame>,
    /// Call-site identifier for the operator being invoked.
    pub site: SiteId,
    rng: SharedRng,
    state: Rc<RefCell<StateStore>>,
}

impl Context {
    /// Context for one cell. The linear index is derived from the
    /// coordinates in row-major, layer-major order.
    pub fn cell(
        grid: Grid,
        x: u32,
        y: u32,
        z: u32,
        seed: u64,
        rng: SharedRng,
        state: Rc<RefCell<StateStore>>,
    ) -> Self {
        let count = (z - 1) * grid.x * grid.y + (y - 1) * grid.x + x;
        Self {
            x,
            y,
            z,
            count,
            grid,
            seed,
            extra: Vec::new(),
            site: SiteId(0),
            rng,
            state,
        }
    }

    /// The same cell viewed from a different call-site.
    pub fn at_site(&self, site: SiteId) -> Self {
        let mut ctx = self.clone();
        ctx.site = site;
        ctx
    }

    /// The same cell with one more enclosing sequence-expansion frame.
    pub fn with_frame(&self, frame: SeqFrame) -> Self {
        let mut ctx = self.clone();
        ctx.extra.push(frame);
        ctx
    }

    /// Innermost active sequence frame, if any.
    pub fn last_frame(&self) -> Option<&SeqFrame> {
        self.extra.last()
    }

    /// Shared pass RNG.
    pub fn rng(&self) -> &SharedRng {
        &self.rng
    }

    /// Mutable access to the shared pass state.
    pub fn state(&self) -> RefMut<'_, StateStore> {
        self.state.borrow_mut()
    }

    /// Handle to the shared state store, for constructing sibling
    /// contexts.
    pub fn shared_state(&self) -> Rc<RefCell<StateStore>> {
        Rc::clone(&self.state)
    }

    /// Stable per-cell id string.
    pub fn cell_id(&self) -> String {
        format!("cell-{}-{}-{}", self.x, self.y, self.z)
    }
}
