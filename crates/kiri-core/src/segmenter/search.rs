//! Minimum-cost decomposition of a lattice node into shorter candidates.
//!
//! The search is an exhaustive depth-first enumeration: from each start
//! candidate it follows outgoing connections, and for every connection walks
//! the candidate chain, extending the path while the covered length stays
//! below the target. Only sequences that cover the target span exactly are
//! complete. Among complete sequences the lowest total cost wins and ties go
//! to the first one enumerated.

use tracing::{trace, warn};

use crate::lattice::{Lattice, NodeIdx};
use crate::unicode::is_all_kanji;

/// Ideographic surfaces longer than this are decomposed.
pub const SEARCH_MODE_KANJI_LENGTH: usize = 2;
/// Any surface longer than this is decomposed.
pub const SEARCH_MODE_OTHER_LENGTH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTarget {
    pub kanji_length: usize,
    pub other_length: usize,
}

impl Default for SearchTarget {
    fn default() -> Self {
        Self {
            kanji_length: SEARCH_MODE_KANJI_LENGTH,
            other_length: SEARCH_MODE_OTHER_LENGTH,
        }
    }
}

impl SearchTarget {
    /// Whether `surface` is long enough to be worth splitting for search.
    pub fn is_search_target(&self, surface: &str) -> bool {
        let len = surface.chars().count();
        (len > self.kanji_length && is_all_kanji(surface)) || len > self.other_length
    }
}

/// Best covering sequence found for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub nodes: Vec<NodeIdx>,
    /// Sum of word costs plus the connection costs between them.
    pub cost: i64,
}

struct SearchState {
    target_len: usize,
    unigram_only: bool,
    /// Upper bound on candidate extensions, 0 for none.
    budget: usize,
    expansions: usize,
    exhausted: bool,
    path: Vec<NodeIdx>,
    best: Option<Decomposition>,
}

impl SearchState {
    fn new(target_len: usize, unigram_only: bool, budget: usize) -> Self {
        Self {
            target_len,
            unigram_only,
            budget,
            expansions: 0,
            exhausted: false,
            path: Vec::new(),
            best: None,
        }
    }

    fn accepts(&self, len: usize) -> bool {
        len > 0 && (!self.unigram_only || len == 1)
    }

    /// Count one extension; false once the budget is spent.
    fn spend(&mut self) -> bool {
        if self.budget > 0 && self.expansions >= self.budget {
            self.exhausted = true;
            return false;
        }
        self.expansions += 1;
        true
    }

    fn offer(&mut self, cost: i64) {
        if self.best.as_ref().is_some_and(|b| b.cost <= cost) {
            return;
        }
        trace!(cost, nodes = ?self.path, "improved decomposition");
        self.best = Some(Decomposition {
            nodes: self.path.clone(),
            cost,
        });
    }
}

/// Split a long compound into shorter nodes covering the same span.
///
/// Start candidates are the same-start alternatives of `idx` that are
/// strictly shorter than it.
pub fn decompose_compound(
    lattice: &Lattice,
    idx: NodeIdx,
    max_expansions: usize,
) -> Option<Decomposition> {
    let target_len = lattice.node(idx).surface_len();
    let mut state = SearchState::new(target_len, false, max_expansions);
    run(lattice, idx, &mut state, |len| len < target_len)
}

/// Split an unknown span into single-character nodes.
///
/// A single-character node has nothing to split into and yields `None`.
pub fn expand_unknown(
    lattice: &Lattice,
    idx: NodeIdx,
    max_expansions: usize,
) -> Option<Decomposition> {
    let target_len = lattice.node(idx).surface_len();
    if target_len < 2 {
        return None;
    }
    let mut state = SearchState::new(target_len, true, max_expansions);
    run(lattice, idx, &mut state, |len| len == 1)
}

fn run(
    lattice: &Lattice,
    idx: NodeIdx,
    state: &mut SearchState,
    is_start: impl Fn(usize) -> bool,
) -> Option<Decomposition> {
    for start in lattice.alternatives(idx) {
        let node = lattice.node(start);
        let len = node.surface_len();
        if node.is_boundary() || len == 0 || !is_start(len) {
            continue;
        }
        if !state.spend() {
            break;
        }
        state.path.push(start);
        extend(lattice, start, len, node.word_cost, state);
        state.path.pop();
        if state.exhausted {
            break;
        }
    }

    if state.exhausted {
        warn!(
            node = lattice.node(idx).id,
            surface = %lattice.node(idx).surface,
            expansions = state.expansions,
            found = state.best.is_some(),
            "decomposition search budget exhausted"
        );
    }
    state.best.take()
}

fn extend(lattice: &Lattice, from: NodeIdx, covered: usize, cost: i64, state: &mut SearchState) {
    for edge in lattice.edges(from) {
        for cand in lattice.candidates(edge) {
            let node = lattice.node(cand);
            let len = node.surface_len();
            if node.is_boundary() || !state.accepts(len) {
                continue;
            }
            let reach = covered + len;
            if reach > state.target_len {
                continue;
            }
            if !state.spend() {
                return;
            }

            let total = cost + edge.cost + node.word_cost;
            state.path.push(cand);
            if reach == state.target_len {
                state.offer(total);
            } else {
                extend(lattice, cand, reach, total, state);
            }
            state.path.pop();

            if state.exhausted {
                return;
            }
        }
    }
}
