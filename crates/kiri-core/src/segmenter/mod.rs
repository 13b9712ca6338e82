//! Re-segmentation of analyzer output into search tokens.
//!
//! The assembler walks the analyzer's best path. Long compounds (and, in
//! extended mode, unknown spans) are decomposed through the lattice search;
//! the decomposition is emitted as plain tokens with the original node
//! stacked on top of it as an overlay spanning all of them.

mod search;
pub(crate) mod testutil;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::dict::DictError;
use crate::lattice::{AnalysisError, Analyzer, Lattice, LatticeNode, NodeIdx, NodeStatus};
use crate::settings::{settings, Settings};
use crate::token::{RecognizedToken, TokenQueue, TokenType};
use crate::unicode::is_punctuation;

pub use search::{
    decompose_compound, expand_unknown, Decomposition, SearchTarget, SEARCH_MODE_KANJI_LENGTH,
    SEARCH_MODE_OTHER_LENGTH,
};

/// Segmentation mode, ordered by how aggressively nodes are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Best path only.
    Normal,
    /// Decompose long compounds.
    #[default]
    Search,
    /// Also split unknown spans into single characters.
    Extended,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?} (expected normal, search or extended)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "search" => Ok(Mode::Search),
            "extended" => Ok(Mode::Extended),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = UnknownMode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> String {
        mode.to_string()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Normal => "normal",
            Mode::Search => "search",
            Mode::Extended => "extended",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterOptions {
    pub mode: Mode,
    pub discard_punctuation: bool,
    pub search_target: SearchTarget,
    /// Per-node search budget, 0 for unbounded.
    pub max_expansions: usize,
}

impl From<&Settings> for SegmenterOptions {
    fn from(s: &Settings) -> Self {
        Self {
            mode: s.tokenizer.mode,
            discard_punctuation: s.tokenizer.discard_punctuation,
            search_target: SearchTarget {
                kanji_length: s.search.kanji_length,
                other_length: s.search.other_length,
            },
            max_expansions: s.search.max_expansions,
        }
    }
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self::from(settings())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Dict(#[from] DictError),
}

/// Runs sentences through an analyzer and assembles their tokens.
pub struct Segmenter<A> {
    analyzer: A,
    options: SegmenterOptions,
}

impl<A: Analyzer> Segmenter<A> {
    pub fn new(analyzer: A, options: SegmenterOptions) -> Self {
        Self { analyzer, options }
    }

    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Analyze `text` and assemble its token queue.
    ///
    /// The analyzer's lattice is validated before the assembler walks it.
    pub fn segment(&mut self, text: &str) -> Result<TokenQueue, SegmentError> {
        let keep_all_paths = self.options.mode >= Mode::Search;
        let lattice = self.analyzer.analyze(text, keep_all_paths)?;
        lattice.validate()?;
        Ok(assemble(&lattice, &self.options)?)
    }
}

/// Build the token queue for an analyzed sentence.
pub fn assemble(lattice: &Lattice, options: &SegmenterOptions) -> Result<TokenQueue, DictError> {
    let _span = debug_span!("assemble", chars = lattice.sentence().chars().count()).entered();
    let mut queue = TokenQueue::new(lattice.sentence());
    let mut start = 0;

    for &idx in lattice.best_path() {
        let node = lattice.node(idx);
        if node.is_boundary() {
            continue;
        }
        start += node.shift();

        let decomposition = find_decomposition(lattice, idx, options);
        match decomposition {
            Some(found) => emit_decomposed(lattice, idx, &found, start, options, &mut queue)?,
            None => {
                register(&mut queue, node)?;
                let len = node.surface_len();
                if len > 0 && !is_discarded(&queue, start, len, options) {
                    queue.push(plain_token(node, start, len));
                }
            }
        }
        start += node.surface_len();
    }

    debug!(tokens = queue.len(), "assembled");
    Ok(queue)
}

fn find_decomposition(
    lattice: &Lattice,
    idx: NodeIdx,
    options: &SegmenterOptions,
) -> Option<Decomposition> {
    let node = lattice.node(idx);
    if node.status == NodeStatus::Unknown && options.mode == Mode::Extended {
        expand_unknown(lattice, idx, options.max_expansions)
    } else if options.mode >= Mode::Search && options.search_target.is_search_target(&node.surface)
    {
        decompose_compound(lattice, idx, options.max_expansions)
    } else {
        None
    }
}

fn emit_decomposed(
    lattice: &Lattice,
    idx: NodeIdx,
    found: &Decomposition,
    start: usize,
    options: &SegmenterOptions,
    queue: &mut TokenQueue,
) -> Result<(), DictError> {
    let node = lattice.node(idx);
    debug!(
        id = node.id,
        surface = %node.surface,
        parts = found.nodes.len(),
        cost = found.cost,
        "decomposed"
    );

    let mut subs = Vec::with_capacity(found.nodes.len());
    let mut offset = start;
    for &sub_idx in &found.nodes {
        let sub = lattice.node(sub_idx);
        register(queue, sub)?;
        let len = sub.surface_len();
        if !is_discarded(queue, offset, len, options) {
            subs.push(plain_token(sub, offset, len));
        }
        offset += len;
    }
    register(queue, node)?;

    let len = node.surface_len();
    if subs.is_empty() {
        queue.push(plain_token(node, start, len));
        return Ok(());
    }
    let overlay = RecognizedToken {
        position_length: subs.len(),
        overlay: true,
        ..plain_token(node, start, len)
    };
    let mut subs = subs.into_iter();
    if let Some(first) = subs.next() {
        queue.push(first);
    }
    queue.push(overlay);
    for sub in subs {
        queue.push(sub);
    }
    Ok(())
}

fn register(queue: &mut TokenQueue, node: &LatticeNode) -> Result<(), DictError> {
    debug!(
        id = node.id,
        cost = node.cost,
        word_cost = node.word_cost,
        surface = %node.surface,
        feature = node.feature.as_deref().unwrap_or(""),
        "node"
    );
    queue.dictionary_mut().add(
        node.id,
        &node.surface,
        node.pos_id,
        node.cost,
        node.word_cost,
        node.feature.as_deref(),
    )
}

fn plain_token(node: &LatticeNode, offset: usize, length: usize) -> RecognizedToken {
    RecognizedToken {
        id: node.id,
        offset,
        length,
        position_length: 1,
        overlay: false,
        token_type: if node.status == NodeStatus::Unknown {
            TokenType::Unknown
        } else {
            TokenType::Known
        },
    }
}

/// One-character punctuation spans are dropped when discarding is on.
fn is_discarded(queue: &TokenQueue, offset: usize, len: usize, options: &SegmenterOptions) -> bool {
    options.discard_punctuation
        && len == 1
        && queue.char_at(offset).is_some_and(is_punctuation)
}
