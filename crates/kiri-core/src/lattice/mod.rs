//! Arena representation of an analyzer lattice.
//!
//! The morphological analyzer links its nodes in several directions at once
//! (same-start alternatives, successors, weighted connections). Here every
//! node lives in one `Vec` and all links are indices into it, so a lattice is
//! a plain owned value that can be dropped as soon as a sentence is done.

mod dump;

pub use dump::{DumpAnalyzer, EdgeDump, LatticeDump, NodeDump};

use std::io;

use serde::{Deserialize, Serialize};

/// Index of a node inside its [`Lattice`].
pub type NodeIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Known,
    Unknown,
    SentenceStart,
    SentenceEnd,
}

/// A word candidate.
#[derive(Debug, Clone)]
pub struct LatticeNode {
    /// Analyzer-assigned id, unique within the sentence.
    pub id: u32,
    pub surface: String,
    /// Surface length without leading whitespace (chars).
    pub length: usize,
    /// Surface length including leading whitespace (chars).
    pub rlength: usize,
    pub pos_id: u16,
    /// Cumulative cost of the best path ending at this node.
    pub cost: i64,
    pub word_cost: i64,
    /// Raw CSV feature record; some analyzers leave it out.
    pub feature: Option<String>,
    pub status: NodeStatus,
    surface_len: usize,
    bnext: Option<NodeIdx>,
    next: Option<NodeIdx>,
    edges: Vec<usize>,
}

impl LatticeNode {
    pub fn new(id: u32, surface: &str, word_cost: i64, feature: &str) -> Self {
        let surface_len = surface.chars().count();
        Self {
            id,
            surface: surface.to_string(),
            length: surface_len,
            rlength: surface_len,
            pos_id: 0,
            cost: word_cost,
            word_cost,
            feature: Some(feature.to_string()),
            status: NodeStatus::Known,
            surface_len,
            bnext: None,
            next: None,
            edges: Vec::new(),
        }
    }

    /// A sentence-boundary marker with an empty surface.
    pub fn boundary(id: u32, status: NodeStatus) -> Self {
        let mut node = Self::new(id, "", 0, "BOS/EOS,*,*,*,*,*,*,*,*");
        node.status = status;
        node
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_pos_id(mut self, pos_id: u16) -> Self {
        self.pos_id = pos_id;
        self
    }

    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    /// Mark `chars` characters of leading whitespace before the surface.
    pub fn with_leading_space(mut self, chars: usize) -> Self {
        self.rlength = self.length + chars;
        self
    }

    pub fn without_feature(mut self) -> Self {
        self.feature = None;
        self
    }

    /// Surface length in characters.
    pub fn surface_len(&self) -> usize {
        self.surface_len
    }

    /// Characters the analyzer skipped before this node's surface.
    pub fn shift(&self) -> usize {
        self.rlength.saturating_sub(self.length)
    }

    pub fn is_boundary(&self) -> bool {
        matches!(
            self.status,
            NodeStatus::SentenceStart | NodeStatus::SentenceEnd
        )
    }
}

/// A weighted connection from one node's right boundary to `right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub right: NodeIdx,
    pub cost: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("cannot analyze sentence {sentence:?}: {reason}")]
    Unparsable { sentence: String, reason: String },

    #[error("{link} of node {node} points at missing node {target}")]
    DanglingIndex {
        node: NodeIdx,
        link: &'static str,
        target: NodeIdx,
    },

    #[error("{link} chain starting at node {node} never terminates")]
    CyclicChain { node: NodeIdx, link: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("lattice dump error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lattice adapter: turns a sentence into a [`Lattice`].
pub trait Analyzer {
    /// Analyze `sentence`. With `keep_all_paths` the adapter must keep every
    /// candidate and connection, not only the best path, so that the lattice
    /// can be searched for decompositions.
    fn analyze(&mut self, sentence: &str, keep_all_paths: bool) -> Result<Lattice, AnalysisError>;
}

/// All candidates of one analyzed sentence plus the chosen best path.
#[derive(Debug, Clone, Default)]
pub struct Lattice {
    sentence: String,
    nodes: Vec<LatticeNode>,
    edges: Vec<Edge>,
    best_path: Vec<NodeIdx>,
}

impl Lattice {
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            ..Self::default()
        }
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn push(&mut self, node: LatticeNode) -> NodeIdx {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Panics if `idx` is not a node of this lattice.
    pub fn node(&self, idx: NodeIdx) -> &LatticeNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[LatticeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link `chain` as one same-start alternative chain, in order.
    pub fn chain_alternatives(&mut self, chain: &[NodeIdx]) {
        for pair in chain.windows(2) {
            self.nodes[pair[0]].bnext = Some(pair[1]);
        }
    }

    /// Link `chain` as one successor chain, in order.
    pub fn chain_successors(&mut self, chain: &[NodeIdx]) {
        for pair in chain.windows(2) {
            self.nodes[pair[0]].next = Some(pair[1]);
        }
    }

    /// Add a connection from `from` to `to`. Edges are visited in insertion
    /// order.
    pub fn connect(&mut self, from: NodeIdx, to: NodeIdx, cost: i64) {
        assert!(to < self.nodes.len(), "edge target {to} out of range");
        let edge = self.edges.len();
        self.edges.push(Edge { right: to, cost });
        self.nodes[from].edges.push(edge);
    }

    pub fn set_best_path(&mut self, path: Vec<NodeIdx>) {
        self.best_path = path;
    }

    pub fn best_path(&self) -> &[NodeIdx] {
        &self.best_path
    }

    /// Nodes after `idx` in its same-start alternative chain.
    pub fn alternatives(&self, idx: NodeIdx) -> Chain<'_> {
        Chain {
            lattice: self,
            cursor: self.nodes[idx].bnext,
            follow: Link::Alternative,
        }
    }

    /// Outgoing connections of `idx`.
    pub fn edges(&self, idx: NodeIdx) -> impl Iterator<Item = &Edge> + '_ {
        self.nodes[idx].edges.iter().map(|&e| &self.edges[e])
    }

    /// Candidates reachable over `edge`: its right node, then that node's
    /// successor chain.
    pub fn candidates(&self, edge: &Edge) -> Chain<'_> {
        Chain {
            lattice: self,
            cursor: Some(edge.right),
            follow: Link::Successor,
        }
    }

    /// Check that every link points inside the arena and every chain ends.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let count = self.nodes.len();
        let check = |node: NodeIdx, link: &'static str, target: NodeIdx| {
            if target < count {
                Ok(())
            } else {
                Err(AnalysisError::DanglingIndex { node, link, target })
            }
        };

        for &idx in &self.best_path {
            if idx >= count {
                return Err(AnalysisError::DanglingIndex {
                    node: idx,
                    link: "best path",
                    target: idx,
                });
            }
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(t) = node.bnext {
                check(idx, "alternative", t)?;
            }
            if let Some(t) = node.next {
                check(idx, "successor", t)?;
            }
            for &e in &node.edges {
                check(idx, "edge", self.edges[e].right)?;
            }
        }
        for idx in 0..count {
            self.check_terminates(idx, Link::Alternative)?;
            self.check_terminates(idx, Link::Successor)?;
        }
        Ok(())
    }

    fn check_terminates(&self, start: NodeIdx, follow: Link) -> Result<(), AnalysisError> {
        let mut cursor = Some(start);
        for _ in 0..=self.nodes.len() {
            match cursor {
                Some(idx) => cursor = follow.step(&self.nodes[idx]),
                None => return Ok(()),
            }
        }
        Err(AnalysisError::CyclicChain {
            node: start,
            link: follow.name(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Link {
    Alternative,
    Successor,
}

impl Link {
    fn step(self, node: &LatticeNode) -> Option<NodeIdx> {
        match self {
            Link::Alternative => node.bnext,
            Link::Successor => node.next,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Link::Alternative => "alternative",
            Link::Successor => "successor",
        }
    }
}

/// Iterator over a singly linked chain of nodes.
pub struct Chain<'a> {
    lattice: &'a Lattice,
    cursor: Option<NodeIdx>,
    follow: Link,
}

impl Iterator for Chain<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let idx = self.cursor?;
        self.cursor = self.follow.step(&self.lattice.nodes[idx]);
        Some(idx)
    }
}
