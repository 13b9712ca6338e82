#![cfg(test)]

use crate::lattice::{Lattice, LatticeNode, NodeIdx, NodeStatus};
use crate::token::TokenQueue;

use super::{Mode, SearchTarget, SegmenterOptions};

struct Word {
    start: usize,
    node: LatticeNode,
}

/// Builds analyzer-shaped lattices from a list of words placed at char
/// offsets of the sentence.
///
/// Words starting at the same offset form one alternative chain, best-path
/// words first. Every node gets one connection to each word that starts
/// where it ends (and to EOS at the end of the sentence), in insertion
/// order.
pub struct LatticeBuilder {
    sentence: String,
    words: Vec<Word>,
    best: Vec<usize>,
    conn: Box<dyn Fn(&str, &str) -> i64>,
}

impl LatticeBuilder {
    pub fn new(sentence: &str) -> Self {
        Self {
            sentence: sentence.to_string(),
            words: Vec::new(),
            best: Vec::new(),
            conn: Box::new(|_, _| 0),
        }
    }

    /// Add a known word; returns its index for [`LatticeBuilder::best`].
    pub fn word(&mut self, start: usize, surface: &str, word_cost: i64) -> usize {
        let feature = format!("名詞,一般,*,*,*,*,{surface},*,*");
        self.push(start, LatticeNode::new(0, surface, word_cost, &feature))
    }

    pub fn unknown(&mut self, start: usize, surface: &str, word_cost: i64) -> usize {
        let feature = "名詞,サ変接続,*,*,*,*,*";
        self.push(
            start,
            LatticeNode::new(0, surface, word_cost, feature).with_status(NodeStatus::Unknown),
        )
    }

    /// Add a word preceded by `spaces` characters of whitespace, which the
    /// analyzer folds into the node's span.
    pub fn spaced(&mut self, start: usize, spaces: usize, surface: &str, word_cost: i64) -> usize {
        let idx = self.word(start, surface, word_cost);
        let node = &mut self.words[idx].node;
        *node = node.clone().with_leading_space(spaces);
        idx
    }

    pub fn feature(&mut self, word: usize, feature: &str) -> &mut Self {
        self.words[word].node.feature = Some(feature.to_string());
        self
    }

    pub fn no_feature(&mut self, word: usize) -> &mut Self {
        self.words[word].node.feature = None;
        self
    }

    /// Connection cost between two surfaces (BOS and EOS are "").
    pub fn conn(&mut self, f: impl Fn(&str, &str) -> i64 + 'static) -> &mut Self {
        self.conn = Box::new(f);
        self
    }

    pub fn best(&mut self, words: &[usize]) -> &mut Self {
        self.best = words.to_vec();
        self
    }

    fn push(&mut self, start: usize, node: LatticeNode) -> usize {
        self.words.push(Word { start, node });
        self.words.len() - 1
    }

    fn end(&self, word: usize) -> usize {
        self.words[word].start + self.words[word].node.rlength
    }

    /// Arena layout: BOS at 0, word `i` at `i + 1`, EOS last.
    pub fn build(&self) -> Lattice {
        let total = self.sentence.chars().count();
        let mut lattice = Lattice::new(self.sentence.clone());
        let bos = lattice.push(LatticeNode::boundary(0, NodeStatus::SentenceStart));
        for (i, w) in self.words.iter().enumerate() {
            let mut node = w.node.clone();
            node.id = i as u32 + 1;
            lattice.push(node);
        }
        let eos = lattice.push(LatticeNode::boundary(
            self.words.len() as u32 + 1,
            NodeStatus::SentenceEnd,
        ));

        // Same-start groups, best-path words first.
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); total + 1];
        for &w in &self.best {
            groups[self.words[w].start].push(w);
        }
        for (i, w) in self.words.iter().enumerate() {
            if !self.best.contains(&i) {
                groups[w.start].push(i);
            }
        }
        for group in &groups {
            let chain: Vec<NodeIdx> = group.iter().map(|w| w + 1).collect();
            lattice.chain_alternatives(&chain);
        }

        let connect_from = |lattice: &mut Lattice, from: NodeIdx, left: &str, end: usize| {
            if let Some(group) = groups.get(end) {
                for &w in group {
                    let cost = (self.conn)(left, &self.words[w].node.surface);
                    lattice.connect(from, w + 1, cost);
                }
            }
            if end == total {
                let cost = (self.conn)(left, "");
                lattice.connect(from, eos, cost);
            }
        };
        connect_from(&mut lattice, bos, "", 0);
        for (i, w) in self.words.iter().enumerate() {
            connect_from(&mut lattice, i + 1, &w.node.surface, self.end(i));
        }

        let mut path = vec![bos];
        path.extend(self.best.iter().map(|w| w + 1));
        path.push(eos);
        lattice.set_best_path(path);
        lattice
    }
}

pub fn options(mode: Mode) -> SegmenterOptions {
    SegmenterOptions {
        mode,
        discard_punctuation: true,
        search_target: SearchTarget::default(),
        max_expansions: 0,
    }
}

/// Drained tokens as (term, position increment, position length).
pub fn drain(queue: TokenQueue) -> Vec<(String, usize, usize)> {
    queue
        .into_stream()
        .map(|t| (t.term, t.position_increment, t.position_length))
        .collect()
}

pub fn terms(queue: TokenQueue) -> Vec<String> {
    drain(queue).into_iter().map(|(term, _, _)| term).collect()
}
