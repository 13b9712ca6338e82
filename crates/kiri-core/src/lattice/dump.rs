//! Recorded lattices and the replay analyzer built on them.
//!
//! A dump captures everything the segmenter reads from the analyzer for one
//! sentence, so lattices can be stored as JSON and fed back without the
//! analysis engine.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnalysisError, Analyzer, Lattice, LatticeNode, NodeIdx, NodeStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeDump {
    pub sentence: String,
    pub nodes: Vec<NodeDump>,
    pub best_path: Vec<NodeIdx>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDump {
    pub id: u32,
    pub surface: String,
    /// Defaults to the surface length.
    #[serde(default)]
    pub length: Option<usize>,
    /// Defaults to `length`.
    #[serde(default)]
    pub rlength: Option<usize>,
    #[serde(default)]
    pub pos_id: u16,
    #[serde(default)]
    pub cost: i64,
    pub word_cost: i64,
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub bnext: Option<NodeIdx>,
    #[serde(default)]
    pub next: Option<NodeIdx>,
    #[serde(default)]
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeDump {
    pub right: NodeIdx,
    #[serde(default)]
    pub cost: i64,
}

impl Lattice {
    /// Rebuild a lattice from its dump, rejecting broken links.
    pub fn from_dump(dump: &LatticeDump) -> Result<Self, AnalysisError> {
        let count = dump.nodes.len();
        let mut lattice = Lattice::new(dump.sentence.clone());

        for n in &dump.nodes {
            let mut node = LatticeNode::new(n.id, &n.surface, n.word_cost, "")
                .with_status(n.status)
                .with_pos_id(n.pos_id)
                .with_cost(n.cost);
            node.feature = n.feature.clone();
            if let Some(length) = n.length {
                node.length = length;
            }
            node.rlength = n.rlength.unwrap_or(node.length);
            lattice.push(node);
        }

        for (idx, n) in dump.nodes.iter().enumerate() {
            if let Some(b) = n.bnext {
                check_index(idx, "alternative", b, count)?;
                lattice.chain_alternatives(&[idx, b]);
            }
            if let Some(s) = n.next {
                check_index(idx, "successor", s, count)?;
                lattice.chain_successors(&[idx, s]);
            }
            for edge in &n.edges {
                check_index(idx, "edge", edge.right, count)?;
                lattice.connect(idx, edge.right, edge.cost);
            }
        }

        lattice.set_best_path(dump.best_path.clone());
        lattice.validate()?;
        Ok(lattice)
    }
}

fn check_index(
    node: NodeIdx,
    link: &'static str,
    target: NodeIdx,
    count: usize,
) -> Result<(), AnalysisError> {
    if target < count {
        Ok(())
    } else {
        Err(AnalysisError::DanglingIndex { node, link, target })
    }
}

/// Analyzer that replays recorded lattices, keyed by sentence text.
#[derive(Debug, Default)]
pub struct DumpAnalyzer {
    lattices: HashMap<String, LatticeDump>,
    order: Vec<String>,
}

impl DumpAnalyzer {
    pub fn from_dumps(dumps: Vec<LatticeDump>) -> Self {
        let mut analyzer = Self::default();
        for dump in dumps {
            if !analyzer.lattices.contains_key(&dump.sentence) {
                analyzer.order.push(dump.sentence.clone());
            }
            analyzer.lattices.insert(dump.sentence.clone(), dump);
        }
        analyzer
    }

    /// Parse dumps from a JSON array or from JSON lines.
    pub fn from_json(content: &str) -> Result<Self, AnalysisError> {
        let trimmed = content.trim_start();
        let dumps: Vec<LatticeDump> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed)?
        } else {
            trimmed
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(serde_json::from_str)
                .collect::<Result<_, _>>()?
        };
        debug!(sentences = dumps.len(), "loaded lattice dumps");
        Ok(Self::from_dumps(dumps))
    }

    pub fn open(path: &Path) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Recorded sentences, in first-seen order.
    pub fn sentences(&self) -> &[String] {
        &self.order
    }
}

impl Analyzer for DumpAnalyzer {
    fn analyze(&mut self, sentence: &str, _keep_all_paths: bool) -> Result<Lattice, AnalysisError> {
        let dump = self
            .lattices
            .get(sentence)
            .ok_or_else(|| AnalysisError::Unparsable {
                sentence: sentence.to_string(),
                reason: "no recorded lattice".to_string(),
            })?;
        Lattice::from_dump(dump)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const DUMP: &str = r#"{
        "sentence": "東京都",
        "nodes": [
            {"id": 0, "surface": "", "word_cost": 0, "status": "sentence_start",
             "feature": "BOS/EOS,*,*,*,*,*,*,*,*",
             "edges": [{"right": 1}, {"right": 2, "cost": 5}]},
            {"id": 1, "surface": "東京都", "word_cost": 900, "feature": "名詞,固有名詞",
             "bnext": 2, "edges": [{"right": 4}]},
            {"id": 2, "surface": "東京", "word_cost": 300, "feature": "名詞,固有名詞",
             "edges": [{"right": 3, "cost": 10}]},
            {"id": 3, "surface": "都", "word_cost": 200, "feature": "名詞,接尾",
             "edges": [{"right": 4}]},
            {"id": 4, "surface": "", "word_cost": 0, "status": "sentence_end",
             "feature": "BOS/EOS,*,*,*,*,*,*,*,*"}
        ],
        "best_path": [0, 1, 4]
    }"#;

    #[test]
    fn test_from_dump_links() {
        let dump: LatticeDump = serde_json::from_str(DUMP).unwrap();
        let lattice = Lattice::from_dump(&dump).unwrap();
        assert_eq!(lattice.sentence(), "東京都");
        assert_eq!(lattice.len(), 5);
        assert_eq!(lattice.best_path(), &[0, 1, 4]);
        assert_eq!(lattice.alternatives(1).collect::<Vec<_>>(), vec![2]);
        let costs: Vec<i64> = lattice.edges(0).map(|e| e.cost).collect();
        assert_eq!(costs, vec![0, 5]);
        assert_eq!(lattice.node(0).status, NodeStatus::SentenceStart);
        assert_eq!(lattice.node(1).surface_len(), 3);
        assert_eq!(lattice.node(1).shift(), 0);
    }

    #[test]
    fn test_from_dump_dangling_edge() {
        let mut dump: LatticeDump = serde_json::from_str(DUMP).unwrap();
        dump.nodes[3].edges.push(EdgeDump { right: 9, cost: 0 });
        let err = Lattice::from_dump(&dump).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DanglingIndex {
                node: 3,
                link: "edge",
                target: 9
            }
        ));
    }

    #[test]
    fn test_replay_unknown_sentence() {
        let dump: LatticeDump = serde_json::from_str(DUMP).unwrap();
        let mut analyzer = DumpAnalyzer::from_dumps(vec![dump]);
        assert!(analyzer.analyze("東京都", true).is_ok());
        let err = analyzer.analyze("大阪府", true).unwrap_err();
        assert!(matches!(err, AnalysisError::Unparsable { .. }));
    }

    #[test]
    fn test_open_json_lines() {
        let dump: LatticeDump = serde_json::from_str(DUMP).unwrap();
        let mut other = dump.clone();
        other.sentence = "とうきょうと".to_string();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::to_string(&dump).unwrap()).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", serde_json::to_string(&other).unwrap()).unwrap();

        let analyzer = DumpAnalyzer::open(file.path()).unwrap();
        assert_eq!(analyzer.sentences(), &["東京都", "とうきょうと"]);
    }

    #[test]
    fn test_open_json_array() {
        let content = format!("[{DUMP}]");
        let analyzer = DumpAnalyzer::from_json(&content).unwrap();
        assert_eq!(analyzer.sentences().len(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let err = DumpAnalyzer::open(Path::new("/nonexistent/lattice.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
