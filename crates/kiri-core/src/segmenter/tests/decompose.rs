use super::*;
use crate::lattice::LatticeNode;

fn surfaces(lattice: &Lattice, found: &Decomposition) -> Vec<String> {
    found
        .nodes
        .iter()
        .map(|&i| lattice.node(i).surface.clone())
        .collect()
}

#[test]
fn test_minimum_cost_cover() {
    let lattice = tokyo_daigaku().build();
    let found = decompose_compound(&lattice, 1, 0).unwrap();
    assert_eq!(surfaces(&lattice, &found), vec!["東京", "大学"]);
    assert_eq!(found.cost, 4000);
}

#[test]
fn test_connection_costs_count() {
    let mut b = tokyo_daigaku();
    b.conn(|left, _| if left == "東京" { 5000 } else { 0 });
    let lattice = b.build();
    let found = decompose_compound(&lattice, 1, 0).unwrap();
    // 東 + 京 + 大学 = 1500 + 1500 + 2000
    assert_eq!(surfaces(&lattice, &found), vec!["東", "京", "大学"]);
    assert_eq!(found.cost, 5000);
}

#[test]
fn test_tie_goes_to_first_enumerated() {
    let build = |shorter_first: bool| {
        let mut b = LatticeBuilder::new("東京大学");
        let full = b.word(0, "東京大学", 5000);
        if shorter_first {
            b.word(0, "東", 1000);
            b.word(0, "東京", 2000);
        } else {
            b.word(0, "東京", 2000);
            b.word(0, "東", 1000);
        }
        b.word(1, "京", 1000);
        b.word(2, "大学", 2000);
        b.best(&[full]);
        b.build()
    };

    let lattice = build(false);
    let found = decompose_compound(&lattice, 1, 0).unwrap();
    assert_eq!(surfaces(&lattice, &found), vec!["東京", "大学"]);
    assert_eq!(found.cost, 4000);

    let lattice = build(true);
    let found = decompose_compound(&lattice, 1, 0).unwrap();
    assert_eq!(surfaces(&lattice, &found), vec!["東", "京", "大学"]);
    assert_eq!(found.cost, 4000);
}

#[test]
fn test_overshooting_candidates_are_ignored() {
    let mut b = LatticeBuilder::new("東京大学院");
    let full = b.word(0, "東京大学", 5000);
    let in_ = b.word(4, "院", 100);
    b.word(0, "東京", 2000);
    // cheaper, but runs past the end of 東京大学
    b.word(2, "大学院", 1);
    b.word(2, "大学", 3000);
    b.best(&[full, in_]);
    let lattice = b.build();

    let found = decompose_compound(&lattice, 1, 0).unwrap();
    assert_eq!(surfaces(&lattice, &found), vec!["東京", "大学"]);

    let queue = assemble(&lattice, &options(Mode::Search)).unwrap();
    assert_eq!(terms(queue), vec!["東京", "東京大学", "大学", "院"]);
}

#[test]
fn test_start_candidates_must_be_shorter() {
    let mut b = LatticeBuilder::new("東京大学");
    let full = b.word(0, "東京大学", 5000);
    // same length as the target: not a start candidate
    b.word(0, "東京大学", 1);
    b.best(&[full]);
    let lattice = b.build();
    assert!(decompose_compound(&lattice, 1, 0).is_none());
}

#[test]
fn test_successor_chain_is_searched() {
    let mut lattice = Lattice::new("東京大学");
    let bos = lattice.push(LatticeNode::boundary(0, NodeStatus::SentenceStart));
    let full = lattice.push(LatticeNode::new(1, "東京大学", 5000, "名詞"));
    let tokyo = lattice.push(LatticeNode::new(2, "東京", 2000, "名詞"));
    let dai = lattice.push(LatticeNode::new(3, "大", 1500, "名詞"));
    let daigaku = lattice.push(LatticeNode::new(4, "大学", 1000, "名詞"));
    let gaku = lattice.push(LatticeNode::new(5, "学", 1500, "名詞"));
    let eos = lattice.push(LatticeNode::boundary(6, NodeStatus::SentenceEnd));
    lattice.chain_alternatives(&[full, tokyo]);
    // one connection reaches both candidates starting at offset 2
    lattice.chain_successors(&[dai, daigaku]);
    lattice.connect(bos, full, 0);
    lattice.connect(tokyo, dai, 7);
    lattice.connect(dai, gaku, 0);
    lattice.connect(daigaku, eos, 0);
    lattice.connect(gaku, eos, 0);
    lattice.connect(full, eos, 0);
    lattice.set_best_path(vec![bos, full, eos]);

    let found = decompose_compound(&lattice, full, 0).unwrap();
    assert_eq!(found.nodes, vec![tokyo, daigaku]);
    assert_eq!(found.cost, 2000 + 7 + 1000);
}

#[test]
fn test_sentence_markers_are_skipped() {
    let mut lattice = Lattice::new("東京大学");
    let bos = lattice.push(LatticeNode::boundary(0, NodeStatus::SentenceStart));
    let full = lattice.push(LatticeNode::new(1, "東京大学", 5000, "名詞"));
    let tokyo = lattice.push(LatticeNode::new(2, "東京", 2000, "名詞"));
    let daigaku = lattice.push(LatticeNode::new(3, "大学", 1000, "名詞"));
    let eos = lattice.push(LatticeNode::boundary(4, NodeStatus::SentenceEnd));
    lattice.chain_alternatives(&[full, tokyo]);
    lattice.chain_successors(&[eos, daigaku]);
    lattice.connect(tokyo, eos, 0);
    lattice.connect(daigaku, eos, 0);
    lattice.set_best_path(vec![bos, full, eos]);

    let found = decompose_compound(&lattice, full, 0).unwrap();
    assert_eq!(found.nodes, vec![tokyo, daigaku]);
}

#[test]
fn test_expansion_budget() {
    let lattice = tokyo_daigaku().build();

    // the start candidate alone uses up the budget
    assert!(decompose_compound(&lattice, 1, 1).is_none());

    // 東京, 大学 (complete), 大, then the budget runs out before 学
    let found = decompose_compound(&lattice, 1, 3).unwrap();
    assert_eq!(surfaces(&lattice, &found), vec!["東京", "大学"]);

    let unbounded = decompose_compound(&lattice, 1, 0).unwrap();
    assert_eq!(decompose_compound(&lattice, 1, 10_000), Some(unbounded));
}

#[test]
fn test_budget_cutoff_falls_back_to_plain_token() {
    let lattice = tokyo_daigaku().build();
    let opts = SegmenterOptions {
        max_expansions: 1,
        ..options(Mode::Search)
    };
    let queue = assemble(&lattice, &opts).unwrap();
    assert_eq!(drain(queue), vec![("東京大学".to_string(), 1, 1)]);
}

fn hogera() -> LatticeBuilder {
    let mut b = LatticeBuilder::new("ほげら");
    let full = b.unknown(0, "ほげら", 30000);
    b.unknown(0, "ほげ", 100);
    b.unknown(0, "ほ", 5000);
    b.unknown(1, "げ", 5000);
    b.unknown(1, "げら", 100);
    b.unknown(2, "ら", 5000);
    b.best(&[full]);
    b
}

#[test]
fn test_unknown_expanded_to_unigrams() {
    let lattice = hogera().build();
    let found = expand_unknown(&lattice, 1, 0).unwrap();
    // cheaper bigrams are never used
    assert_eq!(surfaces(&lattice, &found), vec!["ほ", "げ", "ら"]);
    assert_eq!(found.cost, 15000);

    let queue = assemble(&lattice, &options(Mode::Extended)).unwrap();
    let tokens: Vec<_> = queue.into_stream().collect();
    let got: Vec<(&str, usize, usize)> = tokens
        .iter()
        .map(|t| (t.term.as_str(), t.position_increment, t.position_length))
        .collect();
    assert_eq!(
        got,
        vec![("ほ", 1, 1), ("ほげら", 0, 3), ("げ", 1, 1), ("ら", 1, 1)]
    );
    assert!(tokens
        .iter()
        .all(|t| t.token_type == crate::token::TokenType::Unknown));
}

#[test]
fn test_unknown_kept_whole_outside_extended_mode() {
    let lattice = hogera().build();
    for mode in [Mode::Normal, Mode::Search] {
        let queue = assemble(&lattice, &options(mode)).unwrap();
        assert_eq!(terms(queue), vec!["ほげら"], "mode {mode}");
    }
}

#[test]
fn test_single_char_unknown_is_not_expanded() {
    let mut b = LatticeBuilder::new("ほ");
    let full = b.unknown(0, "ほ", 30000);
    b.unknown(0, "ほ", 10);
    b.best(&[full]);
    let lattice = b.build();
    assert!(expand_unknown(&lattice, 1, 0).is_none());

    let queue = assemble(&lattice, &options(Mode::Extended)).unwrap();
    assert_eq!(drain(queue), vec![("ほ".to_string(), 1, 1)]);
}

#[test]
fn test_unknown_long_kanji_in_search_mode() {
    let mut b = LatticeBuilder::new("鬱陶猫犬");
    let full = b.unknown(0, "鬱陶猫犬", 30000);
    b.word(0, "鬱陶", 3000);
    b.word(2, "猫犬", 3000);
    b.best(&[full]);

    let queue = assemble(&b.build(), &options(Mode::Search)).unwrap();
    assert_eq!(terms(queue), vec!["鬱陶", "鬱陶猫犬", "猫犬"]);
}
