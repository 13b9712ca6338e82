use super::testutil::*;
use super::*;

mod decompose;

/// 東京大学 on the best path, with its two- and one-character readings
/// available as alternatives.
fn tokyo_daigaku() -> LatticeBuilder {
    let mut b = LatticeBuilder::new("東京大学");
    let full = b.word(0, "東京大学", 5000);
    b.word(0, "東京", 2000);
    b.word(0, "東", 1500);
    b.word(1, "京", 1500);
    b.word(2, "大学", 2000);
    b.word(2, "大", 1500);
    b.word(3, "学", 1500);
    b.best(&[full]);
    b
}
