//! Character-level Unicode classification for Japanese text.

use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Ideographic characters as the analyzer's character definition sees them:
/// CJK unified ideographs (base block, extension A, extension B), the
/// compatibility block, the iteration mark 々 and the ideographic zero 〇.
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || c == '々'
        || c == '〇'
}

/// True for a non-empty string made only of [`is_kanji`] characters.
pub fn is_all_kanji(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_kanji)
}

/// Separators, controls, format characters, every punctuation category and
/// every symbol category. Letters, marks and numbers are not punctuation.
pub fn is_punctuation(c: char) -> bool {
    matches!(
        c.general_category(),
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::ConnectorPunctuation
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
    )
}
