//! Feature-string parsing and dictionary schema detection.
//!
//! The analyzer reports a node's linguistic features as one CSV-like record.
//! Different system dictionaries lay the columns out differently; the layout
//! is recognised purely from the number of fields.

/// Column layout of a feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSchema {
    /// Up to 8 fields (Juman-style).
    Juman,
    /// 9 to 16 fields (IPADIC-style).
    Ipadic,
    /// 17 or more fields (UniDic-style).
    Unidic,
}

/// Fixed column positions for one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    /// Number of leading fields that make up the part-of-speech.
    pub pos_span: usize,
    pub reading: usize,
    pub base_form: usize,
    pub pronunciation: usize,
    pub inflection_type: usize,
    pub inflection_form: usize,
}

impl FeatureSchema {
    pub fn detect(field_count: usize) -> Self {
        if field_count < 9 {
            FeatureSchema::Juman
        } else if field_count < 17 {
            FeatureSchema::Ipadic
        } else {
            FeatureSchema::Unidic
        }
    }

    pub fn columns(self) -> Columns {
        match self {
            FeatureSchema::Juman => Columns {
                pos_span: 2,
                reading: 5,
                base_form: 4,
                pronunciation: 5,
                inflection_type: 2,
                inflection_form: 3,
            },
            FeatureSchema::Ipadic => Columns {
                pos_span: 4,
                reading: 7,
                base_form: 6,
                pronunciation: 8,
                inflection_type: 5,
                inflection_form: 4,
            },
            FeatureSchema::Unidic => Columns {
                pos_span: 4,
                reading: 6,
                base_form: 10,
                pronunciation: 11,
                inflection_type: 4,
                inflection_form: 5,
            },
        }
    }
}

/// Split a feature record into fields.
///
/// - `,` separates fields outside quotes
/// - `"` toggles the quoted state and is dropped
/// - `""` is a literal quote, inside or outside quotes
/// - a trailing separator does not open an empty last field, and an empty
///   record has no fields at all
pub fn parse_features(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = record.chars().peekable();

    while chars.peek().is_some() {
        let mut field = String::new();
        let mut quoted = false;
        while let Some(c) = chars.next() {
            match c {
                ',' if !quoted => break,
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        quoted = !quoted;
                    }
                }
                _ => field.push(c),
            }
        }
        fields.push(field);
    }
    fields
}

/// Join the first `span` fields with `-`, skipping `*` placeholders.
///
/// A separator is written before every kept field except the very first
/// column, so a skipped first column does not produce a leading `-`.
pub(crate) fn join_pos(fields: &[String], span: usize) -> String {
    let mut pos = String::new();
    for (i, field) in fields.iter().take(span).enumerate() {
        if field == "*" {
            continue;
        }
        if i > 0 && !pos.is_empty() {
            pos.push('-');
        }
        pos.push_str(field);
    }
    pos
}
