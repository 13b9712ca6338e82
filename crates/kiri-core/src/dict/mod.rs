//! Per-sentence word dictionary.
//!
//! `WorkDictionary` records every node the assembler emits so that token
//! attributes (part-of-speech, reading, base form, inflection) can be
//! resolved by id when the token stream is drained. Entries are keyed by
//! node id, and additionally indexed by surface with duplicates (same
//! surface, same features) collapsed.

mod entry;
mod feature;

pub use entry::WorkDictEntry;
pub use feature::{parse_features, Columns, FeatureSchema};

use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("node {id} ({surface}) has no feature string")]
    MissingFeature { id: u32, surface: String },
}

/// Linguistic attributes of one token, resolved from its dictionary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct WordAttributes {
    pub part_of_speech: String,
    pub base_form: String,
    pub reading: String,
    pub pronunciation: String,
    pub inflection_type: String,
    pub inflection_form: String,
}

#[derive(Debug, Default)]
pub struct WorkDictionary {
    by_id: HashMap<u32, WorkDictEntry>,
    by_surface: HashMap<String, Vec<WorkDictEntry>>,
}

impl WorkDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyzed word.
    ///
    /// An absent feature string is rejected: every node the analyzer hands
    /// over must carry one.
    pub fn add(
        &mut self,
        id: u32,
        surface: &str,
        pos_id: u16,
        cost: i64,
        word_cost: i64,
        feature: Option<&str>,
    ) -> Result<(), DictError> {
        let Some(feature) = feature else {
            return Err(DictError::MissingFeature {
                id,
                surface: surface.to_string(),
            });
        };
        let entry = WorkDictEntry {
            id,
            surface: surface.to_string(),
            pos_id,
            cost,
            word_cost,
            features: parse_features(feature),
        };

        let same_surface = self.by_surface.entry(entry.surface.clone()).or_default();
        if !same_surface.iter().any(|e| e.features == entry.features) {
            same_surface.push(entry.clone());
        }
        self.by_id.insert(id, entry);
        Ok(())
    }

    pub fn lookup(&self, id: u32) -> Option<&WorkDictEntry> {
        self.by_id.get(&id)
    }

    /// Find the entry registered for `surface` with exactly these features.
    pub fn find(&self, surface: &str, feature: &str) -> Option<&WorkDictEntry> {
        let features = parse_features(feature);
        self.by_surface
            .get(surface)?
            .iter()
            .find(|e| e.features == features)
    }

    /// Word cost of an entry, 0 if the id was never registered.
    pub fn word_cost(&self, id: u32) -> i64 {
        self.lookup(id).map(|e| e.word_cost).unwrap_or(0)
    }

    /// Resolve all attributes of `id`; unknown ids give empty strings.
    pub fn attributes(&self, id: u32) -> WordAttributes {
        let Some(entry) = self.lookup(id) else {
            return WordAttributes::default();
        };
        WordAttributes {
            part_of_speech: entry.part_of_speech(),
            base_form: entry.base_form().to_string(),
            reading: entry.reading().to_string(),
            pronunciation: entry.pronunciation().to_string(),
            inflection_type: entry.inflection_type().to_string(),
            inflection_form: entry.inflection_form().to_string(),
        }
    }

    /// Number of distinct node ids registered.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of distinct (surface, features) signatures.
    pub fn signature_count(&self) -> usize {
        self.by_surface.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_surface.clear();
    }
}
