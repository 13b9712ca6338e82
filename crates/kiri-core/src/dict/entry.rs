use serde::Serialize;

use super::feature::{join_pos, FeatureSchema};

/// One analyzed word, as registered while assembling a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkDictEntry {
    pub id: u32,
    pub surface: String,
    pub pos_id: u16,
    /// Cumulative path cost reported by the analyzer.
    pub cost: i64,
    pub word_cost: i64,
    pub features: Vec<String>,
}

impl WorkDictEntry {
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::detect(self.features.len())
    }

    fn column(&self, index: usize) -> &str {
        self.features.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn part_of_speech(&self) -> String {
        join_pos(&self.features, self.schema().columns().pos_span)
    }

    pub fn reading(&self) -> &str {
        self.column(self.schema().columns().reading)
    }

    pub fn base_form(&self) -> &str {
        self.column(self.schema().columns().base_form)
    }

    pub fn pronunciation(&self) -> &str {
        self.column(self.schema().columns().pronunciation)
    }

    pub fn inflection_type(&self) -> &str {
        self.column(self.schema().columns().inflection_type)
    }

    pub fn inflection_form(&self) -> &str {
        self.column(self.schema().columns().inflection_form)
    }
}
