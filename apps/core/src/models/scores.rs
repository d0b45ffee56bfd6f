use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SCORE_MIN: u32 = 0;
pub const SCORE_MAX: u32 = 100;

/// Canonical per-category scores (0 – 100) plus a derived overall score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub categories: BTreeMap<String, u32>,
    pub overall: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, category: &str) -> Option<u32> {
        self.categories.get(category).copied()
    }

    /// Number of different values across the categories (overall excluded).
    pub fn distinct_values(&self) -> usize {
        let mut values: Vec<u32> = self.categories.values().copied().collect();
        values.sort_unstable();
        values.dedup();
        values.len()
    }

    pub fn covers(&self, categories: &[String]) -> bool {
        categories.iter().all(|c| self.categories.contains_key(c))
    }
}

/// How a breakdown came to be. Lives outside `ScoreBreakdown` on purpose: the
/// numbers alone never reveal whether they were synthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreProvenance {
    /// Input was already a canonical breakdown.
    Canonical,
    /// Parsed from a key/value map.
    Structured,
    /// Pulled out of free text with the category patterns.
    Text,
    /// The source was near-uniform and the offset correction was applied.
    DegeneracyCorrected,
    /// Nothing resolved; values were drawn from the fallback baseline.
    Synthetic,
}

impl ScoreProvenance {
    pub fn is_low_confidence(&self) -> bool {
        matches!(
            self,
            ScoreProvenance::DegeneracyCorrected | ScoreProvenance::Synthetic
        )
    }
}
