use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Resume categories scored by the analyzer, in presentation order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "ats_compatibility",
    "keyword_optimization",
    "impact_metrics",
    "formatting",
    "clarity",
    "skills_relevance",
    "experience_presentation",
    "grammar",
];

/// Weights for the recomputed overall score. Sum to 1.0.
const DEFAULT_WEIGHTS: &[(&str, f64)] = &[
    ("ats_compatibility", 0.20),
    ("keyword_optimization", 0.15),
    ("impact_metrics", 0.15),
    ("formatting", 0.10),
    ("clarity", 0.10),
    ("skills_relevance", 0.10),
    ("experience_presentation", 0.10),
    ("grammar", 0.10),
];

/// Offsets spread a near-uniform set of model scores apart.
const DEFAULT_DEGENERACY_OFFSETS: &[(&str, i32)] = &[
    ("ats_compatibility", 5),
    ("keyword_optimization", -3),
    ("impact_metrics", 8),
    ("formatting", -6),
    ("clarity", 2),
    ("skills_relevance", -8),
    ("experience_presentation", 4),
    ("grammar", -2),
];

/// Immutable configuration threaded into every extraction and scoring call.
/// Built once at startup; nothing in the core reads process state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub extraction: ExtractionConfig,
    pub response: ResponseConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// A strategy succeeds only when its output is longer than this (in chars).
    pub min_text_len: usize,
    /// Buffers shorter than this are not scanned at all.
    pub min_input_len: usize,
    /// How many bare-word matches are inspected for stop words.
    pub word_sample_size: usize,
    pub min_word_len: usize,
    /// A `TJ` adjustment below this value is rendered as a word gap.
    pub kerning_space_threshold: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_len: 200,
            min_input_len: 16,
            word_sample_size: 100,
            min_word_len: 4,
            kerning_space_threshold: -200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Free-text fields whose stray quotes are escaped by the repair pass.
    pub repair_fields: Vec<String>,
    /// Keys under which a model may nest its issue array.
    pub issue_list_keys: Vec<String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            repair_fields: to_strings(&["text", "explanation", "suggestion"]),
            issue_list_keys: to_strings(&["issues", "feedback", "items", "results"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub categories: Vec<String>,
    pub weights: BTreeMap<String, f64>,
    pub degeneracy_offsets: BTreeMap<String, i32>,
    /// At or below this many distinct values the scores are treated as degenerate.
    pub degeneracy_max_distinct: usize,
    /// Inclusive range the synthetic baseline is drawn from.
    pub fallback_baseline: (u32, u32),
    /// Per-category jitter applied around the synthetic baseline.
    pub fallback_jitter: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            categories: to_strings(DEFAULT_CATEGORIES),
            weights: DEFAULT_WEIGHTS
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect(),
            degeneracy_offsets: DEFAULT_DEGENERACY_OFFSETS
                .iter()
                .map(|(k, o)| (k.to_string(), *o))
                .collect(),
            degeneracy_max_distinct: 2,
            fallback_baseline: (60, 70),
            fallback_jitter: 5,
        }
    }
}

impl ScoringConfig {
    pub fn weight(&self, category: &str) -> f64 {
        self.weights.get(category).copied().unwrap_or(0.0)
    }

    pub fn offset(&self, category: &str) -> i32 {
        self.degeneracy_offsets.get(category).copied().unwrap_or(0)
    }
}

/// Settings for the offline binary, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub core: CoreConfig,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut core = CoreConfig::default();

        if let Some(raw) = optional_env("MIN_TEXT_LENGTH") {
            core.extraction.min_text_len = raw
                .parse::<usize>()
                .context("MIN_TEXT_LENGTH must be a non-negative integer")?;
        }

        if let Some(raw) = optional_env("SCORE_CATEGORIES") {
            let categories: Vec<String> = raw
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if categories.is_empty() {
                return Err(CoreError::Config(
                    "SCORE_CATEGORIES must name at least one category".to_string(),
                )
                .into());
            }
            core.scoring.categories = categories;
        }

        Ok(Config {
            core,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = ScoringConfig::default();
        let total: f64 = config.categories.iter().map(|c| config.weight(c)).sum();
        assert!((total - 1.0).abs() < 1e-9, "Total was {total}");
    }

    #[test]
    fn test_every_default_category_has_an_offset() {
        let config = ScoringConfig::default();
        for category in &config.categories {
            assert!(config.degeneracy_offsets.contains_key(category), "{category}");
        }
    }

    #[test]
    fn test_default_offsets_are_distinct() {
        let config = ScoringConfig::default();
        let mut offsets: Vec<i32> = config.degeneracy_offsets.values().copied().collect();
        offsets.sort_unstable();
        offsets.dedup();
        assert_eq!(offsets.len(), config.categories.len());
    }

    #[test]
    fn test_unknown_category_has_neutral_tables() {
        let config = ScoringConfig::default();
        assert_eq!(config.weight("nonexistent"), 0.0);
        assert_eq!(config.offset("nonexistent"), 0);
    }

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_text_len, 200);
        assert_eq!(config.word_sample_size, 100);
        assert_eq!(config.min_word_len, 4);
    }
}
