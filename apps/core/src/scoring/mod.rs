//! Turning inconsistently scaled model scores into a complete `ScoreBreakdown`.
//!
//! Every call returns all requested categories. Missing categories are filled
//! from the resolved ones, near-uniform results are spread apart with fixed
//! offsets, and a fully unreadable input gets synthetic values. Which of
//! those happened is reported separately as a `ScoreProvenance`.

pub mod degeneracy;
pub mod fallback;
pub mod scale;
pub mod text_scores;

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::models::{ScoreBreakdown, ScoreProvenance};

/// Keys a model may use to report its own overall figure.
const OVERALL_KEYS: &[&str] = &["overall", "overall_score"];

#[derive(Debug, Clone, Copy)]
pub enum ScoreInput<'a> {
    /// An already-parsed key/value map, e.g. from `response::extract_score_map`.
    Map(&'a Map<String, Value>),
    /// Free text to pull `category: N` style scores out of.
    Text(&'a str),
    /// A breakdown that is already on the canonical scale.
    Canonical(&'a ScoreBreakdown),
}

pub fn normalize_scores(
    input: ScoreInput<'_>,
    categories: &[String],
    config: &ScoringConfig,
) -> ScoreBreakdown {
    normalize_scores_with_rng(input, categories, config, &mut rand::thread_rng())
}

pub fn normalize_scores_with_rng<R: Rng>(
    input: ScoreInput<'_>,
    categories: &[String],
    config: &ScoringConfig,
    rng: &mut R,
) -> ScoreBreakdown {
    normalize_scores_with_provenance(input, categories, config, rng).0
}

pub fn normalize_scores_with_provenance<R: Rng>(
    input: ScoreInput<'_>,
    categories: &[String],
    config: &ScoringConfig,
    rng: &mut R,
) -> (ScoreBreakdown, ScoreProvenance) {
    match input {
        ScoreInput::Canonical(breakdown) => canonical(breakdown, categories, config, rng),
        ScoreInput::Map(map) => {
            let (resolved, reported) = resolve_map(map, categories);
            finish(resolved, reported, ScoreProvenance::Structured, categories, config, rng)
        }
        ScoreInput::Text(text) => {
            let resolved = text_scores::raw_scores_from_text(text, categories)
                .into_iter()
                .map(|(category, raw)| (category, scale::to_canonical(raw)))
                .collect();
            let reported = OVERALL_KEYS
                .iter()
                .find_map(|key| text_scores::raw_score_for(text, key))
                .map(scale::to_canonical);
            finish(resolved, reported, ScoreProvenance::Text, categories, config, rng)
        }
    }
}

/// Already-canonical values pass through untouched apart from clamping and
/// filling, so normalizing a normalized breakdown is a no-op.
fn canonical<R: Rng>(
    breakdown: &ScoreBreakdown,
    categories: &[String],
    config: &ScoringConfig,
    rng: &mut R,
) -> (ScoreBreakdown, ScoreProvenance) {
    let mut resolved: BTreeMap<String, u32> = categories
        .iter()
        .filter_map(|c| breakdown.get(c).map(|v| (c.clone(), scale::clamp_score(i64::from(v)))))
        .collect();

    if resolved.is_empty() {
        return synthetic(categories, config, rng);
    }
    fill_missing(&mut resolved, categories);

    let overall = scale::clamp_score(i64::from(breakdown.overall));
    (
        ScoreBreakdown {
            categories: resolved,
            overall,
        },
        ScoreProvenance::Canonical,
    )
}

fn finish<R: Rng>(
    mut resolved: BTreeMap<String, u32>,
    reported_overall: Option<u32>,
    provenance: ScoreProvenance,
    categories: &[String],
    config: &ScoringConfig,
    rng: &mut R,
) -> (ScoreBreakdown, ScoreProvenance) {
    if resolved.is_empty() {
        return synthetic(categories, config, rng);
    }
    fill_missing(&mut resolved, categories);

    if degeneracy::is_degenerate(&resolved, config) {
        info!(
            max_distinct = config.degeneracy_max_distinct,
            categories = resolved.len(),
            "near-uniform scores, applying offsets"
        );
        degeneracy::apply_offsets(&mut resolved, config);
        let overall = degeneracy::weighted_overall(&resolved, config);
        return (
            ScoreBreakdown {
                categories: resolved,
                overall,
            },
            ScoreProvenance::DegeneracyCorrected,
        );
    }

    let overall =
        reported_overall.unwrap_or_else(|| degeneracy::weighted_overall(&resolved, config));
    (
        ScoreBreakdown {
            categories: resolved,
            overall,
        },
        provenance,
    )
}

fn synthetic<R: Rng>(
    categories: &[String],
    config: &ScoringConfig,
    rng: &mut R,
) -> (ScoreBreakdown, ScoreProvenance) {
    warn!(
        categories = categories.len(),
        "no category score could be resolved, using synthetic values"
    );
    let values = fallback::synthesize(categories, config, rng);
    let overall = degeneracy::weighted_overall(&values, config);
    (
        ScoreBreakdown {
            categories: values,
            overall,
        },
        ScoreProvenance::Synthetic,
    )
}

/// Unresolved categories take the rounded mean of the resolved ones.
fn fill_missing(resolved: &mut BTreeMap<String, u32>, categories: &[String]) {
    let mean = degeneracy::mean(resolved);
    for category in categories {
        if !resolved.contains_key(category) {
            debug!(category = %category, value = mean, "filling missing category");
            resolved.insert(category.clone(), mean);
        }
    }
}

/// Looks categories up by normalized key; a nested `"scores"` object is
/// searched first.
fn resolve_map(
    map: &Map<String, Value>,
    categories: &[String],
) -> (BTreeMap<String, u32>, Option<u32>) {
    let mut by_key: HashMap<String, &Value> = HashMap::new();
    if let Some(Value::Object(nested)) = map.get("scores") {
        for (key, value) in nested {
            by_key.entry(normalize_key(key)).or_insert(value);
        }
    }
    for (key, value) in map {
        by_key.entry(normalize_key(key)).or_insert(value);
    }

    let resolved = categories
        .iter()
        .filter_map(|category| {
            let value = by_key.get(&normalize_key(category))?;
            let raw = scale::parse_raw(value)?;
            Some((category.clone(), scale::to_canonical(raw)))
        })
        .collect();

    let reported = OVERALL_KEYS
        .iter()
        .find_map(|key| by_key.get(*key).and_then(|v| scale::parse_raw(v)))
        .map(scale::to_canonical);

    (resolved, reported)
}

/// `"Skills Relevance"`, `"skills-relevance"` and `"SKILLS_RELEVANCE"` all
/// become `skills_relevance`.
pub(crate) fn normalize_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
