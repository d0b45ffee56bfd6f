use std::collections::BTreeMap;

use crate::config::ScoringConfig;

use super::scale;

/// Scores are degenerate when the model collapsed them onto one or two
/// values. A breakdown with no more categories than the threshold is never
/// degenerate, otherwise two honest categories would always be "corrected".
pub fn is_degenerate(categories: &BTreeMap<String, u32>, config: &ScoringConfig) -> bool {
    if categories.len() <= config.degeneracy_max_distinct {
        return false;
    }
    let mut values: Vec<u32> = categories.values().copied().collect();
    values.sort_unstable();
    values.dedup();
    values.len() <= config.degeneracy_max_distinct
}

/// Adds each category's fixed offset and clamps back into range.
pub fn apply_offsets(categories: &mut BTreeMap<String, u32>, config: &ScoringConfig) {
    for (category, value) in categories.iter_mut() {
        *value = scale::clamp_score(i64::from(*value) + i64::from(config.offset(category)));
    }
}

/// Weighted sum of the category scores, rounded. Categories without a weight
/// count for nothing; if no category carries weight the plain mean is used.
pub fn weighted_overall(categories: &BTreeMap<String, u32>, config: &ScoringConfig) -> u32 {
    if categories.is_empty() {
        return 0;
    }

    let (weighted, total_weight) = categories.iter().fold((0.0, 0.0), |(sum, total), (c, v)| {
        let w = config.weight(c).max(0.0);
        (sum + w * f64::from(*v), total + w)
    });

    if total_weight > 0.0 {
        scale::clamp_round(weighted / total_weight)
    } else {
        mean(categories)
    }
}

pub fn mean(categories: &BTreeMap<String, u32>) -> u32 {
    if categories.is_empty() {
        return 0;
    }
    let sum: u64 = categories.values().map(|v| u64::from(*v)).sum();
    scale::clamp_round(sum as f64 / categories.len() as f64)
}
