use std::collections::BTreeMap;

use rand::Rng;

use crate::config::ScoringConfig;

use super::scale;

/// Plausible placeholder scores for when nothing could be read from the
/// model: one baseline drawn from the configured range, with independent
/// jitter per category.
pub fn synthesize<R: Rng>(
    categories: &[String],
    config: &ScoringConfig,
    rng: &mut R,
) -> BTreeMap<String, u32> {
    let (a, b) = config.fallback_baseline;
    let baseline = i64::from(rng.gen_range(a.min(b)..=a.max(b)));
    let jitter = i64::from(config.fallback_jitter.unsigned_abs());

    categories
        .iter()
        .map(|category| {
            let value = baseline + rng.gen_range(-jitter..=jitter);
            (category.clone(), scale::clamp_score(value))
        })
        .collect()
}
