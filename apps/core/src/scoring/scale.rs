//! Scale detection for a single raw score.
//!
//! The range guess is ambiguous by nature: a genuine "7 out of 100" cannot be
//! told apart from "7 out of 10" and is read as the latter.

use serde_json::Value;

use crate::models::{SCORE_MAX, SCORE_MIN};

/// Parses a raw score. Numbers are taken as is; strings have `%` and
/// surrounding whitespace stripped. Anything else, or a non-finite value, is
/// treated as missing.
pub fn parse_raw(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_str(s),
        Value::Object(obj) => obj.get("score").and_then(parse_raw),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub fn parse_str(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Maps a raw value onto the canonical 0 – 100 integer scale.
///
/// Fractions strictly between 0 and 1 are percentages-as-fractions (×100),
/// the rest of `[0, 10]` is a ten-point scale (×10), everything else is
/// already on the 100-point scale. The result is clamped and rounded.
pub fn to_canonical(raw: f64) -> u32 {
    let scaled = if raw > 0.0 && raw < 1.0 {
        raw * 100.0
    } else if (0.0..=10.0).contains(&raw) {
        raw * 10.0
    } else {
        raw
    };
    clamp_round(scaled)
}

pub fn clamp_round(value: f64) -> u32 {
    value
        .clamp(f64::from(SCORE_MIN), f64::from(SCORE_MAX))
        .round() as u32
}

pub fn clamp_score(value: i64) -> u32 {
    value.clamp(i64::from(SCORE_MIN), i64::from(SCORE_MAX)) as u32
}
