//! Recovering structured data from free-form model responses.
//!
//! Candidates are tried in order (fenced code block, first JSON-shaped span,
//! whole input). Each candidate is narrowed to one balanced value, parsed as
//! is, then parsed again after the quote-repair pass. The first candidate that
//! parses into the expected shape wins; if none does the caller's documented
//! default is returned. Nothing here returns an error.

pub mod brackets;
pub mod candidate;
pub mod mapping;
pub mod repair;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::chain::{first_success, strategy_names, Strategy};
use crate::config::ResponseConfig;
use crate::errors::StructuredParseError;
use crate::models::{Issue, Severity};
use crate::scoring::scale;

/// Responses shorter than this cannot contain a JSON value worth parsing.
const MIN_RESPONSE_LEN: usize = 2;

const CANDIDATE_STRATEGIES: [Strategy<str, String>; 3] = [
    Strategy::new("fenced_block", candidate::fenced_block),
    Strategy::new("json_shape", candidate::json_shape),
    Strategy::new("whole_input", candidate::whole_input),
];

/// What to return for an issue list when nothing parses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueFallback {
    #[default]
    Empty,
    /// A single medium-severity issue explaining that analysis failed.
    Sentinel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedShape {
    IssueList(IssueFallback),
    /// Default on failure is `None`.
    ScoreMap,
}

impl ExpectedShape {
    fn name(&self) -> &'static str {
        match self {
            ExpectedShape::IssueList(_) => "issue_list",
            ExpectedShape::ScoreMap => "score_map",
        }
    }

    /// Bytes a payload of this shape may start with.
    fn openers(&self) -> &'static [u8] {
        match self {
            ExpectedShape::IssueList(_) => b"[{",
            ExpectedShape::ScoreMap => b"{",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedValue {
    Issues(Vec<Issue>),
    /// The score object exactly as the model wrote it: values may still be
    /// strings such as `"75%"` or nested `{"score": ..}` objects. Use
    /// `numeric_scores` for plain numbers, or hand the map to
    /// `scoring::normalize_scores` for the canonical scale.
    Scores(Option<Map<String, Value>>),
}

impl ParsedValue {
    pub fn into_issues(self) -> Vec<Issue> {
        match self {
            ParsedValue::Issues(issues) => issues,
            ParsedValue::Scores(_) => Vec::new(),
        }
    }

    pub fn into_scores(self) -> Option<Map<String, Value>> {
        match self {
            ParsedValue::Scores(scores) => scores,
            ParsedValue::Issues(_) => None,
        }
    }

    /// Score values coerced to numbers, unscaled. Keys whose value cannot be
    /// read as a number are dropped.
    pub fn numeric_scores(&self) -> Option<BTreeMap<String, f64>> {
        match self {
            ParsedValue::Scores(Some(map)) => Some(
                map.iter()
                    .filter_map(|(key, value)| scale::parse_raw(value).map(|v| (key.clone(), v)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// The issue returned by `IssueFallback::Sentinel`.
pub fn sentinel_issue() -> Issue {
    Issue::new(
        "Analysis unavailable",
        "The analysis response could not be interpreted.",
        "Run the analysis again.",
        Severity::Medium,
    )
}

pub fn extract_structured(
    response: &str,
    shape: ExpectedShape,
    config: &ResponseConfig,
) -> ParsedValue {
    match shape {
        ExpectedShape::IssueList(fallback) => {
            ParsedValue::Issues(extract_issues(response, fallback, config))
        }
        ExpectedShape::ScoreMap => ParsedValue::Scores(extract_score_map(response, config)),
    }
}

pub fn extract_issues(response: &str, fallback: IssueFallback, config: &ResponseConfig) -> Vec<Issue> {
    let shape = ExpectedShape::IssueList(fallback);
    let parsed = parse_with(response, shape, config, |value| {
        mapping::issues_from_value(value, &config.issue_list_keys)
    });

    parsed.unwrap_or_else(|| match fallback {
        IssueFallback::Empty => Vec::new(),
        IssueFallback::Sentinel => vec![sentinel_issue()],
    })
}

pub fn extract_score_map(response: &str, config: &ResponseConfig) -> Option<Map<String, Value>> {
    parse_with(response, ExpectedShape::ScoreMap, config, |value| match value {
        Value::Object(map) => Ok(map),
        _ => Err(StructuredParseError::UnexpectedShape("a JSON object")),
    })
}

/// Runs the candidate chain and returns the first successfully converted value.
fn parse_with<T>(
    response: &str,
    shape: ExpectedShape,
    config: &ResponseConfig,
    convert: impl Fn(Value) -> Result<T, StructuredParseError>,
) -> Option<T> {
    if response.trim().len() < MIN_RESPONSE_LEN {
        debug!(shape = shape.name(), "response too short to hold JSON");
        return None;
    }

    let mut last_error = StructuredParseError::NoCandidate;
    let mut largest_candidate = 0usize;

    let parsed = first_success(response, &CANDIDATE_STRATEGIES, |name, candidate| {
        largest_candidate = largest_candidate.max(candidate.len());
        match parse_candidate(&candidate, shape, config, &convert) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(strategy = name, candidate_len = candidate.len(), error = %e, "candidate rejected");
                last_error = e;
                None
            }
        }
    });

    if parsed.is_none() {
        warn!(
            shape = shape.name(),
            response_len = response.len(),
            candidate_len = largest_candidate,
            strategies = ?strategy_names(&CANDIDATE_STRATEGIES),
            error = %last_error,
            "could not recover structured output, using default"
        );
    }
    parsed
}

fn parse_candidate<T>(
    candidate: &str,
    shape: ExpectedShape,
    config: &ResponseConfig,
    convert: &impl Fn(Value) -> Result<T, StructuredParseError>,
) -> Result<T, StructuredParseError> {
    let mut last_error = StructuredParseError::NoCandidate;
    for attempt in parse_attempts(candidate, shape.openers(), config) {
        match serde_json::from_str::<Value>(&attempt)
            .map_err(StructuredParseError::from)
            .and_then(convert)
        {
            Ok(value) => return Ok(value),
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

/// Strings to feed the JSON parser, in order: the bounded candidate, the
/// bounded candidate after repair, and the repaired candidate re-bounded
/// (stray quotes can throw off bracket matching).
fn parse_attempts(candidate: &str, openers: &[u8], config: &ResponseConfig) -> Vec<String> {
    let mut attempts: Vec<String> = Vec::with_capacity(3);
    let mut push = |attempt: &str| {
        if !attempts.iter().any(|a| a == attempt) {
            attempts.push(attempt.to_string());
        }
    };

    if let Some(bounded) = candidate::bound(candidate, openers) {
        push(bounded);
        push(&repair::repair_quotes(bounded, &config.repair_fields));
    }
    let repaired = repair::repair_quotes(candidate, &config.repair_fields);
    if let Some(bounded) = candidate::bound(&repaired, openers) {
        push(bounded);
    }

    attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResponseConfig {
        ResponseConfig::default()
    }

    #[test]
    fn test_fenced_issue_list() {
        let response = "Here you go:\n```json\n[{\"text\":\"a\",\"explanation\":\"b\",\"suggestion\":\"c\",\"severity\":\"high\"}]\n```";
        let issues = extract_structured(response, ExpectedShape::IssueList(IssueFallback::Empty), &config())
            .into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].text, "a");
        assert_eq!(issues[0].explanation, "b");
        assert_eq!(issues[0].suggestion, "c");
    }

    #[test]
    fn test_unfenced_array_with_surrounding_prose() {
        let response = r#"I found these problems: [{"text": "x", "severity": "critical"}, {"text": "y"}] Let me know!"#;
        let issues = extract_issues(response, IssueFallback::Empty, &config());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[1].severity, Severity::Medium);
    }

    #[test]
    fn test_nested_arrays_bounded_by_depth() {
        let response = r#"[{"text": "a", "tags": ["x", ["y"]]}, {"text": "b"}] and [1]"#;
        let issues = extract_issues(response, IssueFallback::Empty, &config());
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_unescaped_quote_repaired_or_defaulted() {
        let response = r#"[{"text": "Replace "helped" with a metric", "explanation": "vague", "suggestion": "Quantify", "severity": "low"}]"#;
        let issues = extract_issues(response, IssueFallback::Empty, &config());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text, r#"Replace "helped" with a metric"#);
        assert_eq!(issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_garbage_returns_empty_default() {
        let issues = extract_issues("Sorry, I can't help with that.", IssueFallback::Empty, &config());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_garbage_returns_sentinel_default() {
        let issues = extract_issues("{{{ not json", IssueFallback::Sentinel, &config());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text, sentinel_issue().text);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_empty_response_returns_default() {
        assert!(extract_issues("", IssueFallback::Empty, &config()).is_empty());
        assert_eq!(extract_score_map(" ", &config()), None);
    }

    #[test]
    fn test_truncated_fenced_block_yields_default() {
        let response = "```json\n[{\"text\": \"cut off\", \n```";
        let issues = extract_issues(response, IssueFallback::Sentinel, &config());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].explanation, sentinel_issue().explanation);
    }

    #[test]
    fn test_fenced_block_of_wrong_shape_falls_through() {
        let response = "```json\n{\"note\": 1}\n```";
        assert!(extract_issues(response, IssueFallback::Empty, &config()).is_empty());
        let map = extract_score_map(response, &config()).unwrap();
        assert_eq!(map["note"], 1);
    }

    #[test]
    fn test_score_map_extracted() {
        let response = "Scores below.\n```json\n{\"formatting\": 8, \"clarity\": \"75%\"}\n```";
        let map = extract_structured(response, ExpectedShape::ScoreMap, &config())
            .into_scores()
            .unwrap();
        assert_eq!(map["formatting"], 8);
        assert_eq!(map["clarity"], "75%");
    }

    #[test]
    fn test_numeric_scores_coerce_raw_values() {
        let response = r#"{"formatting": 8, "clarity": "75%", "grammar": {"score": 9}, "notes": "tidy"}"#;
        let parsed = extract_structured(response, ExpectedShape::ScoreMap, &config());
        let scores = parsed.numeric_scores().unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores["formatting"], 8.0);
        assert_eq!(scores["clarity"], 75.0);
        assert_eq!(scores["grammar"], 9.0);

        assert_eq!(ParsedValue::Scores(None).numeric_scores(), None);
        assert_eq!(ParsedValue::Issues(Vec::new()).numeric_scores(), None);
    }

    #[test]
    fn test_score_map_skips_leading_array() {
        let response = r#"Categories [see rubric]: {"grammar": 90}"#;
        let map = extract_score_map(response, &config()).unwrap();
        assert_eq!(map["grammar"], 90);
    }

    #[test]
    fn test_score_map_failure_is_none() {
        assert_eq!(extract_score_map("[1, 2, 3]", &config()), None);
    }

    #[test]
    fn test_record_without_text_fields_still_mapped() {
        let response = r#"[{"severity": "high"}, {"text": "x"}]"#;
        let issues = extract_issues(response, IssueFallback::Empty, &config());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].text, "");
        assert_eq!(issues[1].text, "x");
    }

    #[test]
    fn test_wrapped_issue_list() {
        let response = r#"{"issues": [{"text": "a", "severity": "HIGH"}]}"#;
        let issues = extract_issues(response, IssueFallback::Sentinel, &config());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }
}
