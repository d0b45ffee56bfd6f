//! Mapping loosely-shaped JSON records onto canonical `Issue`s.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::StructuredParseError;
use crate::models::{Issue, PositionHint, Severity};

const TEXT_KEYS: &[&str] = &["text", "issue", "problem"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "reason", "why"];
const SUGGESTION_KEYS: &[&str] = &["suggestion", "recommendation", "fix"];

/// Accepts an array of records, an object wrapping such an array under one of
/// `list_keys`, or a single record object.
pub fn issues_from_value(
    value: Value,
    list_keys: &[String],
) -> Result<Vec<Issue>, StructuredParseError> {
    match value {
        Value::Array(items) => Ok(items.iter().filter_map(issue_from_value).collect()),
        Value::Object(map) => {
            if let Some(items) = list_keys
                .iter()
                .find_map(|key| map.get(key).and_then(Value::as_array))
            {
                return Ok(items.iter().filter_map(issue_from_value).collect());
            }
            // A bare object only counts as a record when it carries feedback text.
            let issue = issue_from_map(&map);
            if issue.text.is_empty() && issue.explanation.is_empty() && issue.suggestion.is_empty() {
                return Err(StructuredParseError::UnexpectedShape("an issue array"));
            }
            Ok(vec![issue])
        }
        _ => Err(StructuredParseError::UnexpectedShape("an issue array")),
    }
}

/// Every object element becomes an issue; missing fields take their defaults.
pub fn issue_from_value(value: &Value) -> Option<Issue> {
    value.as_object().map(issue_from_map)
}

fn issue_from_map(map: &Map<String, Value>) -> Issue {
    Issue {
        id: id_field(map),
        text: text_field(map, TEXT_KEYS),
        explanation: text_field(map, EXPLANATION_KEYS),
        suggestion: text_field(map, SUGGESTION_KEYS),
        severity: Severity::coerce(map.get("severity")),
        position: position_field(map),
    }
}

/// Never absent: missing or null becomes an empty string, other scalars are stringified.
fn text_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
        .map(|value| match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

fn id_field(map: &Map<String, Value>) -> String {
    match map.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

fn position_field(map: &Map<String, Value>) -> PositionHint {
    match map.get("position") {
        Some(Value::Object(pos)) => PositionHint {
            section: pos
                .get("section")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            start: offset(pos.get("start")),
            end: offset(pos.get("end")),
        },
        Some(Value::String(s)) if !s.trim().is_empty() => PositionHint {
            section: Some(s.trim().to_string()),
            ..PositionHint::default()
        },
        _ => PositionHint {
            section: map
                .get("section")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            ..PositionHint::default()
        },
    }
}

fn offset(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
