use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordinal importance of an issue. Declared low-to-high so the derived `Ord`
/// ranks `Critical` above everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parses a model-supplied label. Case and surrounding whitespace are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    /// Never fails: anything unrecognised becomes `Medium`.
    pub fn coerce(value: Option<&serde_json::Value>) -> Self {
        value
            .and_then(|v| v.as_str())
            .and_then(Severity::from_label)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Where in the document an issue applies. Every part is optional because the
/// model is free to omit or garble it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionHint {
    pub section: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl PositionHint {
    pub fn is_empty(&self) -> bool {
        self.section.is_none() && self.start.is_none() && self.end.is_none()
    }
}

/// A single piece of feedback recovered from a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub text: String,
    pub explanation: String,
    pub suggestion: String,
    pub severity: Severity,
    pub position: PositionHint,
}

impl Issue {
    pub fn new(
        text: impl Into<String>,
        explanation: impl Into<String>,
        suggestion: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            explanation: explanation.into(),
            suggestion: suggestion.into(),
            severity,
            position: PositionHint::default(),
        }
    }
}

/// Orders issues most severe first; equal severities keep their original order.
pub fn sort_by_severity(issues: &mut [Issue]) {
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_from_label_ignores_case_and_whitespace() {
        assert_eq!(Severity::from_label("  HIGH "), Some(Severity::High));
        assert_eq!(Severity::from_label("Critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_label("severe"), None);
    }

    #[test]
    fn test_coerce_defaults_to_medium() {
        assert_eq!(Severity::coerce(None), Severity::Medium);
        assert_eq!(Severity::coerce(Some(&json!("urgent"))), Severity::Medium);
        assert_eq!(Severity::coerce(Some(&json!(3))), Severity::Medium);
        assert_eq!(Severity::coerce(Some(&json!("low"))), Severity::Low);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), r#""critical""#);
    }

    #[test]
    fn test_sort_by_severity_is_stable() {
        let mut issues = vec![
            Issue::new("a", "", "", Severity::Low),
            Issue::new("b", "", "", Severity::Critical),
            Issue::new("c", "", "", Severity::Low),
            Issue::new("d", "", "", Severity::High),
        ];
        sort_by_severity(&mut issues);
        let order: Vec<_> = issues.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_new_issue_gets_unique_id() {
        let a = Issue::new("x", "", "", Severity::Medium);
        let b = Issue::new("x", "", "", Severity::Medium);
        assert_ne!(a.id, b.id);
        assert!(a.position.is_empty());
    }
}
