//! Locating the JSON payload inside free-form model output.

use std::sync::LazyLock;

use regex::Regex;

use super::brackets::balanced_span;

/// Content between triple-backtick fences, optionally tagged `json`.
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n?(.*?)```").expect("valid regex"));

/// From the first `{`/`[` to the last `}`/`]`.
static JSON_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[\[{].*[\]}]").expect("valid regex"));

/// First fenced block whose content looks like it holds JSON.
pub fn fenced_block(text: &str) -> Option<String> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|body| body.contains('{') || body.contains('['))
        .map(str::to_string)
}

pub fn json_shape(text: &str) -> Option<String> {
    JSON_SHAPE.find(text).map(|m| m.as_str().to_string())
}

pub fn whole_input(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Drops prose before the first opener and after the last matching closer.
pub fn strip_prose<'a>(candidate: &'a str, openers: &[u8]) -> Option<&'a str> {
    let start = candidate.bytes().position(|b| openers.contains(&b))?;
    let close = closer_for(candidate.as_bytes()[start]);
    let end = candidate.bytes().rposition(|b| b == close)?;
    (end > start).then(|| &candidate[start..=end])
}

/// Narrows a candidate to one complete top-level value: prose is stripped,
/// then the closing bracket is found by depth counting.
pub fn bound<'a>(candidate: &'a str, openers: &[u8]) -> Option<&'a str> {
    let stripped = strip_prose(candidate, openers)?;
    let open = stripped.as_bytes()[0];
    Some(balanced_span(stripped, open, closer_for(open)).unwrap_or(stripped))
}

fn closer_for(open: u8) -> u8 {
    if open == b'[' {
        b']'
    } else {
        b'}'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_with_json_tag() {
        let text = "Here you go:\n```json\n[{\"a\": 1}]\n```\nThanks!";
        assert_eq!(fenced_block(text).as_deref(), Some("[{\"a\": 1}]"));
    }

    #[test]
    fn test_fenced_block_without_tag() {
        let text = "```\n{\"score\": 5}\n```";
        assert_eq!(fenced_block(text).as_deref(), Some("{\"score\": 5}"));
    }

    #[test]
    fn test_fenced_block_skips_non_json_blocks() {
        let text = "```\nplain words\n```\nthen\n```json\n[1]\n```";
        assert_eq!(fenced_block(text).as_deref(), Some("[1]"));
    }

    #[test]
    fn test_no_fenced_block() {
        assert_eq!(fenced_block("just [1, 2]"), None);
    }

    #[test]
    fn test_json_shape_spans_first_to_last_bracket() {
        let text = "Sure! {\"a\": [1]} hope that helps";
        assert_eq!(json_shape(text).as_deref(), Some("{\"a\": [1]}"));
        assert_eq!(json_shape("no json"), None);
    }

    #[test]
    fn test_strip_prose_respects_openers() {
        let text = "Scores [draft]: {\"a\": 1} end";
        assert_eq!(strip_prose(text, b"{"), Some("{\"a\": 1}"));
        assert_eq!(strip_prose(text, b"[{"), Some("[draft]"));
    }

    #[test]
    fn test_bound_cuts_at_matching_bracket() {
        let text = "[{\"a\": 1}] and later [2]";
        assert_eq!(bound(text, b"[{"), Some("[{\"a\": 1}]"));
    }

    #[test]
    fn test_bound_without_closer() {
        assert_eq!(bound("[1, 2", b"["), None);
    }

    #[test]
    fn test_whole_input_trims() {
        assert_eq!(whole_input("  [1]  ").as_deref(), Some("[1]"));
        assert_eq!(whole_input("   "), None);
    }
}
