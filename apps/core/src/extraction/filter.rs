/// Returns true for tokens that are PDF syntax rather than document prose:
/// bare numbers, `/Name` objects and boolean literals.
pub fn is_syntax_token(token: &str) -> bool {
    let token = token.trim();
    if token.starts_with('/') {
        return true;
    }
    if matches!(token, "true" | "false") {
        return true;
    }
    is_numeric(token)
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty()
        && token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
}

/// Replaces control characters with spaces and collapses runs of whitespace.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Share of characters that are printable ASCII or alphabetic.
pub fn printable_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let printable = text
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ' || c.is_alphabetic())
        .count();
    printable as f64 / total as f64
}

/// Sanitizes every piece, drops empty and syntax tokens, joins with single spaces.
pub fn join_filtered<I>(pieces: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pieces
        .into_iter()
        .map(|p| sanitize(&p))
        .filter(|p| !p.is_empty() && !is_syntax_token(p))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_syntax() {
        assert!(is_syntax_token("12"));
        assert!(is_syntax_token("-3.5"));
        assert!(is_syntax_token(" 0 "));
        assert!(!is_syntax_token("2023 Q4"));
        assert!(!is_syntax_token("-"));
    }

    #[test]
    fn test_names_and_booleans_are_syntax() {
        assert!(is_syntax_token("/F1"));
        assert!(is_syntax_token("true"));
        assert!(is_syntax_token("false"));
        assert!(!is_syntax_token("True story"));
    }

    #[test]
    fn test_sanitize_collapses_whitespace_and_controls() {
        assert_eq!(sanitize("  Senior\x00 Engineer\n\n at\tAcme "), "Senior Engineer at Acme");
    }

    #[test]
    fn test_printable_ratio() {
        assert_eq!(printable_ratio(""), 0.0);
        assert_eq!(printable_ratio("abcd"), 1.0);
        assert!(printable_ratio("ab\u{1}\u{2}") < 0.6);
    }

    #[test]
    fn test_join_filtered() {
        let pieces = vec![
            "Hello".to_string(),
            "42".to_string(),
            "/Type".to_string(),
            "  ".to_string(),
            "World".to_string(),
            "false".to_string(),
        ];
        assert_eq!(join_filtered(pieces), "Hello World");
    }
}
