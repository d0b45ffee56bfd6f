//! Fallback strategy: every parenthesized run in the buffer, ignoring text-object
//! boundaries. Three patterns, each more permissive than the last.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::filter::{is_syntax_token, printable_ratio, sanitize};
use super::literal::{decode_text, unescape};
use super::{Recovered, ScanInput};
use crate::models::ExtractionMethod;

/// Plain prose characters only.
static STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\(([A-Za-z0-9 .,;:'!?@&%$#*+=_\-]{2,})\)").expect("valid regex")
});

/// Anything that is not a parenthesis, backslash or line break.
static PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\(([^()\\\r\n]{2,})\)").expect("valid regex"));

/// Also admits backslash escapes, which are decoded afterwards.
static ESCAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\(((?:[^()\\]|\\.)+)\)").expect("valid regex"));

const MIN_TOKEN_CHARS: usize = 4;
/// Binary stream noise caught between parentheses is mostly unprintable.
const MIN_PRINTABLE_RATIO: f64 = 0.85;

pub fn strict(input: &ScanInput<'_>) -> Option<Recovered> {
    collect(&STRICT, input.bytes, false)
}

pub fn plain(input: &ScanInput<'_>) -> Option<Recovered> {
    collect(&PLAIN, input.bytes, false)
}

pub fn escaped(input: &ScanInput<'_>) -> Option<Recovered> {
    collect(&ESCAPED, input.bytes, true)
}

fn collect(pattern: &Regex, bytes: &[u8], decode_escapes: bool) -> Option<Recovered> {
    let tokens: Vec<String> = pattern
        .captures_iter(bytes)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            if decode_escapes {
                decode_text(&unescape(m.as_bytes()))
            } else {
                decode_text(m.as_bytes())
            }
        })
        .map(|raw| sanitize(&raw))
        .filter(|token| is_content_token(token))
        .collect();

    if tokens.is_empty() {
        return None;
    }
    Some(Recovered {
        method: ExtractionMethod::FallbackPattern,
        text: tokens.join(" "),
    })
}

fn is_content_token(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS
        && token.chars().any(|c| c.is_alphanumeric() || c == '_')
        && !is_syntax_token(token)
        && printable_ratio(token) >= MIN_PRINTABLE_RATIO
}
