use std::sync::LazyLock;

use regex::bytes::Regex;

use super::filter::sanitize;
use super::literal::{decode_text, parse_hex, parse_literal};
use crate::models::DocumentMetadata;

/// `/Title` or `/Author` followed by the opening delimiter of its string value.
static INFO_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)/(Title|Author)\s*[(<]").expect("valid regex"));

/// Scans the raw bytes for document-info strings. The first non-empty value of
/// each key wins. Purely informational.
pub fn scan_metadata(bytes: &[u8]) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();

    for caps in INFO_KEY.captures_iter(bytes) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let slot = match key.as_bytes() {
            b"Title" => &mut metadata.title,
            _ => &mut metadata.author,
        };
        if slot.is_some() {
            continue;
        }

        let open = whole.end() - 1;
        let raw = match bytes[open] {
            b'(' => parse_literal(bytes, open).map(|(raw, _)| raw),
            _ => parse_hex(bytes, open).map(|(raw, _)| raw),
        };
        *slot = raw
            .map(|raw| sanitize(&decode_text(&raw)))
            .filter(|value| !value.is_empty());

        if metadata.title.is_some() && metadata.author.is_some() {
            break;
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_title_and_author() {
        let meta = scan_metadata(b"<< /Title (Jane Doe Resume) /Author (Jane Doe) >>");
        assert_eq!(meta.title.as_deref(), Some("Jane Doe Resume"));
        assert_eq!(meta.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_hex_utf16_title() {
        let meta = scan_metadata(b"/Title <FEFF00430056>");
        assert_eq!(meta.title.as_deref(), Some("CV"));
        assert_eq!(meta.author, None);
    }

    #[test]
    fn test_empty_value_skipped_for_later_one() {
        let meta = scan_metadata(b"/Author () ... /Author (Second Try)");
        assert_eq!(meta.author.as_deref(), Some("Second Try"));
    }

    #[test]
    fn test_escaped_parentheses_in_title() {
        let meta = scan_metadata(br"/Title (Resume \(2024\))");
        assert_eq!(meta.title.as_deref(), Some("Resume (2024)"));
    }

    #[test]
    fn test_no_metadata() {
        assert_eq!(scan_metadata(b"nothing here"), DocumentMetadata::default());
    }

    #[test]
    fn test_unclosed_hex_values_scan_in_linear_time() {
        let mut bytes = b"/Title <zz ".repeat(40_000);
        bytes.extend(b"/Author <zz ".repeat(40_000));
        bytes.extend(b"/Title (Found)");
        let started = std::time::Instant::now();
        let meta = scan_metadata(&bytes);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );
        assert_eq!(meta.title.as_deref(), Some("Found"));
        assert_eq!(meta.author, None);
    }
}
