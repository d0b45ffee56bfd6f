//! Last-resort strategy: bare alphanumeric runs anywhere in the buffer, accepted
//! only when a sample of them reads like English prose.

use super::{Recovered, ScanInput};
use crate::models::ExtractionMethod;

/// Common English words that never occur as standalone PDF syntax.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "have", "are", "was", "were", "will",
    "your", "our", "you", "has", "not", "but",
];

/// PDF structure vocabulary that the run scanner would otherwise report as words.
const PDF_SYNTAX_WORDS: &[&str] = &[
    "endobj", "stream", "endstream", "xref", "trailer", "startxref", "subtype", "basefont",
    "winansiencoding", "flatedecode", "dctdecode", "mediabox", "cropbox", "procset", "xobject",
    "colorspace", "devicergb", "devicegray", "devicecmyk", "bitspercomponent", "fontdescriptor",
    "fontname", "fontbbox", "italicangle", "capheight", "stemv", "firstchar", "lastchar",
    "widths", "tounicode", "creationdate", "moddate", "null", "true", "false",
];

/// A run of ASCII alphanumerics as byte offsets.
struct Run {
    start: usize,
    end: usize,
}

pub fn scan(input: &ScanInput<'_>) -> Option<Recovered> {
    let bytes = input.bytes;
    let runs = alphanumeric_runs(bytes, input.config.min_word_len);
    if runs.is_empty() {
        return None;
    }

    let sample_end = runs
        .iter()
        .take(input.config.word_sample_size.max(1))
        .last()
        .map_or(0, |r| r.end);
    if !contains_stop_word(&bytes[..sample_end]) {
        return None;
    }

    let words: Vec<&str> = runs
        .iter()
        .filter_map(|r| std::str::from_utf8(&bytes[r.start..r.end]).ok())
        .filter(|w| !w.bytes().all(|b| b.is_ascii_digit()))
        .filter(|w| !is_pdf_syntax(w))
        .collect();
    if words.is_empty() {
        return None;
    }

    Some(Recovered {
        method: ExtractionMethod::FallbackWordHeuristic,
        text: words.join(" "),
    })
}

fn alphanumeric_runs(bytes: &[u8], min_len: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, b) in bytes.iter().enumerate() {
        match (b.is_ascii_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_len {
                    runs.push(Run { start: s, end: i });
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if bytes.len() - s >= min_len {
            runs.push(Run {
                start: s,
                end: bytes.len(),
            });
        }
    }

    runs
}

/// Looks for a stop word as a standalone alphabetic token in `sample`.
fn contains_stop_word(sample: &[u8]) -> bool {
    sample
        .split(|b| !b.is_ascii_alphabetic())
        .filter(|token| (3..=5).contains(&token.len()))
        .any(|token| {
            let lower = token.to_ascii_lowercase();
            STOP_WORDS.iter().any(|w| w.as_bytes() == lower.as_slice())
        })
}

fn is_pdf_syntax(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    PDF_SYNTAX_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;

    fn run(bytes: &[u8], config: &ExtractionConfig) -> Option<String> {
        scan(&ScanInput { bytes, config }).map(|r| r.text)
    }

    #[test]
    fn test_prose_is_recovered() {
        let config = ExtractionConfig::default();
        let text = run(b"\x00\x01Worked with the platform team\xff\xfe", &config).unwrap();
        assert_eq!(text, "Worked with platform team");
    }

    #[test]
    fn test_pdf_syntax_without_stop_words_rejected() {
        let config = ExtractionConfig::default();
        let bytes = b"1 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj stream endstream";
        assert_eq!(run(bytes, &config), None);
    }

    #[test]
    fn test_stop_word_must_be_standalone() {
        let config = ExtractionConfig::default();
        // "theory" and "android" contain stop words but are not stop words.
        assert_eq!(run(b"theory android mountain", &config), None);
    }

    #[test]
    fn test_stop_word_outside_sample_is_ignored() {
        let config = ExtractionConfig {
            word_sample_size: 2,
            ..ExtractionConfig::default()
        };
        assert_eq!(run(b"alpha beta gamma with delta", &config), None);
        let wide = ExtractionConfig::default();
        assert!(run(b"alpha beta gamma with delta", &wide).is_some());
    }

    #[test]
    fn test_syntax_words_and_numbers_dropped_from_output() {
        let config = ExtractionConfig::default();
        let text = run(b"stream Managed with budgets 12345 endstream", &config).unwrap();
        assert_eq!(text, "Managed with budgets");
    }

    #[test]
    fn test_runs_respect_min_length() {
        let runs = alphanumeric_runs(b"ab abcd abcdef", 4);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (3, 7));
    }
}
