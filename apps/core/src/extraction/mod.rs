//! Best-effort text recovery from raw document bytes without a format parser.
//!
//! Strategies run in order and the first whose output is longer than
//! `ExtractionConfig::min_text_len` wins:
//! 1. `text_show`: strings shown inside `BT ... ET` text objects
//! 2. `paren_scan`: parenthesized runs anywhere, three increasingly permissive patterns
//! 3. `word_heuristic`: bare alphanumeric runs, gated on English stop words
//!
//! When all of them fall short the result carries `NO_TEXT_SENTINEL`.

pub mod filter;
pub mod literal;
pub mod metadata;
pub mod paren_scan;
pub mod text_show;
pub mod word_heuristic;

use tracing::{debug, info, warn};

use crate::chain::{first_success, Strategy};
use crate::config::ExtractionConfig;
use crate::models::{ExtractedText, ExtractionMethod, RawDocument};

/// What every strategy sees: the whole buffer plus the active configuration.
pub struct ScanInput<'a> {
    pub bytes: &'a [u8],
    pub config: &'a ExtractionConfig,
}

/// Output of a single strategy, before the length threshold is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub method: ExtractionMethod,
    pub text: String,
}

/// The fallback chain, in priority order.
pub fn strategies<'a>() -> [Strategy<ScanInput<'a>, Recovered>; 5] {
    [
        Strategy::new("text_show", text_show::scan),
        Strategy::new("paren_strict", paren_scan::strict),
        Strategy::new("paren_plain", paren_scan::plain),
        Strategy::new("paren_escaped", paren_scan::escaped),
        Strategy::new("bare_words", word_heuristic::scan),
    ]
}

/// Recovers readable text from `bytes`. Never fails: when nothing usable is
/// found the returned text is the documented sentinel and `method` is `None`.
pub fn extract_text(bytes: &[u8], config: &ExtractionConfig) -> ExtractedText {
    let metadata = metadata::scan_metadata(bytes);

    if bytes.len() < config.min_input_len {
        debug!(len = bytes.len(), "input too short to scan");
        return ExtractedText::unrecoverable(metadata);
    }

    let input = ScanInput { bytes, config };
    let recovered = first_success(&input, &strategies(), |name, recovered| {
        let chars = recovered.text.chars().count();
        if chars > config.min_text_len {
            Some(recovered)
        } else {
            debug!(
                strategy = name,
                chars,
                threshold = config.min_text_len,
                "partial extraction, trying next strategy"
            );
            None
        }
    });

    match recovered {
        Some(Recovered { method, text }) => {
            if method != ExtractionMethod::Primary {
                info!(?method, chars = text.chars().count(), "text recovered by fallback strategy");
            }
            ExtractedText {
                text,
                method,
                metadata,
            }
        }
        None => {
            warn!(
                len = bytes.len(),
                "no strategy recovered text; document is likely image-based or secured"
            );
            ExtractedText::unrecoverable(metadata)
        }
    }
}

pub fn extract_document(document: &RawDocument, config: &ExtractionConfig) -> ExtractedText {
    debug!(hint = ?document.hint, len = document.bytes.len(), "extracting document");
    extract_text(&document.bytes, config)
}
