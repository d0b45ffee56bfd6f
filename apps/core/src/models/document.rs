use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Returned in place of document text when no strategy recovers anything usable.
pub const NO_TEXT_SENTINEL: &str =
    "No readable text could be recovered: this appears to be an image-based or secured document.";

/// PDF files must carry their header within the first 1024 bytes.
const MAGIC_WINDOW: usize = 1024;

/// Coarse format guess made from the leading bytes of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    Pdf,
    #[default]
    Unknown,
}

impl FormatHint {
    pub fn detect(bytes: &[u8]) -> Self {
        let window = &bytes[..bytes.len().min(MAGIC_WINDOW)];
        if window.windows(5).any(|w| w == b"%PDF-") {
            FormatHint::Pdf
        } else {
            FormatHint::Unknown
        }
    }
}

/// An uploaded document, held only for the duration of one extraction.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Bytes,
    pub hint: FormatHint,
}

impl RawDocument {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let hint = FormatHint::detect(&bytes);
        Self { bytes, hint }
    }
}

/// Which strategy in the fallback chain produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Primary,
    FallbackPattern,
    FallbackWordHeuristic,
    None,
}

/// Informational `/Title` and `/Author` values found in the raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Never empty: holds `NO_TEXT_SENTINEL` when `method` is `None`.
    pub text: String,
    pub method: ExtractionMethod,
    pub metadata: DocumentMetadata,
}

impl ExtractedText {
    pub fn unrecoverable(metadata: DocumentMetadata) -> Self {
        Self {
            text: NO_TEXT_SENTINEL.to_string(),
            method: ExtractionMethod::None,
            metadata,
        }
    }

    pub fn is_recovered(&self) -> bool {
        self.method != ExtractionMethod::None
    }
}
