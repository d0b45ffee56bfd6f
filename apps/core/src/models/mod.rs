pub mod document;
pub mod issue;
pub mod scores;

pub use document::{
    DocumentMetadata, ExtractedText, ExtractionMethod, FormatHint, RawDocument, NO_TEXT_SENTINEL,
};
pub use issue::{sort_by_severity, Issue, PositionHint, Severity};
pub use scores::{ScoreBreakdown, ScoreProvenance, SCORE_MAX, SCORE_MIN};
