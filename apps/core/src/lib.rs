//! Best-effort recovery of resume text, model feedback and scores from
//! untrusted input. Every public entry point returns a usable value; failures
//! are logged through `tracing` and replaced by documented defaults.

pub mod chain;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod response;
pub mod scoring;

pub use config::{CoreConfig, ExtractionConfig, ResponseConfig, ScoringConfig};
pub use extraction::{extract_document, extract_text};
pub use models::{
    ExtractedText, ExtractionMethod, Issue, RawDocument, ScoreBreakdown, ScoreProvenance, Severity,
};
pub use response::{extract_structured, ExpectedShape, IssueFallback, ParsedValue};
pub use scoring::{
    normalize_scores, normalize_scores_with_provenance, normalize_scores_with_rng, ScoreInput,
};
