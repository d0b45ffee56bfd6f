use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the offline binary. The extraction and scoring
/// functions themselves never return an error.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Why a single response candidate could not be turned into structured data.
/// Logged for diagnostics and then replaced by the caller's default.
#[derive(Debug, Error)]
pub enum StructuredParseError {
    #[error("No JSON candidate found")]
    NoCandidate,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected JSON shape: expected {0}")]
    UnexpectedShape(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_the_path() {
        let err = CoreError::Io {
            path: PathBuf::from("resume.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("resume.pdf"));
    }

    #[test]
    fn test_json_parse_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StructuredParseError = parse_err.into();
        assert!(matches!(err, StructuredParseError::Json(_)));
    }
}
