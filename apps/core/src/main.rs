use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_core::config::{Config, CoreConfig};
use resume_core::errors::CoreError;
use resume_core::extraction::extract_document;
use resume_core::models::{sort_by_severity, ExtractedText, RawDocument, ScoreBreakdown, ScoreProvenance};
use resume_core::response::{extract_issues, extract_score_map, IssueFallback};
use resume_core::scoring::{normalize_scores_with_provenance, ScoreInput};

#[derive(Parser, Debug)]
#[command(name = "resume-core")]
#[command(about = "Recover resume text, feedback issues and scores from untrusted input")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract readable text from one or more documents
    Extract {
        /// Documents to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse a saved model response into issues
    Issues {
        /// File holding the raw model response
        response: PathBuf,
        /// Return a placeholder issue instead of an empty list on failure
        #[arg(long)]
        sentinel: bool,
    },
    /// Normalize the scores in a saved model response
    Scores {
        /// File holding the raw model response
        response: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    #[serde(flatten)]
    extracted: ExtractedText,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    scores: ScoreBreakdown,
    provenance: ScoreProvenance,
    low_confidence: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("resume-core v{}", env!("CARGO_PKG_VERSION"));

    let output = match cli.command {
        Commands::Extract { files } => {
            serde_json::to_string_pretty(&extract_files(files, &config.core).await?)?
        }
        Commands::Issues { response, sentinel } => {
            let text = read_text(&response).await?;
            let fallback = if sentinel {
                IssueFallback::Sentinel
            } else {
                IssueFallback::Empty
            };
            let mut issues = extract_issues(&text, fallback, &config.core.response);
            sort_by_severity(&mut issues);
            serde_json::to_string_pretty(&issues)?
        }
        Commands::Scores { response } => {
            let text = read_text(&response).await?;
            serde_json::to_string_pretty(&score_report(&text, &config.core))?
        }
    };

    println!("{output}");
    Ok(())
}

/// Scans every file on the blocking pool at once; results keep input order.
async fn extract_files(files: Vec<PathBuf>, config: &CoreConfig) -> Result<Vec<FileReport>, CoreError> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let config = config.extraction.clone();
            tokio::spawn(async move {
                let bytes = read_bytes(&path).await?;
                let document = RawDocument::new(bytes);
                let extracted =
                    tokio::task::spawn_blocking(move || extract_document(&document, &config))
                        .await?;
                if !extracted.is_recovered() {
                    warn!(path = %path.display(), "no text recovered");
                }
                Ok::<_, CoreError>(FileReport { path, extracted })
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await??);
    }
    Ok(reports)
}

fn score_report(text: &str, config: &CoreConfig) -> ScoreReport {
    let categories = &config.scoring.categories;
    let map = extract_score_map(text, &config.response);
    let input = match &map {
        Some(map) => ScoreInput::Map(map),
        None => ScoreInput::Text(text),
    };
    let (scores, provenance) =
        normalize_scores_with_provenance(input, categories, &config.scoring, &mut rand::thread_rng());

    ScoreReport {
        scores,
        provenance,
        low_confidence: provenance.is_low_confidence(),
    }
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>, CoreError> {
    tokio::fs::read(path).await.map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_text(path: &Path) -> Result<String, CoreError> {
    let bytes = read_bytes(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
