// src/error.rs
//! Error kinds raised by the ETL pipeline.
//!
//! Every kind here is recovered locally by the stage that raises it; callers
//! outside the pipeline mostly see logs and empty results, not these values.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raw dataset missing when the normalizer runs.
    #[error("source dataset not found: {}", .0.display())]
    SourceUnavailable(PathBuf),

    /// Non-success status or network error while fetching one result page.
    #[error("fetch failed for '{term}' page {page}: {reason}")]
    FetchFailure {
        term: String,
        page: u32,
        reason: String,
    },

    /// Markup that could not be turned into a record (one card or one selector).
    #[error("parse failure: {0}")]
    ParseFailure(String),

    /// Anything that went wrong while cleaning or filtering rows.
    #[error("transform failure: {0}")]
    TransformFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn fetch(term: &str, page: u32, reason: impl ToString) -> Self {
        Self::FetchFailure {
            term: term.to_string(),
            page,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_message() {
        let err = PipelineError::fetch("Data Analyst", 2, "HTTP error: 500");
        assert_eq!(
            err.to_string(),
            "fetch failed for 'Data Analyst' page 2: HTTP error: 500"
        );
    }

    #[test]
    fn test_source_unavailable_names_path() {
        let err = PipelineError::SourceUnavailable(PathBuf::from("data/raw.csv"));
        assert!(err.to_string().contains("data/raw.csv"));
    }
}
