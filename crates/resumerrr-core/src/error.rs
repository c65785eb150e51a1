use std::path::PathBuf;

use thiserror::Error;

/// Why a file could not be attached to the draft
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("Please upload a PDF file only")]
    NotPdf { path: PathBuf, content_type: String },

    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transport-level failures talking to the analysis backend.
///
/// Errors reported by the backend itself are not represented here; they parse
/// into a [`crate::analyzer::Reply::Failure`].
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {endpoint} was not valid JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}
