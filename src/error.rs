// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Document parsing error in {file}: {message}")]
    DocumentParse { file: String, message: String },

    #[error("Malformed document {file}: {reason}")]
    MalformedDocument { file: String, reason: String },

    #[error("Template error in {file}: {message}")]
    Template { file: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Errors scoped to a single structured document; the batch continues past these.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            PipelineError::DocumentParse { .. }
                | PipelineError::MalformedDocument { .. }
                | PipelineError::FileOperation { .. }
        )
    }
}
