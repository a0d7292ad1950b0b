//! Error types for the derg exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for derg export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O failure on an output file. Fatal for the current frame; carries
    /// the failing path so the caller can report it.
    #[error("I/O error writing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected configuration, detected before any processing begins.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An object could not produce a mesh this frame. Recoverable: the
    /// orchestrator skips the object and continues.
    #[error("Mesh evaluation failed: {0}")]
    MeshEvaluation(String),

    /// Failed to copy a referenced resource file.
    #[error("Reference copy error: {0}")]
    ReferenceCopy(String),

    /// Failed to parse JSON scene data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
