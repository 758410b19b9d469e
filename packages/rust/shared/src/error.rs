//! Error types for QuizForge.
//!
//! Library crates use [`QuizForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all QuizForge operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed input (bad URL, empty record field). Never retried.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// All fetch attempts for a URL failed.
    #[error("fetch exhausted for {url} after {attempts} attempts: {last_error}")]
    FetchExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    /// Fetch succeeded but yielded nothing usable.
    #[error("no content extracted from {url}")]
    EmptyContent { url: String },

    /// Stored intermediate content could not be read back.
    #[error("retrieval failed for key '{key}': {message}")]
    RetrievalFailed { key: String, message: String },

    /// The quiz generator returned an error or empty output.
    #[error("quiz generation failed: {0}")]
    GenerationFailed(String),

    /// Blob store or ledger read/write error.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// Network/HTTP error during a single fetch attempt.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuizForgeError>;

impl QuizForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Create a retrieval error for a storage key.
    pub fn retrieval(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::RetrievalFailed {
            key: key.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
