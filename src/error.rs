use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum CtxsyncError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Server returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server rejected {path} as too large ({bytes} bytes) even when sent alone")]
    PayloadTooLarge { path: String, bytes: usize },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
impl CtxsyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CtxsyncError::Io {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        CtxsyncError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}
