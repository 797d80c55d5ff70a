//! Error types for calcdesk.

use crate::calculator::EvalError;

/// Errors surfaced by the storage, remote and clipboard layers.
///
/// Evaluation failures never reach callers of `Calculator::dispatch`; they
/// are kept here so the lower-level evaluator can be used on its own.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("remote store is not configured")]
    RemoteUnavailable,

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
