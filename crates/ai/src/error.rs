//! Error types for move selection

use engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("move selection cancelled")]
    Cancelled,

    #[error("move selection deadline exceeded")]
    DeadlineExceeded,

    /// The external oracle failed or answered with nothing usable
    #[error("oracle error: {0}")]
    Oracle(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl AiError {
    /// Cancellation or deadline, as opposed to a hard failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AiError::Cancelled | AiError::DeadlineExceeded)
    }
}

/// Result type alias for move selection
pub type AiResult<T> = Result<T, AiError>;
