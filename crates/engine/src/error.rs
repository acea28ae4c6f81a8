//! Error types for the rules engine
//!
//! Parse failures (move notation, FEN) are kept apart from rule violations so
//! callers can map them to different responses.

use thiserror::Error;

/// Malformed move notation, raised by `Game::parse_move`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid move notation '{notation}': expected 4 or 5 characters, got {len}")]
    WrongLength { notation: String, len: usize },

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("no piece on {square}")]
    NoPieceToMove { square: String },

    #[error("piece on {square} belongs to the side not on move")]
    WrongColor { square: String },

    #[error("invalid promotion piece '{0}': expected one of Q, R, B, N")]
    InvalidPromotion(char),

    #[error("promotion suffix given for a {piece} move")]
    UnexpectedPromotion { piece: String },

    #[error("king not in position for castling")]
    KingNotHome,
}

/// Malformed FEN input. Each variant names the field that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid FEN placement: expected 8 ranks, got {0}")]
    RankCount(usize),

    #[error("invalid FEN rank {rank}: expected 8 files, got {files}")]
    RankWidth { rank: u8, files: usize },

    #[error("invalid FEN piece character '{0}'")]
    InvalidPiece(char),

    #[error("invalid FEN active color '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid FEN castling field '{0}'")]
    InvalidCastling(String),

    #[error("invalid FEN en passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid FEN halfmove clock '{0}'")]
    InvalidHalfMoveClock(String),

    #[error("invalid FEN fullmove number '{0}'")]
    InvalidFullMoveNumber(String),
}

/// Errors surfaced by the rules engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Fen(#[from] FenError),

    /// Syntactically valid move that breaks the rules in this position
    #[error("illegal move: {notation}")]
    IllegalMove { notation: String },

    #[error("no moves to undo")]
    NothingToUndo,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
