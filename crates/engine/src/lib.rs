pub mod board;
pub mod error;
pub mod game;
pub mod logger;
pub mod perft;
pub mod pgn;
pub mod types;

pub use board::Board;
pub use error::{EngineError, EngineResult, FenError, NotationError};
pub use game::{Game, STARTING_FEN};
pub use logger::ChessLogger;
pub use pgn::{to_pgn, PgnHeaders};
pub use types::*;
