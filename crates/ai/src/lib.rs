pub mod config;
pub mod context;
pub mod error;
pub mod evaluation;
pub mod external;
pub mod heuristic;
pub mod logger_extensions;
pub mod random;
pub mod strategy;
pub mod types;

pub use config::AiConfig;
pub use context::{CancelHandle, SearchContext};
pub use error::{AiError, AiResult};
pub use evaluation::score_move;
pub use external::{ExternalStrategy, MoveOracle, PromptContext};
pub use heuristic::HeuristicStrategy;
pub use logger_extensions::AILoggerExtensions;
pub use random::RandomStrategy;
pub use strategy::{build_selector, MoveSelector};
pub use types::*;
