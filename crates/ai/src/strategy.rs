use std::sync::Arc;

use async_trait::async_trait;
use engine::{Game, Move};
use tracing::{info, warn};

use crate::config::AiConfig;
use crate::context::SearchContext;
use crate::error::AiResult;
use crate::external::{ExternalStrategy, MoveOracle};
use crate::heuristic::HeuristicStrategy;
use crate::random::RandomStrategy;
use crate::types::{Difficulty, EngineKind};

/// A move-selection strategy.
///
/// Implementations read the game and never mutate it. Every call fails with
/// `AiError::NoLegalMoves` when the side to move has no move, and returns
/// `Cancelled`/`DeadlineExceeded` instead of a partial result when `ctx` expires.
#[async_trait]
pub trait MoveSelector: Send {
    async fn best_move(&mut self, ctx: &SearchContext, game: &Game) -> AiResult<Move>;

    fn difficulty(&self) -> Difficulty;

    fn set_difficulty(&mut self, difficulty: Difficulty);
}

/// Build the strategy for `kind`. `External` without an oracle degrades to `Random`.
pub fn build_selector(
    kind: EngineKind,
    difficulty: Difficulty,
    config: &AiConfig,
    oracle: Option<Arc<dyn MoveOracle>>,
) -> Box<dyn MoveSelector> {
    info!(engine = %kind, %difficulty, "building move selector");
    match kind {
        EngineKind::Random => Box::new(RandomStrategy::new(difficulty, config)),
        EngineKind::Heuristic => Box::new(HeuristicStrategy::new(difficulty, config)),
        EngineKind::External => match oracle {
            Some(oracle) => Box::new(ExternalStrategy::new(oracle, difficulty, config)),
            None => {
                warn!("external engine requested without an oracle, using random strategy");
                Box::new(RandomStrategy::new(difficulty, config))
            }
        },
    }
}
