use std::time::Duration;

use async_trait::async_trait;
use engine::{Game, Move};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::AiConfig;
use crate::context::SearchContext;
use crate::error::{AiError, AiResult};
use crate::strategy::MoveSelector;
use crate::types::Difficulty;

/// Picks a legal move uniformly at random after a randomized delay.
#[derive(Debug)]
pub struct RandomStrategy<R: Rng + Send = StdRng> {
    difficulty: Difficulty,
    think_ms: u64,
    rng: R,
}

impl RandomStrategy<StdRng> {
    /// Strategy seeded from the operating system.
    pub fn new(difficulty: Difficulty, config: &AiConfig) -> Self {
        Self::with_rng(difficulty, config, StdRng::from_os_rng())
    }

    pub fn seeded(difficulty: Difficulty, config: &AiConfig, seed: u64) -> Self {
        Self::with_rng(difficulty, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> RandomStrategy<R> {
    pub fn with_rng(difficulty: Difficulty, config: &AiConfig, rng: R) -> Self {
        Self {
            difficulty,
            think_ms: config.random_think_ms,
            rng,
        }
    }

    /// Uniform pick from `moves` without any delay.
    pub(crate) fn pick(&mut self, moves: &[Move]) -> AiResult<Move> {
        if moves.is_empty() {
            return Err(AiError::NoLegalMoves);
        }
        Ok(moves[self.rng.random_range(0..moves.len())])
    }

    fn think_time(&mut self) -> Duration {
        let max = self.think_ms.saturating_mul(u64::from(self.difficulty.think_scale()));
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.rng.random_range(0..=max))
    }
}

#[async_trait]
impl<R: Rng + Send> MoveSelector for RandomStrategy<R> {
    async fn best_move(&mut self, ctx: &SearchContext, game: &Game) -> AiResult<Move> {
        let moves = game.all_legal_moves();
        if moves.is_empty() {
            return Err(AiError::NoLegalMoves);
        }

        let delay = self.think_time();
        debug!(delay_ms = delay.as_millis() as u64, candidates = moves.len(), "random strategy thinking");
        ctx.sleep(delay).await?;

        self.pick(&moves)
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}
