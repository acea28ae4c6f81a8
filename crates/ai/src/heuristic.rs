use std::time::Duration;

use async_trait::async_trait;
use engine::{Game, Move};
use tracing::debug;

use crate::config::AiConfig;
use crate::context::SearchContext;
use crate::error::{AiError, AiResult};
use crate::evaluation::score_move;
use crate::strategy::MoveSelector;
use crate::types::Difficulty;

/// One-ply greedy strategy.
///
/// Difficulty maps to a nominal depth that only scales the thinking delay;
/// candidates are always scored one ply deep.
#[derive(Debug, Clone)]
pub struct HeuristicStrategy {
    difficulty: Difficulty,
    ply_think_ms: u64,
}

impl HeuristicStrategy {
    pub fn new(difficulty: Difficulty, config: &AiConfig) -> Self {
        Self {
            difficulty,
            ply_think_ms: config.ply_think_ms,
        }
    }

    pub fn depth(&self) -> u32 {
        self.difficulty.depth()
    }

    fn think_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.depth()).saturating_mul(self.ply_think_ms))
    }
}

/// Score every candidate, polling `ctx` between them.
pub fn score_candidates(ctx: &SearchContext, game: &Game, moves: &[Move]) -> AiResult<Vec<(Move, i32)>> {
    let mut scored = Vec::with_capacity(moves.len());
    for mv in moves {
        ctx.check()?;
        scored.push((*mv, score_move(game, mv)));
    }
    Ok(scored)
}

/// Highest score wins; on ties the earliest candidate is kept.
pub fn select_best(scored: &[(Move, i32)]) -> Option<(Move, i32)> {
    let mut best: Option<(Move, i32)> = None;
    for &(mv, score) in scored {
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }
    best
}

#[async_trait]
impl MoveSelector for HeuristicStrategy {
    async fn best_move(&mut self, ctx: &SearchContext, game: &Game) -> AiResult<Move> {
        let mut moves = game.all_legal_moves();
        if moves.is_empty() {
            return Err(AiError::NoLegalMoves);
        }

        ctx.sleep(self.think_time()).await?;

        if game.is_in_check(game.active_color()) {
            moves.retain(|mv| game.is_legal_move(mv));
            if moves.is_empty() {
                return Err(AiError::NoLegalMoves);
            }
        }

        let scored = score_candidates(ctx, game, &moves)?;
        let (best, score) = select_best(&scored).ok_or(AiError::NoLegalMoves)?;
        debug!(mv = %best, score, candidates = scored.len(), depth = self.depth(), "heuristic move selected");
        Ok(best)
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}
