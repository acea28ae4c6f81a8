//! Adapter for externally backed move selection (for example an LLM).
//!
//! The provider itself lives behind [`MoveOracle`]; this module only builds
//! the prompt context from the game's read-only surface, interprets the reply
//! and falls back to [`RandomStrategy`] when the reply is unusable.

use std::sync::Arc;

use async_trait::async_trait;
use engine::{Color, Game, Move};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::context::SearchContext;
use crate::error::{AiError, AiResult};
use crate::random::RandomStrategy;
use crate::strategy::MoveSelector;
use crate::types::Difficulty;

/// Something that proposes a move as free text.
#[async_trait]
pub trait MoveOracle: Send + Sync {
    /// Implementations should honour `ctx` and return its errors unchanged.
    async fn propose(&self, ctx: &SearchContext, prompt: &PromptContext) -> AiResult<String>;
}

/// Position summary handed to an oracle.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub fen: String,
    pub board: String,
    pub active_color: Color,
    pub in_check: bool,
    pub legal_moves: Vec<String>,
    pub legal_san: Vec<String>,
    pub recent_moves: Vec<String>,
    pub difficulty: Difficulty,
    pub temperature: f32,
}

impl PromptContext {
    pub fn from_game(game: &Game, difficulty: Difficulty, history_window: usize) -> Self {
        let legal = game.all_legal_moves();
        let history = game.generate_san();
        let skip = history.len().saturating_sub(history_window);

        Self {
            fen: game.to_fen(),
            board: game.board().to_string(),
            active_color: game.active_color(),
            in_check: game.is_in_check(game.active_color()),
            legal_moves: legal.iter().map(|mv| mv.to_string()).collect(),
            legal_san: legal.iter().map(|mv| game.san(mv)).collect(),
            recent_moves: history.into_iter().skip(skip).collect(),
            difficulty,
            temperature: difficulty.temperature(),
        }
    }

    pub fn system_prompt(&self) -> String {
        let level = match self.difficulty {
            Difficulty::Beginner => "Play at a beginner level, occasionally making suboptimal moves.",
            Difficulty::Easy => "Play at an easy level with basic tactical awareness.",
            Difficulty::Medium => "Play at a medium level with good tactical and some strategic understanding.",
            Difficulty::Hard => "Play at a hard level with strong tactical and strategic play.",
            Difficulty::Expert => "Play at an expert level with excellent tactical and strategic understanding.",
        };
        format!(
            "You are a chess AI opponent. {}\n\
             Respond ONLY with one legal move in standard algebraic notation (e.g. e4, Nf3, O-O, exd5, e8=Q).\n\
             Do not add explanations. If you cannot decide, respond with \"random\".",
            level
        )
    }

    pub fn user_prompt(&self) -> String {
        let mut prompt = format!("Current chess position (FEN): {}\n\n{}\n", self.fen, self.board);
        if !self.recent_moves.is_empty() {
            prompt.push_str(&format!("Recent moves: {}\n", self.recent_moves.join(" ")));
        }
        let side = match self.active_color {
            Color::White => "White",
            Color::Black => "Black",
        };
        prompt.push_str(&format!("Active color: {}\n", side));
        if self.in_check {
            prompt.push_str("You are in check.\n");
        }
        prompt.push_str(&format!("Legal moves: {}\n\n", self.legal_san.join(" ")));
        prompt.push_str("Provide your move in algebraic notation:");
        prompt
    }
}

/// Strategy that asks a [`MoveOracle`] and falls back to random play.
pub struct ExternalStrategy {
    oracle: Arc<dyn MoveOracle>,
    difficulty: Difficulty,
    history_window: usize,
    fallback: RandomStrategy,
}

impl ExternalStrategy {
    pub fn new(oracle: Arc<dyn MoveOracle>, difficulty: Difficulty, config: &AiConfig) -> Self {
        Self {
            oracle,
            difficulty,
            history_window: config.history_window,
            fallback: RandomStrategy::new(difficulty, config),
        }
    }

    pub fn with_fallback(mut self, fallback: RandomStrategy) -> Self {
        self.fallback = fallback;
        self
    }
}

fn normalize_san(text: &str) -> String {
    text.trim_end_matches(['+', '#'])
        .replace('=', "")
        .replace('0', "O")
}

/// First token of `reply` that names a legal move, as coordinate notation,
/// a castling token or SAN.
pub fn parse_reply(reply: &str, game: &Game, legal: &[Move]) -> Option<Move> {
    let sans: Vec<String> = legal.iter().map(|mv| normalize_san(&game.san(mv))).collect();

    for line in reply.lines() {
        let line = line.trim();
        let line = line.strip_prefix("Best move:").unwrap_or(line);
        let line = line.strip_prefix("Move:").unwrap_or(line);

        for token in line.split_whitespace() {
            let token = token.trim_matches(|c: char| matches!(c, '"' | '\'' | '.' | ',' | '!' | '?' | '`'));
            if token.is_empty() {
                continue;
            }

            if let Ok(mv) = game.parse_move(token) {
                if game.is_legal_move(&mv) {
                    return Some(mv);
                }
            }

            let wanted = normalize_san(token);
            if let Some(index) = sans.iter().position(|san| *san == wanted) {
                return Some(legal[index]);
            }
        }
    }
    None
}

#[async_trait]
impl MoveSelector for ExternalStrategy {
    async fn best_move(&mut self, ctx: &SearchContext, game: &Game) -> AiResult<Move> {
        let legal = game.all_legal_moves();
        if legal.is_empty() {
            return Err(AiError::NoLegalMoves);
        }
        ctx.check()?;

        let prompt = PromptContext::from_game(game, self.difficulty, self.history_window);
        match self.oracle.propose(ctx, &prompt).await {
            Ok(reply) => match parse_reply(&reply, game, &legal) {
                Some(mv) => {
                    debug!(mv = %mv, "oracle move accepted");
                    return Ok(mv);
                }
                None => warn!(reply = %reply, "unusable oracle reply, falling back to random"),
            },
            Err(err) if err.is_timeout() => return Err(err),
            Err(err) => warn!(error = %err, "oracle failed, falling back to random"),
        }

        self.fallback.best_move(ctx, game).await
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.fallback.set_difficulty(difficulty);
    }
}
