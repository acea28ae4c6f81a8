use engine::{ChessLogger, Game, Move};

use crate::types::Difficulty;

/// Move-selection entries for the game record.
pub trait AILoggerExtensions {
    fn log_selection_start(&mut self, engine: &str, difficulty: Difficulty, candidates: usize);
    fn log_candidate_scores(&mut self, game: &Game, scored: &[(Move, i32)]);
    fn log_selection(&mut self, game: &Game, mv: &Move, score: Option<i32>);
    fn log_selection_failed(&mut self, reason: &str);
}

impl AILoggerExtensions for ChessLogger {
    fn log_selection_start(&mut self, engine: &str, difficulty: Difficulty, candidates: usize) {
        if self.should_log_advanced() {
            self.log_with_indent(&format!(
                "{} engine ({}) choosing among {} moves",
                engine, difficulty, candidates
            ));
        }
    }

    /// Only written when advanced logging is on.
    fn log_candidate_scores(&mut self, game: &Game, scored: &[(Move, i32)]) {
        if !self.should_log_advanced() {
            return;
        }
        self.increase_indent();
        for (index, (mv, score)) in scored.iter().enumerate() {
            self.log_with_indent(&format!(
                "{}/{}: {} ({}) -> {:+}",
                index + 1,
                scored.len(),
                game.san(mv),
                mv,
                score
            ));
        }
        self.decrease_indent();
    }

    fn log_selection(&mut self, game: &Game, mv: &Move, score: Option<i32>) {
        let san = game.san(mv);
        match score {
            Some(score) => self.log_with_indent(&format!("Selected {} ({}) score {:+}", san, mv, score)),
            None => self.log_with_indent(&format!("Selected {} ({})", san, mv)),
        }
    }

    fn log_selection_failed(&mut self, reason: &str) {
        self.log_with_indent(&format!("Move selection failed: {}", reason));
    }
}
