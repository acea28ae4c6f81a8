use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::types::{GameStatus, Move};

/// Human-readable record of one game, written to disk when the game ends.
///
/// Entries are mirrored to `tracing` at debug level so a running service sees
/// the same events in its own log.
#[derive(Debug)]
pub struct ChessLogger {
    pub log_buffer: String,
    pub advanced_logging: bool,
    game_start_time: Instant,
    move_count: u32,
    indent_level: usize,
}

impl ChessLogger {
    pub fn new() -> Self {
        let mut logger = Self {
            log_buffer: String::with_capacity(64 * 1024),
            advanced_logging: false,
            game_start_time: Instant::now(),
            move_count: 0,
            indent_level: 0,
        };

        logger.log("=== Chess Game Log Started ===");
        logger.log(&format!("Date: {}", chrono::Local::now().format("%m/%d/%Y %H:%M:%S")));
        logger
    }

    pub fn should_log_advanced(&self) -> bool {
        self.advanced_logging
    }

    pub fn enable_advanced_logging(&mut self) {
        self.advanced_logging = true;
        self.log("Advanced logging enabled - candidate analysis active");
    }

    pub fn disable_advanced_logging(&mut self) {
        self.advanced_logging = false;
        self.log("Advanced logging disabled");
    }

    pub fn log(&mut self, message: &str) {
        tracing::debug!(target: "game_record", "{}", message);
        self.log_buffer.push_str(message);
        self.log_buffer.push('\n');
    }

    pub fn log_with_indent(&mut self, message: &str) {
        let indent = "  ".repeat(self.indent_level);
        self.log(&format!("{}{}", indent, message));
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Plies logged so far, counting undos back.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.game_start_time.elapsed().as_millis()
    }

    pub fn log_fen_load(&mut self, fen: &str) {
        self.move_count = 0;
        self.log(&format!("Position loaded: {}", fen));
    }

    pub fn log_human_move(&mut self, mv: &Move, san: &str, time_ms: u64) {
        self.move_count += 1;
        self.log(&format!("{}. {} [{}] (human - {}ms)", self.move_count, san, mv, time_ms));
    }

    pub fn log_ai_move(&mut self, mv: &Move, san: &str, time_ms: u64, eval: i32) {
        self.move_count += 1;
        self.log(&format!(
            "{}. {} [{}] (AI - {}ms) Eval: {:+}",
            self.move_count, san, mv, time_ms, eval
        ));
    }

    pub fn log_undo(&mut self, mv: &Move) {
        self.move_count = self.move_count.saturating_sub(1);
        self.log(&format!("UNDO: {}", mv));
    }

    pub fn log_result(&mut self, status: GameStatus) {
        self.log(&format!("Result: {} ({})", status.result_token(), status));
    }

    pub fn log_game_aborted(&mut self, reason: &str) {
        self.log(&format!("Game finished abruptly - {}", reason));
    }

    /// Write the buffer to `dir/<MM_DD_YYYY_HH_MM_SS>.txt`, creating `dir`.
    pub fn save_to_file(&mut self, dir: impl AsRef<Path>, reason: &str) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let now = chrono::Local::now();
        let path = dir.join(format!("{}.txt", now.format("%m_%d_%Y_%H_%M_%S")));

        self.log(&format!("Game ended: {} - saving log", reason));
        let mut file = File::create(&path)?;
        file.write_all(self.log_buffer.as_bytes())?;

        info!(path = %path.display(), "game log saved");
        Ok(path)
    }
}

impl Default for ChessLogger {
    fn default() -> Self {
        Self::new()
    }
}
