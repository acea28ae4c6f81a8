use std::fmt;
use std::str::FromStr;

use engine::PieceKind;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Playing strength requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Nominal search depth. Only scales the heuristic strategy's think time.
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Beginner | Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::Expert => 5,
        }
    }

    /// Multiplier applied to the random strategy's think time.
    pub fn think_scale(self) -> u32 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::Expert => 5,
        }
    }

    /// Sampling temperature handed to an external oracle.
    pub fn temperature(self) -> f32 {
        match self {
            Difficulty::Beginner => 1.2,
            Difficulty::Easy => 0.9,
            Difficulty::Medium => 0.7,
            Difficulty::Hard => 0.5,
            Difficulty::Expert => 0.3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(AiError::Config(format!("unknown difficulty '{}'", other))),
        }
    }
}

/// Which move-selection strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Random,
    #[default]
    #[serde(alias = "minimax")]
    Heuristic,
    #[serde(alias = "llm")]
    External,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::Random => "random",
            EngineKind::Heuristic => "heuristic",
            EngineKind::External => "external",
        };
        f.write_str(name)
    }
}

impl FromStr for EngineKind {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(EngineKind::Random),
            "heuristic" | "minimax" => Ok(EngineKind::Heuristic),
            "external" | "llm" => Ok(EngineKind::External),
            other => Err(AiError::Config(format!("unknown engine '{}'", other))),
        }
    }
}

/// Capture values used by the heuristic strategy.
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Queen => 900,
        PieceKind::Rook => 500,
        PieceKind::Bishop | PieceKind::Knight => 300,
        PieceKind::Pawn => 100,
        PieceKind::King => 0,
    }
}

/// Bonus for landing on d4, e4, d5 or e5.
pub const CENTER_BONUS: i32 = 30;

/// Bonus for moving a knight or bishop off its home rank early.
pub const DEVELOPMENT_BONUS: i32 = 20;

/// Development bonus applies while the full-move number is below this.
pub const OPENING_MOVE_LIMIT: u32 = 10;
