//! Move-selection configuration
//!
//! Values come from built-in defaults, optionally overlaid by a JSON document
//! or by `CHESS_AI_*` environment variables.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AiError, AiResult};
use crate::types::{Difficulty, EngineKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub engine: EngineKind,
    pub difficulty: Difficulty,
    /// Upper bound of the random strategy's delay, before difficulty scaling.
    pub random_think_ms: u64,
    /// Heuristic strategy delay per nominal ply.
    pub ply_think_ms: u64,
    /// Budget a caller should wrap each selection in.
    pub timeout_secs: u64,
    /// Number of recent SAN moves passed to an external oracle.
    pub history_window: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            difficulty: Difficulty::default(),
            random_think_ms: 1000,
            ply_think_ms: 500,
            timeout_secs: 30,
            history_window: 10,
        }
    }
}

impl AiConfig {
    /// Defaults with every artificial delay removed.
    pub fn instant() -> Self {
        Self {
            random_think_ms: 0,
            ply_think_ms: 0,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn from_json_str(json: &str) -> AiResult<Self> {
        serde_json::from_str(json).map_err(|e| AiError::Config(format!("invalid AI config JSON: {}", e)))
    }

    /// Read a JSON config file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded AI config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse AI config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read AI config, using defaults");
                Self::default()
            }
        }
    }

    /// Defaults overlaid with `CHESS_AI_*` environment variables.
    pub fn from_env() -> AiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> AiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        overlay(&lookup, "CHESS_AI_ENGINE", &mut config.engine)?;
        overlay(&lookup, "CHESS_AI_DIFFICULTY", &mut config.difficulty)?;
        overlay(&lookup, "CHESS_AI_RANDOM_THINK_MS", &mut config.random_think_ms)?;
        overlay(&lookup, "CHESS_AI_PLY_THINK_MS", &mut config.ply_think_ms)?;
        overlay(&lookup, "CHESS_AI_TIMEOUT_SECS", &mut config.timeout_secs)?;
        overlay(&lookup, "CHESS_AI_HISTORY_WINDOW", &mut config.history_window)?;
        Ok(config)
    }
}

fn overlay<F, T>(lookup: &F, key: &str, slot: &mut T) -> AiResult<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| AiError::Config(format!("invalid value '{}' for {}", raw, key)))?;
    }
    Ok(())
}
