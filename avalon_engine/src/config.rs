//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Pass-through settings for decision agents. The engine never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    pub model: String,
    pub reasoning_effort: String,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            model: "gpt-5.1".to_string(),
            reasoning_effort: "low".to_string(),
        }
    }
}

/// Configuration for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Statements per seat in each mission's discussion.
    pub discussion_rounds: usize,

    /// Statements per evil seat before the assassination.
    pub evil_discussion_rounds: usize,

    pub tuning: AgentTuning,

    /// Seed for every random choice the engine makes. Drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            discussion_rounds: 1,
            evil_discussion_rounds: 1,
            tuning: AgentTuning::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from TOML; omitted keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
