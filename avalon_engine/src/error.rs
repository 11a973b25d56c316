//! Engine and decision errors.

use avalon_rules::ConfigurationError;
use thiserror::Error;

use crate::agent::PhaseKind;

/// A decision agent could not produce a usable decision. Always recovered by a
/// fallback decision; never ends a game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("decision agent unavailable: {0}")]
    Unavailable(String),

    #[error("unparseable {phase} decision: {reason}")]
    Unparseable { phase: PhaseKind, reason: String },
}

/// Errors that stop a game.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("invalid engine config: {0}")]
    Config(String),

    /// An internal defect, never caused by agent input.
    #[error("engine invariant violated: {0}")]
    Invariant(String),
}

/// Convenience Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
