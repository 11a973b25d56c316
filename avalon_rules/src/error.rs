//! Configuration errors raised before any game starts.

use thiserror::Error;

use crate::entities::Role;

/// Errors in a player count or role catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unsupported player count {0} (expected 5-10)")]
    UnsupportedPlayerCount(usize),

    #[error("catalog declares {roles} roles for {players} players")]
    RoleCountMismatch { players: usize, roles: usize },

    #[error("catalog declares {names} seat names for {players} players")]
    NameCountMismatch { players: usize, names: usize },

    #[error("seating does not use the catalog's role set")]
    RoleSetMismatch,

    #[error("seat name '{0}' appears more than once")]
    DuplicateSeatName(String),

    #[error("invalid team size table: {0}")]
    TeamSizeTable(String),

    #[error("catalog must contain exactly one merlin, found {0}")]
    MissingMerlin(usize),

    #[error("role {0} may appear at most once")]
    DuplicateRole(Role),

    #[error("assassin role {role} is invalid: {reason}")]
    AssassinRole { role: Role, reason: String },

    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

/// Convenience Result type for rule operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
