//! Entity definitions: seats, roles and alignments.

mod role;
mod seat;

pub use role::*;
pub use seat::*;

use serde::{Deserialize, Serialize};

/// Identity of a seat at the table. Seats are addressed by name everywhere,
/// including in decision-agent replies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatName(pub String);

impl SeatName {
    /// Create a seat name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SeatName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SeatName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for SeatName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Good,
    Evil,
}

impl Alignment {
    pub fn is_good(self) -> bool {
        self == Alignment::Good
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Good => write!(f, "good"),
            Alignment::Evil => write!(f, "evil"),
        }
    }
}

/// Join seat names with a separator, for logs and prompt text.
pub fn join_names(names: &[SeatName], separator: &str) -> String {
    names
        .iter()
        .map(SeatName::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
