//! Role catalogs: per-player-count role sets, seat names and team sizes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::{Role, SeatName};
use crate::error::{ConfigurationError, Result};
use crate::state::MAX_MISSIONS;

pub const MIN_PLAYERS: usize = 5;
pub const MAX_PLAYERS: usize = 10;

const SEAT_NAMES: [&str; MAX_PLAYERS] = [
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Iris", "Jack",
];

/// Static configuration for one player count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCatalog {
    pub player_count: usize,

    /// One entry per seat; duplicates such as several `good` are allowed.
    pub roles: Vec<Role>,

    /// Seat names in seat order. Defaults to the standard names when omitted.
    #[serde(default)]
    pub names: Vec<SeatName>,

    /// Team size for missions 1 through 5. Defaults to the standard table when omitted.
    #[serde(default)]
    pub team_sizes: Vec<usize>,

    /// Role whose holder makes the assassination guess. Some setups reuse an
    /// existing evil role instead of a dedicated assassin.
    #[serde(default = "default_assassin_role")]
    pub assassin_role: Role,
}

fn default_assassin_role() -> Role {
    Role::Assassin
}

/// Standard team sizes per mission for a player count.
pub fn standard_team_sizes(player_count: usize) -> Result<Vec<usize>> {
    let sizes = match player_count {
        5 => vec![2, 3, 2, 3, 3],
        6 => vec![2, 3, 4, 3, 4],
        7 => vec![2, 3, 3, 4, 4],
        8..=10 => vec![3, 4, 4, 5, 5],
        other => return Err(ConfigurationError::UnsupportedPlayerCount(other)),
    };
    Ok(sizes)
}

/// Standard seat names for a player count.
pub fn standard_names(player_count: usize) -> Vec<SeatName> {
    SEAT_NAMES
        .iter()
        .take(player_count)
        .map(|name| SeatName::from(*name))
        .collect()
}

impl RoleCatalog {
    /// The built-in catalog for 5 to 10 players.
    pub fn standard(player_count: usize) -> Result<Self> {
        use Role::*;

        let (roles, assassin_role) = match player_count {
            5 => (vec![Merlin, Good, Good, Assassin, Evil], Assassin),
            6 => (vec![Merlin, Percival, Good, Good, Morgana, Mordred], Mordred),
            7 => (
                vec![Merlin, Percival, Good, Good, Morgana, Mordred, Oberon],
                Morgana,
            ),
            8 => (
                vec![Merlin, Percival, Good, Good, Good, Morgana, Mordred, Assassin],
                Assassin,
            ),
            9 => (
                vec![
                    Merlin, Percival, Good, Good, Good, Good, Morgana, Mordred, Assassin,
                ],
                Assassin,
            ),
            10 => (
                vec![
                    Merlin, Percival, Good, Good, Good, Good, Morgana, Mordred, Oberon, Assassin,
                ],
                Assassin,
            ),
            other => return Err(ConfigurationError::UnsupportedPlayerCount(other)),
        };

        let catalog = Self {
            player_count,
            roles,
            names: standard_names(player_count),
            team_sizes: standard_team_sizes(player_count)?,
            assassin_role,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from TOML, filling omitted names and team sizes from the
    /// standard tables, then validate it.
    ///
    /// ```toml
    /// player_count = 6
    /// roles = ["merlin", "percival", "good", "good", "morgana", "assassin"]
    /// assassin_role = "assassin"
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut catalog: RoleCatalog =
            toml::from_str(source).map_err(|e| ConfigurationError::Parse(e.to_string()))?;

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&catalog.player_count) {
            return Err(ConfigurationError::UnsupportedPlayerCount(
                catalog.player_count,
            ));
        }
        if catalog.names.is_empty() {
            catalog.names = standard_names(catalog.player_count);
        }
        if catalog.team_sizes.is_empty() {
            catalog.team_sizes = standard_team_sizes(catalog.player_count)?;
        }

        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every structural rule of the catalog.
    pub fn validate(&self) -> Result<()> {
        let players = self.player_count;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigurationError::UnsupportedPlayerCount(players));
        }
        if self.roles.len() != players {
            return Err(ConfigurationError::RoleCountMismatch {
                players,
                roles: self.roles.len(),
            });
        }
        if self.names.len() != players {
            return Err(ConfigurationError::NameCountMismatch {
                players,
                names: self.names.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.names {
            if !seen.insert(name) {
                return Err(ConfigurationError::DuplicateSeatName(name.to_string()));
            }
        }

        if self.team_sizes.len() != MAX_MISSIONS {
            return Err(ConfigurationError::TeamSizeTable(format!(
                "expected {} entries, found {}",
                MAX_MISSIONS,
                self.team_sizes.len()
            )));
        }
        if let Some(size) = self
            .team_sizes
            .iter()
            .find(|size| **size == 0 || **size > players)
        {
            return Err(ConfigurationError::TeamSizeTable(format!(
                "team size {} does not fit {} players",
                size, players
            )));
        }

        let merlins = self.count_role(Role::Merlin);
        if merlins != 1 {
            return Err(ConfigurationError::MissingMerlin(merlins));
        }
        if let Some(role) = Role::ALL
            .into_iter()
            .filter(|role| !matches!(role, Role::Good | Role::Evil | Role::Merlin))
            .find(|role| self.count_role(*role) > 1)
        {
            return Err(ConfigurationError::DuplicateRole(role));
        }

        if !self.assassin_role.is_evil() {
            return Err(ConfigurationError::AssassinRole {
                role: self.assassin_role,
                reason: "role is not evil".to_string(),
            });
        }
        let holders = self.count_role(self.assassin_role);
        if holders != 1 {
            return Err(ConfigurationError::AssassinRole {
                role: self.assassin_role,
                reason: format!("held by {} seats, expected exactly one", holders),
            });
        }

        Ok(())
    }

    /// Team size for a 1-based mission number.
    pub fn team_size(&self, mission_number: usize) -> Option<usize> {
        mission_number
            .checked_sub(1)
            .and_then(|index| self.team_sizes.get(index))
            .copied()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.roles.iter().filter(|r| **r == role).count()
    }

    pub fn good_count(&self) -> usize {
        self.roles.iter().filter(|r| !r.is_evil()).count()
    }

    pub fn evil_count(&self) -> usize {
        self.player_count - self.good_count()
    }
}
