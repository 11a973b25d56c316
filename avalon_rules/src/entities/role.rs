//! Role definitions.

use serde::{Deserialize, Serialize};

use super::Alignment;

/// Every role a seat can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every evil seat except Mordred.
    Merlin,
    /// Sees Merlin, and Morgana disguised as a second Merlin.
    Percival,
    /// Loyal servant without special knowledge.
    Good,
    /// Minion of Mordred.
    Evil,
    /// Dedicated assassin.
    Assassin,
    /// Appears as Merlin to Percival.
    Morgana,
    /// Invisible to Merlin.
    Mordred,
    /// Isolated from the rest of evil in both directions.
    Oberon,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Merlin,
        Role::Percival,
        Role::Good,
        Role::Evil,
        Role::Assassin,
        Role::Morgana,
        Role::Mordred,
        Role::Oberon,
    ];

    /// Alignment derived from the role.
    pub fn alignment(self) -> Alignment {
        match self {
            Role::Merlin | Role::Percival | Role::Good => Alignment::Good,
            Role::Evil | Role::Assassin | Role::Morgana | Role::Mordred | Role::Oberon => {
                Alignment::Evil
            }
        }
    }

    pub fn is_evil(self) -> bool {
        self.alignment() == Alignment::Evil
    }

    /// Lowercase identifier used in records and catalogs.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Merlin => "merlin",
            Role::Percival => "percival",
            Role::Good => "good",
            Role::Evil => "evil",
            Role::Assassin => "assassin",
            Role::Morgana => "morgana",
            Role::Mordred => "mordred",
            Role::Oberon => "oberon",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_alignment() {
        let good: Vec<_> = Role::ALL.iter().filter(|r| !r.is_evil()).collect();
        assert_eq!(good, vec![&Role::Merlin, &Role::Percival, &Role::Good]);
        assert_eq!(Role::Oberon.alignment(), Alignment::Evil);
        assert_eq!(Role::Mordred.alignment(), Alignment::Evil);
    }

    #[test]
    fn test_role_serde_names() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
