//! Game records - a serializable snapshot sufficient to audit a played game.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::RoleCatalog;
use crate::entities::{Alignment, Seat, SeatName};
use crate::mission::{Mission, MissionResult, Statement};

/// Unique identifier for games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    /// Create a game ID from a random source, so seeded games get stable IDs.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }

    /// Create a nil/empty game ID.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "avalon_{}", self.0.simple())
    }
}

/// Settings a game was played with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedConfig {
    pub model: String,
    pub reasoning_effort: String,
    pub team_sizes: Vec<usize>,
    pub discussion_rounds: usize,
    pub evil_discussion_rounds: usize,
    pub player_count: usize,
    pub seed: u64,
}

/// The post-game identification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssassinPhaseRecord {
    pub assassin: SeatName,
    pub evil_discussion: Vec<Statement>,
    pub guess: SeatName,
    pub rationale: String,
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Final scores and winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub good_successes: usize,
    pub evil_fails: usize,
    pub winner: Alignment,
    pub assassin_phase: Option<AssassinPhaseRecord>,
}

/// Everything needed to reconstruct a played game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: GameId,
    pub config: RecordedConfig,
    pub catalog: RoleCatalog,
    pub seats: Vec<Seat>,
    pub missions: Vec<Mission>,
    pub outcome: GameOutcome,
}

impl GameRecord {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn winner(&self) -> Alignment {
        self.outcome.winner
    }

    /// Seat by name.
    pub fn seat(&self, name: &SeatName) -> Option<&Seat> {
        self.seats.iter().find(|s| &s.name == name)
    }

    /// Did the given seat end up on the winning side.
    pub fn seat_won(&self, name: &SeatName) -> Option<bool> {
        self.seat(name).map(|s| s.alignment == self.outcome.winner)
    }

    /// Mission results in play order.
    pub fn results(&self) -> Vec<MissionResult> {
        self.missions.iter().map(|m| m.result).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_record() -> GameRecord {
        let catalog = RoleCatalog::standard(5).unwrap();
        GameRecord {
            game_id: GameId::nil(),
            config: RecordedConfig {
                model: "test-model".to_string(),
                reasoning_effort: "low".to_string(),
                team_sizes: catalog.team_sizes.clone(),
                discussion_rounds: 1,
                evil_discussion_rounds: 2,
                player_count: 5,
                seed: 9,
            },
            seats: vec![
                Seat::new("Alice", Role::Merlin),
                Seat::new("Eve", Role::Assassin),
            ],
            catalog,
            missions: Vec::new(),
            outcome: GameOutcome {
                good_successes: 3,
                evil_fails: 0,
                winner: Alignment::Good,
                assassin_phase: None,
            },
        }
    }

    #[test]
    fn test_game_id_is_seeded() {
        let a = GameId::from_rng(&mut ChaCha8Rng::seed_from_u64(5));
        let b = GameId::from_rng(&mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
        assert!(a.to_string().starts_with("avalon_"));
    }

    #[test]
    fn test_record_json_shape() {
        let record = sample_record();
        let json = record.to_json_pretty().unwrap();
        assert!(json.contains("\"winner\": \"good\""));
        assert!(json.contains("\"role\": \"assassin\""));
        assert!(json.contains("\"evil_discussion_rounds\": 2"));
        assert_eq!(GameRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_seat_won() {
        let record = sample_record();
        assert_eq!(record.seat_won(&SeatName::from("Alice")), Some(true));
        assert_eq!(record.seat_won(&SeatName::from("Eve")), Some(false));
        assert_eq!(record.seat_won(&SeatName::from("Zed")), None);
    }
}
