//! Cross-game memory - reflections written after each game and replayed as
//! advisory context in later games.

use std::collections::BTreeMap;

use avalon_rules::{Role, Seat, SeatName};
use serde::{Deserialize, Serialize};

use crate::agent::PhaseKind;
use crate::context_assembler::ContextEnrichment;

/// Self-assessments shown from the most recent games.
pub const RECENT_REFLECTIONS: usize = 3;

/// Notes shown per observed player.
pub const NOTES_PER_PLAYER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Won,
    Lost,
}

impl GameResult {
    pub fn from_won(won: bool) -> Self {
        if won {
            GameResult::Won
        } else {
            GameResult::Lost
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Won => write!(f, "won"),
            GameResult::Lost => write!(f, "lost"),
        }
    }
}

/// What one player took away from one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub game_number: usize,
    pub player: SeatName,
    pub role_played: Role,
    pub result: GameResult,
    pub self_assessment: String,
    pub observations: BTreeMap<SeatName, String>,
}

/// All reflections of one player, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMemory {
    pub player: SeatName,
    reflections: Vec<Reflection>,
}

impl PlayerMemory {
    pub fn new(player: impl Into<SeatName>) -> Self {
        Self {
            player: player.into(),
            reflections: Vec::new(),
        }
    }

    pub fn record(&mut self, reflection: Reflection) {
        self.reflections.push(reflection);
    }

    pub fn reflections(&self) -> &[Reflection] {
        &self.reflections
    }

    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }

    /// Memory rendered for a decision context; `None` before the first game.
    pub fn context_string(&self) -> Option<String> {
        if self.reflections.is_empty() {
            return None;
        }

        let mut context = String::from("## Memory From Previous Games\n");
        context.push_str(&format!(
            "You have played {} games before this one.\n\n",
            self.reflections.len()
        ));

        context.push_str("Your past performance:\n");
        let skip = self.reflections.len().saturating_sub(RECENT_REFLECTIONS);
        for reflection in &self.reflections[skip..] {
            context.push_str(&format!(
                "- Game {} (as {}, {}): {}\n",
                reflection.game_number,
                reflection.role_played,
                reflection.result,
                reflection.self_assessment
            ));
        }

        let mut notes: BTreeMap<&SeatName, Vec<String>> = BTreeMap::new();
        for reflection in &self.reflections {
            for (player, observation) in &reflection.observations {
                notes
                    .entry(player)
                    .or_default()
                    .push(format!("[Game {}] {}", reflection.game_number, observation));
            }
        }

        if !notes.is_empty() {
            context.push_str("\nYour observations about other players:\n");
            for (player, player_notes) in notes {
                context.push_str(&format!("- {}:\n", player));
                let skip = player_notes.len().saturating_sub(NOTES_PER_PLAYER);
                for note in &player_notes[skip..] {
                    context.push_str(&format!("  - {}\n", note));
                }
            }
        }

        Some(context)
    }
}

/// Memories of the memory-enabled seats, keyed by seat name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBook {
    memories: BTreeMap<SeatName, PlayerMemory>,
}

impl MemoryBook {
    pub fn new(players: impl IntoIterator<Item = SeatName>) -> Self {
        Self {
            memories: players
                .into_iter()
                .map(|name| (name.clone(), PlayerMemory::new(name)))
                .collect(),
        }
    }

    pub fn is_enabled(&self, player: &SeatName) -> bool {
        self.memories.contains_key(player)
    }

    pub fn players(&self) -> impl Iterator<Item = &SeatName> {
        self.memories.keys()
    }

    pub fn memory(&self, player: &SeatName) -> Option<&PlayerMemory> {
        self.memories.get(player)
    }

    /// Store a reflection. Returns false if the player has no memory.
    pub fn record(&mut self, reflection: Reflection) -> bool {
        match self.memories.get_mut(&reflection.player) {
            Some(memory) => {
                memory.record(reflection);
                true
            }
            None => false,
        }
    }
}

impl ContextEnrichment for MemoryBook {
    fn advisory(&self, seat: &Seat, phase: PhaseKind) -> Option<String> {
        match phase {
            PhaseKind::Reflection => None,
            _ => self.memory(&seat.name)?.context_string(),
        }
    }
}
