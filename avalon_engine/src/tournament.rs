//! Tournament - a series of games sharing one agent and the players' memories.
//!
//! After each game, every memory-enabled seat reflects on it with all roles
//! revealed. The reflections feed the advisory context of later games.

use std::collections::BTreeMap;

use avalon_rules::{Alignment, GameRecord, Role, RoleCatalog, SeatName};
use serde::{Deserialize, Serialize};

use crate::agent::{DecisionAgent, DecisionRequest, ReflectionDecision};
use crate::config::EngineConfig;
use crate::context_assembler::ContextAssembler;
use crate::controller::{GameController, FALLBACK_REFLECTION};
use crate::error::{EngineError, Result};
use crate::memory::{GameResult, MemoryBook, Reflection};

/// One played game of a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentGame {
    /// 1-based.
    pub game_number: usize,
    pub record: GameRecord,
    pub reflections: Vec<Reflection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStats {
    pub games: usize,
    pub wins: usize,
    pub roles: BTreeMap<Role, usize>,
}

/// Aggregate results over the games played so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub games: usize,
    pub good_wins: usize,
    pub evil_wins: usize,
    pub assassin_attempts: usize,
    pub assassin_hits: usize,
    pub seats: BTreeMap<SeatName, SeatStats>,
}

impl TournamentSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a GameRecord>) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.record(record);
        }
        summary
    }

    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        match record.winner() {
            Alignment::Good => self.good_wins += 1,
            Alignment::Evil => self.evil_wins += 1,
        }
        if let Some(phase) = &record.outcome.assassin_phase {
            self.assassin_attempts += 1;
            if phase.correct {
                self.assassin_hits += 1;
            }
        }
        for seat in &record.seats {
            let stats = self.seats.entry(seat.name.clone()).or_default();
            stats.games += 1;
            if seat.alignment == record.winner() {
                stats.wins += 1;
            }
            *stats.roles.entry(seat.role).or_default() += 1;
        }
    }

    /// Fraction of assassin phases that found Merlin.
    pub fn assassin_success_rate(&self) -> Option<f64> {
        if self.assassin_attempts == 0 {
            None
        } else {
            Some(self.assassin_hits as f64 / self.assassin_attempts as f64)
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

impl std::fmt::Display for TournamentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total games: {}", self.games)?;
        writeln!(
            f,
            "Good wins: {} ({:.1}%)",
            self.good_wins,
            percent(self.good_wins, self.games)
        )?;
        writeln!(
            f,
            "Evil wins: {} ({:.1}%)",
            self.evil_wins,
            percent(self.evil_wins, self.games)
        )?;
        if self.assassin_attempts > 0 {
            writeln!(
                f,
                "Assassin success: {}/{} ({:.1}%)",
                self.assassin_hits,
                self.assassin_attempts,
                percent(self.assassin_hits, self.assassin_attempts)
            )?;
        }
        for (name, stats) in &self.seats {
            let roles: Vec<String> = stats
                .roles
                .iter()
                .map(|(role, count)| format!("{}({})", role, count))
                .collect();
            writeln!(
                f,
                "{}: {}/{} won ({:.1}%), roles {}",
                name,
                stats.wins,
                stats.games,
                percent(stats.wins, stats.games),
                roles.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Everything a finished tournament produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub games: Vec<TournamentGame>,
    pub memory: MemoryBook,
    pub summary: TournamentSummary,
}

/// Plays `games` games of one catalog with a shared agent.
pub struct Tournament<A: DecisionAgent> {
    catalog: RoleCatalog,
    config: EngineConfig,
    agent: A,
    games: usize,
    memory: MemoryBook,
}

impl<A: DecisionAgent> Tournament<A> {
    /// Memory-enabled players must be seat names of the catalog.
    pub fn new(
        catalog: RoleCatalog,
        config: EngineConfig,
        agent: A,
        games: usize,
        memory_players: Vec<SeatName>,
    ) -> Result<Self> {
        catalog.validate()?;
        if let Some(unknown) = memory_players.iter().find(|n| !catalog.names.contains(*n)) {
            return Err(EngineError::Config(format!(
                "memory player {} is not seated",
                unknown
            )));
        }
        Ok(Self {
            catalog,
            config,
            agent,
            games,
            memory: MemoryBook::new(memory_players),
        })
    }

    pub fn memory(&self) -> &MemoryBook {
        &self.memory
    }

    /// Play every game. Game `n` is seeded with the base seed plus `n`.
    pub fn run(&mut self) -> Result<TournamentReport> {
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let assembler = ContextAssembler::with_defaults();
        let mut games = Vec::with_capacity(self.games);
        let mut summary = TournamentSummary::default();

        for game_number in 1..=self.games {
            let config = self
                .config
                .clone()
                .with_seed(base_seed.wrapping_add(game_number as u64));
            let record = GameController::new(self.catalog.clone(), config, &mut self.agent)?
                .with_enrichment(Box::new(self.memory.clone()))
                .play()?;
            summary.record(&record);

            let reflections = self.reflect(&assembler, &record, game_number);
            for reflection in &reflections {
                self.memory.record(reflection.clone());
            }

            tracing::info!(
                game = game_number,
                of = self.games,
                winner = %record.winner(),
                reflections = reflections.len(),
                "tournament game finished"
            );
            games.push(TournamentGame {
                game_number,
                record,
                reflections,
            });
        }

        Ok(TournamentReport {
            games,
            memory: self.memory.clone(),
            summary,
        })
    }

    fn reflect(
        &mut self,
        assembler: &ContextAssembler,
        record: &GameRecord,
        game_number: usize,
    ) -> Vec<Reflection> {
        let mut reflections = Vec::new();
        for seat in &record.seats {
            if !self.memory.is_enabled(&seat.name) {
                continue;
            }
            let request =
                DecisionRequest::new(assembler.reflection_context(record, seat, game_number));
            let decision = match self.agent.reflect(&request) {
                Ok(decision) => decision,
                Err(e) => {
                    tracing::warn!(seat = %seat.name, error = %e, "reflection fallback");
                    ReflectionDecision {
                        self_assessment: FALLBACK_REFLECTION.to_string(),
                        observations: BTreeMap::new(),
                    }
                }
            };
            reflections.push(Reflection {
                game_number,
                player: seat.name.clone(),
                role_played: seat.role,
                result: GameResult::from_won(seat.alignment == record.winner()),
                self_assessment: decision.self_assessment,
                observations: decision.observations,
            });
        }
        reflections
    }
}
