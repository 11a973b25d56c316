//! Game controller - drives one game from role assignment to the final winner.
//!
//! Each mission runs discussion, the proposal/voting loop and the mission
//! itself. When good reaches three successes the assassin phase decides the
//! winner. Agent failures are replaced by fallbacks and never end a game.

mod assassin;
mod fallback;
mod proposal;

pub use fallback::*;
pub use proposal::*;

use avalon_rules::{
    decide_winner, DiscussionPhase, GameId, GameOutcome, GameRecord, GameState, GameStatus,
    KnowledgeView, Mission, MissionResolver, RecordedConfig, Role, RoleCatalog, Seat, Statement,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agent::{DecisionAgent, DecisionRequest};
use crate::config::EngineConfig;
use crate::context_assembler::{ContextAssembler, ContextEnrichment, History, PhaseDetails};
use crate::error::{EngineError, Result};

/// Plays games of a fixed catalog with one decision agent.
pub struct GameController<A: DecisionAgent> {
    catalog: RoleCatalog,
    config: EngineConfig,
    agent: A,
    assembler: ContextAssembler,
    seating: Option<Vec<Role>>,
    starting_leader: Option<usize>,
}

impl<A: DecisionAgent> GameController<A> {
    /// Create a controller. The catalog is validated before any game starts.
    pub fn new(catalog: RoleCatalog, config: EngineConfig, agent: A) -> Result<Self> {
        catalog.validate()?;
        Ok(Self {
            catalog,
            config,
            agent,
            assembler: ContextAssembler::with_defaults(),
            seating: None,
            starting_leader: None,
        })
    }

    /// Inject advisory text into every decision context.
    pub fn with_enrichment(mut self, enrichment: Box<dyn ContextEnrichment>) -> Self {
        self.assembler = ContextAssembler::new(enrichment);
        self
    }

    /// Seat roles in this order instead of shuffling them.
    pub fn with_seating(mut self, roles: Vec<Role>) -> Self {
        self.seating = Some(roles);
        self
    }

    /// Start with this table position as leader instead of a random one.
    pub fn with_starting_leader(mut self, leader: usize) -> Self {
        self.starting_leader = Some(leader);
        self
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn into_agent(self) -> A {
        self.agent
    }

    /// Play one complete game.
    pub fn play(&mut self) -> Result<GameRecord> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let view = match &self.seating {
            Some(roles) => KnowledgeView::with_seating(&self.catalog, roles)?,
            None => KnowledgeView::assign(&self.catalog, &mut rng)?,
        };
        let game_id = GameId::from_rng(&mut rng);
        let leader = match self.starting_leader {
            Some(leader) => leader,
            None => rng.gen_range(0..view.len()),
        };

        tracing::info!(
            game = %game_id,
            players = view.len(),
            seed,
            leader = %view.seat_at(leader % view.len()).map(|s| s.name.as_str()).unwrap_or("?"),
            "game started"
        );

        let mut session = Session {
            view: &view,
            catalog: &self.catalog,
            config: &self.config,
            assembler: &self.assembler,
            agent: &mut self.agent,
            rng: &mut rng,
            turn: 0,
        };

        let mut missions = Vec::new();
        let mut state = GameState::new(view.len(), leader);
        while !state.is_over() {
            let (mission, next) = session.play_mission(state, &missions)?;
            missions.push(mission);
            state = next;
        }

        let assassin_phase = match state.status() {
            GameStatus::AwaitingAssassination => {
                Some(session.assassin_phase(&state, &missions)?)
            }
            GameStatus::EvilVictory | GameStatus::InProgress => None,
        };
        let winner = decide_winner(&state, assassin_phase.as_ref().map(|phase| phase.correct));

        tracing::info!(
            game = %game_id,
            good = state.good_successes,
            evil = state.evil_fails,
            %winner,
            "game finished"
        );

        Ok(GameRecord {
            game_id,
            config: RecordedConfig {
                model: self.config.tuning.model.clone(),
                reasoning_effort: self.config.tuning.reasoning_effort.clone(),
                team_sizes: self.catalog.team_sizes.clone(),
                discussion_rounds: self.config.discussion_rounds,
                evil_discussion_rounds: self.config.evil_discussion_rounds,
                player_count: view.len(),
                seed,
            },
            catalog: self.catalog.clone(),
            seats: view.seats().to_vec(),
            missions,
            outcome: GameOutcome {
                good_successes: state.good_successes,
                evil_fails: state.evil_fails,
                winner,
                assassin_phase,
            },
        })
    }
}

/// Borrowed state of one game in progress.
struct Session<'g, A> {
    view: &'g KnowledgeView,
    catalog: &'g RoleCatalog,
    config: &'g EngineConfig,
    assembler: &'g ContextAssembler,
    agent: &'g mut A,
    rng: &'g mut ChaCha8Rng,
    /// Game-wide statement counter.
    turn: usize,
}

impl<'g, A: DecisionAgent> Session<'g, A> {
    fn request(
        &self,
        seat: &Seat,
        history: &History<'_>,
        details: PhaseDetails,
    ) -> DecisionRequest {
        DecisionRequest::new(self.assembler.assemble(self.view, seat, history, details))
    }

    fn seat_at(&self, index: usize) -> Result<&'g Seat> {
        self.view
            .seat_at(index)
            .ok_or_else(|| EngineError::Invariant(format!("no seat at position {}", index)))
    }

    fn next_statement(
        &mut self,
        seat: &Seat,
        content: String,
        phase: DiscussionPhase,
    ) -> Statement {
        let statement = Statement {
            speaker: seat.name.clone(),
            content,
            turn: self.turn,
            phase,
        };
        self.turn += 1;
        tracing::debug!(
            turn = statement.turn,
            speaker = %statement.speaker,
            content = %statement.content,
            "statement"
        );
        statement
    }

    /// Public discussion before a mission's first proposal, in seat order.
    fn discussion(&mut self, base: History<'_>) -> Vec<Statement> {
        let mut statements = Vec::new();
        for _ in 0..self.config.discussion_rounds {
            for seat in self.view.seats() {
                let history = History {
                    discussion: &statements,
                    ..base
                };
                let request = self.request(seat, &history, PhaseDetails::Discussion);
                let content = match self.agent.speak(&request) {
                    Ok(decision) => decision.content,
                    Err(e) => {
                        tracing::warn!(seat = %seat.name, error = %e, "statement fallback");
                        FALLBACK_STATEMENT.to_string()
                    }
                };
                let statement = self.next_statement(seat, content, DiscussionPhase::Mission);
                statements.push(statement);
            }
        }
        statements
    }

    /// Discussion, proposals and execution of the next mission.
    fn play_mission(
        &mut self,
        state: GameState,
        missions: &[Mission],
    ) -> Result<(Mission, GameState)> {
        let number = state.mission_number;
        let team_size = self.catalog.team_size(number).ok_or_else(|| {
            EngineError::Invariant(format!("no team size for mission {}", number))
        })?;
        let base = History {
            state: &state,
            team_size: Some(team_size),
            missions,
            discussion: &[],
            proposals: &[],
        };

        let discussion = self.discussion(base);
        let round = self.run_proposals(
            History {
                discussion: &discussion,
                ..base
            },
            team_size,
        )?;
        let accepted = round.accepted()?;

        let mut actions = Vec::with_capacity(accepted.team.len());
        for name in &accepted.team {
            let seat = self.view.seat(name).ok_or_else(|| {
                EngineError::Invariant(format!("team member {} is not seated", name))
            })?;
            let chosen = if seat.is_evil() {
                let history = History {
                    discussion: &discussion,
                    proposals: &round.proposals[..round.proposals.len() - 1],
                    ..base
                };
                let details = PhaseDetails::MissionAction {
                    team: accepted.team.clone(),
                };
                let request = self.request(seat, &history, details);
                match self.agent.mission_action(&request) {
                    Ok(decision) => Some(decision.action),
                    Err(e) => {
                        tracing::warn!(seat = %seat.name, error = %e, "mission action fallback");
                        None
                    }
                }
            } else {
                None
            };
            actions.push(MissionResolver::card_for(seat, chosen));
        }

        let resolution = MissionResolver::resolve(&actions);
        tracing::info!(
            mission = number,
            result = %resolution.result,
            fails = resolution.fail_count,
            proposals = round.proposals.len(),
            "mission resolved"
        );

        let next = state
            .with_leader(round.leader)
            .record_mission(resolution.result);
        let mission = Mission {
            number,
            discussion,
            accepted_proposal: round.proposals.len() - 1,
            proposals: round.proposals,
            actions,
            result: resolution.result,
            fail_count: resolution.fail_count,
        };
        Ok((mission, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RandomAgent;
    use avalon_rules::{Alignment, MissionActionKind, MAX_PROPOSALS, MISSIONS_TO_WIN};

    fn controller(players: usize, seed: u64) -> GameController<RandomAgent> {
        let catalog = RoleCatalog::standard(players).unwrap();
        let config = EngineConfig::default().with_seed(seed);
        GameController::new(catalog, config, RandomAgent::new(seed)).unwrap()
    }

    #[test]
    fn test_game_reaches_a_verdict() {
        for players in 5..=10 {
            let record = controller(players, players as u64).play().unwrap();
            let outcome = &record.outcome;

            assert_eq!(record.seats.len(), players);
            assert!(outcome.good_successes <= MISSIONS_TO_WIN);
            assert!(outcome.evil_fails <= MISSIONS_TO_WIN);
            assert!(
                outcome.good_successes == MISSIONS_TO_WIN || outcome.evil_fails == MISSIONS_TO_WIN
            );
            assert_eq!(
                outcome.assassin_phase.is_some(),
                outcome.good_successes == MISSIONS_TO_WIN
            );
            if outcome.evil_fails == MISSIONS_TO_WIN {
                assert_eq!(outcome.winner, Alignment::Evil);
            }
        }
    }

    #[test]
    fn test_missions_are_well_formed() {
        let record = controller(7, 11).play().unwrap();
        for mission in &record.missions {
            assert!(!mission.proposals.is_empty());
            assert!(mission.proposals.len() <= MAX_PROPOSALS);
            assert_eq!(mission.accepted_proposal, mission.proposals.len() - 1);
            assert_eq!(mission.discussion.len(), 7);

            let accepted = mission.accepted().unwrap();
            assert_eq!(
                accepted.team.len(),
                record.catalog.team_size(mission.number).unwrap()
            );
            for action in &mission.actions {
                let seat = record.seat(&action.seat).unwrap();
                if seat.is_good() {
                    assert_eq!(action.action, MissionActionKind::Success);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_record() {
        let first = controller(8, 5).play().unwrap();
        let second = controller(8, 5).play().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.config.seed, 5);
    }

    #[test]
    fn test_statement_turns_are_game_wide() {
        let record = controller(5, 3).play().unwrap();
        let turns: Vec<usize> = record
            .missions
            .iter()
            .flat_map(|m| m.discussion.iter().map(|s| s.turn))
            .collect();
        let expected: Vec<usize> = (0..turns.len()).collect();
        assert_eq!(turns, expected);
    }

    #[test]
    fn test_record_carries_engine_config() {
        let catalog = RoleCatalog::standard(5).unwrap();
        let mut config = EngineConfig::default().with_seed(21);
        config.discussion_rounds = 2;
        config.evil_discussion_rounds = 3;
        let record = GameController::new(catalog, config, RandomAgent::new(21))
            .unwrap()
            .play()
            .unwrap();

        assert_eq!(record.config.discussion_rounds, 2);
        assert_eq!(record.config.evil_discussion_rounds, 3);
        assert_eq!(record.missions[0].discussion.len(), 10);
        if let Some(phase) = &record.outcome.assassin_phase {
            assert_eq!(phase.evil_discussion.len(), 6);
        }
    }

    #[test]
    fn test_swapped_agent_drives_the_game() {
        let mut swapped = controller(5, 8);
        *swapped.agent_mut() = RandomAgent::new(3);
        let catalog = RoleCatalog::standard(5).unwrap();
        let config = EngineConfig::default().with_seed(8);
        let mut direct = GameController::new(catalog, config, RandomAgent::new(3)).unwrap();

        assert_eq!(swapped.play().unwrap(), direct.play().unwrap());
    }

    #[test]
    fn test_agent_state_carries_into_next_controller() {
        let mut twice = controller(5, 8);
        twice.play().unwrap();
        let second = twice.play().unwrap();

        let mut once = controller(5, 8);
        once.play().unwrap();
        let agent = once.into_agent();
        let mut next = GameController::new(
            RoleCatalog::standard(5).unwrap(),
            EngineConfig::default().with_seed(8),
            agent,
        )
        .unwrap();

        assert_eq!(next.play().unwrap(), second);
    }

    #[test]
    fn test_invalid_catalog_rejected() {
        let mut catalog = RoleCatalog::standard(5).unwrap();
        catalog.roles.pop();
        let result = GameController::new(catalog, EngineConfig::default(), RandomAgent::new(0));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }
}
