//! End-to-end games with a scripted agent on a fixed five-seat table:
//! Alice merlin, Bob and Charlie good, Diana assassin, Eve evil.

use avalon_engine::{
    AssassinGuessDecision, DecisionAgent, DecisionError, DecisionRequest, DecisionResult,
    EngineConfig, GameController, MissionActionDecision, PhaseDetails, PhaseKind,
    StatementDecision, StaticAdvice, TeamProposalDecision, VoteDecision, FALLBACK_STATEMENT,
};
use avalon_rules::{
    Alignment, DiscussionPhase, GameRecord, MissionActionKind, MissionResult, Role, RoleCatalog,
    SeatName, VoteChoice, VoteOutcome, MAX_PROPOSALS,
};

const SEATING: [Role; 5] = [Role::Merlin, Role::Good, Role::Good, Role::Assassin, Role::Evil];

/// Answers every decision from a fixed script and keeps every request.
struct Scripted {
    team: Vec<SeatName>,
    vote: VoteChoice,
    action: MissionActionKind,
    guess: SeatName,
    broken: bool,
    requests: Vec<DecisionRequest>,
}

impl Scripted {
    fn new(team: &[&str], guess: &str) -> Self {
        Self {
            team: team.iter().map(|n| SeatName::from(*n)).collect(),
            vote: VoteChoice::Approve,
            action: MissionActionKind::Fail,
            guess: SeatName::from(guess),
            broken: false,
            requests: Vec::new(),
        }
    }

    /// Every call fails.
    fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new(&[], "Alice")
        }
    }

    fn seen(&mut self, request: &DecisionRequest) -> DecisionResult<()> {
        self.requests.push(request.clone());
        if self.broken {
            Err(DecisionError::Unavailable("backend down".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DecisionAgent for Scripted {
    fn speak(&mut self, request: &DecisionRequest) -> DecisionResult<StatementDecision> {
        self.seen(request)?;
        Ok(StatementDecision {
            content: format!("{} has nothing to hide", request.seat),
        })
    }

    fn propose_team(&mut self, request: &DecisionRequest) -> DecisionResult<TeamProposalDecision> {
        self.seen(request)?;
        let size = match request.context.details {
            PhaseDetails::TeamProposal { team_size } => team_size,
            _ => unreachable!("team requested outside a proposal"),
        };
        Ok(TeamProposalDecision {
            team: self.team.iter().take(size).cloned().collect(),
            rationale: "scripted".to_string(),
        })
    }

    fn vote(&mut self, request: &DecisionRequest) -> DecisionResult<VoteDecision> {
        self.seen(request)?;
        Ok(VoteDecision {
            choice: self.vote,
            comment: String::new(),
        })
    }

    fn mission_action(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<MissionActionDecision> {
        self.seen(request)?;
        Ok(MissionActionDecision {
            action: self.action,
            rationale: String::new(),
        })
    }

    fn assassin_guess(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<AssassinGuessDecision> {
        self.seen(request)?;
        Ok(AssassinGuessDecision {
            guess: self.guess.clone(),
            rationale: "scripted".to_string(),
        })
    }
}

fn play(agent: &mut Scripted, seed: u64) -> GameRecord {
    let catalog = RoleCatalog::standard(5).unwrap();
    let config = EngineConfig::default().with_seed(seed);
    GameController::new(catalog, config, agent)
        .unwrap()
        .with_seating(SEATING.to_vec())
        .with_starting_leader(0)
        .play()
        .unwrap()
}

fn leaders(record: &GameRecord) -> Vec<Vec<&str>> {
    record
        .missions
        .iter()
        .map(|m| m.proposals.iter().map(|p| p.leader.as_str()).collect())
        .collect()
}

#[test]
fn test_three_successes_and_merlin_found() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Alice");
    let record = play(&mut agent, 1);

    assert_eq!(
        record.results(),
        vec![MissionResult::Success; 3]
    );
    let phase = record.outcome.assassin_phase.as_ref().unwrap();
    assert_eq!(phase.assassin, SeatName::from("Diana"));
    assert!(phase.correct);
    assert_eq!(phase.fallback, None);
    assert_eq!(record.outcome.good_successes, 3);
    assert_eq!(record.winner(), Alignment::Evil);
}

#[test]
fn test_three_successes_and_merlin_missed() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Bob");
    let record = play(&mut agent, 1);

    let phase = record.outcome.assassin_phase.as_ref().unwrap();
    assert!(!phase.correct);
    assert_eq!(phase.guess, SeatName::from("Bob"));
    assert_eq!(record.winner(), Alignment::Good);
    assert_eq!(record.seat_won(&SeatName::from("Alice")), Some(true));
}

#[test]
fn test_three_fails_end_without_assassination() {
    let mut agent = Scripted::new(&["Eve", "Alice", "Bob"], "Alice");
    let record = play(&mut agent, 1);

    assert_eq!(record.results(), vec![MissionResult::Fail; 3]);
    assert_eq!(record.outcome.evil_fails, 3);
    assert_eq!(record.outcome.good_successes, 0);
    assert!(record.outcome.assassin_phase.is_none());
    assert_eq!(record.winner(), Alignment::Evil);
    assert!(agent
        .requests
        .iter()
        .all(|r| r.phase != PhaseKind::AssassinGuess));
}

#[test]
fn test_good_members_are_never_asked_for_an_action() {
    let mut agent = Scripted::new(&["Eve", "Alice", "Bob"], "Alice");
    let record = play(&mut agent, 1);

    let asked: Vec<&str> = agent
        .requests
        .iter()
        .filter(|r| r.phase == PhaseKind::MissionAction)
        .map(|r| r.seat.as_str())
        .collect();
    assert_eq!(asked, vec!["Eve"; 3]);
    for mission in &record.missions {
        assert_eq!(mission.fail_count, 1);
    }
}

#[test]
fn test_leader_rotates_after_each_mission() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Bob");
    let record = play(&mut agent, 1);

    assert_eq!(
        leaders(&record),
        vec![vec!["Alice"], vec!["Bob"], vec!["Charlie"]]
    );
}

#[test]
fn test_fifth_proposal_is_approved_without_votes() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Bob");
    agent.vote = VoteChoice::Reject;
    let record = play(&mut agent, 1);

    let first = &record.missions[0];
    assert_eq!(first.proposals.len(), MAX_PROPOSALS);
    for proposal in &first.proposals[..MAX_PROPOSALS - 1] {
        assert_eq!(proposal.outcome, VoteOutcome::Rejected);
        assert_eq!(proposal.votes.len(), 5);
    }
    let last = first.accepted().unwrap();
    assert!(last.votes.is_empty());
    assert_eq!(last.outcome, VoteOutcome::Approved);

    // Each rejection passes leadership on; the mission then advances it once more.
    assert_eq!(
        leaders(&record)[..2],
        [
            vec!["Alice", "Bob", "Charlie", "Diana", "Eve"],
            vec!["Alice", "Bob", "Charlie", "Diana", "Eve"],
        ]
    );
}

#[test]
fn test_broken_agent_still_finishes() {
    let mut agent = Scripted::broken();
    let record = play(&mut agent, 7);

    assert!(record.outcome.good_successes == 3 || record.outcome.evil_fails == 3);
    for mission in &record.missions {
        for statement in &mission.discussion {
            assert_eq!(statement.content, FALLBACK_STATEMENT);
        }
        for proposal in &mission.proposals {
            assert!(proposal.fallback.is_some());
            assert_eq!(proposal.team.len(), record.catalog.team_size(mission.number).unwrap());
            for vote in &proposal.votes {
                let seat = record.seat(&vote.voter).unwrap();
                if seat.is_good() {
                    assert_eq!(vote.choice, VoteChoice::Approve);
                }
            }
        }
        for action in &mission.actions {
            let seat = record.seat(&action.seat).unwrap();
            let expected = if seat.is_evil() {
                MissionActionKind::Fail
            } else {
                MissionActionKind::Success
            };
            assert_eq!(action.action, expected);
        }
    }
    if let Some(phase) = &record.outcome.assassin_phase {
        assert!(phase.fallback.is_some());
        assert!(record.seat(&phase.guess).unwrap().is_good());
    }
}

#[test]
fn test_malformed_team_is_repaired() {
    let mut agent = Scripted::new(&["Alice", "Alice", "Zed"], "Alice");
    let record = play(&mut agent, 3);

    let proposal = record.missions[0].accepted().unwrap();
    assert_eq!(proposal.team.len(), 2);
    assert_eq!(proposal.team[0], SeatName::from("Alice"));
    assert_ne!(proposal.team[1], SeatName::from("Alice"));
    let note = proposal.fallback.as_deref().unwrap();
    assert!(note.contains("dropped duplicate Alice"));
    assert_eq!(proposal.rationale, "scripted");
}

#[test]
fn test_unknown_guess_falls_back_to_good_seat() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Mallory");
    let record = play(&mut agent, 5);

    let phase = record.outcome.assassin_phase.as_ref().unwrap();
    assert!(phase.fallback.as_deref().unwrap().contains("Mallory"));
    assert!(record.seat(&phase.guess).unwrap().is_good());
}

#[test]
fn test_evil_discussion_before_guess() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Alice");
    let record = play(&mut agent, 1);

    let phase = record.outcome.assassin_phase.as_ref().unwrap();
    let speakers: Vec<&str> = phase
        .evil_discussion
        .iter()
        .map(|s| s.speaker.as_str())
        .collect();
    assert_eq!(speakers, vec!["Diana", "Eve"]);
    assert!(phase
        .evil_discussion
        .iter()
        .all(|s| s.phase == DiscussionPhase::EvilReveal));

    let guess = agent
        .requests
        .iter()
        .find(|r| r.phase == PhaseKind::AssassinGuess)
        .unwrap();
    assert_eq!(guess.seat, SeatName::from("Diana"));
    match &guess.context.details {
        PhaseDetails::AssassinGuess {
            evil_discussion,
            candidates,
            ..
        } => {
            assert_eq!(evil_discussion.len(), 2);
            assert_eq!(
                candidates,
                &vec![
                    SeatName::from("Alice"),
                    SeatName::from("Bob"),
                    SeatName::from("Charlie")
                ]
            );
        }
        other => panic!("unexpected details {:?}", other),
    }
}

#[test]
fn test_good_seats_see_no_hidden_roles() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Alice");
    play(&mut agent, 1);

    for request in agent.requests.iter().filter(|r| r.seat.as_str() == "Bob") {
        assert!(request.context.knowledge.is_empty());
        let prompt = request.context.to_prompt_string();
        assert!(!prompt.contains("Evil team members"));
        assert!(!prompt.contains("assassin"));
    }
}

#[test]
fn test_enrichment_reaches_every_request() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Alice");
    let catalog = RoleCatalog::standard(5).unwrap();
    let config = EngineConfig::default().with_seed(2);
    GameController::new(catalog, config, &mut agent)
        .unwrap()
        .with_enrichment(Box::new(StaticAdvice("House rule: be brief.".to_string())))
        .with_seating(SEATING.to_vec())
        .play()
        .unwrap();

    assert!(!agent.requests.is_empty());
    assert!(agent
        .requests
        .iter()
        .all(|r| r.context.advisory.as_deref() == Some("House rule: be brief.")));
}

#[test]
fn test_record_survives_json() {
    let mut agent = Scripted::new(&["Alice", "Bob", "Charlie"], "Bob");
    let record = play(&mut agent, 9);

    let json = record.to_json_pretty().unwrap();
    assert!(json.contains("\"winner\": \"good\""));
    assert!(json.contains("\"role\": \"assassin\""));
    assert_eq!(GameRecord::from_json(&json).unwrap(), record);
}
