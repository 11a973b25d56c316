//! Seeded baseline agent.
//!
//! Plays plausibly using nothing but its `SeatContext`: Merlin avoids teams
//! with evil it can see, evil seats back teams with evil on them and usually
//! fail missions, everyone else approves most teams.

use avalon_rules::{MissionActionKind, Role, SeatName, VoteChoice};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    AssassinGuessDecision, DecisionAgent, DecisionRequest, DecisionResult, MissionActionDecision,
    ReflectionDecision, StatementDecision, TeamProposalDecision, VoteDecision,
};
use crate::context_assembler::{PhaseDetails, SeatContext};
use crate::error::DecisionError;

/// Chance a seat without information approves a proposed team.
const BLIND_APPROVAL: f64 = 0.7;

/// Chance an evil team member plays a fail card.
const EVIL_FAIL: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn others(context: &SeatContext) -> Vec<&SeatName> {
        context
            .players
            .iter()
            .filter(|name| **name != context.seat)
            .collect()
    }

    /// Seats this seat knows to be evil, itself included when evil.
    fn known_evil(context: &SeatContext) -> Vec<SeatName> {
        match context.role {
            Role::Merlin => context.knowledge.clone(),
            Role::Percival | Role::Good => Vec::new(),
            Role::Evil | Role::Assassin | Role::Morgana | Role::Mordred | Role::Oberon => {
                let mut evil = context.knowledge.clone();
                evil.push(context.seat.clone());
                evil
            }
        }
    }
}

impl DecisionAgent for RandomAgent {
    fn speak(&mut self, request: &DecisionRequest) -> DecisionResult<StatementDecision> {
        let context = &request.context;
        let content = match &context.details {
            PhaseDetails::EvilDiscussion { .. } => {
                let known_evil = Self::known_evil(context);
                let suspects: Vec<&SeatName> = context
                    .players
                    .iter()
                    .filter(|name| !known_evil.contains(*name))
                    .collect();
                match suspects.choose(&mut self.rng) {
                    Some(name) => format!("{} steered the votes too well to be ordinary.", name),
                    None => "I have no read on Merlin.".to_string(),
                }
            }
            _ => match Self::others(context).choose(&mut self.rng) {
                Some(name) => format!("I think {} deserves a place on the team.", name),
                None => "Let's keep the team small and see.".to_string(),
            },
        };
        Ok(StatementDecision { content })
    }

    fn propose_team(&mut self, request: &DecisionRequest) -> DecisionResult<TeamProposalDecision> {
        let context = &request.context;
        let &PhaseDetails::TeamProposal { team_size } = &context.details else {
            return Err(DecisionError::Unavailable(format!(
                "no team size in {} context",
                request.phase
            )));
        };

        let known_evil = Self::known_evil(context);
        let mut candidates = Self::others(context);
        if context.alignment.is_good() {
            candidates.retain(|name| !known_evil.contains(*name));
        }
        candidates.shuffle(&mut self.rng);

        let mut team = vec![context.seat.clone()];
        team.extend(
            candidates
                .into_iter()
                .take(team_size.saturating_sub(1))
                .cloned(),
        );
        Ok(TeamProposalDecision {
            team,
            rationale: "A team I can vouch for.".to_string(),
        })
    }

    fn vote(&mut self, request: &DecisionRequest) -> DecisionResult<VoteDecision> {
        let context = &request.context;
        let PhaseDetails::Vote { team, .. } = &context.details else {
            return Err(DecisionError::Unavailable(format!(
                "no proposed team in {} context",
                request.phase
            )));
        };

        let known_evil = Self::known_evil(context);
        let evil_on_team = team.iter().any(|name| known_evil.contains(name));
        let approve = if context.alignment.is_good() && !known_evil.is_empty() {
            !evil_on_team
        } else if context.alignment.is_good() {
            self.rng.gen_bool(BLIND_APPROVAL)
        } else {
            evil_on_team || self.rng.gen_bool(1.0 - BLIND_APPROVAL)
        };

        Ok(if approve {
            VoteDecision {
                choice: VoteChoice::Approve,
                comment: "I trust this team.".to_string(),
            }
        } else {
            VoteDecision {
                choice: VoteChoice::Reject,
                comment: "I'm not sure about this team.".to_string(),
            }
        })
    }

    fn mission_action(
        &mut self,
        _request: &DecisionRequest,
    ) -> DecisionResult<MissionActionDecision> {
        let action = if self.rng.gen_bool(EVIL_FAIL) {
            MissionActionKind::Fail
        } else {
            MissionActionKind::Success
        };
        Ok(MissionActionDecision {
            action,
            rationale: String::new(),
        })
    }

    fn assassin_guess(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<AssassinGuessDecision> {
        let PhaseDetails::AssassinGuess { candidates, .. } = &request.context.details else {
            return Err(DecisionError::Unavailable(format!(
                "no candidates in {} context",
                request.phase
            )));
        };
        let guess = candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| DecisionError::Unavailable("no candidates".to_string()))?;
        Ok(AssassinGuessDecision {
            guess,
            rationale: "A hunch.".to_string(),
        })
    }

    fn reflect(&mut self, request: &DecisionRequest) -> DecisionResult<ReflectionDecision> {
        let PhaseDetails::Reflection { won, .. } = &request.context.details else {
            return Err(DecisionError::Unavailable(format!(
                "no outcome in {} context",
                request.phase
            )));
        };
        let self_assessment = if *won {
            "My reads held up; keep trusting early mission results."
        } else {
            "I trusted the wrong people; weigh voting patterns more."
        };
        Ok(ReflectionDecision {
            self_assessment: self_assessment.to_string(),
            observations: Default::default(),
        })
    }
}
