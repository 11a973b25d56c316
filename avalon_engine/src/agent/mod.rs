//! Decision agents - the contract between the engine and whatever makes decisions.
//!
//! Every choice a seat makes goes through a [`DecisionAgent`]. Agents only see a
//! [`DecisionRequest`]; they cannot touch engine state. Any error they return is
//! recovered by the engine with a fallback decision.

mod parse;
mod prompt;
mod random;

pub use parse::*;
pub use prompt::*;
pub use random::*;

use std::collections::BTreeMap;

use avalon_rules::{MissionActionKind, SeatName, VoteChoice};
use serde::{Deserialize, Serialize};

use crate::context_assembler::SeatContext;
use crate::error::DecisionError;

/// The kind of decision being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Discussion,
    TeamProposal,
    Vote,
    MissionAction,
    EvilDiscussion,
    AssassinGuess,
    Reflection,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Discussion => "discussion",
            PhaseKind::TeamProposal => "team_proposal",
            PhaseKind::Vote => "vote",
            PhaseKind::MissionAction => "mission_action",
            PhaseKind::EvilDiscussion => "evil_discussion",
            PhaseKind::AssassinGuess => "assassin_guess",
            PhaseKind::Reflection => "reflection",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One decision request for one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub seat: SeatName,
    pub phase: PhaseKind,
    pub context: SeatContext,
}

impl DecisionRequest {
    pub fn new(context: SeatContext) -> Self {
        Self {
            seat: context.seat.clone(),
            phase: context.phase(),
            context,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDecision {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProposalDecision {
    pub team: Vec<SeatName>,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDecision {
    pub choice: VoteChoice,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionActionDecision {
    pub action: MissionActionKind,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssassinGuessDecision {
    pub guess: SeatName,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReflectionDecision {
    pub self_assessment: String,
    /// Notes about other players, keyed by seat name.
    pub observations: BTreeMap<SeatName, String>,
}

/// Result of a single decision call.
pub type DecisionResult<T> = std::result::Result<T, DecisionError>;

/// Makes decisions on behalf of seats.
pub trait DecisionAgent {
    /// A public statement, in mission discussion or the evil discussion.
    fn speak(&mut self, request: &DecisionRequest) -> DecisionResult<StatementDecision>;

    fn propose_team(&mut self, request: &DecisionRequest) -> DecisionResult<TeamProposalDecision>;

    fn vote(&mut self, request: &DecisionRequest) -> DecisionResult<VoteDecision>;

    /// Only asked of evil team members.
    fn mission_action(&mut self, request: &DecisionRequest)
        -> DecisionResult<MissionActionDecision>;

    fn assassin_guess(&mut self, request: &DecisionRequest)
        -> DecisionResult<AssassinGuessDecision>;

    /// Post-game reflection. Agents without memory support may leave the default.
    fn reflect(&mut self, request: &DecisionRequest) -> DecisionResult<ReflectionDecision> {
        Err(DecisionError::Unavailable(format!(
            "{} cannot reflect",
            request.seat
        )))
    }
}

impl<A: DecisionAgent + ?Sized> DecisionAgent for &mut A {
    fn speak(&mut self, request: &DecisionRequest) -> DecisionResult<StatementDecision> {
        (**self).speak(request)
    }

    fn propose_team(&mut self, request: &DecisionRequest) -> DecisionResult<TeamProposalDecision> {
        (**self).propose_team(request)
    }

    fn vote(&mut self, request: &DecisionRequest) -> DecisionResult<VoteDecision> {
        (**self).vote(request)
    }

    fn mission_action(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<MissionActionDecision> {
        (**self).mission_action(request)
    }

    fn assassin_guess(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<AssassinGuessDecision> {
        (**self).assassin_guess(request)
    }

    fn reflect(&mut self, request: &DecisionRequest) -> DecisionResult<ReflectionDecision> {
        (**self).reflect(request)
    }
}

impl<A: DecisionAgent + ?Sized> DecisionAgent for Box<A> {
    fn speak(&mut self, request: &DecisionRequest) -> DecisionResult<StatementDecision> {
        (**self).speak(request)
    }

    fn propose_team(&mut self, request: &DecisionRequest) -> DecisionResult<TeamProposalDecision> {
        (**self).propose_team(request)
    }

    fn vote(&mut self, request: &DecisionRequest) -> DecisionResult<VoteDecision> {
        (**self).vote(request)
    }

    fn mission_action(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<MissionActionDecision> {
        (**self).mission_action(request)
    }

    fn assassin_guess(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<AssassinGuessDecision> {
        (**self).assassin_guess(request)
    }

    fn reflect(&mut self, request: &DecisionRequest) -> DecisionResult<ReflectionDecision> {
        (**self).reflect(request)
    }
}
