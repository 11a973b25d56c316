//! Missions: discussion, proposals, votes and mission actions.

mod resolver;
mod vote;

pub use resolver::*;
pub use vote::*;

use serde::{Deserialize, Serialize};

use crate::entities::SeatName;

/// Which discussion a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionPhase {
    /// Public table talk before a mission's first proposal.
    Mission,
    /// Evil seats revealed to each other before the assassination.
    EvilReveal,
}

/// One public statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub speaker: SeatName,
    pub content: String,
    /// Game-wide turn counter.
    pub turn: usize,
    pub phase: DiscussionPhase,
}

/// A leader-nominated team and the table's response to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// 1-based attempt within the mission.
    pub attempt: usize,
    pub leader: SeatName,
    pub team: Vec<SeatName>,
    /// Opaque leader rationale.
    pub rationale: String,
    /// Empty iff this is the capped final attempt.
    pub votes: Vec<Vote>,
    pub outcome: VoteOutcome,
    /// Set when the engine repaired or replaced the leader's team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl Proposal {
    pub fn approvals(&self) -> usize {
        self.votes
            .iter()
            .filter(|v| v.choice == VoteChoice::Approve)
            .count()
    }

    pub fn rejections(&self) -> usize {
        self.votes.len() - self.approvals()
    }

    /// Accepted without a vote under the proposal cap.
    pub fn is_auto_approved(&self) -> bool {
        self.votes.is_empty() && self.outcome == VoteOutcome::Approved
    }
}

/// Card played by a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionActionKind {
    Success,
    Fail,
}

/// A team member's mission card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionAction {
    pub seat: SeatName,
    pub action: MissionActionKind,
}

/// Outcome of an executed mission. The proposal cap guarantees every mission
/// executes, so there is no "not played" result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionResult {
    Success,
    Fail,
}

impl std::fmt::Display for MissionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionResult::Success => write!(f, "success"),
            MissionResult::Fail => write!(f, "fail"),
        }
    }
}

/// One completed mission round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// 1-based mission number.
    pub number: usize,
    pub discussion: Vec<Statement>,
    /// Between 1 and 5 proposals.
    pub proposals: Vec<Proposal>,
    /// Index into `proposals` of the executed team.
    pub accepted_proposal: usize,
    pub actions: Vec<MissionAction>,
    pub result: MissionResult,
    pub fail_count: usize,
}

impl Mission {
    /// The proposal whose team went on the mission.
    pub fn accepted(&self) -> Option<&Proposal> {
        self.proposals.get(self.accepted_proposal)
    }
}
