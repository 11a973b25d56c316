//! The proposal/voting loop for one mission.
//!
//! `Proposing -> Voting -> Approved | Rejected`. A rejection passes leadership
//! one seat on and starts the next attempt. The final attempt is approved
//! without a vote so every mission executes.

use avalon_rules::{tally, Proposal, SeatName, Vote, VoteOutcome, MAX_PROPOSALS};

use super::fallback::{fallback_team, fallback_vote, sanitize_team, FALLBACK_TEAM_RATIONALE};
use super::Session;
use crate::agent::DecisionAgent;
use crate::context_assembler::{History, PhaseDetails};
use crate::error::{EngineError, Result};

/// Where the loop for one mission stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Proposing {
        leader: usize,
        attempt: usize,
    },
    Voting {
        leader: usize,
        attempt: usize,
        proposal: Proposal,
    },
    Approved {
        leader: usize,
    },
    Rejected {
        leader: usize,
        attempt: usize,
    },
}

impl LoopState {
    pub fn start(leader: usize) -> Self {
        LoopState::Proposing { leader, attempt: 1 }
    }

    /// The capped attempt skips the vote.
    pub fn is_final_attempt(attempt: usize) -> bool {
        attempt >= MAX_PROPOSALS
    }

    /// Transition out of `Voting` once the outcome is known.
    pub fn after_vote(leader: usize, attempt: usize, outcome: VoteOutcome) -> Self {
        match outcome {
            VoteOutcome::Approved => LoopState::Approved { leader },
            VoteOutcome::Rejected => LoopState::Rejected { leader, attempt },
        }
    }

    /// Transition out of `Rejected`: next seat leads the next attempt.
    pub fn next_attempt(leader: usize, attempt: usize, seat_count: usize) -> Self {
        LoopState::Proposing {
            leader: (leader + 1) % seat_count.max(1),
            attempt: attempt + 1,
        }
    }
}

/// Every proposal of a mission; the last one is the accepted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRound {
    pub proposals: Vec<Proposal>,
    /// Table position of the leader whose team was accepted.
    pub leader: usize,
}

impl ProposalRound {
    pub fn accepted(&self) -> Result<&Proposal> {
        self.proposals
            .last()
            .ok_or_else(|| EngineError::Invariant("proposal loop ended without a proposal".into()))
    }
}

impl<'g, A: DecisionAgent> Session<'g, A> {
    /// Run the loop against `base`, whose earlier proposals are filled in as
    /// the loop goes.
    pub(super) fn run_proposals(
        &mut self,
        base: History<'_>,
        team_size: usize,
    ) -> Result<ProposalRound> {
        let seat_count = self.view.len();
        let mut proposals: Vec<Proposal> = Vec::new();
        let mut loop_state = LoopState::start(base.state.leader);

        loop {
            loop_state = match loop_state {
                LoopState::Proposing { leader, attempt } => {
                    let history = History {
                        proposals: &proposals,
                        ..base
                    };
                    let proposal = self.propose(leader, attempt, team_size, &history)?;
                    tracing::info!(
                        attempt,
                        leader = %proposal.leader,
                        team = ?proposal.team.iter().map(SeatName::as_str).collect::<Vec<_>>(),
                        "team proposed"
                    );

                    if LoopState::is_final_attempt(attempt) {
                        tracing::info!(attempt, "final proposal approved without a vote");
                        proposals.push(proposal);
                        LoopState::Approved { leader }
                    } else {
                        LoopState::Voting {
                            leader,
                            attempt,
                            proposal,
                        }
                    }
                }
                LoopState::Voting {
                    leader,
                    attempt,
                    mut proposal,
                } => {
                    let history = History {
                        proposals: &proposals,
                        ..base
                    };
                    let votes = self.collect_votes(&proposal, &history);
                    if votes.len() != seat_count {
                        return Err(EngineError::Invariant(format!(
                            "{} votes for {} seats",
                            votes.len(),
                            seat_count
                        )));
                    }
                    let outcome = tally(&votes, seat_count);
                    proposal.votes = votes;
                    proposal.outcome = outcome;
                    tracing::info!(
                        attempt,
                        approvals = proposal.approvals(),
                        rejections = proposal.rejections(),
                        ?outcome,
                        "vote tallied"
                    );
                    proposals.push(proposal);
                    LoopState::after_vote(leader, attempt, outcome)
                }
                LoopState::Rejected { leader, attempt } => {
                    LoopState::next_attempt(leader, attempt, seat_count)
                }
                LoopState::Approved { leader } => {
                    return Ok(ProposalRound { proposals, leader });
                }
            };
        }
    }

    /// Ask the leader for a team, repairing or replacing it as needed.
    fn propose(
        &mut self,
        leader: usize,
        attempt: usize,
        team_size: usize,
        history: &History<'_>,
    ) -> Result<Proposal> {
        let seat = self.seat_at(leader)?;
        let request = self.request(seat, history, PhaseDetails::TeamProposal { team_size });

        let (team, rationale, fallback) = match self.agent.propose_team(&request) {
            Ok(decision) => {
                let sanitized = sanitize_team(&decision.team, self.view, team_size, self.rng);
                if let Some(note) = &sanitized.note {
                    tracing::warn!(seat = %seat.name, note = %note, "team repaired");
                }
                (sanitized.team, decision.rationale, sanitized.note)
            }
            Err(e) => {
                tracing::warn!(seat = %seat.name, error = %e, "team fallback");
                (
                    fallback_team(self.view, team_size, self.rng),
                    FALLBACK_TEAM_RATIONALE.to_string(),
                    Some(format!("random team: {}", e)),
                )
            }
        };

        Ok(Proposal {
            attempt,
            leader: seat.name.clone(),
            team,
            rationale,
            votes: Vec::new(),
            outcome: VoteOutcome::Approved,
            fallback,
        })
    }

    /// One vote per seat, in seat order.
    fn collect_votes(&mut self, proposal: &Proposal, history: &History<'_>) -> Vec<Vote> {
        let mut votes = Vec::with_capacity(self.view.len());
        for seat in self.view.seats() {
            let details = PhaseDetails::Vote {
                leader: proposal.leader.clone(),
                team: proposal.team.clone(),
                rationale: proposal.rationale.clone(),
            };
            let request = self.request(seat, history, details);
            let vote = match self.agent.vote(&request) {
                Ok(decision) => Vote {
                    voter: seat.name.clone(),
                    choice: decision.choice,
                    comment: decision.comment,
                },
                Err(e) => {
                    tracing::warn!(seat = %seat.name, error = %e, "vote fallback");
                    fallback_vote(seat, self.rng)
                }
            };
            tracing::debug!(voter = %vote.voter, choice = ?vote.choice, "vote cast");
            votes.push(vote);
        }
        votes
    }
}
