//! Votes and the majority rule.

use serde::{Deserialize, Serialize};

use crate::entities::SeatName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    Approved,
    Rejected,
}

/// One seat's vote on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: SeatName,
    pub choice: VoteChoice,
    /// Opaque comment.
    pub comment: String,
}

/// Approved iff approvals strictly exceed half the table. A tie rejects.
pub fn vote_outcome(approvals: usize, seat_count: usize) -> VoteOutcome {
    if approvals * 2 > seat_count {
        VoteOutcome::Approved
    } else {
        VoteOutcome::Rejected
    }
}

/// Apply the majority rule to a full set of votes.
pub fn tally(votes: &[Vote], seat_count: usize) -> VoteOutcome {
    let approvals = votes
        .iter()
        .filter(|v| v.choice == VoteChoice::Approve)
        .count();
    vote_outcome(approvals, seat_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_with_five_seats() {
        assert_eq!(vote_outcome(3, 5), VoteOutcome::Approved);
        assert_eq!(vote_outcome(2, 5), VoteOutcome::Rejected);
        assert_eq!(vote_outcome(5, 5), VoteOutcome::Approved);
        assert_eq!(vote_outcome(0, 5), VoteOutcome::Rejected);
    }

    #[test]
    fn test_tie_rejects() {
        assert_eq!(vote_outcome(3, 6), VoteOutcome::Rejected);
        assert_eq!(vote_outcome(4, 6), VoteOutcome::Approved);
        assert_eq!(vote_outcome(5, 10), VoteOutcome::Rejected);
    }

    #[test]
    fn test_tally() {
        let votes: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, name)| Vote {
                voter: SeatName::from(*name),
                choice: if i < 3 {
                    VoteChoice::Approve
                } else {
                    VoteChoice::Reject
                },
                comment: String::new(),
            })
            .collect();
        assert_eq!(tally(&votes, 5), VoteOutcome::Approved);
        assert_eq!(tally(&votes[1..], 5), VoteOutcome::Rejected);
    }
}
