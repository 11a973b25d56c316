//! Fallback decisions used when an agent errors or returns an unusable shape.

use std::collections::BTreeSet;

use avalon_rules::{join_names, KnowledgeView, Role, Seat, SeatName, Vote, VoteChoice};
use rand::seq::SliceRandom;
use rand::Rng;

pub const FALLBACK_STATEMENT: &str = "I need to think about this carefully...";
pub const FALLBACK_TEAM_RATIONALE: &str = "Based on trust and past mission results.";
pub const FALLBACK_GUESS_RATIONALE: &str = "Based on their behavior throughout the game.";
pub const FALLBACK_REFLECTION: &str = "Unable to reflect on this game.";

/// A team of the required size plus a note on what was repaired, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedTeam {
    pub team: Vec<SeatName>,
    pub note: Option<String>,
}

/// Repair a proposed team: drop unknown and duplicate names, truncate to the
/// required size, then pad with random unused seats.
pub fn sanitize_team<R: Rng + ?Sized>(
    proposed: &[SeatName],
    view: &KnowledgeView,
    team_size: usize,
    rng: &mut R,
) -> SanitizedTeam {
    let mut notes = Vec::new();
    let mut seen = BTreeSet::new();
    let mut team = Vec::with_capacity(team_size);

    for name in proposed {
        if !view.contains(name) {
            notes.push(format!("dropped unknown seat {}", name));
        } else if !seen.insert(name.clone()) {
            notes.push(format!("dropped duplicate {}", name));
        } else {
            team.push(name.clone());
        }
    }

    if team.len() > team_size {
        notes.push(format!("truncated {} names to {}", team.len(), team_size));
        team.truncate(team_size);
    }

    if team.len() < team_size {
        let unused: Vec<SeatName> = view
            .names()
            .into_iter()
            .filter(|name| !team.contains(name))
            .collect();
        let padding: Vec<SeatName> = unused
            .choose_multiple(rng, team_size - team.len())
            .cloned()
            .collect();
        notes.push(format!("padded with {}", join_names(&padding, ", ")));
        team.extend(padding);
    }

    SanitizedTeam {
        team,
        note: if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        },
    }
}

/// Random legal team.
pub fn fallback_team<R: Rng + ?Sized>(
    view: &KnowledgeView,
    team_size: usize,
    rng: &mut R,
) -> Vec<SeatName> {
    view.names()
        .choose_multiple(rng, team_size)
        .cloned()
        .collect()
}

/// Plain evil and assassin seats vote at random; everyone else approves.
pub fn fallback_vote<R: Rng + ?Sized>(seat: &Seat, rng: &mut R) -> Vote {
    let choice = match seat.role {
        Role::Evil | Role::Assassin => {
            if rng.gen_bool(0.5) {
                VoteChoice::Approve
            } else {
                VoteChoice::Reject
            }
        }
        Role::Merlin
        | Role::Percival
        | Role::Good
        | Role::Morgana
        | Role::Mordred
        | Role::Oberon => VoteChoice::Approve,
    };
    let comment = match choice {
        VoteChoice::Approve => "I trust this team.",
        VoteChoice::Reject => "I'm not sure about this team.",
    };
    Vote {
        voter: seat.name.clone(),
        choice,
        comment: comment.to_string(),
    }
}

/// Random good seat as the assassin's guess.
pub fn fallback_guess<R: Rng + ?Sized>(view: &KnowledgeView, rng: &mut R) -> Option<SeatName> {
    let good: Vec<&Seat> = view.good_seats().collect();
    good.choose(rng).map(|seat| seat.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalon_rules::RoleCatalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn view() -> KnowledgeView {
        let catalog = RoleCatalog::standard(5).unwrap();
        KnowledgeView::with_seating(
            &catalog,
            &[Role::Merlin, Role::Good, Role::Good, Role::Assassin, Role::Evil],
        )
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<SeatName> {
        list.iter().map(|n| SeatName::from(*n)).collect()
    }

    #[test]
    fn test_valid_team_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sanitized = sanitize_team(&names(&["Bob", "Alice"]), &view(), 2, &mut rng);
        assert_eq!(sanitized.team, names(&["Bob", "Alice"]));
        assert_eq!(sanitized.note, None);
    }

    #[test]
    fn test_unknown_and_duplicates_dropped_then_padded() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sanitized = sanitize_team(
            &names(&["Bob", "Mallory", "Bob"]),
            &view(),
            3,
            &mut rng,
        );

        assert_eq!(sanitized.team.len(), 3);
        assert_eq!(sanitized.team[0], SeatName::from("Bob"));
        let unique: BTreeSet<_> = sanitized.team.iter().collect();
        assert_eq!(unique.len(), 3);
        let note = sanitized.note.unwrap();
        assert!(note.contains("dropped unknown seat Mallory"));
        assert!(note.contains("dropped duplicate Bob"));
        assert!(note.contains("padded with"));
    }

    #[test]
    fn test_oversized_team_truncated() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sanitized = sanitize_team(
            &names(&["Alice", "Bob", "Charlie", "Diana"]),
            &view(),
            2,
            &mut rng,
        );
        assert_eq!(sanitized.team, names(&["Alice", "Bob"]));
        assert!(sanitized.note.unwrap().contains("truncated 4 names to 2"));
    }

    #[test]
    fn test_fallback_team_is_legal() {
        let view = view();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for size in 1..=5 {
            let team = fallback_team(&view, size, &mut rng);
            assert_eq!(team.len(), size);
            assert!(team.iter().all(|n| view.contains(n)));
            let unique: BTreeSet<_> = team.iter().collect();
            assert_eq!(unique.len(), size);
        }
    }

    #[test]
    fn test_fallback_vote_by_role() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for role in [Role::Merlin, Role::Percival, Role::Good, Role::Morgana] {
            let vote = fallback_vote(&Seat::new("Bob", role), &mut rng);
            assert_eq!(vote.choice, VoteChoice::Approve);
            assert_eq!(vote.comment, "I trust this team.");
        }

        let choices: BTreeSet<_> = (0..64)
            .map(|_| fallback_vote(&Seat::new("Eve", Role::Evil), &mut rng).choice as u8)
            .collect();
        assert_eq!(choices.len(), 2);
    }

    #[test]
    fn test_fallback_guess_is_good() {
        let view = view();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            let guess = fallback_guess(&view, &mut rng).unwrap();
            assert!(view.seat(&guess).unwrap().is_good());
        }
    }
}
