//! The assassin phase: evil reveal, evil discussion, then a single guess.

use avalon_rules::{AssassinPhaseRecord, DiscussionPhase, GameState, Mission, SeatName};

use super::fallback::{fallback_guess, FALLBACK_GUESS_RATIONALE, FALLBACK_STATEMENT};
use super::Session;
use crate::agent::DecisionAgent;
use crate::context_assembler::{History, PhaseDetails};
use crate::error::{EngineError, Result};

impl<'g, A: DecisionAgent> Session<'g, A> {
    pub(super) fn assassin_phase(
        &mut self,
        state: &GameState,
        missions: &[Mission],
    ) -> Result<AssassinPhaseRecord> {
        let assassin = self.view.assassin().ok_or_else(|| {
            EngineError::Invariant(format!(
                "no seat holds the assassin role {}",
                self.view.assassin_role()
            ))
        })?;
        let merlin = self
            .view
            .merlin()
            .ok_or_else(|| EngineError::Invariant("no seat holds merlin".into()))?;

        let evil_team: Vec<SeatName> = self.view.evil_seats().map(|s| s.name.clone()).collect();
        let candidates: Vec<SeatName> = self.view.good_seats().map(|s| s.name.clone()).collect();
        let history = History {
            state,
            team_size: None,
            missions,
            discussion: &[],
            proposals: &[],
        };

        tracing::info!(assassin = %assassin.name, "assassin phase started");

        let mut evil_discussion = Vec::new();
        for _ in 0..self.config.evil_discussion_rounds {
            for seat in self.view.evil_seats() {
                let details = PhaseDetails::EvilDiscussion {
                    evil_team: evil_team.clone(),
                    so_far: evil_discussion.clone(),
                };
                let request = self.request(seat, &history, details);
                let content = match self.agent.speak(&request) {
                    Ok(decision) => decision.content,
                    Err(e) => {
                        tracing::warn!(seat = %seat.name, error = %e, "statement fallback");
                        FALLBACK_STATEMENT.to_string()
                    }
                };
                let statement = self.next_statement(seat, content, DiscussionPhase::EvilReveal);
                evil_discussion.push(statement);
            }
        }

        let details = PhaseDetails::AssassinGuess {
            evil_team,
            evil_discussion: evil_discussion.clone(),
            candidates,
        };
        let request = self.request(assassin, &history, details);
        let (guess, rationale, fallback) = match self.agent.assassin_guess(&request) {
            Ok(decision) if self.view.contains(&decision.guess) => {
                (decision.guess, decision.rationale, None)
            }
            Ok(decision) => {
                tracing::warn!(guess = %decision.guess, "assassin named an unknown seat");
                (
                    self.random_guess()?,
                    FALLBACK_GUESS_RATIONALE.to_string(),
                    Some(format!("unknown seat {}", decision.guess)),
                )
            }
            Err(e) => {
                tracing::warn!(seat = %assassin.name, error = %e, "assassin guess fallback");
                (
                    self.random_guess()?,
                    FALLBACK_GUESS_RATIONALE.to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let correct = guess == merlin.name;
        tracing::info!(assassin = %assassin.name, %guess, correct, "assassin guessed");

        Ok(AssassinPhaseRecord {
            assassin: assassin.name.clone(),
            evil_discussion,
            guess,
            rationale,
            correct,
            fallback,
        })
    }

    fn random_guess(&mut self) -> Result<SeatName> {
        fallback_guess(self.view, self.rng)
            .ok_or_else(|| EngineError::Invariant("no good seat to guess".into()))
    }
}
