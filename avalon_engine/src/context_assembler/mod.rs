//! Context Assembler - Builds what a seat knows when it is asked for a decision.
//!
//! A context is assembled from three sources:
//! 1. **Knowledge**: the seat's role briefing and fixed knowledge set
//! 2. **History**: scores, earlier missions, this mission's discussion and proposals
//! 3. **Phase**: details of the decision being asked for
//!
//! Other seats appear by name only. Roles are never included beyond what the
//! seat's knowledge set or the evil reveal before the assassination allows.

mod enrichment;

pub use enrichment::*;

use avalon_rules::{
    join_names, Alignment, GameRecord, GameState, KnowledgeView, Mission, MissionResult,
    Proposal, Role, Seat, SeatName, Statement, MAX_MISSIONS, MISSIONS_TO_WIN,
};
use serde::{Deserialize, Serialize};

use crate::agent::PhaseKind;

/// The immutable history a decision is made against.
#[derive(Debug, Clone, Copy)]
pub struct History<'a> {
    pub state: &'a GameState,
    /// Required team size, while a mission is in progress.
    pub team_size: Option<usize>,
    pub missions: &'a [Mission],
    pub discussion: &'a [Statement],
    /// Earlier proposals of the current mission.
    pub proposals: &'a [Proposal],
}

/// Phase-specific part of a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseDetails {
    Discussion,
    TeamProposal {
        team_size: usize,
    },
    Vote {
        leader: SeatName,
        team: Vec<SeatName>,
        rationale: String,
    },
    MissionAction {
        team: Vec<SeatName>,
    },
    EvilDiscussion {
        evil_team: Vec<SeatName>,
        so_far: Vec<Statement>,
    },
    AssassinGuess {
        evil_team: Vec<SeatName>,
        evil_discussion: Vec<Statement>,
        candidates: Vec<SeatName>,
    },
    Reflection {
        game_number: usize,
        winner: Alignment,
        won: bool,
        roles: Vec<(SeatName, Role)>,
        assassination: Option<AssassinationSummary>,
    },
}

impl PhaseDetails {
    pub fn kind(&self) -> PhaseKind {
        match self {
            PhaseDetails::Discussion => PhaseKind::Discussion,
            PhaseDetails::TeamProposal { .. } => PhaseKind::TeamProposal,
            PhaseDetails::Vote { .. } => PhaseKind::Vote,
            PhaseDetails::MissionAction { .. } => PhaseKind::MissionAction,
            PhaseDetails::EvilDiscussion { .. } => PhaseKind::EvilDiscussion,
            PhaseDetails::AssassinGuess { .. } => PhaseKind::AssassinGuess,
            PhaseDetails::Reflection { .. } => PhaseKind::Reflection,
        }
    }
}

/// Revealed assassination outcome, for reflections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssassinationSummary {
    pub guess: SeatName,
    pub correct: bool,
    pub merlin: SeatName,
}

/// Public summary of a completed mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub number: usize,
    pub leader: SeatName,
    pub team: Vec<SeatName>,
    pub approvals: usize,
    pub rejections: usize,
    pub auto_approved: bool,
    pub proposal_count: usize,
    pub result: MissionResult,
    pub fail_count: usize,
    pub discussion: Vec<Statement>,
}

impl MissionSummary {
    pub fn from_mission(mission: &Mission) -> Option<Self> {
        let accepted = mission.accepted()?;
        Some(Self {
            number: mission.number,
            leader: accepted.leader.clone(),
            team: accepted.team.clone(),
            approvals: accepted.approvals(),
            rejections: accepted.rejections(),
            auto_approved: accepted.is_auto_approved(),
            proposal_count: mission.proposals.len(),
            result: mission.result,
            fail_count: mission.fail_count,
            discussion: mission.discussion.clone(),
        })
    }
}

/// Public summary of an earlier proposal in the current mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub attempt: usize,
    pub leader: SeatName,
    pub team: Vec<SeatName>,
    pub approvals: usize,
    pub rejections: usize,
}

impl From<&Proposal> for ProposalSummary {
    fn from(proposal: &Proposal) -> Self {
        Self {
            attempt: proposal.attempt,
            leader: proposal.leader.clone(),
            team: proposal.team.clone(),
            approvals: proposal.approvals(),
            rejections: proposal.rejections(),
        }
    }
}

/// Everything one seat may use for one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatContext {
    pub seat: SeatName,
    pub role: Role,
    pub alignment: Alignment,
    pub is_assassin: bool,
    pub briefing: String,
    pub knowledge: Vec<SeatName>,
    /// Text from the configured enrichment, if any.
    pub advisory: Option<String>,
    pub players: Vec<SeatName>,
    pub good_count: usize,
    pub evil_count: usize,
    pub mission_number: usize,
    pub team_size: Option<usize>,
    pub good_successes: usize,
    pub evil_fails: usize,
    pub previous_missions: Vec<MissionSummary>,
    pub discussion: Vec<Statement>,
    pub earlier_proposals: Vec<ProposalSummary>,
    pub details: PhaseDetails,
}

impl SeatContext {
    pub fn phase(&self) -> PhaseKind {
        self.details.kind()
    }

    /// Format the context as prompt text.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "You are {}, playing The Resistance: Avalon.\n\n",
            self.seat
        ));

        prompt.push_str("## Your Role\n");
        prompt.push_str(&format!("{}\n", self.role.as_str().to_uppercase()));
        prompt.push_str(&self.briefing);
        prompt.push_str("\n\n");

        if let Some(advisory) = &self.advisory {
            prompt.push_str(advisory.trim_end());
            prompt.push_str("\n\n");
        }

        prompt.push_str("## Table\n");
        prompt.push_str(&format!("All players: {}\n", join_names(&self.players, ", ")));
        prompt.push_str(&format!(
            "Team composition: {} Good, {} Evil\n",
            self.good_count, self.evil_count
        ));
        if let Some(team_size) = self.team_size {
            prompt.push_str(&format!(
                "Quest {}/{} - Team size needed: {}\n",
                self.mission_number, MAX_MISSIONS, team_size
            ));
        }
        prompt.push_str(&format!(
            "Score - Good: {}, Evil: {}\n\n",
            self.good_successes, self.evil_fails
        ));

        if !self.previous_missions.is_empty() {
            prompt.push_str("## Previous Missions\n");
            for mission in &self.previous_missions {
                prompt.push_str(&format!(
                    "- Mission {}: Leader {}, Team [{}]\n",
                    mission.number,
                    mission.leader,
                    join_names(&mission.team, ", ")
                ));
                if mission.auto_approved {
                    prompt.push_str("  Votes: none, auto-approved");
                } else {
                    prompt.push_str(&format!(
                        "  Votes: {} approve, {} reject",
                        mission.approvals, mission.rejections
                    ));
                }
                if mission.proposal_count > 1 {
                    prompt.push_str(&format!(" (after {} proposals)", mission.proposal_count));
                }
                prompt.push('\n');
                prompt.push_str(&format!(
                    "  Result: {} ({} FAIL cards)\n",
                    mission.result, mission.fail_count
                ));
            }
            prompt.push('\n');
        }

        if !self.discussion.is_empty() {
            prompt.push_str("## Discussion This Mission\n");
            push_statements(&mut prompt, &self.discussion);
            prompt.push('\n');
        }

        if !self.earlier_proposals.is_empty() {
            prompt.push_str("## Previous Proposals This Mission\n");
            for proposal in &self.earlier_proposals {
                prompt.push_str(&format!(
                    "- Proposal {} by {}: [{}]\n  Result: REJECTED ({} approve, {} reject)\n",
                    proposal.attempt,
                    proposal.leader,
                    join_names(&proposal.team, ", "),
                    proposal.approvals,
                    proposal.rejections
                ));
            }
            prompt.push('\n');
        }

        self.push_phase_details(&mut prompt);
        prompt
    }

    fn push_phase_details(&self, prompt: &mut String) {
        match &self.details {
            PhaseDetails::Discussion => {}
            PhaseDetails::TeamProposal { team_size } => {
                prompt.push_str("## Your Proposal\n");
                prompt.push_str(&format!(
                    "You are the mission leader. Pick {} players from: {}\n",
                    team_size,
                    join_names(&self.players, ", ")
                ));
            }
            PhaseDetails::Vote {
                leader,
                team,
                rationale,
            } => {
                prompt.push_str("## Proposed Team\n");
                prompt.push_str(&format!("Leader: {}\n", leader));
                prompt.push_str(&format!("Team: {}\n", join_names(team, ", ")));
                prompt.push_str(&format!("Leader's reasoning: {}\n", rationale));
            }
            PhaseDetails::MissionAction { team } => {
                prompt.push_str("## Mission Team\n");
                prompt.push_str(&format!("You are on the mission with: {}\n", join_names(team, ", ")));
            }
            PhaseDetails::EvilDiscussion { evil_team, so_far } => {
                self.push_evil_reveal(prompt, evil_team);
                if !so_far.is_empty() {
                    prompt.push_str("## Evil Team Discussion So Far\n");
                    push_statements(prompt, so_far);
                }
            }
            PhaseDetails::AssassinGuess {
                evil_team,
                evil_discussion,
                candidates,
            } => {
                self.push_evil_reveal(prompt, evil_team);
                prompt.push_str("## Evil Team Discussion\n");
                push_statements(prompt, evil_discussion);
                prompt.push_str(&format!(
                    "\nYou get ONE chance to name Merlin. Candidates: {}\n",
                    join_names(candidates, ", ")
                ));
            }
            PhaseDetails::Reflection {
                game_number,
                winner,
                won,
                roles,
                assassination,
            } => {
                prompt.push_str(&format!("## Game {} Is Over\n", game_number));
                prompt.push_str(&format!(
                    "You {} (team {} won)\n",
                    if *won { "won" } else { "lost" },
                    winner
                ));
                if let Some(assassination) = assassination {
                    prompt.push_str(&format!(
                        "Assassin guessed {} ({}). Merlin was {}.\n",
                        assassination.guess,
                        if assassination.correct {
                            "correct"
                        } else {
                            "wrong"
                        },
                        assassination.merlin
                    ));
                }
                prompt.push_str("\n## Actual Roles\n");
                for (name, role) in roles {
                    prompt.push_str(&format!("- {}: {}\n", name, role));
                }
            }
        }
    }

    fn push_evil_reveal(&self, prompt: &mut String, evil_team: &[SeatName]) {
        prompt.push_str("## Evil Team Revealed\n");
        prompt.push_str(&format!("Evil team members: {}\n", join_names(evil_team, ", ")));
        prompt.push_str(&format!(
            "The good team won {} quests. The assassin decides who Merlin is.\n\n",
            MISSIONS_TO_WIN
        ));

        prompt.push_str("## All Game Discussions\n");
        for mission in &self.previous_missions {
            prompt.push_str(&format!("Mission {}:\n", mission.number));
            push_statements(prompt, &mission.discussion);
        }
        prompt.push('\n');
    }
}

fn push_statements(prompt: &mut String, statements: &[Statement]) {
    for statement in statements {
        prompt.push_str(&format!("- {}: {}\n", statement.speaker, statement.content));
    }
}

fn list_or(names: &[SeatName], empty: &str) -> String {
    if names.is_empty() {
        empty.to_string()
    } else {
        join_names(names, ", ")
    }
}

/// Role briefing for a seat, including the assassination duty for whichever
/// role holds it.
pub fn role_briefing(seat: &Seat, is_assassin: bool) -> String {
    let known = list_or(&seat.knowledge, "none you can see");

    let mut briefing = match seat.role {
        Role::Merlin => format!(
            "You are Merlin. You know these evil players: {}.\n\
             Help good win without revealing yourself, or the Assassin will find you.",
            known
        ),
        Role::Percival => {
            if seat.knowledge.len() > 1 {
                format!(
                    "You are Percival (good team). You see these players as Merlin: {}.\n\
                     One is the real Merlin, the other is Morgana in disguise. Protect Merlin.",
                    known
                )
            } else {
                format!(
                    "You are Percival (good team). You know Merlin is {}. Protect Merlin.",
                    known
                )
            }
        }
        Role::Good => "You are on the good team. Deduce who the evil players are and \
                       make sure missions succeed."
            .to_string(),
        Role::Evil => format!(
            "You are on the evil team. Your evil teammates are: {}.\n\
             Sabotage missions and deceive the good players.",
            known
        ),
        Role::Assassin => format!(
            "You are the Assassin (evil team). Your evil teammates are: {}.\n\
             Sabotage missions. If good wins {} missions, you name who you think Merlin is.",
            known, MISSIONS_TO_WIN
        ),
        Role::Morgana => format!(
            "You are Morgana (evil team). Your evil teammates are: {}.\n\
             You appear as Merlin to Percival. Deceive and sabotage.",
            known
        ),
        Role::Mordred => format!(
            "You are Mordred (evil team). Your evil teammates are: {}.\n\
             You are invisible to Merlin. Sabotage missions.",
            known
        ),
        Role::Oberon => "You are Oberon (evil team). You don't know your teammates and \
                         they don't know you. Sabotage missions and find your team."
            .to_string(),
    };

    if is_assassin && seat.role != Role::Assassin {
        briefing.push_str(&format!(
            "\nYou are also the Assassin: if good wins {} missions, you name who you think Merlin is.",
            MISSIONS_TO_WIN
        ));
    }
    briefing
}

/// Builds seat contexts, applying the configured enrichment.
pub struct ContextAssembler {
    enrichment: Box<dyn ContextEnrichment>,
}

impl ContextAssembler {
    /// Create a context assembler with the given enrichment.
    pub fn new(enrichment: Box<dyn ContextEnrichment>) -> Self {
        Self { enrichment }
    }

    /// Create a context assembler without enrichment.
    pub fn with_defaults() -> Self {
        Self::new(Box::new(NoEnrichment))
    }

    /// Assemble the context for one decision by one seat.
    pub fn assemble(
        &self,
        view: &KnowledgeView,
        seat: &Seat,
        history: &History<'_>,
        details: PhaseDetails,
    ) -> SeatContext {
        let is_assassin = view.is_assassin(seat);
        SeatContext {
            seat: seat.name.clone(),
            role: seat.role,
            alignment: seat.alignment,
            is_assassin,
            briefing: role_briefing(seat, is_assassin),
            knowledge: seat.knowledge.clone(),
            advisory: self.enrichment.advisory(seat, details.kind()),
            players: view.names(),
            good_count: view.good_count(),
            evil_count: view.evil_count(),
            mission_number: history.state.mission_number,
            team_size: history.team_size,
            good_successes: history.state.good_successes,
            evil_fails: history.state.evil_fails,
            previous_missions: history
                .missions
                .iter()
                .filter_map(MissionSummary::from_mission)
                .collect(),
            discussion: history.discussion.to_vec(),
            earlier_proposals: history.proposals.iter().map(ProposalSummary::from).collect(),
            details,
        }
    }

    /// Post-game context with every role revealed.
    pub fn reflection_context(
        &self,
        record: &GameRecord,
        seat: &Seat,
        game_number: usize,
    ) -> SeatContext {
        let is_assassin = seat.role == record.catalog.assassin_role;
        let winner = record.outcome.winner;
        let merlin = record
            .seats
            .iter()
            .find(|s| s.role == Role::Merlin)
            .map(|s| s.name.clone());
        let assassination = record
            .outcome
            .assassin_phase
            .as_ref()
            .zip(merlin)
            .map(|(phase, merlin)| AssassinationSummary {
                guess: phase.guess.clone(),
                correct: phase.correct,
                merlin,
            });
        let details = PhaseDetails::Reflection {
            game_number,
            winner,
            won: seat.alignment == winner,
            roles: record
                .seats
                .iter()
                .map(|s| (s.name.clone(), s.role))
                .collect(),
            assassination,
        };
        let good_count = record.seats.iter().filter(|s| s.is_good()).count();

        SeatContext {
            seat: seat.name.clone(),
            role: seat.role,
            alignment: seat.alignment,
            is_assassin,
            briefing: role_briefing(seat, is_assassin),
            knowledge: seat.knowledge.clone(),
            advisory: None,
            players: record.seats.iter().map(|s| s.name.clone()).collect(),
            good_count,
            evil_count: record.seats.len() - good_count,
            mission_number: record.missions.len(),
            team_size: None,
            good_successes: record.outcome.good_successes,
            evil_fails: record.outcome.evil_fails,
            previous_missions: record
                .missions
                .iter()
                .filter_map(MissionSummary::from_mission)
                .collect(),
            discussion: Vec::new(),
            earlier_proposals: Vec::new(),
            details,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use avalon_rules::RoleCatalog;

    /// Five seats: Alice merlin, Bob and Charlie good, Diana assassin, Eve evil.
    pub fn five_player_view() -> KnowledgeView {
        let catalog = RoleCatalog::standard(5).unwrap();
        KnowledgeView::with_seating(
            &catalog,
            &[Role::Merlin, Role::Good, Role::Good, Role::Assassin, Role::Evil],
        )
        .unwrap()
    }

    pub fn context_for(seat: &str, details: PhaseDetails) -> SeatContext {
        let view = five_player_view();
        let state = GameState::new(5, 0);
        let history = History {
            state: &state,
            team_size: Some(2),
            missions: &[],
            discussion: &[],
            proposals: &[],
        };
        let seat = view.seat(&SeatName::from(seat)).unwrap();
        ContextAssembler::with_defaults().assemble(&view, seat, &history, details)
    }

    pub fn sample_context() -> SeatContext {
        context_for("Bob", PhaseDetails::Discussion)
    }
}
