//! Prompt-driven agent over an opaque text-completion backend.

use avalon_rules::Role;
use serde::{Deserialize, Serialize};

use super::parse::{
    parse_guess, parse_mission_action, parse_reflection, parse_statement, parse_team, parse_vote,
};
use super::{
    AssassinGuessDecision, DecisionAgent, DecisionRequest, DecisionResult, MissionActionDecision,
    PhaseKind, ReflectionDecision, StatementDecision, TeamProposalDecision, VoteDecision,
};
use crate::config::AgentTuning;
use crate::context_assembler::{PhaseDetails, SeatContext};

/// A completion call as handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub reasoning_effort: String,
    pub system: String,
    pub user: String,
}

/// Produces reply text for a prompt, e.g. a hosted language model.
///
/// Failures should be reported as `DecisionError::Unavailable`.
pub trait CompletionBackend {
    fn complete(&mut self, request: &CompletionRequest) -> DecisionResult<String>;
}

/// Renders a seat context into prompts and parses the backend's replies.
pub struct PromptAgent<B: CompletionBackend> {
    backend: B,
    tuning: AgentTuning,
}

impl<B: CompletionBackend> PromptAgent<B> {
    pub fn new(backend: B, tuning: AgentTuning) -> Self {
        Self { backend, tuning }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Build the completion request for a decision.
    pub fn completion_request(&self, request: &DecisionRequest) -> CompletionRequest {
        CompletionRequest {
            model: self.tuning.model.clone(),
            reasoning_effort: self.tuning.reasoning_effort.clone(),
            system: request.context.to_prompt_string(),
            user: user_prompt(&request.context),
        }
    }

    fn ask(&mut self, request: &DecisionRequest) -> DecisionResult<String> {
        let completion = self.completion_request(request);
        tracing::trace!(seat = %request.seat, phase = %request.phase, "completion request");
        self.backend.complete(&completion)
    }
}

/// The instruction for the requested decision, with role-conditioned hints.
pub fn user_prompt(context: &SeatContext) -> String {
    match &context.details {
        PhaseDetails::Discussion => {
            let mut prompt = String::from(
                "It's your turn to speak. Give a strategic comment about who to trust or who \
                 should be on the mission team. Be natural and conversational. Keep it to 1-2 sentences.",
            );
            match context.role {
                Role::Merlin => prompt.push_str(
                    " Subtly guide the team without revealing you know who the evil players are.",
                ),
                role if role.is_evil() => prompt.push_str(
                    " Remember to deceive and create confusion while appearing trustworthy.",
                ),
                _ => {}
            }
            prompt
        }
        PhaseDetails::TeamProposal { team_size } => format!(
            "You are the mission leader. Propose a team of {} players for this mission.\n\
             Respond ONLY with a JSON object: {{\"team\": [\"Name1\", \"Name2\", ...], \
             \"reasoning\": \"why you chose this team\"}}",
            team_size
        ),
        PhaseDetails::Vote { .. } => "Vote on this team proposal. Respond ONLY with JSON: \
             {\"vote\": \"approve\" or \"reject\", \"comment\": \"brief reason\"}"
            .to_string(),
        PhaseDetails::MissionAction { .. } => "You're on the mission. As an evil player, choose \
             'success' or 'fail' strategically. Respond with JSON: \
             {\"action\": \"success\" or \"fail\", \"reasoning\": \"why\"}"
            .to_string(),
        PhaseDetails::EvilDiscussion { .. } => "Discuss who you think Merlin is among the good \
             players. Analyze their behavior and statements in first person. Be specific. \
             Keep it to 2-3 sentences, speaking to your evil teammates."
            .to_string(),
        PhaseDetails::AssassinGuess { .. } => "Based on all the discussions and your teammates' \
             analysis, choose who you think is Merlin. Respond ONLY with JSON: \
             {\"guess\": \"PlayerName\", \"reasoning\": \"your analysis in 2-3 sentences\"}"
            .to_string(),
        PhaseDetails::Reflection { .. } => "Reflect on this game. Respond ONLY with JSON: \
             {\"self_assessment\": \"what you did well and what you could improve (2-3 sentences)\", \
             \"player_observations\": {\"PlayerName\": \"one sentence about how they played\"}}"
            .to_string(),
    }
}

impl<B: CompletionBackend> DecisionAgent for PromptAgent<B> {
    fn speak(&mut self, request: &DecisionRequest) -> DecisionResult<StatementDecision> {
        let reply = self.ask(request)?;
        parse_statement(request.phase, &reply)
    }

    fn propose_team(&mut self, request: &DecisionRequest) -> DecisionResult<TeamProposalDecision> {
        parse_team(&self.ask(request)?)
    }

    fn vote(&mut self, request: &DecisionRequest) -> DecisionResult<VoteDecision> {
        parse_vote(&self.ask(request)?)
    }

    fn mission_action(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<MissionActionDecision> {
        parse_mission_action(&self.ask(request)?)
    }

    fn assassin_guess(
        &mut self,
        request: &DecisionRequest,
    ) -> DecisionResult<AssassinGuessDecision> {
        parse_guess(&self.ask(request)?)
    }

    fn reflect(&mut self, request: &DecisionRequest) -> DecisionResult<ReflectionDecision> {
        debug_assert_eq!(request.phase, PhaseKind::Reflection);
        parse_reflection(&self.ask(request)?)
    }
}
