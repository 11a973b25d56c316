//! Decoding of free-text agent replies into typed decisions.
//!
//! Replies are expected to carry one JSON object. Prose or code fences around
//! the object are tolerated; anything else is an `Unparseable` error.

use std::collections::BTreeMap;

use avalon_rules::{MissionActionKind, SeatName, VoteChoice};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    AssassinGuessDecision, DecisionResult, MissionActionDecision, PhaseKind, ReflectionDecision,
    StatementDecision, TeamProposalDecision, VoteDecision,
};
use crate::error::DecisionError;

#[derive(Deserialize)]
struct TeamReply {
    team: Vec<String>,
    #[serde(default)]
    reasoning: String,
}

#[derive(Deserialize)]
struct VoteReply {
    vote: String,
    #[serde(default)]
    comment: String,
}

#[derive(Deserialize)]
struct ActionReply {
    action: String,
    #[serde(default)]
    reasoning: String,
}

#[derive(Deserialize)]
struct GuessReply {
    guess: String,
    #[serde(default)]
    reasoning: String,
}

#[derive(Deserialize)]
struct ReflectionReply {
    self_assessment: String,
    #[serde(default)]
    player_observations: BTreeMap<String, String>,
}

/// The outermost `{...}` span of a reply, if any.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn unparseable(phase: PhaseKind, reason: impl Into<String>) -> DecisionError {
    DecisionError::Unparseable {
        phase,
        reason: reason.into(),
    }
}

fn decode<T: DeserializeOwned>(phase: PhaseKind, text: &str) -> DecisionResult<T> {
    let body = extract_json(text).ok_or_else(|| unparseable(phase, "no JSON object in reply"))?;
    serde_json::from_str(body).map_err(|e| unparseable(phase, e.to_string()))
}

/// A statement is the trimmed reply text itself.
pub fn parse_statement(phase: PhaseKind, text: &str) -> DecisionResult<StatementDecision> {
    let content = text.trim();
    if content.is_empty() {
        return Err(unparseable(phase, "empty statement"));
    }
    Ok(StatementDecision {
        content: content.to_string(),
    })
}

pub fn parse_team(text: &str) -> DecisionResult<TeamProposalDecision> {
    let reply: TeamReply = decode(PhaseKind::TeamProposal, text)?;
    Ok(TeamProposalDecision {
        team: reply
            .team
            .into_iter()
            .map(|name| SeatName::new(name.trim()))
            .collect(),
        rationale: reply.reasoning,
    })
}

pub fn parse_vote(text: &str) -> DecisionResult<VoteDecision> {
    let reply: VoteReply = decode(PhaseKind::Vote, text)?;
    let choice = match reply.vote.trim().to_ascii_lowercase().as_str() {
        "approve" => VoteChoice::Approve,
        "reject" => VoteChoice::Reject,
        other => return Err(unparseable(PhaseKind::Vote, format!("unknown vote {:?}", other))),
    };
    Ok(VoteDecision {
        choice,
        comment: reply.comment,
    })
}

pub fn parse_mission_action(text: &str) -> DecisionResult<MissionActionDecision> {
    let reply: ActionReply = decode(PhaseKind::MissionAction, text)?;
    let action = match reply.action.trim().to_ascii_lowercase().as_str() {
        "success" => MissionActionKind::Success,
        "fail" => MissionActionKind::Fail,
        other => {
            return Err(unparseable(
                PhaseKind::MissionAction,
                format!("unknown action {:?}", other),
            ))
        }
    };
    Ok(MissionActionDecision {
        action,
        rationale: reply.reasoning,
    })
}

pub fn parse_guess(text: &str) -> DecisionResult<AssassinGuessDecision> {
    let reply: GuessReply = decode(PhaseKind::AssassinGuess, text)?;
    Ok(AssassinGuessDecision {
        guess: SeatName::new(reply.guess.trim()),
        rationale: reply.reasoning,
    })
}

pub fn parse_reflection(text: &str) -> DecisionResult<ReflectionDecision> {
    let reply: ReflectionReply = decode(PhaseKind::Reflection, text)?;
    Ok(ReflectionDecision {
        self_assessment: reply.self_assessment,
        observations: reply
            .player_observations
            .into_iter()
            .map(|(name, note)| (SeatName::new(name), note))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_fence() {
        let reply = "Sure!\n```json\n{\"vote\": \"approve\"}\n```";
        assert_eq!(extract_json(reply), Some("{\"vote\": \"approve\"}"));
        assert_eq!(extract_json("no object here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_parse_team() {
        let decision =
            parse_team(r#"{"team": ["Alice", " Bob "], "reasoning": "clean record"}"#).unwrap();
        assert_eq!(decision.team, vec![SeatName::from("Alice"), SeatName::from("Bob")]);
        assert_eq!(decision.rationale, "clean record");
    }

    #[test]
    fn test_parse_team_missing_field() {
        let err = parse_team(r#"{"players": ["Alice"]}"#).unwrap_err();
        assert!(matches!(
            err,
            DecisionError::Unparseable {
                phase: PhaseKind::TeamProposal,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_vote() {
        let vote = parse_vote(r#"I think {"vote": "Reject", "comment": "too risky"}"#).unwrap();
        assert_eq!(vote.choice, VoteChoice::Reject);
        assert_eq!(vote.comment, "too risky");

        assert!(parse_vote(r#"{"vote": "maybe"}"#).is_err());
    }

    #[test]
    fn test_parse_mission_action() {
        let action = parse_mission_action(r#"{"action": "success", "reasoning": "lay low"}"#)
            .unwrap();
        assert_eq!(action.action, MissionActionKind::Success);
        assert!(parse_mission_action("fail").is_err());
    }

    #[test]
    fn test_parse_guess_and_reflection() {
        let guess = parse_guess(r#"{"guess": "Alice", "reasoning": "too accurate"}"#).unwrap();
        assert_eq!(guess.guess, SeatName::from("Alice"));

        let reflection = parse_reflection(
            r#"{"self_assessment": "I pushed too hard", "player_observations": {"Eve": "quiet evil"}}"#,
        )
        .unwrap();
        assert_eq!(reflection.self_assessment, "I pushed too hard");
        assert_eq!(
            reflection.observations.get(&SeatName::from("Eve")).map(String::as_str),
            Some("quiet evil")
        );
    }

    #[test]
    fn test_parse_statement() {
        assert_eq!(
            parse_statement(PhaseKind::Discussion, "  Bob looks fine.\n")
                .unwrap()
                .content,
            "Bob looks fine."
        );
        assert!(parse_statement(PhaseKind::Discussion, "   ").is_err());
    }
}
