//! Mission resolution from team members' cards.

use serde::{Deserialize, Serialize};

use super::{MissionAction, MissionActionKind, MissionResult};
use crate::entities::Seat;

/// Result and fail-card count of an executed mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionResolution {
    pub result: MissionResult,
    pub fail_count: usize,
}

/// Computes mission outcomes. A single fail card fails the mission for every
/// player count and mission number.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissionResolver;

impl MissionResolver {
    /// The card a team member actually plays. Good seats always play success;
    /// only evil seats may turn in the card they chose.
    pub fn card_for(seat: &Seat, chosen: Option<MissionActionKind>) -> MissionAction {
        let action = if seat.is_good() {
            MissionActionKind::Success
        } else {
            chosen.unwrap_or(MissionActionKind::Fail)
        };
        MissionAction {
            seat: seat.name.clone(),
            action,
        }
    }

    pub fn resolve(actions: &[MissionAction]) -> MissionResolution {
        let fail_count = actions
            .iter()
            .filter(|a| a.action == MissionActionKind::Fail)
            .count();
        let result = if fail_count > 0 {
            MissionResult::Fail
        } else {
            MissionResult::Success
        };
        MissionResolution { result, fail_count }
    }
}
