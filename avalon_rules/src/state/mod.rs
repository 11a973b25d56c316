//! Game state - scores and leadership threaded through every transition.

use serde::{Deserialize, Serialize};

use crate::entities::Alignment;
use crate::mission::MissionResult;

/// Missions in a full game.
pub const MAX_MISSIONS: usize = 5;

/// Mission results one side needs to end the game.
pub const MISSIONS_TO_WIN: usize = 3;

/// Proposal attempts per mission; the last one is accepted without a vote.
pub const MAX_PROPOSALS: usize = 5;

/// Where the game stands after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    /// Good reached its success threshold; the assassin decides the winner.
    AwaitingAssassination,
    /// Evil reached its fail threshold and wins outright.
    EvilVictory,
}

/// Scores, leader position and the next mission number.
///
/// Transitions consume the state and return the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 1-based number of the next mission to play.
    pub mission_number: usize,
    /// Table position of the current leader.
    pub leader: usize,
    pub good_successes: usize,
    pub evil_fails: usize,
    seat_count: usize,
}

impl GameState {
    /// Fresh state with the given starting leader.
    pub fn new(seat_count: usize, leader: usize) -> Self {
        Self {
            mission_number: 1,
            leader: leader % seat_count.max(1),
            good_successes: 0,
            evil_fails: 0,
            seat_count,
        }
    }

    pub fn seat_count(&self) -> usize {
        self.seat_count
    }

    pub fn missions_played(&self) -> usize {
        self.mission_number - 1
    }

    /// Hand leadership to a specific table position, e.g. where a proposal loop ended.
    pub fn with_leader(self, leader: usize) -> Self {
        Self {
            leader: leader % self.seat_count.max(1),
            ..self
        }
    }

    /// Pass leadership to the next seat, wrapping around the table.
    pub fn rotate_leader(self) -> Self {
        Self {
            leader: (self.leader + 1) % self.seat_count.max(1),
            ..self
        }
    }

    /// Score a completed mission, advance the mission number and rotate the leader.
    pub fn record_mission(self, result: MissionResult) -> Self {
        let (good_successes, evil_fails) = match result {
            MissionResult::Success => (self.good_successes + 1, self.evil_fails),
            MissionResult::Fail => (self.good_successes, self.evil_fails + 1),
        };
        Self {
            mission_number: self.mission_number + 1,
            good_successes,
            evil_fails,
            ..self
        }
        .rotate_leader()
    }

    pub fn status(&self) -> GameStatus {
        if self.good_successes >= MISSIONS_TO_WIN {
            GameStatus::AwaitingAssassination
        } else if self.evil_fails >= MISSIONS_TO_WIN {
            GameStatus::EvilVictory
        } else {
            GameStatus::InProgress
        }
    }

    /// True once either side reached three or all missions were played.
    pub fn is_over(&self) -> bool {
        self.status() != GameStatus::InProgress || self.missions_played() >= MAX_MISSIONS
    }
}

/// Final winner given the state and the assassin's verdict, if one was made.
///
/// Good reaching three successes hands the decision to the assassin: a correct
/// guess wins for evil, anything else for good. Otherwise evil wins.
pub fn decide_winner(state: &GameState, assassin_correct: Option<bool>) -> Alignment {
    match state.status() {
        GameStatus::AwaitingAssassination => match assassin_correct {
            Some(true) => Alignment::Evil,
            Some(false) | None => Alignment::Good,
        },
        GameStatus::EvilVictory | GameStatus::InProgress => Alignment::Evil,
    }
}
