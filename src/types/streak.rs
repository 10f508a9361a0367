//! Streak state and the transitions the tracker can take

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Per-user streak snapshot
///
/// Created at registration with a zero streak and no activity date.
/// Only the streak tracker produces new values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStreakState {
    pub user_id: UserId,
    /// Consecutive active days
    pub streak_count: u32,
    /// Never below `streak_count`, never decreases
    pub longest_streak: u32,
    /// Calendar date of the last recorded activity
    pub last_activity_date: Option<NaiveDate>,
    /// One-time protection across a single missed day
    pub streak_frozen: bool,
}

impl UserStreakState {
    /// Fresh state for a newly registered user
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            streak_count: 0,
            longest_streak: 0,
            last_activity_date: None,
            streak_frozen: false,
        }
    }
}

/// Which branch of the streak state machine was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreakTransition {
    /// No prior activity, streak starts at 1
    FirstActivity,
    /// Already active today
    SameDay,
    /// Active yesterday, streak grows
    Consecutive,
    /// One day missed while frozen, streak kept
    FreezeConsumed,
    /// Gap too large, streak restarts at 1
    Reset,
    /// Today precedes the last activity date
    Backdated,
}

impl StreakTransition {
    /// Code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::FirstActivity => "FIRST_ACTIVITY",
            Self::SameDay => "SAME_DAY",
            Self::Consecutive => "CONSECUTIVE",
            Self::FreezeConsumed => "FREEZE_CONSUMED",
            Self::Reset => "RESET",
            Self::Backdated => "BACKDATED",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstActivity => "First activity, streak started",
            Self::SameDay => "Already active today",
            Self::Consecutive => "Streak extended",
            Self::FreezeConsumed => "Streak freeze used, streak kept",
            Self::Reset => "Streak lost, started over",
            Self::Backdated => "Date before last activity, ignored",
        }
    }

    /// True if the transition left the state untouched
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::SameDay | Self::Backdated)
    }
}

impl std::fmt::Display for StreakTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
