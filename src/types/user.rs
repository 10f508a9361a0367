//! User account records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserStreakState};
use crate::MAX_HEARTS;

/// Stored user with game counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub hearts: u32,
    pub points: i64,
    pub xp: i64,
    #[serde(flatten)]
    pub streak: UserStreakState,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// New account: full hearts, no points, fresh streak
    pub fn new(id: UserId, email: impl Into<String>, full_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            full_name,
            hearts: MAX_HEARTS,
            points: 0,
            xp: 0,
            streak: UserStreakState::new(id),
            created_at: Utc::now(),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Row on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub xp: i64,
    pub streak_count: u32,
}
