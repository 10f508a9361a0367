//! Lesson progress rows and the delta produced by one activity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LessonId, Quest, StreakTransition, UserId, UserQuestAward, UserStreakState};

/// One user's record for one lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub completed: bool,
    pub hearts_used: u32,
    pub points_earned: i64,
    pub updated_at: DateTime<Utc>,
}

/// Everything one activity changes for a user, applied by the store in a
/// single commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDelta {
    /// Streak state after the activity
    pub streak: UserStreakState,
    pub transition: StreakTransition,
    /// Awards to insert
    pub awards: Vec<UserQuestAward>,
    /// Quests behind `awards`, same order
    pub quests: Vec<Quest>,
    /// Points coming from quests alone
    pub quest_points: i64,
    pub xp_delta: i64,
    /// Lesson points plus quest points
    pub points_delta: i64,
}

/// Response to a lesson completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonCompletion {
    pub progress: LessonProgress,
    pub transition: StreakTransition,
    pub streak_count: u32,
    pub longest_streak: u32,
    pub quests_awarded: Vec<Quest>,
    pub points: i64,
    pub xp: i64,
}
