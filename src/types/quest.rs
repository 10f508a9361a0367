//! Quest catalog and award records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{QuestId, UserId};

/// Streak-threshold reward from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Streak needed to earn the quest (at least 1)
    pub required_streak: u32,
    /// Points granted on award
    pub points: i64,
}

/// A quest granted to a user; at most one per (user, quest)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuestAward {
    pub user_id: UserId,
    pub quest_id: QuestId,
    pub completion_date: NaiveDate,
}

/// Outcome of one quest evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestEvaluation {
    pub newly_awarded: Vec<Quest>,
    pub points_delta: i64,
}

impl QuestEvaluation {
    pub fn is_empty(&self) -> bool {
        self.newly_awarded.is_empty()
    }
}

/// Catalog entry with the caller's completion flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestProgress {
    #[serde(flatten)]
    pub quest: Quest,
    pub completed: bool,
}
