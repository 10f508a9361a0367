//! Activity composition: streak advance feeding quest evaluation
//!
//! Produces a `ProgressDelta` the store commits in one step. Nothing here
//! touches storage, so a crashed commit can be recomputed from the same
//! snapshot.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::core::{QuestAwarder, StreakTracker};
use crate::types::{ProgressDelta, Quest, QuestId, UserQuestAward, UserStreakState};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressEngine {
    tracker: StreakTracker,
    awarder: QuestAwarder,
}

impl ProgressEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one activity worth `lesson_points` on `today`
    pub fn record_activity(
        &self,
        streak: &UserStreakState,
        today: NaiveDate,
        catalog: &[Quest],
        already_awarded: &HashSet<QuestId>,
        lesson_points: i64,
    ) -> ProgressDelta {
        let (next, transition) = self.tracker.advance_with_transition(streak, today);
        let eval = self.awarder.evaluate(next.streak_count, already_awarded, catalog);

        let awards = eval
            .newly_awarded
            .iter()
            .map(|quest| UserQuestAward {
                user_id: streak.user_id,
                quest_id: quest.id,
                completion_date: today,
            })
            .collect();

        ProgressDelta {
            streak: next,
            transition,
            awards,
            quests: eval.newly_awarded,
            quest_points: eval.points_delta,
            xp_delta: lesson_points,
            points_delta: lesson_points.saturating_add(eval.points_delta),
        }
    }
}
