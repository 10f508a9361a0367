//! Streak Tracker: daily state machine over the last activity date
//!
//! Transitions, keyed on `today - last_activity_date`:
//! - no previous date → FIRST_ACTIVITY (streak = 1)
//! - 0 days → SAME_DAY (no-op)
//! - negative → BACKDATED (no-op)
//! - 1 day → CONSECUTIVE (streak + 1, freeze cleared)
//! - 2 days while frozen → FREEZE_CONSUMED (streak kept, freeze cleared)
//! - anything else → RESET (streak = 1, freeze untouched)

use chrono::NaiveDate;

use crate::types::{StreakTransition, UserStreakState};
use crate::FREEZE_GAP_DAYS;

/// Pure streak state machine
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakTracker;

impl StreakTracker {
    pub fn new() -> Self {
        Self
    }

    /// Advance `state` to `today`, returning the new state
    pub fn advance(&self, state: &UserStreakState, today: NaiveDate) -> UserStreakState {
        self.advance_with_transition(state, today).0
    }

    /// Advance and report which transition was taken
    pub fn advance_with_transition(
        &self,
        state: &UserStreakState,
        today: NaiveDate,
    ) -> (UserStreakState, StreakTransition) {
        let transition = self.compute_transition(state, today);
        let mut next = state.clone();

        match transition {
            StreakTransition::SameDay | StreakTransition::Backdated => {}
            StreakTransition::FirstActivity => {
                next.streak_count = 1;
                next.longest_streak = next.longest_streak.max(1);
                next.last_activity_date = Some(today);
            }
            StreakTransition::Consecutive => {
                next.streak_count = next.streak_count.saturating_add(1);
                next.longest_streak = next.longest_streak.max(next.streak_count);
                next.streak_frozen = false;
                next.last_activity_date = Some(today);
            }
            StreakTransition::FreezeConsumed => {
                next.streak_frozen = false;
                next.last_activity_date = Some(today);
            }
            StreakTransition::Reset => {
                // A reset never lowers the record
                next.streak_count = 1;
                next.longest_streak = next.longest_streak.max(1);
                next.last_activity_date = Some(today);
            }
        }

        (next, transition)
    }

    /// Classify `today` against the state without changing anything
    pub fn compute_transition(&self, state: &UserStreakState, today: NaiveDate) -> StreakTransition {
        let Some(last) = state.last_activity_date else {
            return StreakTransition::FirstActivity;
        };

        match (today - last).num_days() {
            gap if gap < 0 => StreakTransition::Backdated,
            0 => StreakTransition::SameDay,
            1 => StreakTransition::Consecutive,
            gap if gap == FREEZE_GAP_DAYS && state.streak_frozen => StreakTransition::FreezeConsumed,
            // Longer gaps reset even while frozen
            _ => StreakTransition::Reset,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
