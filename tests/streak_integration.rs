//! Integration tests for streaks and quests
//!
//! Tests the path: date → StreakTracker → QuestAwarder → delta

use std::collections::HashSet;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use puolingo::core::{ProgressEngine, QuestAwarder, Seed, StreakTracker};
use puolingo::types::{Quest, QuestId, StreakTransition, UserStreakState};

const BUNDLED_SEED: &str = include_str!("../seed/curriculum.json");

fn day(d: u32) -> NaiveDate {
    // January 2024 starts on a Monday
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn state(streak: u32, last: NaiveDate, frozen: bool) -> UserStreakState {
    UserStreakState {
        user_id: 1,
        streak_count: streak,
        longest_streak: streak,
        last_activity_date: Some(last),
        streak_frozen: frozen,
    }
}

/// Monday → Tuesday extends the streak
#[test]
fn test_next_day_extends_streak() {
    let next = StreakTracker::new().advance(&state(3, day(1), false), day(2));
    assert_eq!(next.streak_count, 4);
    assert_eq!(next.last_activity_date, Some(day(2)));
}

/// Monday → Thursday resets
#[test]
fn test_three_day_gap_resets() {
    let next = StreakTracker::new().advance(&state(3, day(1), false), day(4));
    assert_eq!(next.streak_count, 1);
    assert_eq!(next.last_activity_date, Some(day(4)));
}

/// Monday → Wednesday with a freeze keeps the streak
#[test]
fn test_freeze_keeps_streak() {
    let next = StreakTracker::new().advance(&state(5, day(1), true), day(3));
    assert_eq!(next.streak_count, 5);
    assert!(!next.streak_frozen);
    assert_eq!(next.last_activity_date, Some(day(3)));
}

/// Catalog {1, 3, 7} at streak 3 awards the first two
#[test]
fn test_catalog_threshold_awards() {
    let catalog: Vec<Quest> = [(1, 1, 10), (2, 3, 30), (3, 7, 100)]
        .into_iter()
        .map(|(id, required_streak, points)| Quest {
            id,
            title: format!("Day {}", required_streak),
            description: String::new(),
            required_streak,
            points,
        })
        .collect();

    let eval = QuestAwarder::new().evaluate(3, &HashSet::new(), &catalog);
    let req: Vec<u32> = eval.newly_awarded.iter().map(|q| q.required_streak).collect();
    assert_eq!(req, vec![1, 3]);
    assert_eq!(eval.points_delta, 40);
}

/// A month of daily practice with the bundled catalog
#[test]
fn test_month_of_practice_with_bundled_quests() {
    let seed = Seed::from_json(BUNDLED_SEED).unwrap();
    let engine = ProgressEngine::new();
    let start = day(1);

    let mut streak = UserStreakState::new(1);
    let mut awarded: HashSet<QuestId> = HashSet::new();
    let mut quest_points = 0;

    for offset in 0..30 {
        let today = start + chrono::Duration::days(offset);
        let delta = engine.record_activity(&streak, today, &seed.quests, &awarded, 10);
        for award in &delta.awards {
            assert!(awarded.insert(award.quest_id), "quest {} awarded twice", award.quest_id);
        }
        quest_points += delta.quest_points;
        streak = delta.streak;
    }

    assert_eq!(streak.streak_count, 30);
    assert_eq!(streak.longest_streak, 30);
    assert_eq!(awarded.len(), 5);
    assert_eq!(quest_points, 10 + 30 + 100 + 250 + 1000);
}

/// A break after a long run restarts the count but keeps the record and
/// never re-awards earlier quests
#[test]
fn test_break_keeps_record_and_awards() {
    let seed = Seed::from_json(BUNDLED_SEED).unwrap();
    let engine = ProgressEngine::new();

    let mut streak = UserStreakState::new(1);
    let mut awarded: HashSet<QuestId> = HashSet::new();
    let mut transitions = Vec::new();

    for d in [1, 2, 3, 4, 10, 11, 12] {
        let delta = engine.record_activity(&streak, day(d), &seed.quests, &awarded, 10);
        for award in &delta.awards {
            assert!(awarded.insert(award.quest_id));
        }
        transitions.push(delta.transition);
        streak = delta.streak;
    }

    assert_eq!(transitions[4], StreakTransition::Reset);
    assert_eq!(streak.streak_count, 3);
    assert_eq!(streak.longest_streak, 4);
    let mut ids: Vec<QuestId> = awarded.into_iter().collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
}

/// Same-day and backdated calls never change the state
#[test]
fn test_repeat_and_backdated_calls_are_noops() {
    let tracker = StreakTracker::new();
    let s = tracker.advance(&state(2, day(5), true), day(6));

    for d in [day(6), day(6), day(3), day(1)] {
        assert_eq!(tracker.advance(&s, d), s);
    }
}
