//! Quest Awarder: streak-threshold rewards, at most once per user

use std::collections::HashSet;

use crate::types::{Quest, QuestEvaluation, QuestId};

/// Pure quest evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestAwarder;

impl QuestAwarder {
    pub fn new() -> Self {
        Self
    }

    /// Award every catalog quest reached by `streak_count` that is not in
    /// `already_awarded`
    ///
    /// Awarded ids missing from the catalog are ignored. A quest id listed
    /// twice in the catalog is awarded once.
    pub fn evaluate(
        &self,
        streak_count: u32,
        already_awarded: &HashSet<QuestId>,
        catalog: &[Quest],
    ) -> QuestEvaluation {
        let mut seen: HashSet<QuestId> = HashSet::new();
        let mut result = QuestEvaluation::default();

        for quest in catalog {
            if quest.required_streak > streak_count || already_awarded.contains(&quest.id) {
                continue;
            }
            if !seen.insert(quest.id) {
                continue;
            }
            result.points_delta = result.points_delta.saturating_add(quest.points);
            result.newly_awarded.push(quest.clone());
        }

        result
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quest(id: QuestId, required_streak: u32, points: i64) -> Quest {
        Quest {
            id,
            title: format!("Day {}", required_streak),
            description: String::new(),
            required_streak,
            points,
        }
    }

    fn catalog() -> Vec<Quest> {
        vec![quest(1, 1, 10), quest(2, 3, 30), quest(3, 7, 100)]
    }

    fn ids(eval: &QuestEvaluation) -> Vec<QuestId> {
        eval.newly_awarded.iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_awards_all_reached_thresholds() {
        let awarder = QuestAwarder::new();
        let eval = awarder.evaluate(3, &HashSet::new(), &catalog());

        assert_eq!(ids(&eval), vec![1, 2]);
        assert_eq!(eval.points_delta, 40);
    }

    #[test]
    fn test_zero_streak_awards_nothing() {
        let awarder = QuestAwarder::new();
        let eval = awarder.evaluate(0, &HashSet::new(), &catalog());

        assert!(eval.is_empty());
        assert_eq!(eval.points_delta, 0);
    }

    #[test]
    fn test_skips_already_awarded() {
        let awarder = QuestAwarder::new();
        let awarded: HashSet<QuestId> = [1].into_iter().collect();
        let eval = awarder.evaluate(7, &awarded, &catalog());

        assert_eq!(ids(&eval), vec![2, 3]);
        assert_eq!(eval.points_delta, 130);
    }

    #[test]
    fn test_unknown_awarded_ids_do_not_block() {
        let awarder = QuestAwarder::new();
        let awarded: HashSet<QuestId> = [42, 99].into_iter().collect();
        let eval = awarder.evaluate(1, &awarded, &catalog());

        assert_eq!(ids(&eval), vec![1]);
    }

    #[test]
    fn test_duplicate_catalog_entry_awarded_once() {
        let awarder = QuestAwarder::new();
        let mut cat = catalog();
        cat.push(quest(1, 1, 10));
        let eval = awarder.evaluate(1, &HashSet::new(), &cat);

        assert_eq!(ids(&eval), vec![1]);
        assert_eq!(eval.points_delta, 10);
    }

    #[test]
    fn test_exactly_once_over_a_sequence() {
        let awarder = QuestAwarder::new();
        let cat = catalog();
        let mut awarded: HashSet<QuestId> = HashSet::new();
        let mut all: Vec<QuestId> = Vec::new();

        for streak in [1, 1, 2, 3, 3, 5, 7, 7, 8, 12] {
            let eval = awarder.evaluate(streak, &awarded, &cat);
            for q in &eval.newly_awarded {
                assert!(awarded.insert(q.id), "quest {} awarded twice", q.id);
                all.push(q.id);
            }
        }

        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn test_points_saturate_on_huge_catalog() {
        let awarder = QuestAwarder::new();
        let cat = vec![quest(1, 1, i64::MAX), quest(2, 1, 500)];
        let eval = awarder.evaluate(1, &HashSet::new(), &cat);

        assert_eq!(ids(&eval), vec![1, 2]);
        assert_eq!(eval.points_delta, i64::MAX);
    }
}
