//! Seed file: the content tree and quest catalog
//!
//! Content authoring hands the engine a JSON document:
//! `{ "courses": [ { ..., "units": [ { ..., "lessons": [ { ..., "challenges": [...] } ] } ] } ], "quests": [...] }`

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::types::{Course, Ordered, Quest};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

impl Seed {
    /// Parse and validate a seed document
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Seed = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reject ids reused at one level and zero-streak quests
    pub fn validate(&self) -> Result<()> {
        let mut courses = HashSet::new();
        let mut units = HashSet::new();
        let mut lessons = HashSet::new();
        let mut challenges = HashSet::new();
        let mut quests = HashSet::new();

        for course in &self.courses {
            if !courses.insert(course.id) {
                return Err(StoreError::DuplicateId { kind: "course", id: course.id });
            }
            for unit in &course.units {
                if !units.insert(unit.id) {
                    return Err(StoreError::DuplicateId { kind: "unit", id: unit.id });
                }
                for lesson in &unit.lessons {
                    if !lessons.insert(lesson.id) {
                        return Err(StoreError::DuplicateId { kind: "lesson", id: lesson.id });
                    }
                    for challenge in &lesson.challenges {
                        if !challenges.insert(challenge.id) {
                            return Err(StoreError::DuplicateId { kind: "challenge", id: challenge.id });
                        }
                    }
                }
            }
        }

        for quest in &self.quests {
            if quest.required_streak < 1 {
                return Err(StoreError::InvalidQuest {
                    id: quest.id,
                    required_streak: quest.required_streak,
                });
            }
            if !quests.insert(quest.id) {
                return Err(StoreError::DuplicateId { kind: "quest", id: quest.id });
            }
        }

        Ok(())
    }

    pub fn lesson_count(&self) -> usize {
        self.courses.iter().map(|c| c.lesson_ids().count()).sum()
    }

    /// Put every sibling list in `(order_index, id)` order; options by id
    pub fn sort(&mut self) {
        self.courses.sort_by_key(|c| c.sort_key());
        for course in &mut self.courses {
            course.units.sort_by_key(|u| u.sort_key());
            for unit in &mut course.units {
                unit.lessons.sort_by_key(|l| l.sort_key());
                for lesson in &mut unit.lessons {
                    lesson.challenges.sort_by_key(|c| c.sort_key());
                    for challenge in &mut lesson.challenges {
                        challenge.options.sort_by_key(|o| o.id);
                    }
                }
            }
        }
        self.quests.sort_by_key(|q| (q.required_streak, q.id));
    }
}

/// Load a seed from a JSON file
pub fn load_seed(path: impl AsRef<Path>) -> Result<Seed> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let seed = Seed::from_json(&json)?;
    info!(
        path = %path.display(),
        courses = seed.courses.len(),
        lessons = seed.lesson_count(),
        quests = seed.quests.len(),
        "Loaded seed"
    );
    Ok(seed)
}

/// Write a seed as pretty JSON, creating parent directories
pub fn save_seed(seed: &Seed, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(seed)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "courses": [
            { "id": 1, "title": "Setswana", "units": [
                { "id": 1, "title": "Basics", "order_index": 1, "lessons": [
                    { "id": 1, "title": "Greetings", "order_index": 1, "challenges": [
                        { "id": 2, "type": "TRANSLATE", "question": "Translate: 'Hello sir'",
                          "correct_text": "Dumela rra", "order_index": 2, "options": [
                            { "id": 4, "text": "rra", "correct": true },
                            { "id": 3, "text": "Dumela", "correct": true }
                        ]},
                        { "id": 1, "type": "MATCH", "question": "Match the formal greetings", "order_index": 1 }
                    ]},
                    { "id": 2, "title": "Verbs", "order_index": 2 }
                ]}
            ]}
        ],
        "quests": [
            { "id": 1, "title": "Day 1", "required_streak": 1, "points": 10 }
        ]
    }"#;

    #[test]
    fn test_parse_seed() {
        let seed = Seed::from_json(SEED).unwrap();
        assert_eq!(seed.courses.len(), 1);
        assert_eq!(seed.lesson_count(), 2);
        assert_eq!(seed.quests[0].description, "");
    }

    #[test]
    fn test_rejects_zero_streak_quest() {
        let json = SEED.replace("\"required_streak\": 1", "\"required_streak\": 0");
        let err = Seed::from_json(&json).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuest { id: 1, required_streak: 0 }));
    }

    #[test]
    fn test_rejects_duplicate_lesson() {
        let json = SEED.replace("\"id\": 2, \"title\": \"Verbs\"", "\"id\": 1, \"title\": \"Verbs\"");
        let err = Seed::from_json(&json).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { kind: "lesson", id: 1 }));
    }

    #[test]
    fn test_parse_challenges() {
        let seed = Seed::from_json(SEED).unwrap();
        let lesson = seed.courses[0].find_lesson(1).unwrap();

        assert_eq!(lesson.challenges.len(), 2);
        assert_eq!(lesson.challenges[0].kind, "TRANSLATE");
        assert_eq!(lesson.challenges[0].correct_text.as_deref(), Some("Dumela rra"));
        assert!(lesson.challenges[1].options.is_empty());
        assert!(seed.courses[0].find_lesson(2).unwrap().challenges.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_challenge() {
        let json = SEED.replace("{ \"id\": 1, \"type\": \"MATCH\"", "{ \"id\": 2, \"type\": \"MATCH\"");
        let err = Seed::from_json(&json).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { kind: "challenge", id: 2 }));
    }

    #[test]
    fn test_sort_orders_challenges_and_options() {
        let mut seed = Seed::from_json(SEED).unwrap();
        seed.sort();
        let lesson = seed.courses[0].find_lesson(1).unwrap();

        let order: Vec<u64> = lesson.challenges.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![1, 2]);
        let options: Vec<&str> = lesson.challenges[1].options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(options, vec!["Dumela", "rra"]);
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(Seed::from_json("{ nope"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_save_then_load() {
        let seed = Seed::from_json(SEED).unwrap();
        let path = std::env::temp_dir()
            .join(format!("puolingo-seed-{}", std::process::id()))
            .join("seed.json");

        save_seed(&seed, &path).unwrap();
        let loaded = load_seed(&path).unwrap();
        assert_eq!(loaded.courses, seed.courses);
        assert_eq!(loaded.quests, seed.quests);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
