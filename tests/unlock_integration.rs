//! Integration tests for course and unit unlocking
//!
//! Tests the path: seed → ProgressionUnlocker → annotated tree

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use puolingo::core::{ProgressionUnlocker, Seed};
use puolingo::types::{Course, Lesson, LessonId, Unit};

const BUNDLED_SEED: &str = include_str!("../seed/curriculum.json");

fn unit(id: u64, order_index: i32, lessons: &[LessonId]) -> Unit {
    Unit {
        id,
        title: format!("Unit {}", id),
        description: None,
        order_index,
        lessons: lessons
            .iter()
            .enumerate()
            .map(|(i, &lid)| Lesson::new(lid, format!("L{}", lid), i as i32))
            .collect(),
    }
}

fn course(units: Vec<Unit>) -> Course {
    Course {
        id: 1,
        title: "Course".to_string(),
        description: None,
        image_src: None,
        order_index: 0,
        units,
    }
}

/// Unit 1 done → unit 2 open but not done
#[test]
fn test_completed_unit_opens_next() {
    let c = course(vec![unit(1, 0, &[1, 2]), unit(2, 1, &[3])]);
    let completed: HashSet<LessonId> = [1, 2].into_iter().collect();

    let view = ProgressionUnlocker::new().compute_course(&c, &completed);
    let u1 = view.unit(1).unwrap();
    let u2 = view.unit(2).unwrap();

    assert_eq!((u1.locked, u1.completed), (false, true));
    assert_eq!((u2.locked, u2.completed), (false, false));
}

/// Empty unit 1 does not block unit 2
#[test]
fn test_empty_unit_does_not_block() {
    let c = course(vec![unit(1, 0, &[]), unit(2, 1, &[3])]);

    let view = ProgressionUnlocker::new().compute_course(&c, &HashSet::new());
    assert!(view.unit(1).unwrap().completed);
    assert!(!view.unit(2).unwrap().locked);
}

/// Walking the bundled course: each finished unit opens exactly the next one
#[test]
fn test_bundled_course_unlocks_in_order() {
    let seed = Seed::from_json(BUNDLED_SEED).unwrap();
    let unlocker = ProgressionUnlocker::new();
    let lesson_ids: Vec<LessonId> = {
        let tree = unlocker.compute_tree(&seed.courses, &HashSet::new());
        tree[0]
            .units
            .iter()
            .flat_map(|u| u.lessons.iter().map(|l| l.id))
            .collect()
    };

    let mut completed: HashSet<LessonId> = HashSet::new();
    for (done, lesson) in lesson_ids.iter().enumerate() {
        let tree = unlocker.compute_tree(&seed.courses, &completed);
        let units = &tree[0].units;
        let open = units.iter().filter(|u| !u.locked).count();
        // every unit in this course holds one lesson
        assert_eq!(open, (done + 1).min(units.len()));
        completed.insert(*lesson);
    }

    let tree = unlocker.compute_tree(&seed.courses, &completed);
    assert!(tree[0].completed);
    assert!(tree[0].units.iter().all(|u| !u.locked && u.completed));
}

/// Unknown lesson ids are ignored
#[test]
fn test_unknown_ids_ignored() {
    let seed = Seed::from_json(BUNDLED_SEED).unwrap();
    let unlocker = ProgressionUnlocker::new();
    let junk: HashSet<LessonId> = [900, 901].into_iter().collect();

    assert_eq!(
        unlocker.compute_tree(&seed.courses, &junk),
        unlocker.compute_tree(&seed.courses, &HashSet::new())
    );
}
