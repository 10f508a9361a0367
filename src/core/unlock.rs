//! Progression Unlocker: locked/completed flags over the content tree
//!
//! Rules, applied to courses and to the units inside each course:
//! - a node is completed when every lesson below it is completed
//!   (a node with no lessons counts as completed)
//! - the first sibling is never locked
//! - sibling N is locked when sibling N-1 is not completed

use std::collections::HashSet;

use crate::types::{
    Course, CourseView, LessonId, LessonView, Ordered, Unit, UnitView,
};

/// Pure tree annotator
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressionUnlocker;

impl ProgressionUnlocker {
    pub fn new() -> Self {
        Self
    }

    /// Annotate all courses, sorted by (`order_index`, id)
    pub fn compute_tree(&self, courses: &[Course], completed: &HashSet<LessonId>) -> Vec<CourseView> {
        let mut views: Vec<CourseView> = sorted(courses)
            .into_iter()
            .map(|course| self.compute_course(course, completed))
            .collect();

        let flags: Vec<bool> = views.iter().map(|c| c.completed).collect();
        for (view, locked) in views.iter_mut().zip(lock_flags(&flags)) {
            view.locked = locked;
        }
        views
    }

    /// Annotate one course in isolation (its own `locked` stays false)
    pub fn compute_course(&self, course: &Course, completed: &HashSet<LessonId>) -> CourseView {
        let mut units: Vec<UnitView> = sorted(&course.units)
            .into_iter()
            .map(|unit| self.compute_unit(unit, completed))
            .collect();

        let flags: Vec<bool> = units.iter().map(|u| u.completed).collect();
        for (unit, locked) in units.iter_mut().zip(lock_flags(&flags)) {
            unit.locked = locked;
        }

        CourseView {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            image_src: course.image_src.clone(),
            order_index: course.order_index,
            locked: false,
            completed: course.lesson_ids().all(|id| completed.contains(&id)),
            units,
        }
    }

    fn compute_unit(&self, unit: &Unit, completed: &HashSet<LessonId>) -> UnitView {
        let lessons: Vec<LessonView> = sorted(&unit.lessons)
            .into_iter()
            .map(|lesson| LessonView {
                id: lesson.id,
                title: lesson.title.clone(),
                order_index: lesson.order_index,
                completed: completed.contains(&lesson.id),
            })
            .collect();

        UnitView {
            id: unit.id,
            title: unit.title.clone(),
            description: unit.description.clone(),
            order_index: unit.order_index,
            locked: false,
            // vacuously true for an empty unit
            completed: lessons.iter().all(|l| l.completed),
            lessons,
        }
    }
}

/// One left-to-right pass: each entry is locked iff its predecessor is not
/// completed
pub(crate) fn lock_flags(completed: &[bool]) -> Vec<bool> {
    let mut prev_completed = true;
    completed
        .iter()
        .map(|&done| {
            let locked = !prev_completed;
            prev_completed = done;
            locked
        })
        .collect()
}

fn sorted<T: Ordered>(items: &[T]) -> Vec<&T> {
    let mut refs: Vec<&T> = items.iter().collect();
    refs.sort_by_key(|item| item.sort_key());
    refs
}

// =============================================================================
// TESTS
// =============================================================================
