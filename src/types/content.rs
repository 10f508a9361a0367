//! Content tree: Course → Unit → Lesson → Challenge
//!
//! The plain tree is owned by content authoring and loaded from the seed
//! file. The `*View` types are the annotated output of the unlocker; their
//! `locked`/`completed` flags are derived on every read and never stored.

use serde::{Deserialize, Serialize};

use crate::types::{ChallengeId, CourseId, LessonId, UnitId};

/// One answer choice of a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOption {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(default)]
    pub audio_src: Option<String>,
}

/// Exercise inside a lesson (MATCH, TRANSLATE, LISTEN_TYPE, SPEAK, SELECT, ...)
///
/// The kind is kept as authored; grading happens client side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    #[serde(default)]
    pub correct_text: Option<String>,
    #[serde(default)]
    pub audio_src: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub options: Vec<ChallengeOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

impl Lesson {
    /// Lesson without challenges
    pub fn new(id: LessonId, title: impl Into<String>, order_index: i32) -> Self {
        Self { id, title: title.into(), order_index, challenges: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Course {
    /// Every lesson id under this course, any order
    pub fn lesson_ids(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.units.iter().flat_map(|u| u.lessons.iter().map(|l| l.id))
    }

    pub fn find_lesson(&self, lesson_id: LessonId) -> Option<&Lesson> {
        self.units
            .iter()
            .flat_map(|u| u.lessons.iter())
            .find(|l| l.id == lesson_id)
    }
}

/// Sort key shared by all sibling lists: `order_index`, then id
pub trait Ordered {
    fn sort_key(&self) -> (i32, u64);
}

impl Ordered for Course {
    fn sort_key(&self) -> (i32, u64) {
        (self.order_index, self.id)
    }
}

impl Ordered for Unit {
    fn sort_key(&self) -> (i32, u64) {
        (self.order_index, self.id)
    }
}

impl Ordered for Lesson {
    fn sort_key(&self) -> (i32, u64) {
        (self.order_index, self.id)
    }
}

impl Ordered for Challenge {
    fn sort_key(&self) -> (i32, u64) {
        (self.order_index, self.id)
    }
}

/// Annotated lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonView {
    pub id: LessonId,
    pub title: String,
    pub order_index: i32,
    pub completed: bool,
}

/// Annotated unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    pub locked: bool,
    pub completed: bool,
    pub lessons: Vec<LessonView>,
}

/// Annotated course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub image_src: Option<String>,
    pub order_index: i32,
    pub locked: bool,
    pub completed: bool,
    pub units: Vec<UnitView>,
}

impl CourseView {
    pub fn unit(&self, unit_id: UnitId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == unit_id)
    }
}
