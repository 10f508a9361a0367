//! Errors at the persistence boundary
//!
//! The engine itself never fails; these come from lookups, registration and
//! seed loading.

use thiserror::Error;

use crate::types::{CourseId, LessonId, QuestId, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),
    #[error("Lesson not found: {0}")]
    LessonNotFound(LessonId),
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Quest {id} needs a streak of at least 1, got {required_streak}")]
    InvalidQuest { id: QuestId, required_streak: u32 },
    #[error("Duplicate {kind} id in seed: {id}")]
    DuplicateId { kind: &'static str, id: u64 },
    #[error("Seed read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Seed parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
