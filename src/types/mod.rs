//! Core types for Puolingo

mod streak;
mod quest;
mod content;
mod user;
mod progress;

pub type UserId = u64;
pub type QuestId = u64;
pub type CourseId = u64;
pub type UnitId = u64;
pub type LessonId = u64;
pub type ChallengeId = u64;

pub use streak::{UserStreakState, StreakTransition};
pub use quest::{Quest, UserQuestAward, QuestEvaluation, QuestProgress};
pub use content::{Course, Unit, Lesson, Challenge, ChallengeOption, Ordered, CourseView, UnitView, LessonView};
pub use user::{UserProfile, NewUser, LeaderboardEntry};
pub use progress::{LessonProgress, ProgressDelta, LessonCompletion};
