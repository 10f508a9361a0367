//! Puolingo: progression and streak engine
//!
//! The engine lives in `core`: a streak state machine, a quest awarder and a
//! content unlocker, all pure functions over snapshots. `core::store` and
//! `core::api` wrap them in an in-memory store and an HTTP API.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// GAME RULES
// =============================================================================

/// Hearts a user starts with and refills to
pub const MAX_HEARTS: u32 = 5;

/// Points for a lesson when the client sends none
pub const DEFAULT_LESSON_POINTS: i64 = 10;

/// Most points one activity may report; xp and points totals saturate
pub const MAX_ACTIVITY_POINTS: i64 = 10_000;

/// Gap in days that a streak freeze can bridge
pub const FREEZE_GAP_DAYS: i64 = 2;

// =============================================================================
// API
// =============================================================================

/// Header carrying the caller id, set by the auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Leaderboard size when the request gives none
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
