//! HTTP API for Puolingo
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /users - Register
//! - GET /users/me - Caller profile
//! - POST /users/me/hearts/reduce - Lose a heart
//! - POST /users/me/hearts/refill - Refill hearts
//! - GET /users/me/streak - Caller streak state
//! - POST /users/me/streak-freeze - Arm the streak freeze (alias /users/me/streak/freeze)
//! - POST /users/me/xp/add - Grant xp, counted as the day's activity
//! - GET /courses - Courses with lock/completion flags
//! - GET /courses/:id - One course with units and lessons
//! - GET /lessons/:id - One lesson with its challenges
//! - GET /lessons/:id/challenges - A lesson's challenges in order
//! - GET /progress - Caller's lesson progress
//! - POST /progress/lesson/:id/complete - Complete a lesson
//! - GET /quests - Quest catalog with completion flags
//! - GET /leaderboard - Top users by xp
//!
//! The caller is identified by the `x-user-id` header, set upstream by the
//! auth gateway.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::{load_seed, Clock, Seed, Store, SystemClock};
use crate::error::StoreError;
use crate::types::{
    Challenge, CourseId, CourseView, LeaderboardEntry, Lesson, LessonCompletion, LessonId,
    LessonProgress, NewUser, QuestProgress, UserId, UserProfile, UserStreakState,
};
use crate::{DEFAULT_LESSON_POINTS, USER_ID_HEADER};

/// App state
pub struct AppState {
    pub store: Store,
    pub clock: Arc<dyn Clock>,
    pub leaderboard_limit: usize,
}

impl AppState {
    pub fn new(seed: Seed, clock: Arc<dyn Clock>, leaderboard_limit: usize) -> Arc<Self> {
        Arc::new(Self {
            store: Store::new(seed),
            clock,
            leaderboard_limit,
        })
    }
}

/// Complete lesson request
#[derive(Debug, Deserialize)]
pub struct CompleteLessonRequest {
    #[serde(default)]
    pub hearts_used: u32,
    #[serde(default = "default_lesson_points")]
    pub points_earned: i64,
}

fn default_lesson_points() -> i64 {
    DEFAULT_LESSON_POINTS
}

/// Add xp request
#[derive(Debug, Deserialize)]
pub struct AddXpRequest {
    pub xp: i64,
}

/// Leaderboard query
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub users: usize,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", post(register))
        .route("/users/me", get(get_me))
        .route("/users/me/hearts/reduce", post(reduce_hearts))
        .route("/users/me/hearts/refill", post(refill_hearts))
        .route("/users/me/streak", get(get_streak))
        .route("/users/me/streak-freeze", post(grant_streak_freeze))
        .route("/users/me/streak/freeze", post(grant_streak_freeze))
        .route("/users/me/xp/add", post(add_xp))
        .route("/courses", get(list_courses))
        .route("/courses/:id", get(get_course))
        .route("/lessons/:id", get(get_lesson))
        .route("/lessons/:id/challenges", get(list_challenges))
        .route("/progress", get(list_progress))
        .route("/progress/lesson/:id/complete", post(complete_lesson))
        .route("/quests", get(list_quests))
        .route("/leaderboard", get(leaderboard))
        .with_state(state)
}

/// Map store errors to HTTP status
fn status_for(err: StoreError) -> StatusCode {
    match err {
        StoreError::UserNotFound(_)
        | StoreError::CourseNotFound(_)
        | StoreError::LessonNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::EmailTaken(_) => StatusCode::CONFLICT,
        StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        other => {
            warn!(error = %other, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Caller id from the auth header, if any
fn caller_optional(headers: &HeaderMap) -> Result<Option<UserId>, StatusCode> {
    match headers.get(USER_ID_HEADER) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<UserId>().ok())
            .map(Some)
            .ok_or(StatusCode::UNAUTHORIZED),
    }
}

fn caller(headers: &HeaderMap) -> Result<UserId, StatusCode> {
    caller_optional(headers)?.ok_or(StatusCode::UNAUTHORIZED)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        users: state.store.user_count().await,
    })
}

/// Register a user
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<UserProfile>), StatusCode> {
    let user = state.store.register(req).await.map_err(status_for)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, StatusCode> {
    let id = caller(&headers)?;
    state.store.user(id).await.map(Json).map_err(status_for)
}

async fn reduce_hearts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, StatusCode> {
    let id = caller(&headers)?;
    state.store.reduce_hearts(id).await.map(Json).map_err(status_for)
}

async fn refill_hearts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, StatusCode> {
    let id = caller(&headers)?;
    state.store.refill_hearts(id).await.map(Json).map_err(status_for)
}

async fn get_streak(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserStreakState>, StatusCode> {
    let id = caller(&headers)?;
    state.store.streak(id).await.map(Json).map_err(status_for)
}

/// Grant xp on today's date; same streak and quest path as a lesson
async fn add_xp(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddXpRequest>,
) -> Result<Json<UserProfile>, StatusCode> {
    let id = caller(&headers)?;
    let today = state.clock.today();
    state.store.add_xp(id, req.xp, today).await.map(Json).map_err(status_for)
}

async fn grant_streak_freeze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, StatusCode> {
    let id = caller(&headers)?;
    state.store.grant_streak_freeze(id).await.map(Json).map_err(status_for)
}

/// Courses, annotated for the caller when one is given
async fn list_courses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CourseView>>, StatusCode> {
    let id = caller_optional(&headers)?;
    state.store.courses(id).await.map(Json).map_err(status_for)
}

async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<CourseId>,
    headers: HeaderMap,
) -> Result<Json<CourseView>, StatusCode> {
    let id = caller_optional(&headers)?;
    state.store.course(course_id, id).await.map(Json).map_err(status_for)
}

async fn get_lesson(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<LessonId>,
) -> Result<Json<Lesson>, StatusCode> {
    state.store.lesson(lesson_id).await.map(Json).map_err(status_for)
}

async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<LessonId>,
) -> Result<Json<Vec<Challenge>>, StatusCode> {
    state.store.challenges(lesson_id).await.map(Json).map_err(status_for)
}

async fn list_progress(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<LessonProgress>>, StatusCode> {
    let id = caller(&headers)?;
    state.store.progress(id).await.map(Json).map_err(status_for)
}

/// Complete a lesson: progress row, streak, quests and points in one commit
async fn complete_lesson(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<LessonId>,
    headers: HeaderMap,
    Json(req): Json<CompleteLessonRequest>,
) -> Result<Json<LessonCompletion>, StatusCode> {
    let id = caller(&headers)?;
    let today = state.clock.today();

    let done = state
        .store
        .complete_lesson(id, lesson_id, req.hearts_used, req.points_earned, today)
        .await
        .map_err(status_for)?;

    info!(
        user_id = id,
        lesson_id,
        transition = done.transition.code(),
        quests = done.quests_awarded.len(),
        "Lesson completion handled"
    );
    Ok(Json(done))
}

async fn list_quests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<QuestProgress>>, StatusCode> {
    let id = caller(&headers)?;
    state.store.quests(id).await.map(Json).map_err(status_for)
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    let limit = query.limit.unwrap_or(state.leaderboard_limit);
    Json(state.store.leaderboard(limit).await)
}

/// Run the API server
pub async fn run_server(config: &ServerConfig) -> anyhow::Result<()> {
    let seed = load_seed(&config.seed)?;
    let state = AppState::new(seed, Arc::new(SystemClock), config.leaderboard_limit);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!(addr = %config.addr, "Puolingo API listening");
    axum::serve(listener, router).await?;
    Ok(())
}
