//! In-memory persistence collaborator
//!
//! Holds users, lesson progress, quest awards and the seeded content. All
//! user mutations go through a per-user mutex so the read → compute → commit
//! cycle of one user never interleaves with another mutation of the same
//! user. Each commit applies its whole delta under one write lock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::core::{ProgressEngine, ProgressionUnlocker, Seed};
use crate::error::{Result, StoreError};
use crate::types::{
    Challenge, Course, CourseId, CourseView, LeaderboardEntry, Lesson, LessonCompletion, LessonId,
    LessonProgress, NewUser, ProgressDelta, Quest, QuestId, QuestProgress, StreakTransition, UserId,
    UserProfile, UserQuestAward, UserStreakState,
};
use crate::{MAX_ACTIVITY_POINTS, MAX_HEARTS};

#[derive(Debug, Default)]
struct StoreData {
    courses: Vec<Course>,
    quests: Vec<Quest>,
    users: HashMap<UserId, UserProfile>,
    next_user_id: UserId,
    /// Keyed by (user, quest): one award per pair
    awards: HashMap<(UserId, QuestId), UserQuestAward>,
    progress: HashMap<(UserId, LessonId), LessonProgress>,
}

impl StoreData {
    fn user(&self, user_id: UserId) -> Result<&UserProfile> {
        self.users.get(&user_id).ok_or(StoreError::UserNotFound(user_id))
    }

    fn user_mut(&mut self, user_id: UserId) -> Result<&mut UserProfile> {
        self.users.get_mut(&user_id).ok_or(StoreError::UserNotFound(user_id))
    }

    fn find_lesson(&self, lesson_id: LessonId) -> Option<&Lesson> {
        self.courses.iter().find_map(|c| c.find_lesson(lesson_id))
    }

    fn awarded_ids(&self, user_id: UserId) -> HashSet<QuestId> {
        self.awards
            .keys()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, qid)| *qid)
            .collect()
    }

    fn completed_lessons(&self, user_id: UserId) -> HashSet<LessonId> {
        self.progress
            .values()
            .filter(|p| p.user_id == user_id && p.completed)
            .map(|p| p.lesson_id)
            .collect()
    }
}

/// Shared application store
#[derive(Debug)]
pub struct Store {
    data: RwLock<StoreData>,
    user_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    engine: ProgressEngine,
    unlocker: ProgressionUnlocker,
}

impl Store {
    /// Store seeded with content and quests, no users
    pub fn new(mut seed: Seed) -> Self {
        seed.sort();
        Self {
            data: RwLock::new(StoreData {
                courses: seed.courses,
                quests: seed.quests,
                next_user_id: 1,
                ..StoreData::default()
            }),
            user_locks: Mutex::new(HashMap::new()),
            engine: ProgressEngine::new(),
            unlocker: ProgressionUnlocker::new(),
        }
    }

    /// Serialization boundary for one user's mutations
    async fn user_lock(&self, user_id: UserId) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks.entry(user_id).or_default().clone()
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn register(&self, new_user: NewUser) -> Result<UserProfile> {
        let email = new_user.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(StoreError::InvalidInput(format!("bad email: {:?}", new_user.email)));
        }

        let mut data = self.data.write().await;
        if data.users.values().any(|u| u.email == email) {
            return Err(StoreError::EmailTaken(email));
        }

        let id = data.next_user_id;
        data.next_user_id += 1;
        let user = UserProfile::new(id, email, new_user.full_name);
        data.users.insert(id, user.clone());

        info!(user_id = id, "Registered user");
        Ok(user)
    }

    pub async fn user(&self, user_id: UserId) -> Result<UserProfile> {
        let data = self.data.read().await;
        data.user(user_id).cloned()
    }

    /// Take one heart, stopping at zero
    pub async fn reduce_hearts(&self, user_id: UserId) -> Result<UserProfile> {
        self.update_user(user_id, |user| {
            user.hearts = user.hearts.saturating_sub(1);
        })
        .await
    }

    pub async fn refill_hearts(&self, user_id: UserId) -> Result<UserProfile> {
        self.update_user(user_id, |user| user.hearts = MAX_HEARTS).await
    }

    /// Arm the one-time streak freeze
    pub async fn grant_streak_freeze(&self, user_id: UserId) -> Result<UserProfile> {
        self.update_user(user_id, |user| user.streak.streak_frozen = true).await
    }

    pub async fn streak(&self, user_id: UserId) -> Result<UserStreakState> {
        let data = self.data.read().await;
        data.user(user_id).map(|u| u.streak.clone())
    }

    async fn update_user<F>(&self, user_id: UserId, apply: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let mut data = self.data.write().await;
        let user = data.user_mut(user_id)?;
        apply(user);
        Ok(user.clone())
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Mark a lesson completed and apply the resulting streak, quest and
    /// point changes as one commit
    pub async fn complete_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
        hearts_used: u32,
        points_earned: i64,
        today: NaiveDate,
    ) -> Result<LessonCompletion> {
        check_points("points_earned", points_earned)?;

        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let delta = {
            let data = self.data.read().await;
            let user = data.user(user_id)?;
            if data.find_lesson(lesson_id).is_none() {
                return Err(StoreError::LessonNotFound(lesson_id));
            }
            self.engine.record_activity(
                &user.streak,
                today,
                &data.quests,
                &data.awarded_ids(user_id),
                points_earned,
            )
        };
        log_transition(user_id, today, &delta);

        let progress = LessonProgress {
            user_id,
            lesson_id,
            completed: true,
            hearts_used,
            points_earned,
            updated_at: Utc::now(),
        };
        let quests_awarded = delta.quests.clone();
        let transition = delta.transition;
        let user = self.commit(user_id, Some(progress.clone()), delta).await?;

        info!(
            user_id,
            lesson_id,
            streak = user.streak.streak_count,
            points = user.points,
            xp = user.xp,
            "Lesson completed"
        );

        Ok(LessonCompletion {
            progress,
            transition,
            streak_count: user.streak.streak_count,
            longest_streak: user.streak.longest_streak,
            quests_awarded,
            points: user.points,
            xp: user.xp,
        })
    }

    /// Grant xp outside a lesson; counts as activity for the streak and
    /// quests but writes no progress row
    pub async fn add_xp(&self, user_id: UserId, xp: i64, today: NaiveDate) -> Result<UserProfile> {
        check_points("xp", xp)?;

        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let delta = {
            let data = self.data.read().await;
            let user = data.user(user_id)?;
            self.engine.record_activity(&user.streak, today, &data.quests, &data.awarded_ids(user_id), xp)
        };
        log_transition(user_id, today, &delta);

        let user = self.commit(user_id, None, delta).await?;
        info!(user_id, xp = user.xp, points = user.points, "Xp added");
        Ok(user)
    }

    /// Apply one delta under a single write lock, all or nothing
    async fn commit(
        &self,
        user_id: UserId,
        progress: Option<LessonProgress>,
        delta: ProgressDelta,
    ) -> Result<UserProfile> {
        let mut data = self.data.write().await;

        let user = data.user(user_id)?;
        let xp = user.xp.saturating_add(delta.xp_delta);
        let points = user.points.saturating_add(delta.points_delta);

        if let Some(row) = progress {
            data.progress.insert((row.user_id, row.lesson_id), row);
        }
        for award in delta.awards {
            info!(user_id, quest_id = award.quest_id, "Quest awarded");
            data.awards.entry((user_id, award.quest_id)).or_insert(award);
        }

        let user = data.user_mut(user_id)?;
        user.streak = delta.streak;
        user.xp = xp;
        user.points = points;
        Ok(user.clone())
    }

    /// The user's progress rows ordered by lesson id
    pub async fn progress(&self, user_id: UserId) -> Result<Vec<LessonProgress>> {
        let data = self.data.read().await;
        data.user(user_id)?;
        let mut rows: Vec<LessonProgress> = data
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.lesson_id);
        Ok(rows)
    }

    pub async fn awards(&self, user_id: UserId) -> Vec<UserQuestAward> {
        let data = self.data.read().await;
        let mut awards: Vec<UserQuestAward> = data
            .awards
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        awards.sort_by_key(|a| a.quest_id);
        awards
    }

    // =========================================================================
    // Content (read paths)
    // =========================================================================

    /// All courses annotated for `user_id`, or for an empty completed set
    pub async fn courses(&self, user_id: Option<UserId>) -> Result<Vec<CourseView>> {
        let data = self.data.read().await;
        let completed = match user_id {
            Some(id) => {
                data.user(id)?;
                data.completed_lessons(id)
            }
            None => HashSet::new(),
        };
        Ok(self.unlocker.compute_tree(&data.courses, &completed))
    }

    /// One course, locked relative to its siblings
    pub async fn course(&self, course_id: CourseId, user_id: Option<UserId>) -> Result<CourseView> {
        self.courses(user_id)
            .await?
            .into_iter()
            .find(|c| c.id == course_id)
            .ok_or(StoreError::CourseNotFound(course_id))
    }

    /// A lesson with its challenges in `(order_index, id)` order
    pub async fn lesson(&self, lesson_id: LessonId) -> Result<Lesson> {
        let data = self.data.read().await;
        data.find_lesson(lesson_id)
            .cloned()
            .ok_or(StoreError::LessonNotFound(lesson_id))
    }

    pub async fn challenges(&self, lesson_id: LessonId) -> Result<Vec<Challenge>> {
        Ok(self.lesson(lesson_id).await?.challenges)
    }

    /// Quest catalog with the user's completion flags
    pub async fn quests(&self, user_id: UserId) -> Result<Vec<QuestProgress>> {
        let data = self.data.read().await;
        data.user(user_id)?;
        let awarded = data.awarded_ids(user_id);
        Ok(data
            .quests
            .iter()
            .map(|quest| QuestProgress {
                quest: quest.clone(),
                completed: awarded.contains(&quest.id),
            })
            .collect())
    }

    /// Top users by xp, ties broken by id
    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let data = self.data.read().await;
        let mut users: Vec<&UserProfile> = data.users.values().collect();
        users.sort_by(|a, b| b.xp.cmp(&a.xp).then(a.id.cmp(&b.id)));
        users
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, u)| LeaderboardEntry {
                rank: i + 1,
                user_id: u.id,
                full_name: u.full_name.clone(),
                xp: u.xp,
                streak_count: u.streak.streak_count,
            })
            .collect()
    }

    pub async fn user_count(&self) -> usize {
        self.data.read().await.users.len()
    }
}

/// Points reported by one activity must lie in `0..=MAX_ACTIVITY_POINTS`
fn check_points(field: &str, value: i64) -> Result<()> {
    if !(0..=MAX_ACTIVITY_POINTS).contains(&value) {
        return Err(StoreError::InvalidInput(format!(
            "{} must be between 0 and {}, got {}",
            field, MAX_ACTIVITY_POINTS, value
        )));
    }
    Ok(())
}

fn log_transition(user_id: UserId, today: NaiveDate, delta: &ProgressDelta) {
    if delta.transition == StreakTransition::Backdated {
        debug!(user_id, %today, "Activity dated before last activity, streak unchanged");
    } else if !delta.transition.is_noop() {
        debug!(
            user_id,
            transition = delta.transition.code(),
            streak = delta.streak.streak_count,
            "Streak advanced"
        );
    }
}
