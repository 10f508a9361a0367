//! Source of "today" for the serving layer

use std::sync::RwLock;

use chrono::{Duration, NaiveDate, Utc};

/// Supplies the current calendar date in the caller's canonical zone
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// UTC calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today: RwLock::new(today) }
    }

    pub fn advance_days(&self, days: i64) {
        if let Ok(mut guard) = self.today.write() {
            *guard += Duration::days(days);
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
