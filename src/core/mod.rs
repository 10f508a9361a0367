//! Core modules for Puolingo

pub mod streak;
pub mod quest;
pub mod unlock;
pub mod progress;
pub mod clock;
pub mod seed;
pub mod store;
pub mod api;

pub use streak::StreakTracker;
pub use quest::QuestAwarder;
pub use unlock::ProgressionUnlocker;
pub use progress::ProgressEngine;
pub use clock::{Clock, SystemClock, FixedClock};
pub use seed::{Seed, load_seed, save_seed};
pub use store::Store;
pub use api::{AppState, create_router, run_server};
