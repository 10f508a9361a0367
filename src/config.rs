//! Server configuration

use std::path::PathBuf;

use clap::Args;

use crate::DEFAULT_LEADERBOARD_LIMIT;

/// Settings for `puolingo serve`, read from flags or the environment
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "PUOLINGO_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// Seed file with courses and quests
    #[arg(long, env = "PUOLINGO_SEED", default_value = "seed/curriculum.json")]
    pub seed: PathBuf,

    /// Leaderboard size when the request gives none
    #[arg(long, env = "PUOLINGO_LEADERBOARD_LIMIT", default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
    pub leaderboard_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            seed: PathBuf::from("seed/curriculum.json"),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}
