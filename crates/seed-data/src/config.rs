//! Configuration types for seed runs.

use serde::{Deserialize, Serialize};

/// Store used when `DATABASE_URL` is not set: `seed_db.db` in the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://seed_db.db";

/// Configuration for seeding operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of games to create.
    pub game_count: usize,

    /// Number of reviews to create and link.
    pub review_count: usize,

    /// Number of users to create.
    pub user_count: usize,

    /// Rows written between progress log lines during bulk inserts and updates.
    pub batch_size: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            game_count: 100,
            review_count: 1000,
            user_count: 500,
            batch_size: 50,
        }
    }
}

impl SeedConfig {
    /// Reads the database URL from `DATABASE_URL`, falling back to [`DEFAULT_DATABASE_URL`].
    pub fn database_url() -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
    }
}
