//! Seed data for the game reviews store.
//!
//! A seed run resets the store, creates games, reviews and users with no
//! relationships, then points every review at a random game and a random
//! user.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let db = Database::connect(DEFAULT_DATABASE_URL).await?;
//! db.create_schema().await?;
//!
//! let result = DatasetBuilder::new()
//!     .with_games(100)
//!     .with_reviews(1000)
//!     .with_users(500)
//!     .build(db.pool(), &mut rand::thread_rng())
//!     .await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;

pub use reviews::{Database, Game, Review, User};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{DatasetBuilder, DatasetMetrics, DatasetResult};
    pub use crate::config::{DEFAULT_DATABASE_URL, SeedConfig};
    pub use crate::db::{SeedError, SeededRows, Seeder};
    pub use crate::generators::{GeneratedLink, LinkGenerator};
    pub use crate::{Database, Game, Review, User};
}
