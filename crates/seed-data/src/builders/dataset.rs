//! Fluent builder for the reset, create and relate seed cycle.

use std::time::Instant;

use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;

use reviews::{Game, Review, User};

use crate::config::SeedConfig;
use crate::db::{SeedError, SeededRows, Seeder};
use crate::generators::{GeneratedLink, LinkGenerator};

/// Result of a seed run.
#[derive(Debug)]
pub struct DatasetResult {
    pub games: Vec<Game>,
    /// Reviews as they stand after the relate stage.
    pub reviews: Vec<Review>,
    pub users: Vec<User>,
    pub links: Vec<GeneratedLink>,
    /// Stage timings (populated if metrics tracking enabled).
    pub metrics: Option<DatasetMetrics>,
}

/// Timing for each stage of a seed run.
#[derive(Debug, Clone)]
pub struct DatasetMetrics {
    /// Time spent deleting existing rows (milliseconds).
    pub reset_time_ms: u64,
    /// Time spent inserting games, reviews and users (milliseconds).
    pub create_time_ms: u64,
    /// Time spent generating and writing links (milliseconds).
    pub relate_time_ms: u64,
}

/// Builder for a full seed run.
///
/// # Example
///
/// ```rust,ignore
/// let result = DatasetBuilder::new()
///     .with_games(10)
///     .with_reviews(40)
///     .with_users(5)
///     .build(&pool, &mut rng)
///     .await?;
/// ```
pub struct DatasetBuilder {
    config: SeedConfig,
    track_metrics: bool,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    /// Creates a builder for the default 100 games, 1000 reviews and 500 users.
    pub fn new() -> Self {
        Self::from_config(SeedConfig::default())
    }

    pub fn from_config(config: SeedConfig) -> Self {
        Self {
            config,
            track_metrics: false,
        }
    }

    pub fn with_games(mut self, count: usize) -> Self {
        self.config.game_count = count;
        self
    }

    pub fn with_reviews(mut self, count: usize) -> Self {
        self.config.review_count = count;
        self
    }

    pub fn with_users(mut self, count: usize) -> Self {
        self.config.user_count = count;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Enables per-stage timing in the result.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Picks a game and a user for every review without touching the database.
    pub fn build_links(
        games: &[Game],
        users: &[User],
        reviews: &[Review],
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedLink>, SeedError> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let link_gen = LinkGenerator::new(games, users)?;
        Ok(link_gen.generate_batch(reviews, rng))
    }

    /// Resets the store, creates all rows, then links every review.
    ///
    /// Reset, create and relate each commit separately. If relating fails, the
    /// created rows stay in place with unset references.
    pub async fn build(
        self,
        pool: &SqlitePool,
        rng: &mut impl Rng,
    ) -> Result<DatasetResult, SeedError> {
        let seeder = Seeder::new(pool.clone()).with_batch_size(self.config.batch_size);

        let start = Instant::now();
        seeder.clear_all().await?;
        let reset_time_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let SeededRows {
            games,
            mut reviews,
            users,
        } = seeder
            .seed_all(
                self.config.game_count,
                self.config.review_count,
                self.config.user_count,
            )
            .await?;
        let create_time_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let links = Self::build_links(&games, &users, &reviews, rng)?;
        seeder.relate_reviews(&links).await?;
        let relate_time_ms = start.elapsed().as_millis() as u64;

        for (review, link) in reviews.iter_mut().zip(&links) {
            review.game_id = Some(link.game_id);
            review.user_id = Some(link.user_id);
        }

        info!(
            "Seeded {} games, {} reviews, {} users",
            games.len(),
            reviews.len(),
            users.len()
        );

        let metrics = self.track_metrics.then_some(DatasetMetrics {
            reset_time_ms,
            create_time_ms,
            relate_time_ms,
        });

        Ok(DatasetResult {
            games,
            reviews,
            users,
            links,
            metrics,
        })
    }
}
