//! Default seed script - resets the store and creates 100 games, 1000 reviews
//! and 500 users, each review linked to a random game and user.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed
//! ```

use seed_data::Database;
use seed_data::builders::DatasetBuilder;
use seed_data::config::SeedConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = SeedConfig::database_url();
    let db = Database::connect(&database_url).await?;
    db.create_schema().await?;

    let mut rng = rand::thread_rng();

    let result = DatasetBuilder::from_config(SeedConfig::default())
        .with_metrics(true)
        .build(db.pool(), &mut rng)
        .await;

    db.close().await;
    let result = result?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Games: {}", result.games.len());
    tracing::info!("  Reviews: {}", result.reviews.len());
    tracing::info!("  Users: {}", result.users.len());
    if let Some(metrics) = &result.metrics {
        tracing::info!(
            "  Timings: reset {} ms, create {} ms, relate {} ms",
            metrics.reset_time_ms,
            metrics.create_time_ms,
            metrics.relate_time_ms
        );
    }

    Ok(())
}
