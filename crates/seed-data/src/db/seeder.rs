//! Database seeding utilities.

use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};

use reviews::database::{insert_game, insert_review, insert_user, update_review};
use reviews::{DbError, Game, NewReview, Review, User};

use crate::generators::GeneratedLink;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Store error: {0}")]
    Store(#[from] DbError),
    #[error("Cannot link reviews: no {0} to choose from")]
    EmptyPool(&'static str),
}

/// Rows written by the create stage.
#[derive(Debug)]
pub struct SeededRows {
    pub games: Vec<Game>,
    pub reviews: Vec<Review>,
    pub users: Vec<User>,
}

/// Database seeder for the games/reviews/users store.
///
/// Each public method is one stage and commits in its own transaction. A
/// failure inside a stage leaves it untouched, but earlier stages stay
/// committed.
pub struct Seeder {
    pool: SqlitePool,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            batch_size: 50,
        }
    }

    /// Sets how many rows are written between progress log lines.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Inserts games, reviews and users with no relationships, in one transaction.
    ///
    /// Reviews are created with no game or user set.
    pub async fn seed_all(
        &self,
        game_count: usize,
        review_count: usize,
        user_count: usize,
    ) -> Result<SeededRows, SeedError> {
        info!(
            "Seeding {} games, {} reviews, {} users...",
            game_count, review_count, user_count
        );
        let mut tx = self.pool.begin().await?;

        let games = self.insert_games(&mut *tx, game_count).await?;
        let reviews = self.insert_reviews(&mut *tx, review_count).await?;
        let users = self.insert_users(&mut *tx, user_count).await?;

        tx.commit().await?;
        info!(
            "Seeded {} games, {} reviews, {} users",
            games.len(),
            reviews.len(),
            users.len()
        );
        Ok(SeededRows {
            games,
            reviews,
            users,
        })
    }

    async fn insert_games(
        &self,
        conn: &mut SqliteConnection,
        count: usize,
    ) -> Result<Vec<Game>, SeedError> {
        let mut games = Vec::with_capacity(count);

        for i in 0..count {
            games.push(insert_game(&mut *conn).await?);

            if (i + 1) % self.batch_size == 0 {
                debug!("  Inserted {}/{} games", i + 1, count);
            }
        }

        Ok(games)
    }

    async fn insert_users(
        &self,
        conn: &mut SqliteConnection,
        count: usize,
    ) -> Result<Vec<User>, SeedError> {
        let mut users = Vec::with_capacity(count);

        for i in 0..count {
            users.push(insert_user(&mut *conn).await?);

            if (i + 1) % self.batch_size == 0 {
                debug!("  Inserted {}/{} users", i + 1, count);
            }
        }

        Ok(users)
    }

    async fn insert_reviews(
        &self,
        conn: &mut SqliteConnection,
        count: usize,
    ) -> Result<Vec<Review>, SeedError> {
        let mut reviews = Vec::with_capacity(count);

        for i in 0..count {
            reviews.push(insert_review(&mut *conn, NewReview::default()).await?);

            if (i + 1) % self.batch_size == 0 {
                debug!("  Inserted {}/{} reviews", i + 1, count);
            }
        }

        Ok(reviews)
    }

    /// Points each review at the game and user chosen for it.
    pub async fn relate_reviews(&self, links: &[GeneratedLink]) -> Result<(), SeedError> {
        info!("Relating {} reviews...", links.len());
        let mut tx = self.pool.begin().await?;

        for (i, link) in links.iter().enumerate() {
            update_review(&mut *tx, link.review_id, link.game_id, link.user_id).await?;

            if (i + 1) % self.batch_size == 0 {
                debug!("  Related {}/{} reviews", i + 1, links.len());
            }
        }

        tx.commit().await?;
        info!("Related {} reviews", links.len());
        Ok(())
    }

    /// Clears all seeded data.
    ///
    /// **WARNING**: This deletes every row of `reviews`, `games` and `users`.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        info!("Clearing all seeded data...");
        let mut tx = self.pool.begin().await?;

        // Order matters due to foreign key constraints
        sqlx::query("DELETE FROM reviews").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM games").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;

        tx.commit().await?;
        info!("All data cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reviews::Database;

    use super::*;

    async fn seeder() -> (Database, Seeder) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.create_schema().await.unwrap();
        let seeder = Seeder::new(db.pool().clone()).with_batch_size(10);
        (db, seeder)
    }

    fn link(review: &Review, game_id: i64, user_id: i64) -> GeneratedLink {
        GeneratedLink {
            review_id: review.id,
            game_id,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_seed_all_leaves_reviews_unlinked() {
        let (db, seeder) = seeder().await;

        let rows = seeder.seed_all(3, 25, 4).await.unwrap();

        assert_eq!(rows.games.len(), 3);
        assert_eq!(rows.users.len(), 4);
        assert_eq!(rows.reviews.len(), 25);
        assert!(rows.reviews.iter().all(|r| !r.is_linked()));
        assert_eq!(db.count_reviews().await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_seed_all_is_one_transaction() {
        let (db, seeder) = seeder().await;
        sqlx::raw_sql(
            r#"
            CREATE TRIGGER reject_users BEFORE INSERT ON users
            BEGIN
                SELECT RAISE(ABORT, 'storage failure');
            END;
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = seeder.seed_all(5, 10, 2).await.unwrap_err();
        assert!(err.to_string().contains("storage failure"), "unexpected error: {err}");

        assert_eq!(db.count_games().await.unwrap(), 0);
        assert_eq!(db.count_reviews().await.unwrap(), 0);
        assert_eq!(db.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_relate_reviews_applies_links() {
        let (db, seeder) = seeder().await;
        let SeededRows {
            games,
            reviews,
            users,
        } = seeder.seed_all(2, 2, 2).await.unwrap();

        let links = vec![
            link(&reviews[0], games[1].id, users[0].id),
            link(&reviews[1], games[0].id, users[1].id),
        ];
        seeder.relate_reviews(&links).await.unwrap();

        let stored = db.list_reviews().await.unwrap();
        assert_eq!(stored[0].game_id, Some(games[1].id));
        assert_eq!(stored[0].user_id, Some(users[0].id));
        assert_eq!(stored[1].game_id, Some(games[0].id));
        assert_eq!(stored[1].user_id, Some(users[1].id));
    }

    #[tokio::test]
    async fn test_relate_rolls_back_on_bad_reference() {
        let (db, seeder) = seeder().await;
        let SeededRows {
            games,
            reviews,
            users,
        } = seeder.seed_all(1, 2, 1).await.unwrap();

        let links = vec![
            link(&reviews[0], games[0].id, users[0].id),
            link(&reviews[1], 999, users[0].id),
        ];
        let err = seeder.relate_reviews(&links).await.unwrap_err();
        match err {
            SeedError::Store(e) => assert!(e.is_foreign_key_violation(), "unexpected error: {e}"),
            other => panic!("unexpected error: {other}"),
        }

        // The batch is one transaction, so the first update is gone too.
        assert!(db.list_reviews().await.unwrap().iter().all(|r| !r.is_linked()));
    }

    #[tokio::test]
    async fn test_relate_missing_review_is_not_found() {
        let (_db, seeder) = seeder().await;
        let SeededRows { games, users, .. } = seeder.seed_all(1, 0, 1).await.unwrap();

        let links = vec![GeneratedLink {
            review_id: 42,
            game_id: games[0].id,
            user_id: users[0].id,
        }];
        let err = seeder.relate_reviews(&links).await.unwrap_err();
        assert!(matches!(err, SeedError::Store(DbError::NotFound)));
    }

    #[tokio::test]
    async fn test_clear_all_with_linked_reviews() {
        let (db, seeder) = seeder().await;
        let game = db.create_game().await.unwrap();
        let user = db.create_user().await.unwrap();
        db.add_association(game.id, user.id).await.unwrap();

        seeder.clear_all().await.unwrap();

        assert_eq!(db.count_games().await.unwrap(), 0);
        assert_eq!(db.count_users().await.unwrap(), 0);
        assert_eq!(db.count_reviews().await.unwrap(), 0);
    }
}
