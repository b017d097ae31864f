use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::errors::DbError;
use crate::models::{Game, NewReview, Review, User};

const SCHEMA: &str = include_str!("schema.sql");

// Row-level writes that run on any executor, so a caller can batch them
// inside its own transaction.

pub async fn insert_game<'e, E>(executor: E) -> Result<Game, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let game = sqlx::query_as("INSERT INTO games DEFAULT VALUES RETURNING id")
        .fetch_one(executor)
        .await?;

    Ok(game)
}

pub async fn insert_user<'e, E>(executor: E) -> Result<User, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as("INSERT INTO users DEFAULT VALUES RETURNING id")
        .fetch_one(executor)
        .await?;

    Ok(user)
}

pub async fn insert_review<'e, E>(executor: E, review: NewReview) -> Result<Review, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let review = sqlx::query_as(
        r#"
        INSERT INTO reviews (game_id, user_id)
        VALUES (?, ?)
        RETURNING id, game_id, user_id
        "#,
    )
    .bind(review.game_id)
    .bind(review.user_id)
    .fetch_one(executor)
    .await?;

    Ok(review)
}

/// Points review `review_id` at `game_id` and `user_id`.
///
/// Returns [`DbError::NotFound`] when no such review exists.
pub async fn update_review<'e, E>(
    executor: E,
    review_id: i64,
    game_id: i64,
    user_id: i64,
) -> Result<Review, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let review = sqlx::query_as(
        r#"
        UPDATE reviews SET game_id = ?, user_id = ?
        WHERE id = ?
        RETURNING id, game_id, user_id
        "#,
    )
    .bind(game_id)
    .bind(user_id)
    .bind(review_id)
    .fetch_optional(executor)
    .await?;

    review.ok_or(DbError::NotFound)
}

/// Storage handle for the games/reviews/users store.
///
/// Opened once at process start and passed to whatever needs storage. Call
/// [`Database::close`] before exit so SQLite flushes and releases the file.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a single-connection pool against `database_url`.
    ///
    /// The database file is created if it does not exist and foreign key
    /// enforcement is switched on for the connection.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // One connection keeps writes sequential and keeps `sqlite::memory:`
        // stores alive for the lifetime of the pool.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        info!("Connected to database at {}", database_url);
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database connection closed");
    }

    /// Creates the `games`, `users` and `reviews` tables if they are missing.
    pub async fn create_schema(&self) -> Result<(), DbError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn create_game(&self) -> Result<Game, DbError> {
        insert_game(&self.pool).await
    }

    pub async fn create_user(&self) -> Result<User, DbError> {
        insert_user(&self.pool).await
    }

    pub async fn create_review(&self, review: NewReview) -> Result<Review, DbError> {
        insert_review(&self.pool, review).await
    }

    pub async fn get_game(&self, id: i64) -> Result<Option<Game>, DbError> {
        let game = sqlx::query_as("SELECT id FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(game)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_review(&self, id: i64) -> Result<Option<Review>, DbError> {
        let review = sqlx::query_as("SELECT id, game_id, user_id FROM reviews WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    pub async fn list_games(&self) -> Result<Vec<Game>, DbError> {
        let games = sqlx::query_as("SELECT id FROM games ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(games)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as("SELECT id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>, DbError> {
        let reviews = sqlx::query_as("SELECT id, game_id, user_id FROM reviews ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(reviews)
    }

    pub async fn count_games(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM games")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn count_users(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn count_reviews(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn reviews_for_game(&self, game_id: i64) -> Result<Vec<Review>, DbError> {
        let reviews = sqlx::query_as(
            "SELECT id, game_id, user_id FROM reviews WHERE game_id = ? ORDER BY id",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn reviews_for_user(&self, user_id: i64) -> Result<Vec<Review>, DbError> {
        let reviews = sqlx::query_as(
            "SELECT id, game_id, user_id FROM reviews WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Users reached through the game's reviews.
    ///
    /// One entry per review, in review order, so a user who reviewed the same
    /// game twice appears twice.
    pub async fn users_for_game(&self, game_id: i64) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT users.id
            FROM reviews
            JOIN users ON users.id = reviews.user_id
            WHERE reviews.game_id = ?
            ORDER BY reviews.id
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Games reached through the user's reviews, one entry per review.
    pub async fn games_for_user(&self, user_id: i64) -> Result<Vec<Game>, DbError> {
        let games = sqlx::query_as(
            r#"
            SELECT games.id
            FROM reviews
            JOIN games ON games.id = reviews.game_id
            WHERE reviews.user_id = ?
            ORDER BY reviews.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(games)
    }

    /// Links a game and a user by inserting a new review between them.
    ///
    /// Fails with a foreign key violation if either side does not exist.
    pub async fn add_association(&self, game_id: i64, user_id: i64) -> Result<Review, DbError> {
        let review = self
            .create_review(NewReview {
                game_id: Some(game_id),
                user_id: Some(user_id),
            })
            .await?;

        debug!("Linked game {} to user {} via review {}", game_id, user_id, review.id);
        Ok(review)
    }

    /// Repoints an existing review at `game_id` and `user_id`.
    pub async fn assign_review(
        &self,
        review_id: i64,
        game_id: i64,
        user_id: i64,
    ) -> Result<Review, DbError> {
        update_review(&self.pool, review_id, game_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        db.create_schema().await.expect("Failed to create schema");
        db
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let db = memory_db().await;
        db.create_schema().await.unwrap();

        assert_eq!(db.count_games().await.unwrap(), 0);
        assert_eq!(db.count_users().await.unwrap(), 0);
        assert_eq!(db.count_reviews().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_identity_assigned_on_insert() {
        let db = memory_db().await;

        let first = db.create_game().await.unwrap();
        let second = db.create_game().await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let user = db.create_user().await.unwrap();
        assert_eq!(db.get_user(user.id).await.unwrap(), Some(user));
        assert_eq!(db.get_game(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_review_starts_unlinked() {
        let db = memory_db().await;

        let review = db.create_review(NewReview::default()).await.unwrap();
        assert_eq!(review.game_id, None);
        assert_eq!(review.user_id, None);
        assert!(!review.is_linked());
    }

    #[tokio::test]
    async fn test_single_link_scenario() {
        let db = memory_db().await;
        let game = db.create_game().await.unwrap();
        let user = db.create_user().await.unwrap();
        db.create_review(NewReview::linking(&game, &user))
            .await
            .unwrap();

        assert_eq!(game.id, 1);
        assert_eq!(user.id, 1);
        assert_eq!(db.users_for_game(1).await.unwrap(), vec![User { id: 1 }]);
        assert_eq!(db.games_for_user(1).await.unwrap(), vec![Game { id: 1 }]);
    }

    #[tokio::test]
    async fn test_add_association_keeps_duplicates() {
        let db = memory_db().await;
        let game = db.create_game().await.unwrap();
        let alice = db.create_user().await.unwrap();
        let bob = db.create_user().await.unwrap();

        db.add_association(game.id, alice.id).await.unwrap();
        db.add_association(game.id, bob.id).await.unwrap();
        db.add_association(game.id, alice.id).await.unwrap();

        assert_eq!(
            db.users_for_game(game.id).await.unwrap(),
            vec![alice, bob, alice]
        );
        assert_eq!(db.games_for_user(alice.id).await.unwrap(), vec![game, game]);
        assert_eq!(db.reviews_for_game(game.id).await.unwrap().len(), 3);
        assert_eq!(db.reviews_for_user(bob.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_association_rejects_missing_rows() {
        let db = memory_db().await;
        let game = db.create_game().await.unwrap();

        let err = db.add_association(game.id, 42).await.unwrap_err();
        assert!(err.is_foreign_key_violation(), "unexpected error: {err}");
        assert_eq!(db.count_reviews().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_assign_review_repoints() {
        let db = memory_db().await;
        let first_game = db.create_game().await.unwrap();
        let second_game = db.create_game().await.unwrap();
        let user = db.create_user().await.unwrap();

        let review = db.add_association(first_game.id, user.id).await.unwrap();
        let review = db
            .assign_review(review.id, second_game.id, user.id)
            .await
            .unwrap();

        assert_eq!(review.game_id, Some(second_game.id));
        assert!(db.users_for_game(first_game.id).await.unwrap().is_empty());
        assert_eq!(db.users_for_game(second_game.id).await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn test_assign_missing_review_is_not_found() {
        let db = memory_db().await;
        let game = db.create_game().await.unwrap();
        let user = db.create_user().await.unwrap();

        let err = db.assign_review(7, game.id, user.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
