//! Relational schema for games, users and the reviews that link them.
//!
//! A [`models::Review`] is the join row between one [`models::Game`] and one
//! [`models::User`]. The many-to-many views (`users_for_game`,
//! `games_for_user`) are computed through `reviews` at read time by
//! [`database::Database`].

pub mod database;
pub mod errors;
pub mod models;

pub use database::Database;
pub use errors::DbError;
pub use models::{Game, NewReview, Review, User};
