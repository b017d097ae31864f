use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i64,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game(id={})", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User(id={})", self.id)
    }
}

/// Join row between a game and a user.
///
/// Both references are NULL until the review is assigned, which is the
/// normal state between the create and relate stages of a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub game_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl Review {
    /// Returns true once both the game and the user are set.
    pub fn is_linked(&self) -> bool {
        self.game_id.is_some() && self.user_id.is_some()
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Review(id={})", self.id)
    }
}

/// A review that has not been persisted yet; its id is assigned on insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub game_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl NewReview {
    /// A review linking `game` to `user`.
    pub fn linking(game: &Game, user: &User) -> Self {
        Self {
            game_id: Some(game.id),
            user_id: Some(user.id),
        }
    }
}
