//! Random game/user assignment for reviews.

use rand::Rng;
use rand::seq::SliceRandom;

use reviews::{Game, Review, User};

use crate::db::SeedError;

/// Game and user chosen for one review, ready for the relate update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedLink {
    pub review_id: i64,
    pub game_id: i64,
    pub user_id: i64,
}

/// Draws a game and a user for each review, uniformly and with replacement.
///
/// A game or user may end up on zero, one or many reviews; only each single
/// draw is uniform.
pub struct LinkGenerator<'a> {
    games: &'a [Game],
    users: &'a [User],
}

impl<'a> LinkGenerator<'a> {
    /// Fails when either pool is empty, since no review could be linked.
    pub fn new(games: &'a [Game], users: &'a [User]) -> Result<Self, SeedError> {
        if games.is_empty() {
            return Err(SeedError::EmptyPool("games"));
        }
        if users.is_empty() {
            return Err(SeedError::EmptyPool("users"));
        }

        Ok(Self { games, users })
    }

    /// Generates the link for a single review.
    pub fn generate(&self, review: &Review, rng: &mut impl Rng) -> GeneratedLink {
        // Both slices are non-empty, checked in `new`.
        let game = self.games.choose(rng).unwrap_or_else(|| &self.games[0]);
        let user = self.users.choose(rng).unwrap_or_else(|| &self.users[0]);

        GeneratedLink {
            review_id: review.id,
            game_id: game.id,
            user_id: user.id,
        }
    }

    /// Generates one link per review, in review order.
    pub fn generate_batch(&self, reviews: &[Review], rng: &mut impl Rng) -> Vec<GeneratedLink> {
        reviews.iter().map(|r| self.generate(r, rng)).collect()
    }
}
