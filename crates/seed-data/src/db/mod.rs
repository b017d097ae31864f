//! Database integration for seeding.
//!
//! The [`Seeder`] resets the store and writes generated rows in batches.

mod seeder;

pub use seeder::{SeedError, SeededRows, Seeder};
