//! Generators for seed data.
//!
//! - [`LinkGenerator`]: pick a random game and user for each review

pub mod link;

pub use link::{GeneratedLink, LinkGenerator};
