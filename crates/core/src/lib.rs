//! Montecarlo Core - Game abstraction and common types
//!
//! This crate provides the `Game` trait that any decision process must
//! implement to be searched by the Monte Carlo tree search engine.
//!
//! # Types
//!
//! - [`Game`] - Trait for game implementations
//! - [`Policy`] - Probability distribution over candidate moves (sums to 1.0)
//! - [`MctsError`] - Error taxonomy shared by the engine and the games

mod error;
mod game;
mod types;

pub use error::{MctsError, Result};
pub use game::Game;
pub use types::Policy;
