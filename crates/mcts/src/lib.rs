//! Monte Carlo Tree Search over any `montecarlo_core::Game`.
//!
//! The engine grows a search tree one iteration at a time and estimates the
//! value of each move sequence by averaging the evaluations of random
//! play-outs that passed through it.
//!
//! # Features
//!
//! - **Generic**: Works with any `Game` implementation
//! - **UCB1 Selection**: Children are sampled in proportion to their
//!   upper confidence bound, unvisited children first
//! - **Pluggable Rollouts**: Uniform random by default, scripted for replay
//! - **Injectable RNG**: Seeded generators make every run reproducible
//!
//! # Example
//!
//! ```
//! use montecarlo_games::TravelingTourist;
//! use montecarlo_mcts::{Mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let game = TravelingTourist::new("Berlin", &["Lisbon", "Hamburg", "Madrid"]).unwrap();
//! let state = game.initial_state();
//!
//! let config = MctsConfig::with_iterations(200);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut mcts = Mcts::with_uniform_rollout(game, state, config, rng).unwrap();
//!
//! mcts.run_budget().unwrap();
//! let tour = mcts.best_path();
//! assert_eq!(tour.first().map(String::as_str), Some("Berlin"));
//! ```

pub mod config;
mod node;
pub mod rollout;
pub mod search;
pub mod selection;
mod tree;

pub use config::MctsConfig;
pub use node::{Node, NodeId, NodeStats};
pub use rollout::{RolloutPolicy, ScriptedRollout, UniformRollout};
pub use search::{Iteration, Mcts, SearchStats};
pub use selection::Ucb;
pub use tree::Tree;
