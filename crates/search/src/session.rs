//! One independent search session and its printable summary.

use anyhow::{Context, Result};
use montecarlo_core::Game;
use montecarlo_mcts::{Mcts, MctsConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Outcome of a session, printed as one JSON line.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub seed: u64,
    pub best_path: Vec<String>,
    pub root_visits: u32,
    /// Average value of the last node on `best_path`, if it was ever visited.
    pub best_path_average: Option<f64>,
    pub skipped: usize,
}

/// Run a full search budget from `state` with a session-specific seed.
pub fn run_session<G>(game: &G, state: &G::State, config: &MctsConfig, seed: u64) -> Result<SessionReport>
where
    G: Game<Move = String>,
{
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut mcts = Mcts::with_uniform_rollout(game.clone(), state.clone(), config.clone(), rng)
        .context("Failed to create search engine")?;

    let stats = mcts
        .run_budget()
        .with_context(|| format!("Search failed for seed {}", seed))?;
    debug!(seed, completed = stats.completed, skipped = stats.skipped, "session finished");

    let best_path = mcts.best_path();
    let root_visits = mcts.stats(&[]).map_or(0, |s| s.visit_count());
    let best_path_average = mcts
        .stats(&best_path[1..])
        .and_then(|s| s.average_value().ok());

    Ok(SessionReport {
        seed,
        best_path,
        root_visits,
        best_path_average,
        skipped: stats.skipped,
    })
}

/// Run `sessions` independent sessions in parallel, seeded `seed`, `seed + 1`, ...
///
/// Reports come back in seed order.
pub fn run_sessions<G>(
    game: &G,
    state: &G::State,
    config: &MctsConfig,
    sessions: usize,
    seed: u64,
) -> Result<Vec<SessionReport>>
where
    G: Game<Move = String> + Sync,
    G::State: Sync,
{
    (0..sessions)
        .into_par_iter()
        .map(|i| run_session(game, state, config, seed.wrapping_add(i as u64)))
        .collect()
}
