//! UCB1 selection policy.
//!
//! Children are scored with
//!
//! ```text
//! score = mean + c * sqrt(ln(N_total) / n)
//! ```
//!
//! where `N_total` counts every simulation the engine has completed and `n`
//! counts the visits of the child. Instead of taking the arg-max, a child is
//! sampled with probability proportional to its score.

use crate::node::{NodeId, NodeStats};
use crate::tree::Tree;
use montecarlo_core::{Policy, Result};
use rand::Rng;
use std::hash::Hash;

/// Confidence-bound score of one child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ucb {
    /// Never visited, or no simulation has completed yet. Outranks any score.
    Unvisited,
    /// Finite UCB1 score of a visited child.
    Score(f64),
}

/// Score a child given the engine-wide simulation count.
pub fn ucb1(stats: &NodeStats, total_simulations: u64, exploration: f64) -> Ucb {
    // ln(0) is undefined: before the first simulation every child counts as unvisited
    if total_simulations == 0 {
        return Ucb::Unvisited;
    }

    match stats.average_value() {
        Ok(mean) => {
            let n = stats.visit_count() as f64;
            let bonus = ((total_simulations as f64).ln() / n).sqrt();
            Ucb::Score(mean + exploration * bonus)
        }
        Err(_) => Ucb::Unvisited,
    }
}

/// Turn child scores into a sampling distribution.
///
/// If any child is unvisited, the distribution is uniform over the unvisited
/// children and zero elsewhere. Otherwise it is proportional to the scores,
/// falling back to uniform when they are all zero.
///
/// # Errors
/// Returns `MctsError::InvalidPolicy` for an empty slice or non-finite scores.
pub fn selection_policy(scores: &[Ucb]) -> Result<Policy> {
    let unvisited: Vec<bool> = scores.iter().map(|s| *s == Ucb::Unvisited).collect();
    if unvisited.iter().any(|&u| u) {
        return Policy::uniform_over(&unvisited);
    }

    let values: Vec<f64> = scores
        .iter()
        .filter_map(|s| match s {
            Ucb::Score(v) => Some(*v),
            Ucb::Unvisited => None,
        })
        .collect();
    Policy::from_scores(&values)
}

/// Draw a candidate index from `policy`.
pub fn sample<R: Rng + ?Sized>(policy: &Policy, rng: &mut R) -> usize {
    policy.index_at(rng.gen::<f64>())
}

/// Sample one existing child of `node`.
///
/// Returns `Ok(None)` when the node has no children yet, which is where
/// expansion takes over.
pub fn select_child<M, R>(
    tree: &Tree<M>,
    node: NodeId,
    total_simulations: u64,
    exploration: f64,
    rng: &mut R,
) -> Result<Option<(M, NodeId)>>
where
    M: Clone + Eq + Hash,
    R: Rng + ?Sized,
{
    let children = tree.get(node).children();
    if children.is_empty() {
        return Ok(None);
    }

    let scores: Vec<Ucb> = children
        .iter()
        .map(|(_, id)| ucb1(tree.get(*id).stats(), total_simulations, exploration))
        .collect();
    let policy = selection_policy(&scores)?;
    let (mv, id) = &children[sample(&policy, rng)];

    Ok(Some((mv.clone(), *id)))
}
