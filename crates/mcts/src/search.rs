//! Monte Carlo Tree Search engine.
//!
//! Every iteration runs four phases against a fresh clone of the caller's
//! state:
//!
//! 1. Selection: sample a path through existing nodes with UCB1 scores
//! 2. Expansion: create a child for every legal move at the leaf and follow one
//! 3. Simulation: play out to the end with the rollout policy
//! 4. Backpropagation: record the evaluation at every node on the path
//!
//! The tree persists across iterations for the life of the engine, so
//! statistics accumulate until [`Mcts::best_path`] reads them out.

use crate::{
    config::MctsConfig,
    node::{NodeId, NodeStats},
    rollout::{self, RolloutPolicy, UniformRollout},
    selection,
    tree::Tree,
};
use montecarlo_core::{Game, MctsError, Result};
use rand::Rng;
use tracing::{debug, trace, warn};

/// Outcome of a single iteration.
#[derive(Clone, Debug, PartialEq)]
pub enum Iteration<M> {
    /// The evaluation was recorded at every node of `path` and at the root.
    Completed {
        /// Moves from the root to the deepest node that was updated.
        path: Vec<M>,
        /// Terminal evaluation produced by the simulation.
        value: f64,
    },
    /// The selected leaf is not terminal but offered no move to expand.
    /// Nothing was recorded.
    Skipped,
}

impl<M> Iteration<M> {
    /// Whether statistics were recorded.
    pub fn is_completed(&self) -> bool {
        matches!(self, Iteration::Completed { .. })
    }
}

/// Counters for a batch of iterations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Iterations run.
    pub iterations: usize,
    /// Iterations whose evaluation was backpropagated.
    pub completed: usize,
    /// Iterations that found nothing to expand.
    pub skipped: usize,
}

/// Result of trying to grow the tree below the selected leaf.
enum Expansion {
    /// A child was created for every legal move and one of them was played.
    Expanded,
    /// The leaf is terminal, so the selected path is final.
    Terminal,
    /// The leaf is not terminal but has no legal move.
    Exhausted,
}

/// Monte Carlo Tree Search with UCB1 selection.
///
/// Generic over:
/// - `G`: The game being searched
/// - `P`: The rollout policy used for expansion and simulation
/// - `R`: The random number generator
///
/// The engine owns the tree and is strictly sequential: each iteration
/// mutates one clone of the root state.
pub struct Mcts<G: Game, R: Rng, P: RolloutPolicy<G::Move> = UniformRollout> {
    game: G,
    config: MctsConfig,
    rollout: P,
    rng: R,
    tree: Tree<G::Move>,
    root_move: G::Move,
    root_state: G::State,
    /// Scratch copy of `root_state`, advanced along the current path.
    working_state: G::State,
    /// Nodes of the current iteration, starting with the root.
    current_path: Vec<NodeId>,
    /// Moves of the current iteration, one per non-root node.
    current_moves: Vec<G::Move>,
    total_simulations: u64,
}

impl<G, R> Mcts<G, R, UniformRollout>
where
    G: Game,
    R: Rng,
{
    /// Create an engine with the default uniform rollout policy.
    pub fn with_uniform_rollout(
        game: G,
        state: G::State,
        config: MctsConfig,
        rng: R,
    ) -> Result<Self> {
        Self::new(game, state, config, UniformRollout, rng)
    }
}

impl<G, R, P> Mcts<G, R, P>
where
    G: Game,
    R: Rng,
    P: RolloutPolicy<G::Move>,
{
    /// Create a new search session rooted at `state`.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidConfig` if the configuration is rejected.
    pub fn new(game: G, state: G::State, config: MctsConfig, rollout: P, rng: R) -> Result<Self> {
        config.validate()?;

        let root_move = game.root(&state);
        Ok(Self {
            game,
            config,
            rollout,
            rng,
            tree: Tree::new(),
            root_move,
            working_state: state.clone(),
            root_state: state,
            current_path: vec![NodeId::ROOT],
            current_moves: Vec::new(),
            total_simulations: 0,
        })
    }

    /// Run one select -> expand -> simulate -> backpropagate cycle.
    ///
    /// # Errors
    /// Propagates game contract violations (`IllegalMove`, `NotTerminal`,
    /// `NoLegalMoves`) and returns `InvalidEvaluation` for a NaN or infinite
    /// evaluation. A failed iteration records nothing.
    pub fn run_iteration(&mut self) -> Result<Iteration<G::Move>> {
        self.select()?;

        match self.expand()? {
            Expansion::Expanded | Expansion::Terminal => {}
            Expansion::Exhausted => {
                warn!(
                    depth = self.current_moves.len(),
                    "non-terminal state offered no move to expand, skipping iteration"
                );
                return Ok(Iteration::Skipped);
            }
        }

        let value = self.simulate()?;
        if !value.is_finite() {
            return Err(MctsError::InvalidEvaluation(value));
        }
        self.backpropagate(value);

        trace!(
            depth = self.current_moves.len(),
            value,
            total_simulations = self.total_simulations,
            "iteration complete"
        );

        Ok(Iteration::Completed {
            path: self.current_moves.clone(),
            value,
        })
    }

    /// Run `iterations` iterations in sequence.
    ///
    /// Stops at the first error; statistics from earlier iterations are kept.
    pub fn run(&mut self, iterations: usize) -> Result<SearchStats> {
        let mut stats = SearchStats::default();

        for _ in 0..iterations {
            match self.run_iteration()? {
                Iteration::Completed { .. } => stats.completed += 1,
                Iteration::Skipped => stats.skipped += 1,
            }
            stats.iterations += 1;
        }

        debug!(
            iterations = stats.iterations,
            completed = stats.completed,
            skipped = stats.skipped,
            tree_size = self.tree.len(),
            "search batch finished"
        );

        Ok(stats)
    }

    /// Run the configured iteration budget.
    pub fn run_budget(&mut self) -> Result<SearchStats> {
        self.run(self.config.iteration_budget)
    }

    /// Greedy path by average value.
    ///
    /// Starts with the root label, then repeatedly follows the visited child
    /// with the highest average value (the earliest created child wins a
    /// tie) until the current node has no visited child.
    pub fn best_path(&self) -> Vec<G::Move> {
        let mut path = vec![self.root_move.clone()];
        let mut node = NodeId::ROOT;

        loop {
            let mut best: Option<(f64, &G::Move, NodeId)> = None;

            for (mv, child_id) in self.tree.get(node).children() {
                let Ok(mean) = self.tree.get(*child_id).stats().average_value() else {
                    continue;
                };
                if best.map_or(true, |(best_mean, _, _)| mean > best_mean) {
                    best = Some((mean, mv, *child_id));
                }
            }

            match best {
                Some((_, mv, child_id)) => {
                    path.push(mv.clone());
                    node = child_id;
                }
                None => break,
            }
        }

        path
    }

    /// Statistics of the node reached by `moves` from the root.
    ///
    /// `moves` excludes the root label; an empty slice addresses the root.
    pub fn stats(&self, moves: &[G::Move]) -> Option<&NodeStats> {
        self.tree.node_at(moves).map(|id| self.tree.get(id).stats())
    }

    /// Moves selected and expanded by the most recent iteration.
    pub fn current_path(&self) -> &[G::Move] {
        &self.current_moves
    }

    /// Number of simulations whose evaluation has been backpropagated.
    pub fn total_simulations(&self) -> u64 {
        self.total_simulations
    }

    /// The search tree.
    pub fn tree(&self) -> &Tree<G::Move> {
        &self.tree
    }

    /// The configuration in use.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// The game rules being searched.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// SELECT: sample a path from the root through existing nodes.
    ///
    /// Stops when the working state is terminal or the current node has no
    /// children yet.
    fn select(&mut self) -> Result<()> {
        self.working_state = self.root_state.clone();
        self.current_path.clear();
        self.current_path.push(NodeId::ROOT);
        self.current_moves.clear();

        let mut node = NodeId::ROOT;
        while !self.game.is_terminal(&self.working_state) {
            let picked = selection::select_child(
                &self.tree,
                node,
                self.total_simulations,
                self.config.exploration_coefficient,
                &mut self.rng,
            )?;
            let Some((mv, child_id)) = picked else {
                break;
            };

            self.working_state = self.game.apply(&self.working_state, &mv)?;
            self.current_path.push(child_id);
            self.current_moves.push(mv);
            node = child_id;
        }

        Ok(())
    }

    /// EXPAND: create a child for every legal move at the leaf, then follow
    /// one chosen by the rollout policy.
    fn expand(&mut self) -> Result<Expansion> {
        if self.game.is_terminal(&self.working_state) {
            return Ok(Expansion::Terminal);
        }

        let moves = self.game.legal_moves(&self.working_state);
        if moves.is_empty() {
            return Ok(Expansion::Exhausted);
        }

        let leaf = self.leaf();
        for mv in &moves {
            self.tree.get_or_create_child(leaf, mv.clone());
        }

        let mv = rollout::choose_move(&moves, &mut self.rollout, &mut self.rng)?;
        self.working_state = self.game.apply(&self.working_state, &mv)?;

        let child_id = self.tree.get_or_create_child(leaf, mv.clone());
        self.current_path.push(child_id);
        self.current_moves.push(mv);

        Ok(Expansion::Expanded)
    }

    /// SIMULATE: play out from the expanded state.
    fn simulate(&mut self) -> Result<f64> {
        rollout::play_out(
            &self.game,
            &self.working_state,
            &mut self.rollout,
            &mut self.rng,
        )
    }

    /// BACKPROPAGATE: record `value` at every node of the current path,
    /// root included.
    fn backpropagate(&mut self, value: f64) {
        for &node_id in &self.current_path {
            self.tree.record_outcome(node_id, value);
        }
        self.total_simulations += 1;
    }

    fn leaf(&self) -> NodeId {
        self.current_path.last().copied().unwrap_or(NodeId::ROOT)
    }
}
