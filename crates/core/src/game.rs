use crate::Result;
use std::fmt::Debug;
use std::hash::Hash;

/// A decision process the tree search can explore.
///
/// The trait separates the immutable rules (`self`) from the mutable
/// position (`State`). The engine clones the caller's state once per
/// iteration and advances the clone with [`Game::apply`]; it never touches
/// the rules themselves.
///
/// Implementations must guarantee that every state is either terminal (and
/// can be evaluated) or has at least one legal move, and that every play-out
/// reaches a terminal state in a finite number of moves.
pub trait Game: Clone {
    /// A position in the game (e.g., the route travelled so far).
    /// `Clone` must produce a deep, independent copy.
    type State: Clone;

    /// A single move (e.g., a city name or a word).
    type Move: Clone + Eq + Hash + Debug;

    /// Label of the tree root for this state (e.g., the home town).
    ///
    /// It heads every path reported by the search and is never applied.
    fn root(&self, state: &Self::State) -> Self::Move;

    /// Returns true if the game has ended and can be evaluated.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Returns all legal moves from the given state, in a stable order.
    ///
    /// Empty for terminal states. Empty at a non-terminal state is a
    /// violation of this contract and is reported by the engine.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Applies a move, returning the successor state.
    ///
    /// # Errors
    /// Returns `MctsError::IllegalMove` if `mv` is not currently legal.
    fn apply(&self, state: &Self::State, mv: &Self::Move) -> Result<Self::State>;

    /// Scalar evaluation of a terminal state. Higher is better.
    ///
    /// # Errors
    /// Returns `MctsError::NotTerminal` if the state is not terminal.
    fn evaluate(&self, state: &Self::State) -> Result<f64>;
}
