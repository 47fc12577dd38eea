use thiserror::Error;

/// Errors that can occur while searching or playing a game
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MctsError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Game is not terminal")]
    NotTerminal,

    #[error("No legal moves available at a non-terminal state")]
    NoLegalMoves,

    #[error("Node has not been visited yet")]
    UnvisitedNode,

    #[error("Game could not be initiated: {0}")]
    GameInitiation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Evaluation is not a finite number: {0}")]
    InvalidEvaluation(f64),
}

/// Convenience Result type for search operations
pub type Result<T> = std::result::Result<T, MctsError>;
