use thiserror::Error;

use crate::game_state::chess_types::{Move, Square};

/// Why a candidate move was rejected. The state it was tried against is
/// never modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Missing or out-of-range squares, unparsable text.
    #[error("malformed move: {0}")]
    Malformed(String),
    #[error("no piece on square {0}")]
    NoPieceOnSquare(Square),
    #[error("piece on square {0} does not belong to the side to move")]
    WrongColor(Square),
    #[error("target on square {0} cannot be captured by this piece")]
    InvulnerableTarget(Square),
    #[error("illegal move {0}")]
    Illegal(Move),
    #[error("game is already over")]
    GameOver,
}

pub type ApplyResult<T> = Result<T, MoveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    #[error("invalid game state: {0}")]
    InvalidState(String),
}

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },
}
