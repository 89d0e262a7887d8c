//! Engine abstraction layer.
//!
//! Defines common input parameters and output payloads so different move
//! choosers can be selected at runtime behind a single trait interface.

use crate::errors::EngineError;
use crate::game_state::chess_types::Move;
use crate::game_state::game_state::GameState;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    /// Score from the mover's point of view, when the engine computes one.
    pub score: Option<i32>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> Result<(), EngineError> {
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    /// Chooses a move for `game_state.side_to_move`. `Ok` with no move means
    /// the side has nothing legal to play.
    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> Result<EngineOutput, EngineError>;
}

pub(crate) fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, EngineError> {
    value.trim().parse().map_err(|_| EngineError::InvalidOptionValue {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}
