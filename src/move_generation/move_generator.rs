use crate::game_state::chess_types::Move;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_side_effects::MoveEffects;

pub use crate::errors::{MoveGenResult, MoveGenerationError};

/// A legal move together with the state it produces and what happened.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub game_after_move: GameState,
    pub effects: MoveEffects,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>>;
}
