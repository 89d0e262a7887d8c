use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_slides;
use crate::moves::directions::ORTHOGONAL;

/// Rook slides. Its level-3 invulnerability window is granted by the applier.
pub fn generate_rook_moves(game_state: &GameState, from: Square, rook: &Piece, out: &mut Vec<Move>) {
    push_slides(&game_state.board, &game_state.rules, rook, from, &ORTHOGONAL, false, out);
}
