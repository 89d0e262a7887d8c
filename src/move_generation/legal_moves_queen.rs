use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_slides;
use crate::moves::directions::ALL_DIRECTIONS;

/// Queen slides. Royal guard is a capture-time rule, not a movement change.
pub fn generate_queen_moves(game_state: &GameState, from: Square, queen: &Piece, out: &mut Vec<Move>) {
    push_slides(
        &game_state.board,
        &game_state.rules,
        queen,
        from,
        &ALL_DIRECTIONS,
        false,
        out,
    );
}
