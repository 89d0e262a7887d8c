use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{can_capture, push_pawn_like};
use crate::moves::directions::offset;

/// Pawn pseudo-legal moves. Level 2 adds a backward step, level 3 a sideways
/// step; both are non-capturing. Push-back (level 4) and the promotion extra
/// turn (level 5) are resolved by the applier.
pub fn generate_pawn_moves(game_state: &GameState, from: Square, pawn: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;
    let side = pawn.color;
    let forward = side.forward();

    if let Some(one) = offset(from, forward, 0) {
        if board.is_passable(one) {
            push_pawn_like(rules, side, from, one, false, out);

            if !pawn.has_moved && row_of(from) == side.pawn_start_row() {
                if let Some(two) = offset(from, 2 * forward, 0) {
                    if board.is_passable(two) {
                        out.push(Move::quiet(from, two));
                    }
                }
            }
        }
    }

    for dc in [-1i8, 1] {
        let Some(to) = offset(from, forward, dc) else {
            continue;
        };
        match board.piece_at(to) {
            Some(target) => {
                if can_capture(pawn, target, rules) {
                    push_pawn_like(rules, side, from, to, true, out);
                }
            }
            None if game_state.en_passant_target == Some(to) && !board.is_obstructed(to) => {
                let victim_sq = square_at(row_of(from), col_of(to));
                if let Some(victim) = board.piece_at(victim_sq) {
                    if victim.kind == PieceKind::Pawn && can_capture(pawn, victim, rules) {
                        out.push(Move::new(from, to, MoveKind::EnPassant));
                    }
                }
            }
            None => {}
        }
    }

    if pawn.level >= rules.pawn_backward_level {
        if let Some(back) = offset(from, -forward, 0) {
            if board.is_passable(back) {
                out.push(Move::quiet(from, back));
            }
        }
    }

    if pawn.level >= rules.pawn_sideways_level {
        for dc in [-1i8, 1] {
            if let Some(side_sq) = offset(from, 0, dc) {
                if board.is_passable(side_sq) {
                    out.push(Move::quiet(from, side_sq));
                }
            }
        }
    }
}
