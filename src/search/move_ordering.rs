//! Cheap move ordering: captures and promotions first, most valuable victim
//! by least valuable attacker, then central destinations over edge ones.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::self_destruct_hits;
use crate::moves::directions::{center_distance, is_edge, neighbours};

const CAPTURE_BASE: i32 = 10_000;
const PROMOTION_BASE: i32 = 8_000;
const SELF_DESTRUCT_PER_VICTIM: i32 = 3_000;
const CASTLE_BONUS: i32 = 50;
const CENTER_STEP: i32 = 10;
const EDGE_PENALTY: i32 = 15;

/// Ordering score of `mv` in `game_state`; higher goes first.
pub fn score_move(game_state: &GameState, mv: &Move) -> i32 {
    let board = &game_state.board;
    let Some(mover) = board.piece_at(mv.from) else {
        return i32::MIN;
    };
    let attacker_value = mover.kind.base_value().min(1_000);
    let mut score = 0;

    match mv.kind {
        MoveKind::Capture => {
            if let Some(victim) = board.piece_at(mv.to) {
                score += CAPTURE_BASE + victim.kind.base_value().min(2_000) * 10 - attacker_value / 10;
            }
        }
        MoveKind::EnPassant => {
            score += CAPTURE_BASE + PieceKind::Pawn.base_value() * 10 - attacker_value / 10;
        }
        MoveKind::Promotion => {
            score += PROMOTION_BASE + mv.promotion.map_or(0, |kind| kind.base_value());
            if let Some(victim) = board.piece_at(mv.to) {
                score += victim.kind.base_value() * 10;
            }
        }
        MoveKind::SelfDestruct => {
            let victims = neighbours(mv.from)
                .filter(|(_, sq)| {
                    board
                        .piece_at(*sq)
                        .is_some_and(|target| self_destruct_hits(mover, target, &game_state.rules))
                })
                .count() as i32;
            score += SELF_DESTRUCT_PER_VICTIM * victims - attacker_value;
        }
        MoveKind::Castle => score += CASTLE_BONUS,
        MoveKind::Quiet | MoveKind::Swap => {}
    }

    if mv.kind != MoveKind::SelfDestruct {
        score += (3 - i32::from(center_distance(mv.to))) * CENTER_STEP;
        if is_edge(mv.to) {
            score -= EDGE_PENALTY;
        }
    }
    score
}

/// Sorts `moves` best-first, putting `preferred` (a cached best move) ahead
/// of everything. The sort is stable, so equal scores keep generation order.
pub fn order_moves<T>(game_state: &GameState, moves: &mut [T], preferred: Option<Move>, mv_of: impl Fn(&T) -> Move) {
    moves.sort_by_cached_key(|item| {
        let mv = mv_of(item);
        let first = preferred == Some(mv);
        std::cmp::Reverse((first, score_move(game_state, &mv)))
    });
}
