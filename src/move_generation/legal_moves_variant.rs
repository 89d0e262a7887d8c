//! Generators for the optional variant pieces. None of them appear in the
//! standard setup; they enter play through FEN or variant promotions.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{can_capture, push_pawn_like, push_step_or_capture};
use crate::moves::directions::{offset, step, ALL_DIRECTIONS, KNIGHT_JUMPS, ORTHOGONAL};

/// Commander: one step in any direction; from its leap level it also jumps
/// exactly two squares orthogonally, ignoring whatever stands between.
pub fn generate_commander_moves(game_state: &GameState, from: Square, commander: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;
    for dir in ALL_DIRECTIONS {
        if let Some(to) = step(from, dir, 1) {
            push_step_or_capture(board, rules, commander, from, to, out);
        }
    }
    if commander.level >= rules.commander_leap_level {
        for dir in ORTHOGONAL {
            if let Some(to) = step(from, dir, 2) {
                push_step_or_capture(board, rules, commander, from, to, out);
            }
        }
    }
}

/// Hero: knight jumps plus king steps.
pub fn generate_hero_moves(game_state: &GameState, from: Square, hero: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;
    for (dr, dc) in KNIGHT_JUMPS.into_iter().chain(ALL_DIRECTIONS) {
        if let Some(to) = offset(from, dr, dc) {
            push_step_or_capture(board, rules, hero, from, to, out);
        }
    }
}

/// Infiltrator: moves or captures one square forward or diagonally forward,
/// promoting like a pawn on the far rank.
pub fn generate_infiltrator_moves(game_state: &GameState, from: Square, infiltrator: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;
    let forward = infiltrator.color.forward();
    for dc in [-1, 0, 1] {
        let Some(to) = offset(from, forward, dc) else {
            continue;
        };
        if board.is_obstructed(to) {
            continue;
        }
        match board.piece_at(to) {
            None => push_pawn_like(rules, infiltrator.color, from, to, false, out),
            Some(target) if can_capture(infiltrator, target, rules) => {
                push_pawn_like(rules, infiltrator.color, from, to, true, out)
            }
            Some(_) => {}
        }
    }
}
