//! Capture eligibility and destination helpers shared by the per-piece
//! generators, the attack oracle, and the move applier.

use crate::game_state::chess_rules::RulesConfig;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::Board;
use crate::moves::directions::{step, Direction};

/// Whether `attacker` may capture `target` by an ordinary capture.
///
/// Kings are never protected. Otherwise an active invulnerability window,
/// the bishop's pawn immunity, and the queen's royal guard all block.
pub fn can_capture(attacker: &Piece, target: &Piece, rules: &RulesConfig) -> bool {
    if attacker.color == target.color {
        return false;
    }
    if target.kind == PieceKind::King {
        return true;
    }
    if target.is_invulnerable() {
        return false;
    }
    match target.kind {
        PieceKind::Bishop
            if attacker.kind == PieceKind::Pawn
                && target.level >= rules.bishop_pawn_immunity_level =>
        {
            false
        }
        PieceKind::Queen if is_royal_guard(target, rules) => attacker.level >= target.level,
        _ => true,
    }
}

/// Whether a self-destruct by `attacker` removes `target`.
pub fn self_destruct_hits(attacker: &Piece, target: &Piece, rules: &RulesConfig) -> bool {
    if attacker.color == target.color || target.kind == PieceKind::King {
        return false;
    }
    if target.is_invulnerable() {
        return false;
    }
    if rules.self_destruct_bypasses_royal_guard && is_royal_guard(target, rules) {
        return true;
    }
    can_capture(attacker, target, rules)
}

#[inline]
pub fn is_royal_guard(piece: &Piece, rules: &RulesConfig) -> bool {
    piece.kind == PieceKind::Queen && piece.level >= rules.royal_guard_level
}

/// Pushes a quiet move or a capture onto `out` if `to` is a valid landing
/// square for `piece`. Returns true when the square was empty, which lets
/// sliders keep walking.
pub fn push_step_or_capture(
    board: &Board,
    rules: &RulesConfig,
    piece: &Piece,
    from: Square,
    to: Square,
    out: &mut Vec<Move>,
) -> bool {
    if board.is_obstructed(to) {
        return false;
    }
    match board.piece_at(to) {
        None => {
            out.push(Move::quiet(from, to));
            true
        }
        Some(target) => {
            if can_capture(piece, target, rules) {
                out.push(Move::capture(from, to));
            }
            false
        }
    }
}

/// Sliding generation along `directions`. With `phase_through_friends` the
/// slider passes over (never onto) its own pieces.
pub fn push_slides(
    board: &Board,
    rules: &RulesConfig,
    piece: &Piece,
    from: Square,
    directions: &[Direction],
    phase_through_friends: bool,
    out: &mut Vec<Move>,
) {
    for &dir in directions {
        let mut distance = 1;
        while let Some(to) = step(from, dir, distance) {
            distance += 1;
            if board.is_obstructed(to) {
                break;
            }
            match board.piece_at(to) {
                None => out.push(Move::quiet(from, to)),
                Some(other) if other.color == piece.color => {
                    if phase_through_friends {
                        continue;
                    }
                    break;
                }
                Some(target) => {
                    if can_capture(piece, target, rules) {
                        out.push(Move::capture(from, to));
                    }
                    break;
                }
            }
        }
    }
}

/// Moves onto `to` for a pawn-like piece, expanded into one move per
/// promotion target when `to` is on the far rank.
pub fn push_pawn_like(
    rules: &RulesConfig,
    color: Color,
    from: Square,
    to: Square,
    is_capture: bool,
    out: &mut Vec<Move>,
) {
    if row_of(to) == color.promotion_row() {
        for &target in rules.promotion_targets() {
            out.push(Move::promotion(from, to, target));
        }
    } else if is_capture {
        out.push(Move::capture(from, to));
    } else {
        out.push(Move::quiet(from, to));
    }
}

/// Swap moves onto every friendly piece of `partner` kind.
pub fn push_swaps(board: &Board, piece: &Piece, from: Square, partner: PieceKind, out: &mut Vec<Move>) {
    for (sq, other) in board.pieces_of(piece.color) {
        if sq != from && other.kind == partner {
            out.push(Move::new(from, sq, MoveKind::Swap));
        }
    }
}
