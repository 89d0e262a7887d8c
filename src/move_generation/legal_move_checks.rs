//! Attack detection.
//!
//! Attack patterns mirror the capture patterns of the generators (pawns
//! attack diagonally forward only, leveled pieces extend their reach) but
//! ignore the target's protections: a king's square counts as attacked no
//! matter what, since kings are never invulnerable.

use crate::game_state::chess_rules::RulesConfig;
use crate::game_state::{chess_types::*, game_state::Board, game_state::GameState};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    game_state.board.king_square(color)
}

/// A side without a king is never in check; the caller classifies that
/// situation separately.
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(&game_state.board, &game_state.rules, king_sq, color.opposite())
}

pub fn is_square_attacked(board: &Board, rules: &RulesConfig, square: Square, attacker_color: Color) -> bool {
    board
        .pieces_of(attacker_color)
        .any(|(from, piece)| attacks_square(board, rules, from, piece, square))
}

pub fn attackers_to_square(
    board: &Board,
    rules: &RulesConfig,
    square: Square,
    attacker_color: Color,
) -> Vec<(Square, PieceKind)> {
    board
        .pieces_of(attacker_color)
        .filter(|(from, piece)| attacks_square(board, rules, *from, piece, square))
        .map(|(from, piece)| (from, piece.kind))
        .collect()
}

/// Whether `piece` standing on `from` could capture on `target` by pattern.
pub fn attacks_square(board: &Board, rules: &RulesConfig, from: Square, piece: &Piece, target: Square) -> bool {
    if from == target {
        return false;
    }
    let dr = row_of(target) as i8 - row_of(from) as i8;
    let dc = col_of(target) as i8 - col_of(from) as i8;
    let forward = piece.color.forward();

    match piece.kind {
        PieceKind::Pawn => dr == forward && dc.abs() == 1,
        PieceKind::Infiltrator => dr == forward && dc.abs() <= 1,
        PieceKind::Knight => {
            is_knight_jump(dr, dc)
                || (piece.level >= rules.knight_step_level && dr.abs() + dc.abs() == 1)
                || (piece.level >= rules.knight_leap_level
                    && is_straight(dr, dc)
                    && dr.abs().max(dc.abs()) == 3
                    && path_is_clear(board, piece, from, dr, dc, false))
        }
        PieceKind::Bishop => {
            dr.abs() == dc.abs()
                && path_is_clear(board, piece, from, dr, dc, piece.level >= rules.bishop_phase_level)
        }
        PieceKind::Rook => is_straight(dr, dc) && path_is_clear(board, piece, from, dr, dc, false),
        PieceKind::Queen => {
            (is_straight(dr, dc) || dr.abs() == dc.abs())
                && path_is_clear(board, piece, from, dr, dc, false)
        }
        PieceKind::King => {
            is_king_step(dr, dc)
                || (piece.level >= rules.king_extended_reach_level
                    && is_double_step(dr, dc)
                    && path_is_clear(board, piece, from, dr, dc, false))
                || (piece.level >= rules.king_knight_step_level && is_knight_jump(dr, dc))
        }
        PieceKind::Commander => {
            is_king_step(dr, dc)
                || (piece.level >= rules.commander_leap_level
                    && is_straight(dr, dc)
                    && dr.abs().max(dc.abs()) == 2)
        }
        PieceKind::Hero => is_king_step(dr, dc) || is_knight_jump(dr, dc),
    }
}

#[inline]
fn is_knight_jump(dr: i8, dc: i8) -> bool {
    (dr.abs() == 1 && dc.abs() == 2) || (dr.abs() == 2 && dc.abs() == 1)
}

#[inline]
fn is_king_step(dr: i8, dc: i8) -> bool {
    dr.abs() <= 1 && dc.abs() <= 1 && (dr, dc) != (0, 0)
}

#[inline]
fn is_straight(dr: i8, dc: i8) -> bool {
    (dr == 0) != (dc == 0)
}

#[inline]
fn is_double_step(dr: i8, dc: i8) -> bool {
    (dr.abs() == 2 || dc.abs() == 2)
        && (dr == 0 || dc == 0 || dr.abs() == dc.abs())
}

/// Every square strictly between `from` and `from + (dr, dc)` along a line
/// is passable (or a friendly piece, when phasing).
fn path_is_clear(board: &Board, piece: &Piece, from: Square, dr: i8, dc: i8, phase_through_friends: bool) -> bool {
    let steps = dr.abs().max(dc.abs());
    let (ur, uc) = (dr.signum(), dc.signum());
    (1..steps).all(|k| {
        let row = row_of(from) as i8 + ur * k;
        let col = col_of(from) as i8 + uc * k;
        let sq = square_at(row as u8, col as u8);
        if board.is_obstructed(sq) {
            return false;
        }
        match board.piece_at(sq) {
            None => true,
            Some(other) => phase_through_friends && other.color == piece.color,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawns_attack_diagonally_only() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(1, 4), PieceKind::Pawn, Color::Light);
        let board = &game.board;
        let rules = &game.rules;
        assert!(is_square_attacked(board, rules, square_at(2, 3), Color::Light));
        assert!(is_square_attacked(board, rules, square_at(2, 5), Color::Light));
        assert!(!is_square_attacked(board, rules, square_at(2, 4), Color::Light));
    }

    #[test]
    fn sliders_are_blocked_by_pieces_and_obstacles() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 0), PieceKind::Rook, Color::Dark);
        assert!(is_square_attacked(&game.board, &game.rules, square_at(0, 7), Color::Dark));
        game.board.set_item(square_at(0, 4), Some(Item::Obstacle));
        assert!(!is_square_attacked(&game.board, &game.rules, square_at(0, 7), Color::Dark));
        assert!(is_square_attacked(&game.board, &game.rules, square_at(0, 3), Color::Dark));
    }

    #[test]
    fn check_ignores_invulnerability() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 4), PieceKind::Rook, Color::Dark);
        if let Some(king) = game.board.piece_at_mut(square_at(0, 4)) {
            king.invulnerable_turns = 2;
        }
        assert!(is_king_in_check(&game, Color::Light));
        assert!(!is_king_in_check(&game, Color::Dark));
    }

    #[test]
    fn leveled_king_projects_two_square_reach() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece_with_level(square_at(3, 3), PieceKind::King, Color::Dark, 2);
        let board = &game.board;
        let rules = &game.rules;
        assert!(is_square_attacked(board, rules, square_at(5, 5), Color::Dark));
        assert!(is_square_attacked(board, rules, square_at(3, 1), Color::Dark));
        assert!(!is_square_attacked(board, rules, square_at(5, 4), Color::Dark));
    }

    #[test]
    fn attackers_are_listed_per_piece() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(2, 3), PieceKind::Knight, Color::Dark);
        game.place_piece(square_at(4, 0), PieceKind::Bishop, Color::Dark);
        let attackers = attackers_to_square(&game.board, &game.rules, square_at(0, 4), Color::Dark);
        assert_eq!(attackers.len(), 2);
        assert!(attackers.contains(&(square_at(2, 3), PieceKind::Knight)));
        assert!(attackers.contains(&(square_at(4, 0), PieceKind::Bishop)));
    }
}
