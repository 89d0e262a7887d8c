use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_step_or_capture;
use crate::moves::directions::{offset, step, ALL_DIRECTIONS, KNIGHT_JUMPS};

pub fn generate_king_moves(game_state: &GameState, from: Square, king: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;
    let enemy = king.color.opposite();

    for dir in ALL_DIRECTIONS {
        if let Some(to) = step(from, dir, 1) {
            push_step_or_capture(board, rules, king, from, to, out);
        }
    }

    if king.level >= rules.king_extended_reach_level {
        // The king may not pass through an attacked square. Attacks are
        // measured with the king lifted so it cannot shield its own path.
        let mut lifted = board.clone();
        lifted.take_piece(from);
        for dir in ALL_DIRECTIONS {
            let (Some(mid), Some(to)) = (step(from, dir, 1), step(from, dir, 2)) else {
                continue;
            };
            if board.is_passable(mid) && !is_square_attacked(&lifted, rules, mid, enemy) {
                push_step_or_capture(board, rules, king, from, to, out);
            }
        }
    }

    if king.level >= rules.king_knight_step_level {
        for (dr, dc) in KNIGHT_JUMPS {
            if let Some(to) = offset(from, dr, dc) {
                push_step_or_capture(board, rules, king, from, to, out);
            }
        }
    }

    generate_castling_moves(game_state, from, king, out);
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, king: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;
    let back_row = king.color.back_row();
    let enemy = king.color.opposite();

    if king.has_moved || king_from != square_at(back_row, 4) {
        return;
    }
    // Cannot castle out of check.
    if is_square_attacked(board, rules, king_from, enemy) {
        return;
    }

    // (rook column, columns that must be empty, columns the king crosses, king destination)
    const SIDES: [(u8, &[u8], [u8; 2], u8); 2] = [(7, &[5, 6], [5, 6], 6), (0, &[1, 2, 3], [3, 2], 2)];

    for (rook_col, between, king_path, king_to_col) in SIDES {
        let rook_ok = board
            .piece_at(square_at(back_row, rook_col))
            .is_some_and(|rook| rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved);
        if !rook_ok {
            continue;
        }
        let clear = between
            .iter()
            .all(|&col| board.is_passable(square_at(back_row, col)));
        let safe = king_path
            .iter()
            .all(|&col| !is_square_attacked(board, rules, square_at(back_row, col), enemy));
        if clear && safe {
            out.push(Move::new(king_from, square_at(back_row, king_to_col), MoveKind::Castle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::chess_rules::RulesConfig;
    use crate::game_state::{chess_types::*, game_state::GameState};

    fn moves_for(game: &GameState, sq: Square) -> Vec<Move> {
        let king = *game.board.piece_at(sq).expect("king should be placed");
        let mut out = Vec::new();
        generate_king_moves(game, sq, &king, &mut out);
        out
    }

    #[test]
    fn level_one_king_steps_one_square() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(3, 3);
        game.place_piece(sq, PieceKind::King, Color::Light);
        assert_eq!(moves_for(&game, sq).len(), 8);
    }

    #[test]
    fn extended_reach_avoids_attacked_intermediate_squares() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(3, 3);
        game.place_piece_with_level(sq, PieceKind::King, Color::Light, 2);
        assert_eq!(moves_for(&game, sq).len(), 16);

        // A dark rook on the e-file covers e4, so f4 is out of reach; d6 is not.
        game.place_piece(square_at(7, 4), PieceKind::Rook, Color::Dark);
        let moves = moves_for(&game, sq);
        assert!(!moves.contains(&Move::quiet(sq, square_at(3, 5))));
        assert!(moves.contains(&Move::quiet(sq, square_at(5, 3))));
    }

    #[test]
    fn castling_requires_unmoved_pieces_and_safe_path() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let king_sq = square_at(0, 4);
        game.place_piece(king_sq, PieceKind::King, Color::Light);
        game.place_piece(square_at(0, 7), PieceKind::Rook, Color::Light);
        game.place_piece(square_at(0, 0), PieceKind::Rook, Color::Light);
        let castles = |game: &GameState| -> Vec<Square> {
            moves_for(game, king_sq)
                .into_iter()
                .filter(|mv| mv.kind == MoveKind::Castle)
                .map(|mv| mv.to)
                .collect()
        };
        assert_eq!(castles(&game), vec![square_at(0, 6), square_at(0, 2)]);

        game.place_piece(square_at(7, 5), PieceKind::Rook, Color::Dark);
        assert_eq!(castles(&game), vec![square_at(0, 2)]);

        if let Some(rook) = game.board.piece_at_mut(square_at(0, 0)) {
            rook.has_moved = true;
        }
        assert!(castles(&game).is_empty());
    }
}
