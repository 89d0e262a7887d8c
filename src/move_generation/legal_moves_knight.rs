use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{push_step_or_capture, push_swaps, self_destruct_hits};
use crate::moves::directions::{neighbours, offset, step, KNIGHT_JUMPS, ORTHOGONAL};

pub fn generate_knight_moves(game_state: &GameState, from: Square, knight: &Piece, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let rules = &game_state.rules;

    for (dr, dc) in KNIGHT_JUMPS {
        if let Some(to) = offset(from, dr, dc) {
            push_step_or_capture(board, rules, knight, from, to, out);
        }
    }

    if knight.level >= rules.knight_step_level {
        for (dr, dc) in ORTHOGONAL {
            if let Some(to) = offset(from, dr, dc) {
                push_step_or_capture(board, rules, knight, from, to, out);
            }
        }
    }

    if knight.level >= rules.knight_leap_level {
        for dir in ORTHOGONAL {
            let Some(to) = step(from, dir, 3) else {
                continue;
            };
            let path_clear = (1..3)
                .filter_map(|distance| step(from, dir, distance))
                .all(|sq| board.is_passable(sq));
            if path_clear {
                push_step_or_capture(board, rules, knight, from, to, out);
            }
        }
    }

    if knight.level >= rules.knight_swap_level {
        push_swaps(board, knight, from, PieceKind::Bishop, out);
    }

    if knight.level >= rules.knight_self_destruct_level {
        let has_victim = neighbours(from).any(|(_, sq)| {
            board
                .piece_at(sq)
                .is_some_and(|target| self_destruct_hits(knight, target, rules))
        });
        if has_victim {
            out.push(Move::self_destruct(from));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_knight_moves;
    use crate::game_state::chess_rules::RulesConfig;
    use crate::game_state::{chess_types::*, game_state::GameState};

    fn moves_for(game: &GameState, sq: Square) -> Vec<Move> {
        let knight = *game.board.piece_at(sq).expect("knight should be placed");
        let mut out = Vec::new();
        generate_knight_moves(game, sq, &knight, &mut out);
        out
    }

    #[test]
    fn abilities_accumulate_with_level() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(3, 3);
        game.place_piece(sq, PieceKind::Knight, Color::Light);
        assert_eq!(moves_for(&game, sq).len(), 8);

        game.set_level(sq, 2);
        assert_eq!(moves_for(&game, sq).len(), 12);

        game.set_level(sq, 3);
        // d4 leaps to d1, d7, a4 and g4.
        assert_eq!(moves_for(&game, sq).len(), 16);
    }

    #[test]
    fn three_square_leap_needs_a_clear_path() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(0, 0);
        game.place_piece_with_level(sq, PieceKind::Knight, Color::Light, 3);
        game.board.set_item(square_at(1, 0), Some(Item::Obstacle));
        let moves = moves_for(&game, sq);
        assert!(!moves.contains(&Move::quiet(sq, square_at(3, 0))));
        assert!(moves.contains(&Move::quiet(sq, square_at(0, 3))));
    }

    #[test]
    fn swap_targets_friendly_bishops() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(0, 1);
        game.place_piece_with_level(sq, PieceKind::Knight, Color::Light, 4);
        game.place_piece(square_at(5, 5), PieceKind::Bishop, Color::Light);
        game.place_piece(square_at(6, 6), PieceKind::Bishop, Color::Dark);
        let swaps: Vec<_> = moves_for(&game, sq)
            .into_iter()
            .filter(|mv| mv.kind == MoveKind::Swap)
            .collect();
        assert_eq!(swaps, vec![Move::new(sq, square_at(5, 5), MoveKind::Swap)]);
    }

    #[test]
    fn self_destruct_only_offered_with_a_victim() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(4, 4);
        game.place_piece_with_level(sq, PieceKind::Knight, Color::Light, 5);
        assert!(!moves_for(&game, sq).contains(&Move::self_destruct(sq)));

        game.place_piece(square_at(5, 5), PieceKind::King, Color::Dark);
        assert!(!moves_for(&game, sq).contains(&Move::self_destruct(sq)));

        game.place_piece(square_at(3, 4), PieceKind::Pawn, Color::Dark);
        assert!(moves_for(&game, sq).contains(&Move::self_destruct(sq)));
    }
}
