use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{push_slides, push_swaps};
use crate::moves::directions::DIAGONAL;

/// Bishop slides; from level 2 it passes through friendly pieces and from
/// level 4 it may swap with a friendly knight. Pawn immunity and conversion
/// live in the capture rules and the applier.
pub fn generate_bishop_moves(game_state: &GameState, from: Square, bishop: &Piece, out: &mut Vec<Move>) {
    let rules = &game_state.rules;
    let phase = bishop.level >= rules.bishop_phase_level;
    push_slides(&game_state.board, rules, bishop, from, &DIAGONAL, phase, out);

    if bishop.level >= rules.bishop_swap_level {
        push_swaps(&game_state.board, bishop, from, PieceKind::Knight, out);
    }
}

#[cfg(test)]
mod tests {
    use super::generate_bishop_moves;
    use crate::game_state::chess_rules::RulesConfig;
    use crate::game_state::{chess_types::*, game_state::GameState};

    fn moves_for(game: &GameState, sq: Square) -> Vec<Move> {
        let bishop = *game.board.piece_at(sq).expect("bishop should be placed");
        let mut out = Vec::new();
        generate_bishop_moves(game, sq, &bishop, &mut out);
        out
    }

    #[test]
    fn leveled_bishop_slides_through_friends_but_not_enemies() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(0, 2);
        game.place_piece(sq, PieceKind::Bishop, Color::Light);
        game.place_piece(square_at(1, 3), PieceKind::Pawn, Color::Light);
        game.place_piece(square_at(4, 6), PieceKind::Pawn, Color::Dark);
        assert!(moves_for(&game, sq)
            .iter()
            .all(|mv| mv.to != square_at(2, 4)));

        game.set_level(sq, 2);
        let moves = moves_for(&game, sq);
        assert!(moves.contains(&Move::quiet(sq, square_at(2, 4))));
        assert!(moves.contains(&Move::capture(sq, square_at(4, 6))));
        assert!(!moves.iter().any(|mv| mv.to == square_at(1, 3)));
        assert!(!moves.iter().any(|mv| mv.to == square_at(5, 7)));
    }

    #[test]
    fn obstacles_stop_slides_even_when_phasing() {
        let mut game = GameState::new_empty(RulesConfig::default());
        let sq = square_at(0, 0);
        game.place_piece_with_level(sq, PieceKind::Bishop, Color::Light, 2);
        game.board.set_item(square_at(2, 2), Some(Item::Obstacle));
        assert_eq!(moves_for(&game, sq), vec![Move::quiet(sq, square_at(1, 1))]);
    }
}
