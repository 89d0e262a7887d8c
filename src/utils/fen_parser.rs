//! FEN-to-GameState parser.
//!
//! Reads the placement, side-to-move, castling, and en-passant fields. The
//! two clock fields are optional; the fullmove number seeds the move
//! counter. Besides the standard letters, `c`, `h` and `i` place the
//! Commander, Hero and Infiltrator variants. Every piece starts at level 1.

use crate::errors::ParseError;
use crate::game_state::chess_rules::RulesConfig;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, ParseError> {
    parse_fen_with_rules(fen, RulesConfig::default())
}

pub fn parse_fen_with_rules(fen: &str, rules: RulesConfig) -> Result<GameState, ParseError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().unwrap_or("-");
    let en_passant_part = parts.next().unwrap_or("-");
    let _halfmove_part = parts.next();
    let fullmove_part = parts.next();

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut game_state = GameState::new_empty(rules);
    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    apply_castling_field(castling_part, &mut game_state)?;
    game_state.en_passant_target = parse_en_passant_square(en_passant_part)?;

    if let Some(fullmove) = fullmove_part {
        let number = fullmove
            .parse::<u32>()
            .map_err(|_| invalid(&format!("invalid fullmove number: {fullmove}")))?;
        let dark_to_move = u32::from(game_state.side_to_move == Color::Dark);
        game_state.move_counter = number.saturating_sub(1) * 2 + dark_to_move;
    }

    Ok(game_state)
}

fn invalid(reason: &str) -> ParseError {
    ParseError::InvalidFen(reason.to_owned())
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), ParseError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let row = 7 - fen_rank_idx as u8;
        let mut col = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                col = col.saturating_add(empty_count as u8);
                continue;
            }

            let kind =
                PieceKind::from_char(ch).ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;
            let color = if ch.is_ascii_uppercase() { Color::Light } else { Color::Dark };
            if col >= BOARD_SIZE {
                return Err(invalid("board rank has too many files"));
            }

            let square = square_at(row, col);
            game_state.place_piece(square, kind, color);
            if kind.promotes() && row != color.pawn_start_row() {
                if let Some(piece) = game_state.board.piece_at_mut(square) {
                    piece.has_moved = true;
                }
            }
            col += 1;
        }

        if col != BOARD_SIZE {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ParseError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(&format!("invalid side-to-move field: {side_part}"))),
    }
}

/// Kings and rooks count as unmoved only where the castling field still
/// grants a right that uses them.
fn apply_castling_field(castling_part: &str, game_state: &mut GameState) -> Result<(), ParseError> {
    let mut unmoved: Vec<Square> = Vec::new();
    if castling_part != "-" {
        for ch in castling_part.chars() {
            let (color, rook_col) = match ch {
                'K' => (Color::Light, 7),
                'Q' => (Color::Light, 0),
                'k' => (Color::Dark, 7),
                'q' => (Color::Dark, 0),
                _ => return Err(invalid(&format!("invalid castling rights character: {ch}"))),
            };
            let row = color.back_row();
            unmoved.push(square_at(row, 4));
            unmoved.push(square_at(row, rook_col));
        }
    }

    let castling_pieces: Vec<Square> = game_state
        .board
        .pieces()
        .filter(|(_, piece)| matches!(piece.kind, PieceKind::King | PieceKind::Rook))
        .map(|(square, _)| square)
        .collect();
    for square in castling_pieces {
        if let Some(piece) = game_state.board.piece_at_mut(square) {
            piece.has_moved = !unmoved.contains(&square);
        }
    }
    Ok(())
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ParseError> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    algebraic_to_square(en_passant_part).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn starting_fen_matches_the_standard_setup() {
        let parsed = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        let built = GameState::new_game();

        println!("\n{}", render_game_state(&parsed));

        assert_eq!(parsed.side_to_move, Color::Light);
        assert_eq!(parsed.move_counter, 0);
        for square in 0..NUM_SQUARES as Square {
            let a = parsed.board.piece_at(square).map(|p| (p.kind, p.color, p.has_moved));
            let b = built.board.piece_at(square).map(|p| (p.kind, p.color, p.has_moved));
            assert_eq!(a, b, "square {square}");
        }
    }

    #[test]
    fn castling_field_marks_unmoved_kings_and_rooks() {
        let game = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").expect("fen should parse");
        let moved = |sq: Square| game.board.piece_at(sq).map(|p| p.has_moved);
        assert_eq!(moved(square_at(0, 4)), Some(false));
        assert_eq!(moved(square_at(0, 7)), Some(false));
        assert_eq!(moved(square_at(0, 0)), Some(true));
        assert_eq!(moved(square_at(7, 0)), Some(false));
        assert_eq!(moved(square_at(7, 7)), Some(true));
    }

    #[test]
    fn variant_letters_en_passant_and_optional_clocks() {
        let game = parse_fen("4k3/8/8/3pP3/8/8/8/C1H1K2I w - d6").expect("fen should parse");
        assert_eq!(game.en_passant_target, Some(square_at(5, 3)));
        assert_eq!(game.board.piece_at(square_at(0, 0)).map(|p| p.kind), Some(PieceKind::Commander));
        assert_eq!(game.board.piece_at(square_at(0, 2)).map(|p| p.kind), Some(PieceKind::Hero));
        assert_eq!(game.board.piece_at(square_at(0, 7)).map(|p| p.kind), Some(PieceKind::Infiltrator));

        let dark = parse_fen("4k3/8/8/8/8/8/8/4K3 b - - 3 12").expect("fen should parse");
        assert_eq!(dark.move_counter, 23);
    }

    #[test]
    fn malformed_fens_are_rejected() {
        for fen in [
            "",
            "8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4z3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
        ] {
            assert!(matches!(parse_fen(fen), Err(ParseError::InvalidFen(_))), "{fen:?}");
        }
    }
}
