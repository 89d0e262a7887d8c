//! Terminal-oriented ASCII board renderer.
//!
//! Each square shows the piece letter (uppercase for Light) followed by its
//! level, `#` for an obstacle, `+` for a level boost, or `.` when empty.
//! Row 7 is printed first so Light sits at the bottom.

use crate::game_state::{chess_types::*, game_state::GameState};

pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();
    out.push_str("   a  b  c  d  e  f  g  h\n");

    for row in (0..BOARD_SIZE).rev() {
        out.push(char::from(b'1' + row));
        out.push(' ');
        for col in 0..BOARD_SIZE {
            out.push_str(&render_square(game_state, square_at(row, col)));
        }
        out.push(char::from(b'1' + row));
        out.push('\n');
    }
    out.push_str("   a  b  c  d  e  f  g  h\n");

    out.push_str(&format!(
        "to move: {}  streaks: light {} dark {}  move: {}",
        game_state.side_to_move,
        game_state.streak(Color::Light),
        game_state.streak(Color::Dark),
        game_state.move_counter
    ));
    if let Some(result) = game_state.result {
        match result.winner {
            Some(winner) => out.push_str(&format!("  result: {winner} wins ({:?})", result.reason)),
            None => out.push_str(&format!("  result: draw ({:?})", result.reason)),
        }
    }
    out
}

fn render_square(game_state: &GameState, square: Square) -> String {
    if let Some(piece) = game_state.board.piece_at(square) {
        let letter = match piece.color {
            Color::Light => piece.kind.to_char().to_ascii_uppercase(),
            Color::Dark => piece.kind.to_char(),
        };
        return format!("{letter}{} ", piece.level);
    }
    match game_state.board.item_at(square) {
        Some(Item::Obstacle) => " # ".to_owned(),
        Some(Item::LevelBoost) => " + ".to_owned(),
        None => " . ".to_owned(),
    }
}
