//! Long algebraic move text (`e2e4`, `e7e8q`, `b1b1`).
//!
//! Parsing resolves text against the legal moves of the side to move, so the
//! result always carries the right `MoveKind`. A move whose source and
//! destination coincide is a self-destruct.

use crate::errors::MoveError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: &Move) -> String {
    let mut out = square_to_algebraic(mv.from);
    out.push_str(&square_to_algebraic(mv.to));
    if let Some(target) = mv.promotion {
        out.push(target.to_char());
    }
    out
}

/// Resolves `text` to one of the legal moves of `game_state.side_to_move`.
///
/// Without a promotion suffix a promoting move defaults to a queen. When
/// castling and a plain king move share squares, castling wins.
pub fn parse_long_algebraic(text: &str, game_state: &GameState) -> Result<Move, MoveError> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(MoveError::Malformed(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2]).map_err(|e| MoveError::Malformed(e.to_string()))?;
    let to = algebraic_to_square(&text[2..4]).map_err(|e| MoveError::Malformed(e.to_string()))?;
    let promotion = match text[4..].chars().next() {
        Some(ch) => Some(
            PieceKind::from_char(ch)
                .filter(|kind| !matches!(kind, PieceKind::Pawn | PieceKind::King))
                .ok_or_else(|| MoveError::Malformed(format!("invalid promotion piece '{ch}'")))?,
        ),
        None => None,
    };

    let candidates: Vec<Move> = legal_moves(game_state, game_state.side_to_move)
        .into_iter()
        .filter(|mv| mv.from == from && mv.to == to)
        .collect();

    let chosen = match promotion {
        Some(kind) => candidates.iter().find(|mv| mv.promotion == Some(kind)),
        None => candidates
            .iter()
            .find(|mv| mv.kind == MoveKind::Castle)
            .or_else(|| candidates.iter().find(|mv| mv.promotion == Some(PieceKind::Queen)))
            .or_else(|| candidates.iter().find(|mv| mv.promotion.is_none())),
    };

    chosen.copied().ok_or_else(|| {
        let attempted = match (promotion, from == to) {
            (Some(kind), _) => Move::promotion(from, to, kind),
            (None, true) => Move::self_destruct(from),
            (None, false) => Move::quiet(from, to),
        };
        MoveError::Illegal(attempted)
    })
}
