//! Full legal move generation pipeline.
//!
//! Orchestrates piece-wise pseudo-legal generation, applies candidate moves,
//! and drops every move that leaves the mover's own king attacked.

use std::borrow::Cow;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::decisions::AutoDecisions;
use crate::move_generation::legal_move_apply::{apply_move, apply_move_scratch, MoveContext};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::move_generation::legal_moves_variant::{
    generate_commander_moves, generate_hero_moves, generate_infiltrator_moves,
};
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerationError, MoveGenerator};
use crate::move_generation::move_side_effects::MoveEffects;

/// Every pseudo-legal move of the piece on `square`, or nothing for an
/// empty square.
pub fn pseudo_legal_moves(game_state: &GameState, square: Square) -> Vec<Move> {
    let mut out = Vec::with_capacity(32);
    if let Some(piece) = game_state.board.piece_at(square) {
        push_pseudo_legal_moves(game_state, square, piece, &mut out);
    }
    out
}

fn push_pseudo_legal_moves(game_state: &GameState, square: Square, piece: &Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(game_state, square, piece, out),
        PieceKind::Knight => generate_knight_moves(game_state, square, piece, out),
        PieceKind::Bishop => generate_bishop_moves(game_state, square, piece, out),
        PieceKind::Rook => generate_rook_moves(game_state, square, piece, out),
        PieceKind::Queen => generate_queen_moves(game_state, square, piece, out),
        PieceKind::King => generate_king_moves(game_state, square, piece, out),
        PieceKind::Commander => generate_commander_moves(game_state, square, piece, out),
        PieceKind::Hero => generate_hero_moves(game_state, square, piece, out),
        PieceKind::Infiltrator => generate_infiltrator_moves(game_state, square, piece, out),
    }
}

fn pseudo_legal_moves_for(game_state: &GameState, color: Color) -> Vec<Move> {
    let mut out = Vec::with_capacity(96);
    for (square, piece) in game_state.board.pieces_of(color) {
        push_pseudo_legal_moves(game_state, square, piece, &mut out);
    }
    out
}

/// `game_state` with `color` to move, cloning only when needed.
fn with_side_to_move(game_state: &GameState, color: Color) -> Cow<'_, GameState> {
    if game_state.side_to_move == color {
        Cow::Borrowed(game_state)
    } else {
        let mut owned = game_state.clone();
        owned.side_to_move = color;
        Cow::Owned(owned)
    }
}

/// Legal moves of `color` with their successor states, applied through
/// `ctx`. This is what the search expands.
pub fn legal_children(
    game_state: &GameState,
    color: Color,
    ctx: &mut MoveContext<'_>,
) -> Vec<(Move, GameState, MoveEffects)> {
    let state = with_side_to_move(game_state, color);
    pseudo_legal_moves_for(&state, color)
        .into_iter()
        .filter_map(|mv| {
            let (next, effects) = apply_move(&state, mv, ctx).ok()?;
            (!is_king_in_check(&next, color)).then_some((mv, next, effects))
        })
        .collect()
}

pub fn legal_moves(game_state: &GameState, color: Color) -> Vec<Move> {
    let state = with_side_to_move(game_state, color);
    pseudo_legal_moves_for(&state, color)
        .into_iter()
        .filter(|&mv| {
            apply_move_scratch(&state, mv).is_ok_and(|(next, _)| !is_king_in_check(&next, color))
        })
        .collect()
}

/// Whether `color` has at least one legal move; stops at the first one.
pub fn has_legal_move(game_state: &GameState, color: Color) -> bool {
    let state = with_side_to_move(game_state, color);
    pseudo_legal_moves_for(&state, color).into_iter().any(|mv| {
        apply_move_scratch(&state, mv).is_ok_and(|(next, _)| !is_king_in_check(&next, color))
    })
}

#[inline]
pub fn is_in_check(game_state: &GameState, color: Color) -> bool {
    is_king_in_check(game_state, color)
}

pub fn is_checkmate(game_state: &GameState, color: Color) -> bool {
    is_in_check(game_state, color) && !has_legal_move(game_state, color)
}

pub fn is_stalemate(game_state: &GameState, color: Color) -> bool {
    !is_in_check(game_state, color) && !has_legal_move(game_state, color)
}

/// Legal move generator for the side to move, with auto-checkmate probing.
/// Random outcomes come from a fixed seed so repeated runs agree.
pub struct LegalMoveGenerator {
    seed: u64,
}

impl Default for LegalMoveGenerator {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

impl LegalMoveGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        for color in Color::ALL {
            if game_state.board.king_count(color) > 1 {
                return Err(MoveGenerationError::InvalidState(format!("{color} has more than one king")));
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut decisions = AutoDecisions;
        let mut ctx = MoveContext::new(&mut rng, &mut decisions);
        Ok(legal_children(game_state, game_state.side_to_move, &mut ctx)
            .into_iter()
            .map(|(mv, game_after_move, effects)| GeneratedMove {
                mv,
                game_after_move,
                effects,
            })
            .collect())
    }
}
