//! Free choices the rules hand to a piece's owner.
//!
//! The applier asks a `DecisionMaker` whenever a rule needs a choice that is
//! not encoded in the move itself. `AutoDecisions` is the non-interactive
//! default used by engines and the search.

use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

pub trait DecisionMaker {
    /// Piece type for a pawn-like piece that reaches the far rank without an
    /// explicit target (resurrections, text moves without a suffix).
    fn choose_promotion(&mut self, game_state: &GameState, square: Square, options: &[PieceKind]) -> PieceKind;

    /// Which friendly piece to give up when a queen reaches its top tier.
    /// `candidates` is never empty. Returning a square outside `candidates`
    /// falls back to the first candidate.
    fn choose_sacrifice(
        &mut self,
        game_state: &GameState,
        candidates: &[Square],
        rng: &mut dyn RngCore,
    ) -> Option<Square>;

    /// Landing square for a resurrected piece. `candidates` is never empty.
    fn choose_resurrection_square(
        &mut self,
        game_state: &GameState,
        piece: &Piece,
        candidates: &[Square],
        rng: &mut dyn RngCore,
    ) -> Option<Square>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecisions;

impl DecisionMaker for AutoDecisions {
    fn choose_promotion(&mut self, _game_state: &GameState, _square: Square, options: &[PieceKind]) -> PieceKind {
        if options.contains(&PieceKind::Queen) {
            PieceKind::Queen
        } else {
            options.first().copied().unwrap_or(PieceKind::Queen)
        }
    }

    /// Gives up the cheapest candidate, lowest level first on ties.
    fn choose_sacrifice(
        &mut self,
        game_state: &GameState,
        candidates: &[Square],
        _rng: &mut dyn RngCore,
    ) -> Option<Square> {
        candidates.iter().copied().min_by_key(|&sq| {
            game_state
                .board
                .piece_at(sq)
                .map(|piece| (piece.kind.base_value(), piece.level))
                .unwrap_or((i32::MAX, u8::MAX))
        })
    }

    fn choose_resurrection_square(
        &mut self,
        _game_state: &GameState,
        _piece: &Piece,
        candidates: &[Square],
        rng: &mut dyn RngCore,
    ) -> Option<Square> {
        candidates.choose(rng).copied()
    }
}
