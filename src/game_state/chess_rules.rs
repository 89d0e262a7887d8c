//! Rule constants for the evolving-pieces variant.
//!
//! Several thresholds changed between rule revisions (royal guard level,
//! whether self-destruct ignores royal guard), so every one of them lives in
//! `RulesConfig` instead of being hard-coded at the use site.

use crate::game_state::chess_types::{PieceKind, PIECE_KIND_COUNT};

/// Standard starting layout in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const MIN_LEVEL: u8 = 1;

const STANDARD_PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

const VARIANT_PROMOTIONS: [PieceKind; 6] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Hero,
    PieceKind::Commander,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulesConfig {
    /// Indexed by `PieceKind::index`.
    pub max_levels: [u8; PIECE_KIND_COUNT],
    /// Levels gained by the capturing piece, indexed by `PieceKind::index`.
    pub capture_bonus: [u8; PIECE_KIND_COUNT],

    pub pawn_backward_level: u8,
    pub pawn_sideways_level: u8,
    pub pawn_push_back_level: u8,
    pub pawn_extra_turn_promotion_level: u8,

    pub knight_step_level: u8,
    pub knight_leap_level: u8,
    pub knight_swap_level: u8,
    pub knight_self_destruct_level: u8,

    pub bishop_phase_level: u8,
    pub bishop_pawn_immunity_level: u8,
    pub bishop_swap_level: u8,
    pub bishop_conversion_level: u8,
    /// Per-neighbour conversion probability in `0.0..=1.0`.
    pub bishop_conversion_chance: f64,

    pub rook_invulnerability_level: u8,
    pub rook_invulnerable_turns: u8,

    pub royal_guard_level: u8,
    pub self_destruct_bypasses_royal_guard: bool,

    pub king_extended_reach_level: u8,
    pub king_knight_step_level: u8,

    pub commander_leap_level: u8,
    pub variant_extra_turn_promotion_level: u8,
    /// Adds Hero and Commander to the promotion choices.
    pub variant_promotions: bool,
    /// Level a promoted piece starts from at minimum.
    pub promotion_floor_level: u8,

    pub resurrection_streak: u32,
    pub extra_turn_streak: u32,

    /// Moves between item spawns; 0 disables spawning.
    pub item_spawn_interval: u32,
    pub max_items: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            //           P  N  B  R  Q  K  C  H  I
            max_levels: [6, 6, 6, 6, 7, 6, 7, 7, 6],
            capture_bonus: [1, 2, 2, 2, 3, 1, 2, 2, 1],

            pawn_backward_level: 2,
            pawn_sideways_level: 3,
            pawn_push_back_level: 4,
            pawn_extra_turn_promotion_level: 5,

            knight_step_level: 2,
            knight_leap_level: 3,
            knight_swap_level: 4,
            knight_self_destruct_level: 5,

            bishop_phase_level: 2,
            bishop_pawn_immunity_level: 3,
            bishop_swap_level: 4,
            bishop_conversion_level: 5,
            bishop_conversion_chance: 0.5,

            rook_invulnerability_level: 3,
            rook_invulnerable_turns: 1,

            royal_guard_level: 5,
            self_destruct_bypasses_royal_guard: false,

            king_extended_reach_level: 2,
            king_knight_step_level: 5,

            commander_leap_level: 3,
            variant_extra_turn_promotion_level: 5,
            variant_promotions: false,
            promotion_floor_level: 1,

            resurrection_streak: 3,
            extra_turn_streak: 6,

            item_spawn_interval: 10,
            max_items: 3,
        }
    }
}

impl RulesConfig {
    #[inline]
    pub fn max_level(&self, kind: PieceKind) -> u8 {
        self.max_levels[kind.index()].max(MIN_LEVEL)
    }

    #[inline]
    pub fn capture_bonus(&self, kind: PieceKind) -> u8 {
        self.capture_bonus[kind.index()]
    }

    #[inline]
    pub fn clamp_level(&self, kind: PieceKind, level: u8) -> u8 {
        level.clamp(MIN_LEVEL, self.max_level(kind))
    }

    #[inline]
    pub fn is_top_tier(&self, kind: PieceKind, level: u8) -> bool {
        level >= self.max_level(kind)
    }

    pub fn promotion_targets(&self) -> &'static [PieceKind] {
        if self.variant_promotions {
            &VARIANT_PROMOTIONS
        } else {
            &STANDARD_PROMOTIONS
        }
    }

    /// Level a promotion lands at, keeping whatever the pawn already earned.
    pub fn promoted_level(&self, target: PieceKind, pawn_level: u8) -> u8 {
        self.clamp_level(target, pawn_level.max(self.promotion_floor_level))
    }

    /// Extra turn for promoting a pawn-like piece of the given pre-move level.
    pub fn promotion_grants_extra_turn(&self, kind: PieceKind, pre_move_level: u8) -> bool {
        match kind {
            PieceKind::Pawn => pre_move_level >= self.pawn_extra_turn_promotion_level,
            PieceKind::Infiltrator => pre_move_level >= self.variant_extra_turn_promotion_level,
            _ => false,
        }
    }
}

/// True when a counter changed this move and landed exactly on `threshold`.
/// Jumping past it (2 to 4 on a double kill) does not count.
#[inline]
pub const fn reached_exactly(before: u32, after: u32, threshold: u32) -> bool {
    before != after && after == threshold
}
