//! Pluggable board evaluation interfaces and the default scorer.
//!
//! Search stays modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! Every non-terminal term is computed per side and combined as
//! `side(perspective) - side(opponent)`, so swapping the perspective negates
//! the score exactly.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{attackers_to_square, is_king_in_check};
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::moves::directions::center_distance;

/// Score of a decided game. Dominates every heuristic term.
pub const WIN_SCORE: i32 = 1_000_000;

pub trait BoardScorer: Send + Sync {
    /// Score from `perspective`'s point of view; positive is good for it.
    fn score(&self, game_state: &GameState, perspective: Color) -> i32;
}

/// Tunable evaluation constants. Per-kind tables are indexed by
/// `PieceKind::index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub base_values: [i32; PIECE_KIND_COUNT],
    pub per_level_values: [i32; PIECE_KIND_COUNT],
    pub center_bonus: i32,
    pub near_center_bonus: i32,
    pub developed_minor_bonus: i32,
    pub in_check_penalty: i32,
    pub attacker_penalty: i32,
    pub king_threat_bonus: i32,
    /// `(threshold, bonus)` pairs, highest threshold first; the first match wins.
    pub streak_bonuses: [(u32, i32); 4],
    pub level_bonus: i32,
    pub top_tier_queen_bonus: i32,
    pub near_promotion_bonus: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            // P N B R Q K C H I
            base_values: [100, 320, 330, 500, 900, 0, 450, 600, 200],
            per_level_values: [30, 40, 40, 50, 70, 20, 45, 50, 35],
            center_bonus: 20,
            near_center_bonus: 10,
            developed_minor_bonus: 10,
            in_check_penalty: 50,
            attacker_penalty: 15,
            king_threat_bonus: 5,
            streak_bonuses: [(6, 150), (5, 100), (3, 60), (2, 25)],
            level_bonus: 10,
            top_tier_queen_bonus: 150,
            near_promotion_bonus: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EvolvingScorer {
    pub weights: ScoringWeights,
}

impl EvolvingScorer {
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Decided positions: a recorded result, or a side to move with no legal
    /// move (checkmate loses, stalemate draws).
    pub fn terminal_score(&self, game_state: &GameState, perspective: Color) -> Option<i32> {
        if let Some(result) = game_state.result {
            return Some(match result.winner {
                Some(winner) if winner == perspective => WIN_SCORE,
                Some(_) => -WIN_SCORE,
                None => 0,
            });
        }
        let to_move = game_state.side_to_move;
        if has_legal_move(game_state, to_move) {
            return None;
        }
        if is_king_in_check(game_state, to_move) {
            Some(if to_move == perspective { -WIN_SCORE } else { WIN_SCORE })
        } else {
            Some(0)
        }
    }

    /// Sum of every heuristic term for one side.
    pub fn side_score(&self, game_state: &GameState, color: Color) -> i32 {
        let w = &self.weights;
        let rules = &game_state.rules;
        let mut score = 0;

        for (sq, piece) in game_state.board.pieces_of(color) {
            let levels_gained = i32::from(piece.level.saturating_sub(1));
            score += w.base_values[piece.kind.index()] + w.per_level_values[piece.kind.index()] * levels_gained;
            score += w.level_bonus * levels_gained;

            score += match center_distance(sq) {
                0 => w.center_bonus,
                1 => w.near_center_bonus,
                _ => 0,
            };
            if matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop) && piece.has_moved {
                score += w.developed_minor_bonus;
            }
            if piece.kind == PieceKind::Queen && rules.is_top_tier(PieceKind::Queen, piece.level) {
                score += w.top_tier_queen_bonus;
            }
            if piece.kind.promotes() && row_of(sq).abs_diff(color.promotion_row()) <= 2 {
                score += w.near_promotion_bonus;
            }
        }

        if let Some(king_sq) = game_state.board.king_square(color) {
            let attackers = attackers_to_square(&game_state.board, rules, king_sq, color.opposite());
            if !attackers.is_empty() {
                score -= w.in_check_penalty;
            }
            score -= w.attacker_penalty * attackers.len() as i32;
        }
        if let Some(enemy_king_sq) = game_state.board.king_square(color.opposite()) {
            let threats = attackers_to_square(&game_state.board, rules, enemy_king_sq, color);
            score += w.king_threat_bonus * threats.len() as i32;
        }

        let streak = game_state.streak(color);
        if let Some(&(_, bonus)) = w.streak_bonuses.iter().find(|(threshold, _)| streak >= *threshold) {
            score += bonus;
        }

        score
    }
}

impl BoardScorer for EvolvingScorer {
    fn score(&self, game_state: &GameState, perspective: Color) -> i32 {
        if let Some(terminal) = self.terminal_score(game_state, perspective) {
            return terminal;
        }
        self.side_score(game_state, perspective) - self.side_score(game_state, perspective.opposite())
    }
}

/// Scores `game_state` for `perspective` with the default weights.
pub fn evaluate(game_state: &GameState, perspective: Color) -> i32 {
    EvolvingScorer::default().score(game_state, perspective)
}
