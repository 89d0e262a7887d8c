//! Post-move consequences: triggered abilities, streak bookkeeping,
//! resurrection, and invulnerability countdowns.
//!
//! Everything here runs on the already-cloned successor state, after the core
//! board transformation of the move has been made.

use rand::Rng;
use tracing::debug;

use crate::game_state::chess_rules::reached_exactly;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::MoveContext;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_shared::can_capture;
use crate::moves::directions::{neighbours, step};

/// Structured record of everything a move caused, for callers that drive
/// presentation or need to judge thresholds after the fact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveEffects {
    pub moved_piece: Option<PieceId>,
    /// Level of the moving piece before the move; the piece keeps its id
    /// through promotion, so this is the only record of it.
    pub pre_move_level: u8,
    /// `None` when the mover left the board (self-destruct).
    pub post_move_level: Option<u8>,
    pub captured: Vec<Piece>,
    pub promotion: Option<PieceKind>,
    /// Squares whose pieces changed color.
    pub conversions: Vec<Square>,
    /// `(from, to)` for every enemy pushed away by a leveled pawn.
    pub push_backs: Vec<(Square, Square)>,
    pub invulnerability_granted: bool,
    pub sacrificed: Option<Piece>,
    pub resurrected: Option<(Square, Piece)>,
    pub item_collected: Option<Item>,
    pub streak_before: u32,
    pub streak_after: u32,
    pub self_check: bool,
    pub extra_turn: bool,
    pub auto_checkmate: bool,
    pub king_captured: bool,
}

impl MoveEffects {
    #[inline]
    pub fn capture_count(&self) -> usize {
        self.captured.len()
    }
}

/// Collects an item on the landing square. A level boost raises the piece
/// one level.
pub(crate) fn collect_item(next: &mut GameState, square: Square, effects: &mut MoveEffects) {
    let Some(item) = next.board.take_item(square) else {
        return;
    };
    effects.item_collected = Some(item);
    if item == Item::LevelBoost {
        let rules = next.rules;
        if let Some(piece) = next.board.piece_at_mut(square) {
            piece.level = rules.clamp_level(piece.kind, piece.level.saturating_add(1));
        }
    }
}

/// Abilities of the piece now standing on `square`, in a fixed order:
/// pawn push-back, bishop conversion, rook invulnerability, queen sacrifice.
pub(crate) fn resolve_triggers(
    next: &mut GameState,
    square: Square,
    pre_kind: PieceKind,
    pre_level: u8,
    ctx: &mut MoveContext<'_>,
    effects: &mut MoveEffects,
) {
    let Some(piece) = next.board.piece_at(square).copied() else {
        return;
    };
    let rules = next.rules;

    match piece.kind {
        PieceKind::Pawn if piece.level >= rules.pawn_push_back_level => {
            push_back_neighbours(next, square, &piece, effects);
        }
        PieceKind::Bishop if piece.level >= rules.bishop_conversion_level => {
            convert_neighbours(next, square, &piece, ctx, effects);
        }
        PieceKind::Rook => {
            let threshold = rules.rook_invulnerability_level;
            let crossed_now = piece.level >= threshold && (pre_kind != PieceKind::Rook || pre_level < threshold);
            if crossed_now {
                if let Some(rook) = next.board.piece_at_mut(square) {
                    rook.invulnerable_turns = rules.rook_invulnerable_turns;
                }
                effects.invulnerability_granted = true;
                debug!(square, turns = rules.rook_invulnerable_turns, "rook became invulnerable");
            }
        }
        PieceKind::Queen => {
            let was_top = pre_kind == PieceKind::Queen && rules.is_top_tier(PieceKind::Queen, pre_level);
            if rules.is_top_tier(PieceKind::Queen, piece.level) && !was_top {
                sacrifice_for_queen(next, piece.color, ctx, effects);
            }
        }
        _ => {}
    }
}

fn push_back_neighbours(next: &mut GameState, square: Square, pawn: &Piece, effects: &mut MoveEffects) {
    let targets: Vec<_> = neighbours(square)
        .filter(|(_, sq)| next.board.piece_at(*sq).is_some_and(|p| p.color != pawn.color))
        .collect();
    for (dir, victim_sq) in targets {
        let Some(beyond) = step(victim_sq, dir, 1) else {
            continue;
        };
        if !next.board.is_vacant(beyond) {
            continue;
        }
        if let Some(victim) = next.board.take_piece(victim_sq) {
            next.board.set_piece(beyond, victim);
            effects.push_backs.push((victim_sq, beyond));
            debug!(from = victim_sq, to = beyond, "pawn pushed an enemy back");
        }
    }
}

fn convert_neighbours(
    next: &mut GameState,
    square: Square,
    bishop: &Piece,
    ctx: &mut MoveContext<'_>,
    effects: &mut MoveEffects,
) {
    let rules = next.rules;
    let chance = rules.bishop_conversion_chance.clamp(0.0, 1.0);
    let targets: Vec<Square> = neighbours(square)
        .map(|(_, sq)| sq)
        .filter(|&sq| {
            next.board.piece_at(sq).is_some_and(|target| {
                target.kind != PieceKind::King && can_capture(bishop, target, &rules)
            })
        })
        .collect();
    for sq in targets {
        if !ctx.rng.random_bool(chance) {
            continue;
        }
        if let Some(target) = next.board.piece_at_mut(sq) {
            target.color = bishop.color;
            effects.conversions.push(sq);
            debug!(square = sq, kind = ?target.kind, "bishop converted an adjacent enemy");
        }
    }
}

/// A queen reaching its top tier costs its owner a pawn, or failing that a
/// low-level minor piece. Candidates whose removal keeps the king safe are
/// preferred; without any candidate nothing is given up.
fn sacrifice_for_queen(next: &mut GameState, owner: Color, ctx: &mut MoveContext<'_>, effects: &mut MoveEffects) {
    let mut candidates: Vec<Square> = next
        .board
        .pieces_of(owner)
        .filter(|(_, p)| p.kind == PieceKind::Pawn)
        .map(|(sq, _)| sq)
        .collect();
    if candidates.is_empty() {
        candidates = next
            .board
            .pieces_of(owner)
            .filter(|(_, p)| !matches!(p.kind, PieceKind::King | PieceKind::Queen) && p.level <= 2)
            .map(|(sq, _)| sq)
            .collect();
    }
    if candidates.is_empty() {
        return;
    }

    let safe: Vec<Square> = candidates
        .iter()
        .copied()
        .filter(|&sq| {
            let mut trial = next.clone();
            trial.board.take_piece(sq);
            !is_king_in_check(&trial, owner)
        })
        .collect();
    if !safe.is_empty() {
        candidates = safe;
    }

    let chosen = ctx
        .decisions
        .choose_sacrifice(next, &candidates, &mut *ctx.rng)
        .filter(|sq| candidates.contains(sq))
        .or_else(|| candidates.first().copied());
    let Some(sq) = chosen else {
        return;
    };
    if let Some(piece) = next.board.take_piece(sq) {
        debug!(square = sq, kind = ?piece.kind, "piece sacrificed for queen ascension");
        next.captured[owner.opposite().index()].push(piece);
        effects.sacrificed = Some(piece);
    }
}

/// Updates the mover's streak and reports whether it landed exactly on the
/// resurrection and extra-turn thresholds.
pub(crate) fn update_streaks(next: &mut GameState, mover: Color, kills: u32, effects: &mut MoveEffects) -> (bool, bool) {
    let before = next.kill_streaks[mover.index()];
    let after = if kills > 0 {
        next.kill_streaks[mover.opposite().index()] = 0;
        before.saturating_add(kills)
    } else {
        0
    };
    next.kill_streaks[mover.index()] = after;
    effects.streak_before = before;
    effects.streak_after = after;

    let rules = &next.rules;
    (
        reached_exactly(before, after, rules.resurrection_streak),
        reached_exactly(before, after, rules.extra_turn_streak),
    )
}

/// Brings back the most valuable fallen piece of `mover` (most recent on
/// ties) at level 1, preferring an empty square on its own back rank.
pub(crate) fn resurrect(next: &mut GameState, mover: Color, ctx: &mut MoveContext<'_>, effects: &mut MoveEffects) {
    let pool = &next.captured[mover.opposite().index()];
    let Some(index) = pool
        .iter()
        .enumerate()
        .filter(|(_, p)| p.color == mover && p.kind != PieceKind::King)
        .max_by_key(|(i, p)| (p.kind.base_value(), *i))
        .map(|(i, _)| i)
    else {
        return;
    };
    let fallen = pool[index];

    let back_row = mover.back_row();
    let mut candidates: Vec<Square> = (0..BOARD_SIZE)
        .map(|col| square_at(back_row, col))
        .filter(|&sq| next.board.is_vacant(sq))
        .collect();
    if candidates.is_empty() {
        candidates = (0..NUM_SQUARES as Square)
            .filter(|&sq| next.board.is_vacant(sq))
            .collect();
    }
    let chosen = ctx
        .decisions
        .choose_resurrection_square(next, &fallen, &candidates, &mut *ctx.rng)
        .filter(|sq| candidates.contains(sq))
        .or_else(|| candidates.first().copied());
    let Some(square) = chosen else {
        debug!(kind = ?fallen.kind, "no empty square for resurrection");
        return;
    };

    next.captured[mover.opposite().index()].remove(index);
    let mut piece = Piece {
        id: next.ids.allocate(),
        has_moved: true,
        ..Piece::new(fallen.id, fallen.kind, mover)
    };
    if piece.kind.promotes() && row_of(square) == mover.promotion_row() {
        let rules = next.rules;
        let target = ctx
            .decisions
            .choose_promotion(next, square, rules.promotion_targets());
        piece.kind = target;
        piece.level = rules.promoted_level(target, piece.level);
    }
    next.board.set_piece(square, piece);
    effects.resurrected = Some((square, piece));
    debug!(square, kind = ?piece.kind, id = piece.id.0, "piece resurrected");
}

/// Counts down the invulnerability windows of `color`'s pieces.
pub(crate) fn tick_invulnerability(next: &mut GameState, color: Color) {
    for sq in 0..NUM_SQUARES as Square {
        if let Some(piece) = next.board.piece_at_mut(sq) {
            if piece.color == color {
                piece.invulnerable_turns = piece.invulnerable_turns.saturating_sub(1);
            }
        }
    }
}
