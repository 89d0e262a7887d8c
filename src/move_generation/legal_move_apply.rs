//! The state-transition function.
//!
//! `apply_move` never mutates its input: it validates the move against the
//! state, clones, performs the board transformation, and then resolves the
//! move's consequences in order (capture bonus, item pickup, triggered
//! abilities, streaks and resurrection, extra turn, terminal checks).

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::errors::{ApplyResult, MoveError};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::decisions::{AutoDecisions, DecisionMaker};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{legal_moves, pseudo_legal_moves};
use crate::move_generation::legal_move_shared::{can_capture, self_destruct_hits};
use crate::move_generation::move_side_effects::{
    collect_item, resolve_triggers, resurrect, tick_invulnerability, update_streaks, MoveEffects,
};
use crate::moves::directions::neighbours;

/// Seed for scratch application, where random outcomes only need to be
/// repeatable.
const SCRATCH_SEED: u64 = 0x5eed_cafe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Check for auto-checkmate after an extra turn. Needs a full legal
    /// move generation for the opponent, so scratch applications skip it.
    pub detect_auto_checkmate: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            detect_auto_checkmate: true,
        }
    }
}

/// Randomness and owner choices injected into a move application.
pub struct MoveContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub decisions: &'a mut dyn DecisionMaker,
    pub options: ApplyOptions,
}

impl<'a> MoveContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, decisions: &'a mut dyn DecisionMaker) -> Self {
        Self {
            rng,
            decisions,
            options: ApplyOptions::default(),
        }
    }

    pub fn without_auto_checkmate(mut self) -> Self {
        self.options.detect_auto_checkmate = false;
        self
    }
}

/// Applies `mv` for the side to move and returns the successor state with
/// the effects record.
pub fn apply_move(
    game_state: &GameState,
    mv: Move,
    ctx: &mut MoveContext<'_>,
) -> ApplyResult<(GameState, MoveEffects)> {
    let moving_piece = validate_move(game_state, mv)?;
    // The shape checks above only name the failure; reach, level gates and
    // blocked paths come from the piece's own generator.
    if !pseudo_legal_moves(game_state, mv.from).contains(&mv) {
        return Err(MoveError::Illegal(mv));
    }
    let mover = game_state.side_to_move;
    let opponent = mover.opposite();
    let rules = game_state.rules;

    let mut next = game_state.clone();
    next.en_passant_target = None;
    let mut effects = MoveEffects {
        moved_piece: Some(moving_piece.id),
        pre_move_level: moving_piece.level,
        ..MoveEffects::default()
    };

    let landing = execute_core(&mut next, mv, &moving_piece, &mut effects)?;
    next.captured[mover.index()].extend(effects.captured.iter().copied());

    if let Some(square) = landing {
        if !effects.captured.is_empty() && mv.kind != MoveKind::Promotion {
            if let Some(piece) = next.board.piece_at_mut(square) {
                let bonus = rules.capture_bonus(piece.kind);
                piece.level = rules.clamp_level(piece.kind, piece.level.saturating_add(bonus));
            }
        }
        collect_item(&mut next, square, &mut effects);
        resolve_triggers(&mut next, square, moving_piece.kind, moving_piece.level, ctx, &mut effects);
        effects.post_move_level = next.board.piece_at(square).map(|p| p.level);
    }

    let kills = effects.captured.len() as u32;
    let (resurrection_due, streak_extra_turn) = update_streaks(&mut next, mover, kills, &mut effects);
    if resurrection_due {
        resurrect(&mut next, mover, ctx, &mut effects);
    }
    let promotion_extra_turn = mv.kind == MoveKind::Promotion
        && rules.promotion_grants_extra_turn(moving_piece.kind, moving_piece.level);
    effects.extra_turn = streak_extra_turn || promotion_extra_turn;

    tick_invulnerability(&mut next, opponent);

    if moving_piece.kind == PieceKind::Pawn && row_of(mv.from).abs_diff(row_of(mv.to)) == 2 {
        let mid_row = (row_of(mv.from) + row_of(mv.to)) / 2;
        next.en_passant_target = Some(square_at(mid_row, col_of(mv.from)));
    }
    next.move_counter = next.move_counter.saturating_add(1);

    if is_king_in_check(&next, mover) {
        effects.self_check = true;
        next.result = Some(GameResult::win(opponent, TerminationReason::SelfCheck));
    }
    if effects.captured.iter().any(|p| p.kind == PieceKind::King) {
        effects.king_captured = true;
        next.result = Some(GameResult::win(mover, TerminationReason::KingCaptured));
    }

    next.side_to_move = if effects.extra_turn { mover } else { opponent };

    if effects.extra_turn
        && ctx.options.detect_auto_checkmate
        && next.result.is_none()
        && is_king_in_check(&next, opponent)
        && legal_moves(&next, opponent).is_empty()
    {
        effects.auto_checkmate = true;
        next.result = Some(GameResult::win(mover, TerminationReason::AutoCheckmate));
        debug!(winner = %mover, "check with an extra turn and no reply");
    }

    Ok((next, effects))
}

/// Applies with a fixed-seed generator, automatic decisions, and no
/// auto-checkmate check. Used by the legality filter.
pub fn apply_move_scratch(game_state: &GameState, mv: Move) -> ApplyResult<(GameState, MoveEffects)> {
    let mut rng = StdRng::seed_from_u64(SCRATCH_SEED);
    let mut decisions = AutoDecisions;
    let mut ctx = MoveContext::new(&mut rng, &mut decisions).without_auto_checkmate();
    apply_move(game_state, mv, &mut ctx)
}

/// Applies with automatic decisions and the given generator, checking for
/// auto-checkmate.
pub fn apply_move_with_rng(
    game_state: &GameState,
    mv: Move,
    rng: &mut dyn RngCore,
) -> ApplyResult<(GameState, MoveEffects)> {
    let mut decisions = AutoDecisions;
    let mut ctx = MoveContext::new(rng, &mut decisions);
    apply_move(game_state, mv, &mut ctx)
}

/// Checks `mv` against the piece actually present and returns that piece.
fn validate_move(game_state: &GameState, mv: Move) -> ApplyResult<Piece> {
    if game_state.is_game_over() {
        return Err(MoveError::GameOver);
    }
    if !is_on_board(mv.from) || !is_on_board(mv.to) {
        return Err(MoveError::Malformed(format!("square out of range in {mv:?}")));
    }
    let board = &game_state.board;
    let rules = &game_state.rules;
    let piece = *board
        .piece_at(mv.from)
        .ok_or(MoveError::NoPieceOnSquare(mv.from))?;
    if piece.color != game_state.side_to_move {
        return Err(MoveError::WrongColor(mv.from));
    }
    let target = board.piece_at(mv.to);
    let reaches_far_rank = piece.kind.promotes() && row_of(mv.to) == piece.color.promotion_row();

    let check_capture = |target: &Piece| -> ApplyResult<()> {
        if can_capture(&piece, target, rules) {
            Ok(())
        } else if target.is_invulnerable() {
            Err(MoveError::InvulnerableTarget(mv.to))
        } else {
            Err(MoveError::Illegal(mv))
        }
    };

    match mv.kind {
        MoveKind::SelfDestruct if mv.from == mv.to => Ok(piece),
        _ if mv.from == mv.to => Err(MoveError::Illegal(mv)),
        _ if board.is_obstructed(mv.to) => Err(MoveError::Illegal(mv)),
        MoveKind::Quiet => match target {
            None if !reaches_far_rank => Ok(piece),
            _ => Err(MoveError::Illegal(mv)),
        },
        MoveKind::Capture => match target {
            Some(t) if t.color != piece.color && !reaches_far_rank => check_capture(t).map(|_| piece),
            _ => Err(MoveError::Illegal(mv)),
        },
        MoveKind::Promotion => {
            let valid_target = mv
                .promotion
                .is_some_and(|kind| rules.promotion_targets().contains(&kind));
            if !reaches_far_rank || !valid_target {
                return Err(MoveError::Illegal(mv));
            }
            match target {
                None => Ok(piece),
                Some(t) if t.color != piece.color => check_capture(t).map(|_| piece),
                Some(_) => Err(MoveError::Illegal(mv)),
            }
        }
        MoveKind::EnPassant => {
            let victim_sq = square_at(row_of(mv.from), col_of(mv.to));
            match board.piece_at(victim_sq) {
                Some(victim)
                    if piece.kind == PieceKind::Pawn
                        && target.is_none()
                        && game_state.en_passant_target == Some(mv.to)
                        && victim.kind == PieceKind::Pawn =>
                {
                    check_capture(victim).map(|_| piece)
                }
                _ => Err(MoveError::Illegal(mv)),
            }
        }
        MoveKind::Castle => {
            let rook_sq = castle_rook_squares(mv.to).map(|(rook_from, _)| rook_from);
            let rook_ok = rook_sq
                .and_then(|sq| board.piece_at(sq))
                .is_some_and(|rook| rook.kind == PieceKind::Rook && rook.color == piece.color);
            if piece.kind == PieceKind::King && target.is_none() && rook_ok {
                Ok(piece)
            } else {
                Err(MoveError::Illegal(mv))
            }
        }
        MoveKind::Swap => match target {
            Some(t) if t.color == piece.color => Ok(piece),
            _ => Err(MoveError::Illegal(mv)),
        },
        MoveKind::SelfDestruct => Err(MoveError::Illegal(mv)),
    }
}

/// `(rook from, rook to)` for a castle landing on `king_to`.
fn castle_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    let row = row_of(king_to);
    match col_of(king_to) {
        6 => Some((square_at(row, 7), square_at(row, 5))),
        2 => Some((square_at(row, 0), square_at(row, 3))),
        _ => None,
    }
}

/// Moves pieces on the board for `mv`. Returns the square the moving piece
/// ends up on, or `None` if it left the board.
fn execute_core(
    next: &mut GameState,
    mv: Move,
    moving_piece: &Piece,
    effects: &mut MoveEffects,
) -> ApplyResult<Option<Square>> {
    let rules = next.rules;
    let missing = || MoveError::NoPieceOnSquare(mv.from);

    match mv.kind {
        MoveKind::Quiet | MoveKind::Capture | MoveKind::Promotion => {
            let mut piece = next.board.take_piece(mv.from).ok_or_else(missing)?;
            if let Some(victim) = next.board.take_piece(mv.to) {
                effects.captured.push(victim);
            }
            piece.has_moved = true;
            if let Some(target) = mv.promotion.filter(|_| mv.kind == MoveKind::Promotion) {
                let earned = if effects.captured.is_empty() {
                    piece.level
                } else {
                    piece.level.saturating_add(rules.capture_bonus(piece.kind))
                };
                piece.kind = target;
                piece.level = rules.promoted_level(target, earned);
                effects.promotion = Some(target);
                debug!(square = mv.to, kind = ?target, level = piece.level, "promotion");
            }
            next.board.set_piece(mv.to, piece);
            Ok(Some(mv.to))
        }
        MoveKind::EnPassant => {
            let mut pawn = next.board.take_piece(mv.from).ok_or_else(missing)?;
            pawn.has_moved = true;
            let victim_sq = square_at(row_of(mv.from), col_of(mv.to));
            if let Some(victim) = next.board.take_piece(victim_sq) {
                effects.captured.push(victim);
            }
            next.board.set_piece(mv.to, pawn);
            Ok(Some(mv.to))
        }
        MoveKind::Castle => {
            let (rook_from, rook_to) = castle_rook_squares(mv.to).ok_or(MoveError::Illegal(mv))?;
            let mut king = next.board.take_piece(mv.from).ok_or_else(missing)?;
            let mut rook = next
                .board
                .take_piece(rook_from)
                .ok_or(MoveError::NoPieceOnSquare(rook_from))?;
            king.has_moved = true;
            rook.has_moved = true;
            next.board.set_piece(mv.to, king);
            next.board.set_piece(rook_to, rook);
            Ok(Some(mv.to))
        }
        MoveKind::SelfDestruct => {
            let bomber = next.board.take_piece(mv.from).ok_or_else(missing)?;
            let victims: Vec<Square> = neighbours(mv.from)
                .map(|(_, sq)| sq)
                .filter(|&sq| {
                    next.board
                        .piece_at(sq)
                        .is_some_and(|target| self_destruct_hits(moving_piece, target, &rules))
                })
                .collect();
            for sq in victims {
                if let Some(victim) = next.board.take_piece(sq) {
                    effects.captured.push(victim);
                }
            }
            next.captured[bomber.color.opposite().index()].push(bomber);
            debug!(square = mv.from, kills = effects.captured.len(), "self-destruct");
            Ok(None)
        }
        MoveKind::Swap => {
            let mut first = next.board.take_piece(mv.from).ok_or_else(missing)?;
            let mut second = next
                .board
                .take_piece(mv.to)
                .ok_or(MoveError::NoPieceOnSquare(mv.to))?;
            first.has_moved = true;
            second.has_moved = true;
            next.board.set_piece(mv.to, first);
            next.board.set_piece(mv.from, second);
            Ok(Some(mv.to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::RulesConfig;
    use crate::move_generation::legal_move_generator::{is_in_check, legal_moves};

    fn light_to_move(mut game: GameState) -> GameState {
        game.side_to_move = Color::Light;
        game
    }

    #[test]
    fn capture_levels_the_mover_and_records_the_victim() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 4), PieceKind::King, Color::Dark);
        game.place_piece(square_at(3, 0), PieceKind::Rook, Color::Light);
        game.place_piece(square_at(3, 6), PieceKind::Knight, Color::Dark);
        let game = light_to_move(game);

        let (next, effects) = apply_move_scratch(&game, Move::capture(square_at(3, 0), square_at(3, 6)))
            .expect("capture should apply");
        let rook = next.board.piece_at(square_at(3, 6)).expect("rook should land");
        assert_eq!(rook.level, 3);
        assert_eq!(effects.pre_move_level, 1);
        assert_eq!(effects.post_move_level, Some(3));
        assert_eq!(next.captured_by(Color::Light).len(), 1);
        assert_eq!(next.streak(Color::Light), 1);
        assert!(effects.invulnerability_granted);
        assert_eq!(rook.invulnerable_turns, 1);
        assert_eq!(next.side_to_move, Color::Dark);
        // The input state is untouched.
        assert!(game.board.piece_at(square_at(3, 6)).is_some());
    }

    #[test]
    fn invulnerable_target_is_rejected() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 4), PieceKind::King, Color::Dark);
        game.place_piece(square_at(3, 0), PieceKind::Rook, Color::Light);
        game.place_piece(square_at(3, 6), PieceKind::Rook, Color::Dark);
        if let Some(rook) = game.board.piece_at_mut(square_at(3, 6)) {
            rook.invulnerable_turns = 1;
        }
        let err = apply_move_scratch(&game, Move::capture(square_at(3, 0), square_at(3, 6)))
            .expect_err("invulnerable rook cannot be taken");
        assert_eq!(err, MoveError::InvulnerableTarget(square_at(3, 6)));
    }

    #[test]
    fn invulnerability_lasts_through_the_opponents_reply() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece(square_at(3, 0), PieceKind::Rook, Color::Light);
        game.place_piece(square_at(3, 6), PieceKind::Knight, Color::Dark);
        game.place_piece(square_at(6, 0), PieceKind::Queen, Color::Dark);

        let (after_capture, _) = apply_move_scratch(&game, Move::capture(square_at(3, 0), square_at(3, 6)))
            .expect("capture should apply");
        let rook_sq = square_at(3, 6);
        assert!(after_capture.board.piece_at(rook_sq).is_some_and(|p| p.is_invulnerable()));
        assert!(!legal_moves(&after_capture, Color::Dark)
            .iter()
            .any(|mv| mv.to == rook_sq));

        let (after_reply, _) = apply_move_scratch(&after_capture, Move::quiet(square_at(6, 0), square_at(6, 1)))
            .expect("quiet reply should apply");
        assert!(after_reply.board.piece_at(rook_sq).is_some_and(|p| !p.is_invulnerable()));
    }

    #[test]
    fn self_destruct_removes_adjacent_enemies_and_counts_as_two_kills() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 0), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        let bomber_sq = square_at(4, 4);
        game.place_piece_with_level(bomber_sq, PieceKind::Knight, Color::Light, 5);
        game.place_piece(square_at(5, 4), PieceKind::Pawn, Color::Dark);
        game.place_piece(square_at(3, 3), PieceKind::Bishop, Color::Dark);
        game.place_piece(square_at(4, 5), PieceKind::Pawn, Color::Light);

        let (next, effects) =
            apply_move_scratch(&game, Move::self_destruct(bomber_sq)).expect("self-destruct should apply");
        assert_eq!(effects.captured.len(), 2);
        assert_eq!(next.captured_by(Color::Light).len(), 2);
        assert_eq!(next.streak(Color::Light), 2);
        assert!(next.board.piece_at(bomber_sq).is_none());
        assert!(next.board.piece_at(square_at(4, 5)).is_some());
        assert_eq!(next.fallen(Color::Light).len(), 1);
        assert_eq!(effects.post_move_level, None);
    }

    #[test]
    fn high_level_pawn_promotion_grants_an_extra_turn() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece_with_level(square_at(6, 0), PieceKind::Pawn, Color::Light, 5);

        let mv = Move::promotion(square_at(6, 0), square_at(7, 0), PieceKind::Queen);
        let (next, effects) = apply_move_scratch(&game, mv).expect("promotion should apply");
        assert!(effects.extra_turn);
        assert_eq!(effects.promotion, Some(PieceKind::Queen));
        assert_eq!(next.side_to_move, Color::Light);
        let queen = next.board.piece_at(square_at(7, 0)).expect("queen should stand on a8");
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.level, 5);

        let mut low = GameState::new_empty(RulesConfig::default());
        low.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        low.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        low.place_piece_with_level(square_at(6, 0), PieceKind::Pawn, Color::Light, 4);
        let (_, effects) = apply_move_scratch(&low, mv).expect("promotion should apply");
        assert!(!effects.extra_turn);
    }

    #[test]
    fn third_consecutive_kill_resurrects_a_fallen_piece() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece(square_at(3, 3), PieceKind::Queen, Color::Light);
        game.place_piece(square_at(5, 3), PieceKind::Pawn, Color::Dark);
        game.kill_streaks = [2, 0];
        game.captured[Color::Dark.index()] = vec![
            Piece::new(PieceId(500), PieceKind::Knight, Color::Light),
            Piece::new(PieceId(501), PieceKind::Rook, Color::Light),
        ];

        let (next, effects) = apply_move_scratch(&game, Move::capture(square_at(3, 3), square_at(5, 3)))
            .expect("capture should apply");
        assert_eq!(next.streak(Color::Light), 3);
        assert_eq!(next.fallen(Color::Light).len(), 1);
        assert_eq!(next.fallen(Color::Light)[0].kind, PieceKind::Knight);

        let (square, piece) = effects.resurrected.expect("a piece should return");
        assert_eq!(piece.kind, PieceKind::Rook);
        assert_eq!(piece.level, 1);
        assert_eq!(piece.color, Color::Light);
        assert_eq!(row_of(square), 0);
        assert_eq!(next.board.piece_at(square), Some(&piece));
        assert!(game.board.piece_at(square).is_none());
        assert_ne!(piece.id, PieceId(501));
    }

    #[test]
    fn check_with_extra_turn_and_no_reply_is_auto_checkmate() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 0), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece(square_at(6, 0), PieceKind::Rook, Color::Light);
        game.place_piece_with_level(square_at(6, 2), PieceKind::Pawn, Color::Light, 5);
        // The promotion on c8 checks along the back rank; the a7 rook covers
        // the seventh rank, so the dark king has nowhere to go.
        let mv = Move::promotion(square_at(6, 2), square_at(7, 2), PieceKind::Rook);
        let mut rng = StdRng::seed_from_u64(11);
        let (next, effects) = apply_move_with_rng(&game, mv, &mut rng).expect("promotion should apply");

        assert!(effects.extra_turn);
        assert!(effects.auto_checkmate);
        assert!(is_in_check(&next, Color::Dark));
        assert_eq!(
            next.result,
            Some(GameResult::win(Color::Light, TerminationReason::AutoCheckmate))
        );
    }

    #[test]
    fn levels_stay_in_range_after_repeated_captures() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece_with_level(square_at(3, 3), PieceKind::Knight, Color::Light, 5);
        game.place_piece(square_at(5, 4), PieceKind::Pawn, Color::Dark);
        let (next, _) = apply_move_scratch(&game, Move::capture(square_at(3, 3), square_at(5, 4)))
            .expect("capture should apply");
        let knight = next.board.piece_at(square_at(5, 4)).expect("knight should land");
        assert_eq!(knight.level, game.rules.max_level(PieceKind::Knight));
    }

    #[test]
    fn level_boost_is_collected() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece(square_at(1, 1), PieceKind::Bishop, Color::Light);
        game.board.set_item(square_at(3, 3), Some(Item::LevelBoost));
        let (next, effects) = apply_move_scratch(&game, Move::quiet(square_at(1, 1), square_at(3, 3)))
            .expect("quiet move should apply");
        assert_eq!(effects.item_collected, Some(Item::LevelBoost));
        assert_eq!(next.board.item_at(square_at(3, 3)), None);
        assert_eq!(next.board.piece_at(square_at(3, 3)).map(|p| p.level), Some(2));
    }

    #[test]
    fn leveled_pawn_pushes_adjacent_enemies_back() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 7), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece_with_level(square_at(2, 2), PieceKind::Pawn, Color::Light, 4);
        game.place_piece(square_at(4, 2), PieceKind::Knight, Color::Dark);
        game.place_piece(square_at(3, 3), PieceKind::Bishop, Color::Dark);
        game.place_piece(square_at(3, 4), PieceKind::Rook, Color::Dark);

        let (next, effects) = apply_move_scratch(&game, Move::quiet(square_at(2, 2), square_at(3, 2)))
            .expect("push should apply");
        // The knight is pushed to c6; the bishop on d4 is blocked by the rook.
        assert_eq!(effects.push_backs, vec![(square_at(4, 2), square_at(5, 2))]);
        assert!(next.board.piece_at(square_at(5, 2)).is_some());
        assert!(next.board.piece_at(square_at(3, 3)).is_some());
        assert!(!effects.self_check);
    }

    #[test]
    fn certain_conversion_flips_adjacent_enemies_but_not_kings() {
        let rules = RulesConfig {
            bishop_conversion_chance: 1.0,
            ..RulesConfig::default()
        };
        let mut game = GameState::new_empty(rules);
        game.place_piece(square_at(0, 0), PieceKind::King, Color::Light);
        game.place_piece(square_at(5, 5), PieceKind::King, Color::Dark);
        game.place_piece_with_level(square_at(2, 2), PieceKind::Bishop, Color::Light, 5);
        game.place_piece(square_at(5, 3), PieceKind::Knight, Color::Dark);

        let (next, effects) = apply_move_scratch(&game, Move::quiet(square_at(2, 2), square_at(4, 4)))
            .expect("bishop move should apply");
        assert_eq!(effects.conversions, vec![square_at(5, 3)]);
        assert_eq!(next.board.piece_at(square_at(5, 3)).map(|p| p.color), Some(Color::Light));
        assert_eq!(next.board.piece_at(square_at(5, 5)).map(|p| p.color), Some(Color::Dark));
    }

    #[test]
    fn queen_reaching_top_tier_sacrifices_a_pawn() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        game.place_piece_with_level(square_at(3, 3), PieceKind::Queen, Color::Light, 5);
        game.place_piece(square_at(1, 0), PieceKind::Pawn, Color::Light);
        game.place_piece(square_at(5, 5), PieceKind::Knight, Color::Dark);

        let (next, effects) = apply_move_scratch(&game, Move::capture(square_at(3, 3), square_at(5, 5)))
            .expect("capture should apply");
        assert_eq!(next.board.piece_at(square_at(5, 5)).map(|p| p.level), Some(7));
        let sacrificed = effects.sacrificed.expect("a pawn should be given up");
        assert_eq!(sacrificed.kind, PieceKind::Pawn);
        assert!(next.board.piece_at(square_at(1, 0)).is_none());
        assert_eq!(next.fallen(Color::Light).len(), 1);
    }

    #[test]
    fn castling_moves_both_pieces() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(0, 7), PieceKind::Rook, Color::Light);
        game.place_piece(square_at(7, 4), PieceKind::King, Color::Dark);
        let mv = Move::new(square_at(0, 4), square_at(0, 6), MoveKind::Castle);
        let (next, _) = apply_move_scratch(&game, mv).expect("castle should apply");
        assert_eq!(next.board.piece_at(square_at(0, 6)).map(|p| p.kind), Some(PieceKind::King));
        let rook = next.board.piece_at(square_at(0, 5)).expect("rook should jump over");
        assert!(rook.has_moved);
    }

    #[test]
    fn moves_beyond_a_pieces_reach_are_illegal() {
        let game = GameState::new_game();
        let mut rng = StdRng::seed_from_u64(3);
        // a1 rook through its own pawn, and a b1 knight flying to e5.
        let rook_slide = Move::quiet(square_at(0, 0), square_at(4, 0));
        let knight_flight = Move::quiet(square_at(0, 1), square_at(4, 4));
        assert_eq!(
            apply_move_with_rng(&game, rook_slide, &mut rng),
            Err(MoveError::Illegal(rook_slide))
        );
        assert_eq!(
            apply_move_with_rng(&game, knight_flight, &mut rng),
            Err(MoveError::Illegal(knight_flight))
        );

        // A level-1 rook cannot slide past a blocker even onto an empty square.
        let mut open = GameState::new_empty(RulesConfig::default());
        open.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        open.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        open.place_piece(square_at(3, 0), PieceKind::Rook, Color::Light);
        open.place_piece(square_at(3, 2), PieceKind::Pawn, Color::Dark);
        let jump = Move::quiet(square_at(3, 0), square_at(3, 5));
        assert_eq!(apply_move_scratch(&open, jump), Err(MoveError::Illegal(jump)));
    }

    #[test]
    fn double_kill_past_the_resurrection_mark_brings_nobody_back() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 0), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        let bomber_sq = square_at(4, 4);
        game.place_piece_with_level(bomber_sq, PieceKind::Knight, Color::Light, 5);
        game.place_piece(square_at(5, 4), PieceKind::Pawn, Color::Dark);
        game.place_piece(square_at(3, 3), PieceKind::Bishop, Color::Dark);
        game.kill_streaks = [2, 0];
        game.captured[Color::Dark.index()] = vec![Piece::new(PieceId(500), PieceKind::Rook, Color::Light)];

        let (next, effects) =
            apply_move_scratch(&game, Move::self_destruct(bomber_sq)).expect("self-destruct should apply");
        assert_eq!(next.streak(Color::Light), 4);
        assert!(effects.resurrected.is_none());
        assert_eq!(next.board.pieces_of(Color::Light).count(), 1);
        // The fallen rook stays fallen, joined by the bomber.
        assert_eq!(next.fallen(Color::Light).len(), 2);
    }

    #[test]
    fn double_kill_past_the_extra_turn_mark_passes_the_move() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 0), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        let bomber_sq = square_at(4, 4);
        game.place_piece_with_level(bomber_sq, PieceKind::Knight, Color::Light, 5);
        game.place_piece(square_at(5, 4), PieceKind::Pawn, Color::Dark);
        game.place_piece(square_at(3, 3), PieceKind::Bishop, Color::Dark);
        game.kill_streaks = [5, 0];

        let (next, effects) =
            apply_move_scratch(&game, Move::self_destruct(bomber_sq)).expect("self-destruct should apply");
        assert_eq!(next.streak(Color::Light), 7);
        assert!(!effects.extra_turn);
        assert_eq!(next.side_to_move, Color::Dark);
    }

    #[test]
    fn en_passant_removes_the_pawn_beside_the_mover() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        let (from, victim_sq, to) = (square_at(4, 4), square_at(4, 3), square_at(5, 3));
        game.place_piece(from, PieceKind::Pawn, Color::Light);
        game.place_piece(victim_sq, PieceKind::Pawn, Color::Dark);
        game.en_passant_target = Some(to);

        let mv = Move::new(from, to, MoveKind::EnPassant);
        let (next, effects) = apply_move_scratch(&game, mv).expect("en passant should apply");
        assert!(next.board.piece_at(victim_sq).is_none());
        assert!(next.board.piece_at(from).is_none());
        let pawn = next.board.piece_at(to).expect("pawn should land on d6");
        assert_eq!((pawn.kind, pawn.color), (PieceKind::Pawn, Color::Light));
        assert_eq!(effects.captured.len(), 1);
        assert_eq!(effects.captured[0].kind, PieceKind::Pawn);
        assert_eq!(next.captured_by(Color::Light).len(), 1);
        assert_eq!(next.en_passant_target, None);
    }

    #[test]
    fn swap_exchanges_knight_and_bishop() {
        let mut game = GameState::new_empty(RulesConfig::default());
        game.place_piece(square_at(0, 4), PieceKind::King, Color::Light);
        game.place_piece(square_at(7, 7), PieceKind::King, Color::Dark);
        let (knight_sq, bishop_sq) = (square_at(2, 2), square_at(5, 6));
        game.place_piece_with_level(knight_sq, PieceKind::Knight, Color::Light, 4);
        game.place_piece(bishop_sq, PieceKind::Bishop, Color::Light);

        let mv = Move::new(knight_sq, bishop_sq, MoveKind::Swap);
        assert!(legal_moves(&game, Color::Light).contains(&mv));
        let (next, effects) = apply_move_scratch(&game, mv).expect("swap should apply");
        let knight = next.board.piece_at(bishop_sq).expect("knight should stand on the bishop square");
        let bishop = next.board.piece_at(knight_sq).expect("bishop should stand on the knight square");
        assert_eq!((knight.kind, knight.level), (PieceKind::Knight, 4));
        assert_eq!(bishop.kind, PieceKind::Bishop);
        assert!(knight.has_moved && bishop.has_moved);
        assert!(effects.captured.is_empty());
        assert_eq!(next.side_to_move, Color::Dark);
    }

    #[test]
    fn rejections_leave_the_state_alone() {
        let game = GameState::new_game();
        assert_eq!(
            apply_move_scratch(&game, Move::quiet(square_at(3, 3), square_at(4, 3))),
            Err(MoveError::NoPieceOnSquare(square_at(3, 3)))
        );
        assert_eq!(
            apply_move_scratch(&game, Move::quiet(square_at(6, 4), square_at(5, 4))),
            Err(MoveError::WrongColor(square_at(6, 4)))
        );
        assert!(matches!(
            apply_move_scratch(&game, Move::quiet(70, 3)),
            Err(MoveError::Malformed(_))
        ));
        assert_eq!(game, GameState::new_game());
    }
}
