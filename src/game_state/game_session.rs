//! A running game at the caller boundary.
//!
//! The rules core is stateless between calls; the session owns what sits
//! around it: the current state, a position-key history for threefold
//! repetition, the random generator for in-game chance, and item spawning.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::errors::{ApplyResult, MoveError};
use crate::game_state::items::maybe_spawn_item;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::decisions::{AutoDecisions, DecisionMaker};
use crate::move_generation::legal_move_apply::{apply_move, MoveContext};
use crate::move_generation::legal_move_generator::{has_legal_move, is_in_check, legal_moves};
use crate::move_generation::move_side_effects::MoveEffects;
use crate::search::zobrist::position_key;
use crate::utils::long_algebraic::parse_long_algebraic;

const REPETITION_LIMIT: usize = 3;

/// What one accepted move did.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    pub mv: Move,
    pub effects: MoveEffects,
    pub spawned_item: Option<(Square, Item)>,
    pub result: Option<GameResult>,
}

pub struct GameSession {
    state: GameState,
    history: Vec<u64>,
    rng: StdRng,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self::from_state(GameState::new_game(), seed)
    }

    pub fn from_state(state: GameState, seed: u64) -> Self {
        Self {
            history: vec![position_key(&state)],
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.state.result
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.state, self.state.side_to_move)
    }

    /// Plays `mv` with default choices for promotion, sacrifice, and
    /// resurrection.
    pub fn play(&mut self, mv: Move) -> ApplyResult<PlayOutcome> {
        self.play_with(mv, &mut AutoDecisions)
    }

    /// Parses long algebraic text (`e2e4`, `e7e8q`, `b1b1`) and plays it.
    pub fn play_text(&mut self, text: &str) -> ApplyResult<PlayOutcome> {
        if self.state.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let mv = parse_long_algebraic(text, &self.state)?;
        self.play(mv)
    }

    /// Plays `mv`, asking `decisions` whenever the rules leave a choice to
    /// the owner of a piece. A rejected move leaves the session untouched.
    pub fn play_with(&mut self, mv: Move, decisions: &mut dyn DecisionMaker) -> ApplyResult<PlayOutcome> {
        if self.state.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if !is_on_board(mv.from) || !is_on_board(mv.to) {
            return Err(MoveError::Malformed(format!("square out of range in {mv:?}")));
        }
        if !self.legal_moves().contains(&mv) {
            return Err(MoveError::Illegal(mv));
        }

        let mover = self.state.side_to_move;
        let (mut next, effects) = {
            let mut ctx = MoveContext::new(&mut self.rng, decisions);
            apply_move(&self.state, mv, &mut ctx)?
        };

        let spawned_item = if next.is_game_over() {
            None
        } else {
            maybe_spawn_item(&mut next, &mut self.rng)
        };

        self.history.push(position_key(&next));
        if next.result.is_none() {
            next.result = self.classify(&next);
        }

        debug!(%mv, %mover, captures = effects.capture_count(), extra_turn = effects.extra_turn, "move played");
        if let Some(result) = next.result {
            info!(winner = ?result.winner, reason = ?result.reason, moves = next.move_counter, "game over");
        }

        self.state = next;
        Ok(PlayOutcome {
            mv,
            effects,
            spawned_item,
            result: self.state.result,
        })
    }

    /// Terminal conditions that only the session can see (repetition needs
    /// history) or that the applier leaves to the caller.
    fn classify(&self, next: &GameState) -> Option<GameResult> {
        let light_king = next.board.king_count(Color::Light) > 0;
        let dark_king = next.board.king_count(Color::Dark) > 0;
        match (light_king, dark_king) {
            (true, true) => {}
            (false, false) => return Some(GameResult::draw(TerminationReason::MissingKing)),
            (true, false) => return Some(GameResult::win(Color::Light, TerminationReason::MissingKing)),
            (false, true) => return Some(GameResult::win(Color::Dark, TerminationReason::MissingKing)),
        }

        let current = position_key(next);
        if self.history.iter().filter(|&&key| key == current).count() >= REPETITION_LIMIT {
            return Some(GameResult::draw(TerminationReason::Repetition));
        }

        let to_move = next.side_to_move;
        if has_legal_move(next, to_move) {
            None
        } else if is_in_check(next, to_move) {
            Some(GameResult::win(to_move.opposite(), TerminationReason::Checkmate))
        } else {
            Some(GameResult::draw(TerminationReason::Stalemate))
        }
    }
}
