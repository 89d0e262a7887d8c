//! Random-move engine.
//!
//! Selects uniformly from legal moves and is primarily used for diagnostics,
//! integration testing, and low-strength gameplay.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{parse_option, Engine, EngineOutput, GoParams};
use crate::errors::EngineError;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::legal_moves;

pub struct RandomEngine {
    seed: u64,
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Evolving Random"
    }

    fn new_game(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if name.eq_ignore_ascii_case("Seed") {
            *self = Self::new(parse_option(name, value)?);
            return Ok(());
        }
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> Result<EngineOutput, EngineError> {
        let legal = legal_moves(game_state, game_state.side_to_move);

        let mut out = EngineOutput::default();
        out.info_lines
            .push(format!("info string random_engine legal_moves {}", legal.len()));
        if let Some(depth) = params.depth {
            out.info_lines
                .push(format!("info string random_engine requested_depth {depth}"));
        }

        out.best_move = legal.choose(&mut self.rng).copied();
        Ok(out)
    }
}
