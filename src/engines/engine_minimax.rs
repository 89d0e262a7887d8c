//! Iterative-deepening alpha-beta engine.
//!
//! Owns its search configuration, position cache, and random generator so
//! repeated calls reuse the allocation; the search itself clears the cache
//! at the start of every move.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{parse_option, Engine, EngineOutput, GoParams};
use crate::errors::EngineError;
use crate::game_state::game_state::GameState;
use crate::search::alpha_beta::{search_best_move, SearchConfig};
use crate::search::board_scoring::EvolvingScorer;
use crate::search::position_cache::PositionCache;

pub struct MinimaxEngine {
    config: SearchConfig,
    scorer: EvolvingScorer,
    cache: PositionCache,
    rng: StdRng,
}

impl MinimaxEngine {
    pub fn new(default_depth: u8) -> Self {
        Self::with_config(SearchConfig {
            max_depth: default_depth.max(1),
            ..SearchConfig::default()
        })
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            cache: PositionCache::with_entries(config.cache_entries),
            rng: StdRng::seed_from_u64(config.seed),
            scorer: EvolvingScorer::default(),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::with_config(SearchConfig::default())
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "Evolving Minimax"
    }

    fn new_game(&mut self) {
        self.cache.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed);
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if name.eq_ignore_ascii_case("Depth") {
            self.config.max_depth = parse_option::<u8>(name, value)?.max(1);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("MoveTimeMs") {
            let ms = parse_option::<u64>(name, value)?;
            self.config.time_budget = (ms > 0).then(|| Duration::from_millis(ms));
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Seed") {
            self.config.seed = parse_option(name, value)?;
            self.rng = StdRng::seed_from_u64(self.config.seed);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("CacheEntries") {
            self.config.cache_entries = parse_option::<usize>(name, value)?.max(1);
            self.cache = PositionCache::with_entries(self.config.cache_entries);
            return Ok(());
        }
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> Result<EngineOutput, EngineError> {
        let mut config = self.config;
        if let Some(depth) = params.depth {
            config.max_depth = depth.max(1);
        }
        if let Some(ms) = params.movetime_ms {
            config.time_budget = Some(Duration::from_millis(ms));
        }

        let start = Instant::now();
        let color = game_state.side_to_move;
        let result = search_best_move(game_state, color, &config, &self.scorer, &mut self.cache, &mut self.rng);
        let elapsed_ms = start.elapsed().as_millis();

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {} time {} cachehits {}",
            result.reached_depth, result.best_score, result.nodes, elapsed_ms, result.cache_hits
        ));
        if result.timed_out {
            out.info_lines
                .push("info string minimax_engine time budget exhausted".to_owned());
        }
        out.best_move = result.best_move;
        out.score = result.best_move.map(|_| result.best_score);
        Ok(out)
    }
}
