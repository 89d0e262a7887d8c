//! Iterative deepening minimax with alpha-beta pruning.
//!
//! Nodes carry an explicit maximizing flag instead of alternating by ply: a
//! child reached through a move that granted an extra turn keeps the parent's
//! flag, because the same side moves again. The cache and the time budget are
//! parameters of the top-level call, never hidden engine state.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, trace};

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::decisions::AutoDecisions;
use crate::move_generation::legal_move_apply::MoveContext;
use crate::move_generation::legal_move_generator::{legal_children, legal_moves};
use crate::move_generation::move_side_effects::MoveEffects;
use crate::search::board_scoring::{BoardScorer, EvolvingScorer, WIN_SCORE};
use crate::search::move_ordering::order_moves;
use crate::search::position_cache::{Bound, CacheEntry, PositionCache};
use crate::search::zobrist::search_key;

const INFINITY: i32 = WIN_SCORE * 2;
/// Scores at least this far from zero are wins or losses at some ply.
const DECISIVE: i32 = WIN_SCORE - u8::MAX as i32;

/// Cached decisive scores count plies from the node, not from the root, so
/// an entry stays correct when the position recurs at another ply.
fn score_to_cache(score: i32, ply: u8) -> i32 {
    if score >= DECISIVE {
        score + i32::from(ply)
    } else if score <= -DECISIVE {
        score - i32::from(ply)
    } else {
        score
    }
}

fn score_from_cache(score: i32, ply: u8) -> i32 {
    if score >= DECISIVE {
        score - i32::from(ply)
    } else if score <= -DECISIVE {
        score + i32::from(ply)
    } else {
        score
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Wall-clock budget; `None` searches every iteration to completion.
    pub time_budget: Option<Duration>,
    pub cache_entries: usize,
    pub use_cache: bool,
    /// Seeds the generator used for random move outcomes inside the search.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            time_budget: None,
            cache_entries: PositionCache::DEFAULT_ENTRIES,
            use_cache: true,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub cache_hits: u64,
    pub timed_out: bool,
}

type Child = (Move, GameState, MoveEffects);

struct Searcher<'a, S: BoardScorer> {
    ai_color: Color,
    scorer: &'a S,
    cache: &'a mut PositionCache,
    use_cache: bool,
    rng: &'a mut dyn RngCore,
    deadline: Option<Instant>,
    nodes: u64,
    timed_out: bool,
}

impl<S: BoardScorer> Searcher<'_, S> {
    fn out_of_time(&mut self) -> bool {
        if !self.timed_out && self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.timed_out = true;
        }
        self.timed_out
    }

    /// Static score from the searching side's view. Decisive scores shrink
    /// with distance from the root so nearer wins are preferred.
    fn evaluate(&self, game_state: &GameState, ply: u8) -> i32 {
        let score = self.scorer.score(game_state, self.ai_color);
        if score >= WIN_SCORE {
            score - i32::from(ply)
        } else if score <= -WIN_SCORE {
            score + i32::from(ply)
        } else {
            score
        }
    }

    fn children(&mut self, game_state: &GameState, mover: Color) -> Vec<Child> {
        let mut decisions = AutoDecisions;
        let mut ctx = MoveContext::new(&mut *self.rng, &mut decisions);
        legal_children(game_state, mover, &mut ctx)
    }

    #[inline]
    fn mover(&self, maximizing: bool) -> Color {
        if maximizing {
            self.ai_color
        } else {
            self.ai_color.opposite()
        }
    }

    /// Searches every root move to `depth`. Returns `None` only when the root
    /// has no legal move.
    fn search_root(&mut self, game_state: &GameState, depth: u8, preferred: Option<Move>) -> Option<(Move, i32)> {
        let mut children = self.children(game_state, self.ai_color);
        order_moves(game_state, &mut children, preferred, |child| child.0);

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;
        for (mv, child, effects) in &children {
            let score = self.minimax(child, depth.saturating_sub(1), alpha, beta, effects.extra_turn, 1);
            trace!(%mv, score, depth, "root move searched");
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((*mv, score));
            }
            alpha = alpha.max(score);
            if self.timed_out {
                break;
            }
        }
        best
    }

    fn minimax(&mut self, game_state: &GameState, depth: u8, mut alpha: i32, mut beta: i32, maximizing: bool, ply: u8) -> i32 {
        self.nodes += 1;
        if depth == 0 || game_state.is_game_over() || self.out_of_time() {
            return self.evaluate(game_state, ply);
        }

        let key = search_key(game_state, maximizing);
        let mut preferred = None;
        if self.use_cache {
            if let Some(entry) = self.cache.lookup(key) {
                preferred = entry.best_move;
                if entry.depth >= depth {
                    let score = score_from_cache(entry.score, ply);
                    match entry.bound {
                        Bound::Exact => return score,
                        Bound::Lower => alpha = alpha.max(score),
                        Bound::Upper => beta = beta.min(score),
                    }
                    if beta <= alpha {
                        return score;
                    }
                }
            }
        }

        let mover = self.mover(maximizing);
        let mut children = self.children(game_state, mover);
        if children.is_empty() {
            return self.evaluate(game_state, ply);
        }
        order_moves(game_state, &mut children, preferred, |child| child.0);

        let (alpha_start, beta_start) = (alpha, beta);
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for (mv, child, effects) in &children {
            let child_maximizing = if effects.extra_turn { maximizing } else { !maximizing };
            let score = self.minimax(child, depth - 1, alpha, beta, child_maximizing, ply.saturating_add(1));
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(*mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(*mv);
                }
                beta = beta.min(best_score);
            }
            if beta <= alpha || self.timed_out {
                break;
            }
        }

        if self.use_cache && !self.timed_out {
            let bound = if best_score <= alpha_start {
                Bound::Upper
            } else if best_score >= beta_start {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.cache.store(CacheEntry {
                key,
                depth,
                score: score_to_cache(best_score, ply),
                bound,
                best_move,
            });
        }
        best_score
    }

    /// Plain minimax over the same tree, without bounds or cache.
    fn minimax_unpruned(&mut self, game_state: &GameState, depth: u8, maximizing: bool, ply: u8) -> i32 {
        self.nodes += 1;
        if depth == 0 || game_state.is_game_over() {
            return self.evaluate(game_state, ply);
        }
        let children = self.children(game_state, self.mover(maximizing));
        if children.is_empty() {
            return self.evaluate(game_state, ply);
        }
        let scores = children.iter().map(|(_, child, effects)| {
            let child_maximizing = if effects.extra_turn { maximizing } else { !maximizing };
            self.minimax_unpruned(child, depth - 1, child_maximizing, ply.saturating_add(1))
        });
        if maximizing {
            scores.max().unwrap_or(-INFINITY)
        } else {
            scores.min().unwrap_or(INFINITY)
        }
    }
}

/// Searches for `ai_color`'s best move with iterative deepening. The cache is
/// cleared first. An iteration cut short by the time budget is discarded
/// unless it is the only one; with no result at all the first legal move is
/// returned.
pub fn search_best_move<S: BoardScorer>(
    game_state: &GameState,
    ai_color: Color,
    config: &SearchConfig,
    scorer: &S,
    cache: &mut PositionCache,
    rng: &mut dyn RngCore,
) -> SearchResult {
    cache.clear();
    let start = Instant::now();
    let mut searcher = Searcher {
        ai_color,
        scorer,
        cache,
        use_cache: config.use_cache,
        rng,
        deadline: config.time_budget.map(|budget| start + budget),
        nodes: 0,
        timed_out: false,
    };

    let mut result = SearchResult::default();
    for depth in 1..=config.max_depth.max(1) {
        searcher.cache.new_generation();
        let iteration = searcher.search_root(game_state, depth, result.best_move);
        if searcher.timed_out {
            if result.best_move.is_none() {
                if let Some((mv, score)) = iteration {
                    result.best_move = Some(mv);
                    result.best_score = score;
                }
            }
            break;
        }
        let Some((mv, score)) = iteration else {
            break;
        };
        result.best_move = Some(mv);
        result.best_score = score;
        result.reached_depth = depth;
        info!(depth, %mv, score, nodes = searcher.nodes, "iteration complete");
    }

    result.nodes = searcher.nodes;
    result.cache_hits = searcher.cache.stats().hits;
    result.timed_out = searcher.timed_out;

    if result.best_move.is_none() {
        result.best_move = legal_moves(game_state, ai_color).first().copied();
    }
    debug!(
        best = ?result.best_move,
        score = result.best_score,
        depth = result.reached_depth,
        nodes = result.nodes,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search finished"
    );
    result
}

/// Best move for `color` within `max_depth` plies and `time_budget_ms`
/// milliseconds (0 means unlimited), with default weights and a fresh cache.
pub fn get_best_move(game_state: &GameState, color: Color, max_depth: u8, time_budget_ms: u64) -> Option<Move> {
    let config = SearchConfig {
        max_depth,
        time_budget: (time_budget_ms > 0).then(|| Duration::from_millis(time_budget_ms)),
        ..SearchConfig::default()
    };
    let mut cache = PositionCache::with_entries(config.cache_entries);
    let mut rng = StdRng::seed_from_u64(config.seed);
    search_best_move(game_state, color, &config, &EvolvingScorer::default(), &mut cache, &mut rng).best_move
}

/// Root score of an exhaustive minimax to `depth`, for checking that pruning
/// does not change the result.
pub fn unpruned_root_score<S: BoardScorer>(
    game_state: &GameState,
    ai_color: Color,
    depth: u8,
    scorer: &S,
    rng: &mut dyn RngCore,
) -> Option<i32> {
    let mut cache = PositionCache::with_entries(1);
    let mut searcher = Searcher {
        ai_color,
        scorer,
        cache: &mut cache,
        use_cache: false,
        rng,
        deadline: None,
        nodes: 0,
        timed_out: false,
    };
    let children = searcher.children(game_state, ai_color);
    children
        .iter()
        .map(|(_, child, effects)| searcher.minimax_unpruned(child, depth.saturating_sub(1), effects.extra_turn, 1))
        .max()
}
