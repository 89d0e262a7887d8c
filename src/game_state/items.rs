//! Periodic board item spawning.
//!
//! Items appear only between turns at the caller boundary, never inside a
//! search, so the tree explored by the engine stays free of spawn noise.

use rand::prelude::IndexedRandom;
use rand::{Rng, RngCore};
use tracing::debug;

use crate::game_state::{chess_types::*, game_state::GameState};

/// Rows items may appear on; the first two ranks of each side stay clear.
const SPAWN_ROWS: std::ops::RangeInclusive<u8> = 2..=5;

/// Places one random item on a random vacant middle square when the move
/// counter hits a multiple of the spawn interval and the board holds fewer
/// than the configured maximum. Returns what was placed.
pub fn maybe_spawn_item(game_state: &mut GameState, rng: &mut dyn RngCore) -> Option<(Square, Item)> {
    let rules = game_state.rules;
    if rules.item_spawn_interval == 0
        || game_state.move_counter == 0
        || game_state.move_counter % rules.item_spawn_interval != 0
    {
        return None;
    }
    if game_state.board.items().count() >= usize::from(rules.max_items) {
        return None;
    }

    let vacant: Vec<Square> = SPAWN_ROWS
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| square_at(row, col)))
        .filter(|&square| game_state.board.is_vacant(square))
        .collect();
    let square = *vacant.choose(rng)?;
    let item = if rng.random_bool(0.5) {
        Item::Obstacle
    } else {
        Item::LevelBoost
    };

    game_state.board.set_item(square, Some(item));
    debug!(square, ?item, move_counter = game_state.move_counter, "item spawned");
    Some((square, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_only_on_the_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = GameState::new_game();

        game.move_counter = 9;
        assert!(maybe_spawn_item(&mut game, &mut rng).is_none());

        game.move_counter = 10;
        let (square, item) = maybe_spawn_item(&mut game, &mut rng).expect("an item should spawn");
        assert!(SPAWN_ROWS.contains(&row_of(square)));
        assert_eq!(game.board.item_at(square), Some(item));
    }

    #[test]
    fn respects_the_item_cap() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = GameState::new_game();
        for step in 1..=6 {
            game.move_counter = step * game.rules.item_spawn_interval;
            maybe_spawn_item(&mut game, &mut rng);
        }
        assert_eq!(game.board.items().count(), usize::from(game.rules.max_items));
    }
}
