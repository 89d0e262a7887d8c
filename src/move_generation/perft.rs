use crate::game_state::chess_types::MoveKind;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub self_destructs: usize,
    pub swaps: usize,
    pub extra_turns: usize,
    pub checks: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.self_destructs += rhs.self_destructs;
        self.swaps += rhs.swaps;
        self.extra_turns += rhs.extra_turns;
        self.checks += rhs.checks;
    }

    fn record_leaf(&mut self, mv: &GeneratedMove) {
        self.nodes += 1;
        if !mv.effects.captured.is_empty() {
            self.captures += 1;
        }
        match mv.mv.kind {
            MoveKind::EnPassant => self.en_passant += 1,
            MoveKind::Castle => self.castles += 1,
            MoveKind::Promotion => self.promotions += 1,
            MoveKind::SelfDestruct => self.self_destructs += 1,
            MoveKind::Swap => self.swaps += 1,
            MoveKind::Quiet | MoveKind::Capture => {}
        }
        if mv.effects.extra_turn {
            self.extra_turns += 1;
        }
        let on_move = mv.game_after_move.side_to_move;
        let defender = if mv.effects.extra_turn { on_move.opposite() } else { on_move };
        if is_king_in_check(&mv.game_after_move, defender) {
            self.checks += 1;
        }
    }
}

/// Counts the move tree below `game_state`. An extra turn keeps the same
/// side on move in the child state, so the tree follows the real turn order.
pub fn perft<G: MoveGenerator>(generator: &G, game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(game_state)? {
        let mut local = PerftCounts::default();
        perft_recurse(generator, &mv, depth, 1, &mut local)?;
        total.merge(local);
    }
    Ok(total)
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    if current_depth == search_depth {
        counts.record_leaf(mv);
        return Ok(());
    }

    for child in generator.generate_legal_moves(&mv.game_after_move)? {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }
    Ok(())
}
