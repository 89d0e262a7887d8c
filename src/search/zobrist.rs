//! Zobrist hashing for position identity, repetition tracking, and the
//! search cache.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging.

use std::sync::OnceLock;

use crate::game_state::{chess_types::*, game_state::GameState};

/// Level slots per piece key; levels above this share the top slot.
const LEVEL_SLOTS: usize = 8;
const STREAK_SLOTS: usize = 16;
const CAPTURED_COUNT_SLOTS: usize = 8;
const ITEM_KINDS: usize = 2;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[[u64; NUM_SQUARES]; LEVEL_SLOTS]; PIECE_KIND_COUNT]; 2],
    has_moved: [u64; NUM_SQUARES],
    invulnerable: [u64; NUM_SQUARES],
    items: [[u64; NUM_SQUARES]; ITEM_KINDS],
    side_to_move: u64,
    maximizing: u64,
    streaks: [[u64; STREAK_SLOTS]; 2],
    en_passant_file: [u64; 8],
    captured: [[[u64; CAPTURED_COUNT_SLOTS]; PIECE_KIND_COUNT]; 2],
}

static TABLES: OnceLock<Box<ZobristTables>> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn fill(keys: &mut [u64], seed: &mut u64) {
    for key in keys {
        *key = next_random_u64(seed);
    }
}

fn build_tables() -> Box<ZobristTables> {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut tables = Box::new(ZobristTables {
        piece_square: [[[[0; NUM_SQUARES]; LEVEL_SLOTS]; PIECE_KIND_COUNT]; 2],
        has_moved: [0; NUM_SQUARES],
        invulnerable: [0; NUM_SQUARES],
        items: [[0; NUM_SQUARES]; ITEM_KINDS],
        side_to_move: 0,
        maximizing: 0,
        streaks: [[0; STREAK_SLOTS]; 2],
        en_passant_file: [0; 8],
        captured: [[[0; CAPTURED_COUNT_SLOTS]; PIECE_KIND_COUNT]; 2],
    });

    for color in &mut tables.piece_square {
        for kind in color {
            for level in kind {
                fill(level, &mut seed);
            }
        }
    }
    fill(&mut tables.has_moved, &mut seed);
    fill(&mut tables.invulnerable, &mut seed);
    for item in &mut tables.items {
        fill(item, &mut seed);
    }
    tables.side_to_move = next_random_u64(&mut seed);
    tables.maximizing = next_random_u64(&mut seed);
    for color in &mut tables.streaks {
        fill(color, &mut seed);
    }
    fill(&mut tables.en_passant_file, &mut seed);
    for color in &mut tables.captured {
        for kind in color {
            fill(kind, &mut seed);
        }
    }

    tables
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
pub fn piece_key(piece: &Piece, square: Square) -> u64 {
    let level_slot = (piece.level.max(1) as usize - 1).min(LEVEL_SLOTS - 1);
    tables().piece_square[piece.color.index()][piece.kind.index()][level_slot][square as usize]
}

/// Key of the position as a player sees it: pieces with their levels, the
/// castling-relevant moved flags, items, side to move, and the en-passant
/// file. Used for repetition detection.
pub fn position_key(game_state: &GameState) -> u64 {
    let t = tables();
    let mut key = 0u64;

    for (sq, piece) in game_state.board.pieces() {
        key ^= piece_key(piece, sq);
        if piece.has_moved && matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
            key ^= t.has_moved[sq as usize];
        }
    }
    for (sq, item) in game_state.board.items() {
        key ^= t.items[item.index()][sq as usize];
    }
    if game_state.side_to_move == Color::Dark {
        key ^= t.side_to_move;
    }
    if let Some(ep_square) = game_state.en_passant_target {
        key ^= t.en_passant_file[col_of(ep_square) as usize];
    }

    key
}

/// Key for the search cache: the position key extended with invulnerability
/// windows, streaks, the captured-piece pools that feed resurrection, and
/// whether the node is a maximizing one.
pub fn search_key(game_state: &GameState, maximizing: bool) -> u64 {
    let t = tables();
    let mut key = position_key(game_state);

    for (sq, piece) in game_state.board.pieces() {
        if piece.invulnerable_turns > 0 {
            key ^= t.invulnerable[sq as usize].rotate_left(u32::from(piece.invulnerable_turns));
        }
    }
    for color in Color::ALL {
        let streak = (game_state.streak(color) as usize).min(STREAK_SLOTS - 1);
        key ^= t.streaks[color.index()][streak];

        let mut counts = [0usize; PIECE_KIND_COUNT];
        for piece in game_state.captured_by(color) {
            counts[piece.kind.index()] += 1;
        }
        for (kind_index, count) in counts.into_iter().enumerate() {
            if count > 0 {
                key ^= t.captured[color.index()][kind_index][count.min(CAPTURED_COUNT_SLOTS - 1)];
            }
        }
    }
    if maximizing {
        key ^= t.maximizing;
    }

    key
}
