//! Crate root module declarations for the evolving-pieces chess engine.
//!
//! This file exposes all top-level subsystems (game state, move generation,
//! search, engines, and utility helpers) so the binary, benches, and
//! external collaborators can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_session;
    pub mod game_state;
    pub mod items;
}

pub mod moves {
    pub mod directions;
}

pub mod move_generation {
    pub mod decisions;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod legal_moves_variant;
    pub mod move_generator;
    pub mod move_side_effects;
    pub mod perft;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod move_ordering;
    pub mod position_cache;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_minimax;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
