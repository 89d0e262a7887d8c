//! Board and game state value types.
//!
//! `GameState` is a plain value: the move applier clones it and returns a new
//! one, so states handed to the search never alias each other. Piece ids come
//! from an allocator stored inside the state itself, which keeps replays
//! deterministic and avoids any global counter.

use crate::game_state::chess_rules::RulesConfig;
use crate::game_state::chess_types::*;

/// 8x8 grid; each square holds at most one piece and, independently, at most
/// one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; NUM_SQUARES],
    items: [Option<Item>; NUM_SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            squares: [None; NUM_SQUARES],
            items: [None; NUM_SQUARES],
        }
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares.get(square as usize).and_then(Option::as_ref)
    }

    #[inline]
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares
            .get_mut(square as usize)
            .and_then(Option::as_mut)
    }

    /// Puts `piece` on `square`, returning whatever stood there.
    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.squares[square as usize].replace(piece)
    }

    #[inline]
    pub fn take_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    #[inline]
    pub fn item_at(&self, square: Square) -> Option<Item> {
        self.items.get(square as usize).copied().flatten()
    }

    #[inline]
    pub fn set_item(&mut self, square: Square, item: Option<Item>) {
        self.items[square as usize] = item;
    }

    #[inline]
    pub fn take_item(&mut self, square: Square) -> Option<Item> {
        self.items[square as usize].take()
    }

    /// No piece and nothing that blocks movement.
    #[inline]
    pub fn is_passable(&self, square: Square) -> bool {
        self.piece_at(square).is_none() && !self.is_obstructed(square)
    }

    #[inline]
    pub fn is_obstructed(&self, square: Square) -> bool {
        self.item_at(square).is_some_and(Item::blocks_movement)
    }

    /// No piece and no item of any kind.
    #[inline]
    pub fn is_vacant(&self, square: Square) -> bool {
        self.piece_at(square).is_none() && self.item_at(square).is_none()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(sq, slot)| slot.as_ref().map(|piece| (sq as Square, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn items(&self) -> impl Iterator<Item = (Square, Item)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(sq, slot)| slot.map(|item| (sq as Square, item)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    pub fn king_count(&self, color: Color) -> usize {
        self.pieces_of(color)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .count()
    }
}

/// Hands out fresh piece ids; lives inside `GameState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceIdAllocator {
    next: u32,
}

impl PieceIdAllocator {
    #[inline]
    pub fn allocate(&mut self) -> PieceId {
        let id = PieceId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,
    /// Consecutive-capture counters, indexed by `Color::index`.
    pub kill_streaks: [u32; 2],
    /// Pieces captured *by* each color, oldest first. A color's own fallen
    /// pieces therefore sit in the opponent's list.
    pub captured: [Vec<Piece>; 2],
    pub en_passant_target: Option<Square>,
    pub move_counter: u32,
    pub result: Option<GameResult>,
    pub ids: PieceIdAllocator,
    pub rules: RulesConfig,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Default for GameState {
    fn default() -> Self {
        Self::new_empty(RulesConfig::default())
    }
}

impl GameState {
    pub fn new_empty(rules: RulesConfig) -> Self {
        Self {
            board: Board::empty(),
            side_to_move: Color::Light,
            kill_streaks: [0; 2],
            captured: [Vec::new(), Vec::new()],
            en_passant_target: None,
            move_counter: 0,
            result: None,
            ids: PieceIdAllocator::default(),
            rules,
        }
    }

    #[inline]
    pub fn new_game() -> Self {
        Self::new_game_with_rules(RulesConfig::default())
    }

    pub fn new_game_with_rules(rules: RulesConfig) -> Self {
        let mut game = Self::new_empty(rules);
        for color in Color::ALL {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                game.place_piece(square_at(color.back_row(), col as u8), kind, color);
            }
            for col in 0..BOARD_SIZE {
                game.place_piece(square_at(color.pawn_start_row(), col), PieceKind::Pawn, color);
            }
        }
        game
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, crate::errors::ParseError> {
        crate::utils::fen_parser::parse_fen(fen)
    }

    /// Places a fresh level-1 piece, replacing anything on the square.
    pub fn place_piece(&mut self, square: Square, kind: PieceKind, color: Color) -> PieceId {
        let id = self.ids.allocate();
        self.board.set_piece(square, Piece::new(id, kind, color));
        id
    }

    pub fn place_piece_with_level(
        &mut self,
        square: Square,
        kind: PieceKind,
        color: Color,
        level: u8,
    ) -> PieceId {
        let id = self.place_piece(square, kind, color);
        self.set_level(square, level);
        id
    }

    /// Sets the level of the piece on `square`, clamped to its type's range.
    pub fn set_level(&mut self, square: Square, level: u8) {
        let rules = self.rules;
        if let Some(piece) = self.board.piece_at_mut(square) {
            piece.level = rules.clamp_level(piece.kind, level);
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    #[inline]
    pub fn streak(&self, color: Color) -> u32 {
        self.kill_streaks[color.index()]
    }

    #[inline]
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// `color`'s own pieces that have left the board.
    #[inline]
    pub fn fallen(&self, color: Color) -> &[Piece] {
        &self.captured[color.opposite().index()]
    }
}
