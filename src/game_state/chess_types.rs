//! Core value types shared by every engine subsystem.
//!
//! Squares are plain indices (`row * 8 + col`); row 0 is Light's back rank.
//! Pieces carry their own level, has-moved flag, and invulnerability counter,
//! so a `Piece` value fully describes what the move generator needs to know.

use std::fmt;

/// Board square index (`0..=63`), `row * 8 + col`.
pub type Square = u8;

pub const BOARD_SIZE: u8 = 8;
pub const NUM_SQUARES: usize = 64;

#[inline]
pub const fn square_at(row: u8, col: u8) -> Square {
    row * BOARD_SIZE + col
}

#[inline]
pub const fn row_of(square: Square) -> u8 {
    square / BOARD_SIZE
}

#[inline]
pub const fn col_of(square: Square) -> u8 {
    square % BOARD_SIZE
}

#[inline]
pub const fn is_on_board(square: Square) -> bool {
    (square as usize) < NUM_SQUARES
}

/// Side to move / piece owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row delta of a forward pawn step.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::Light => 1,
            Color::Dark => 6,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => write!(f, "light"),
            Color::Dark => write!(f, "dark"),
        }
    }
}

/// Piece type. The last three are variant types that never appear in the
/// standard setup but are fully supported by generation and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Commander,
    Hero,
    Infiltrator,
}

pub const PIECE_KIND_COUNT: usize = 9;

pub const ALL_PIECE_KINDS: [PieceKind; PIECE_KIND_COUNT] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Commander,
    PieceKind::Hero,
    PieceKind::Infiltrator,
];

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
            PieceKind::Commander => 6,
            PieceKind::Hero => 7,
            PieceKind::Infiltrator => 8,
        }
    }

    /// Level-independent ranking used for resurrection and sacrifice picks.
    #[inline]
    pub const fn base_value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
            PieceKind::Commander => 450,
            PieceKind::Hero => 600,
            PieceKind::Infiltrator => 200,
        }
    }

    /// Pawn-like pieces promote on the far rank.
    #[inline]
    pub const fn promotes(self) -> bool {
        matches!(self, PieceKind::Pawn | PieceKind::Infiltrator)
    }

    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Commander => 'c',
            PieceKind::Hero => 'h',
            PieceKind::Infiltrator => 'i',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        ALL_PIECE_KINDS
            .into_iter()
            .find(|kind| kind.to_char() == ch.to_ascii_lowercase())
    }
}

/// Stable identity of a piece for its whole lifetime on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub level: u8,
    pub has_moved: bool,
    pub invulnerable_turns: u8,
}

impl Piece {
    pub const fn new(id: PieceId, kind: PieceKind, color: Color) -> Self {
        Self {
            id,
            kind,
            color,
            level: 1,
            has_moved: false,
            invulnerable_turns: 0,
        }
    }

    #[inline]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerable_turns > 0
    }
}

/// Transient board item sharing a square with (at most) one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    /// Impassable: blocks slides and pushes, never a destination.
    Obstacle,
    /// Collected by the piece that lands on it for one level.
    LevelBoost,
}

impl Item {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Item::Obstacle => 0,
            Item::LevelBoost => 1,
        }
    }

    #[inline]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Item::Obstacle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    Castle,
    EnPassant,
    Promotion,
    /// `from == to`; removes the mover and qualifying neighbours.
    SelfDestruct,
    /// Exchanges the mover with the friendly piece on `to`.
    Swap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Quiet)
    }

    pub const fn capture(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Capture)
    }

    pub const fn promotion(from: Square, to: Square, target: PieceKind) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Promotion,
            promotion: Some(target),
        }
    }

    pub const fn self_destruct(square: Square) -> Self {
        Self::new(square, square, MoveKind::SelfDestruct)
    }

    #[inline]
    pub const fn is_capture_kind(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::SelfDestruct
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            crate::utils::long_algebraic::move_to_long_algebraic(self)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    Checkmate,
    /// Check delivered together with an extra turn, no legal reply.
    AutoCheckmate,
    Stalemate,
    KingCaptured,
    SelfCheck,
    Repetition,
    /// Invariant violation: a side lost its king outside a capture.
    MissingKing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameResult {
    /// `None` is a draw.
    pub winner: Option<Color>,
    pub reason: TerminationReason,
}

impl GameResult {
    pub const fn win(winner: Color, reason: TerminationReason) -> Self {
        Self {
            winner: Some(winner),
            reason,
        }
    }

    pub const fn draw(reason: TerminationReason) -> Self {
        Self {
            winner: None,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_coordinates_follow_row_major_layout() {
        let sq = square_at(6, 3);
        assert_eq!(sq, 51);
        assert_eq!(row_of(sq), 6);
        assert_eq!(col_of(sq), 3);
        assert!(is_on_board(63));
        assert!(!is_on_board(64));
    }

    #[test]
    fn piece_chars_map_back_to_kinds() {
        for kind in ALL_PIECE_KINDS {
            assert_eq!(PieceKind::from_char(kind.to_char()), Some(kind));
            assert_eq!(
                PieceKind::from_char(kind.to_char().to_ascii_uppercase()),
                Some(kind)
            );
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn colors_face_each_other() {
        assert_eq!(Color::Light.opposite(), Color::Dark);
        assert_eq!(Color::Light.promotion_row(), Color::Dark.back_row());
        assert_eq!(Color::Dark.forward(), -1);
    }
}
