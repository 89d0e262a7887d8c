//! Board geometry shared by move generation, attack detection, and the
//! side-effect resolver.
//!
//! All stepping goes through `offset`, which refuses to wrap around files or
//! leave the board.

use crate::game_state::chess_types::*;

/// `(row delta, col delta)`.
pub type Direction = (i8, i8);

pub const ORTHOGONAL: [Direction; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const DIAGONAL: [Direction; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const ALL_DIRECTIONS: [Direction; 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KNIGHT_JUMPS: [Direction; 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Square reached by moving `(dr, dc)` from `square`, if still on the board.
#[inline]
pub fn offset(square: Square, dr: i8, dc: i8) -> Option<Square> {
    let row = row_of(square) as i8 + dr;
    let col = col_of(square) as i8 + dc;
    if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
        Some(square_at(row as u8, col as u8))
    } else {
        None
    }
}

#[inline]
pub fn step(square: Square, direction: Direction, distance: i8) -> Option<Square> {
    offset(square, direction.0 * distance, direction.1 * distance)
}

/// The up-to-eight neighbours of `square`, paired with the direction used.
pub fn neighbours(square: Square) -> impl Iterator<Item = (Direction, Square)> {
    ALL_DIRECTIONS
        .into_iter()
        .filter_map(move |dir| offset(square, dir.0, dir.1).map(|sq| (dir, sq)))
}

/// Chebyshev distance from the four centre squares (0 on d4/e4/d5/e5).
#[inline]
pub fn center_distance(square: Square) -> u8 {
    let row = row_of(square);
    let col = col_of(square);
    let dr = if row < 4 { 3 - row } else { row - 4 };
    let dc = if col < 4 { 3 - col } else { col - 4 };
    dr.max(dc)
}

#[inline]
pub fn is_edge(square: Square) -> bool {
    center_distance(square) == 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_does_not_wrap_files() {
        assert_eq!(offset(square_at(0, 7), 0, 1), None);
        assert_eq!(offset(square_at(0, 0), -1, 0), None);
        assert_eq!(offset(square_at(3, 3), 2, -1), Some(square_at(5, 2)));
    }

    #[test]
    fn corner_has_three_neighbours() {
        assert_eq!(neighbours(square_at(0, 0)).count(), 3);
        assert_eq!(neighbours(square_at(4, 4)).count(), 8);
    }

    #[test]
    fn center_distance_rings() {
        assert_eq!(center_distance(square_at(3, 4)), 0);
        assert_eq!(center_distance(square_at(2, 5)), 1);
        assert_eq!(center_distance(square_at(0, 0)), 3);
        assert!(is_edge(square_at(7, 3)));
        assert!(!is_edge(square_at(6, 3)));
    }
}
