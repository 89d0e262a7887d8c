//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and board
//! squares. Files map to columns and ranks to rows, so `a1` is row 0,
//! column 0 and `h8` is row 7, column 7.

use crate::errors::ParseError;
use crate::game_state::chess_types::{col_of, row_of, square_at, Square};

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, ParseError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ParseError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ParseError::InvalidSquare(square.to_owned()));
    }

    Ok(square_at(rank - b'1', file - b'a'))
}

/// Convert a square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + col_of(square));
    let rank_char = char::from(b'1' + row_of(square));
    format!("{file_char}{rank_char}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(algebraic_to_square("E4").expect("e4 should parse"), square_at(3, 4));
        assert_eq!(square_to_algebraic(0), "a1");
        assert_eq!(square_to_algebraic(square_at(3, 4)), "e4");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        for text in ["", "e", "i1", "a9", "a0", "e44"] {
            assert!(matches!(algebraic_to_square(text), Err(ParseError::InvalidSquare(_))), "{text}");
        }
    }
}
