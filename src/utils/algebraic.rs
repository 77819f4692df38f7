//! Conversions between algebraic coordinates and square indices.
//!
//! Squares are file-major (`a1 == 0`, `a8 == 7`, `h8 == 63`), so these are
//! the only places coordinate characters and indices meet.

use crate::board_state::board_errors::BoardStateError;
use crate::board_state::board_types::{square_at, file_of, rank_of, Square};

/// Convert an algebraic coordinate (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, BoardStateError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(BoardStateError::InvalidFen(format!(
            "Invalid algebraic square: {square}"
        )));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(BoardStateError::InvalidFen(format!(
            "Invalid algebraic file: {}",
            file as char
        )));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(BoardStateError::InvalidFen(format!(
            "Invalid algebraic rank: {}",
            rank as char
        )));
    }

    Ok(square_at(file - b'a', rank - b'1'))
}

/// Convert a square index (`0..=63`) to its algebraic coordinate.
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, BoardStateError> {
    if square > 63 {
        return Err(BoardStateError::InvalidFen(format!(
            "Square index out of bounds: {square}"
        )));
    }

    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));
    Ok(format!("{file_char}{rank_char}"))
}
