//! Zobrist keys for incremental position hashing.
//!
//! The keys are generated from a fixed seed so hashes are deterministic
//! across runs, which is useful for testing and debugging. Twelve key
//! classes cover king, queen, rook, bishop, knight, and pawn per color;
//! the light/dark bishop variants share one class.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::board_state::board_types::{Piece, Square, BOARD_SIZE};

pub const ZOBRIST_CLASSES: usize = 12;

const ZOBRIST_SEED: u64 = 0xD1CE_0F7A_11B0_A4D5;

struct ZobristTable {
    piece_square: [[u64; BOARD_SIZE]; ZOBRIST_CLASSES],
}

static TABLE: OnceLock<ZobristTable> = OnceLock::new();

#[inline]
fn table() -> &'static ZobristTable {
    TABLE.get_or_init(build_table)
}

fn build_table() -> ZobristTable {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[0u64; BOARD_SIZE]; ZOBRIST_CLASSES];
    for class in &mut piece_square {
        for key in class.iter_mut() {
            *key = rng.random();
        }
    }

    ZobristTable { piece_square }
}

/// Return the Zobrist key for a `(piece, square)` occupancy term.
#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    table().piece_square[piece.zobrist_class()][square as usize]
}

#[cfg(test)]
mod tests {
    use super::piece_square_key;
    use crate::board_state::board_types::Piece;

    #[test]
    fn keys_are_deterministic() {
        assert_eq!(
            piece_square_key(Piece::WhiteQueen, 12),
            piece_square_key(Piece::WhiteQueen, 12)
        );
    }

    #[test]
    fn bishop_variants_share_keys() {
        assert_eq!(
            piece_square_key(Piece::WhiteBishopLight, 20),
            piece_square_key(Piece::WhiteBishopDark, 20)
        );
    }

    #[test]
    fn classes_and_squares_get_distinct_keys() {
        assert_ne!(
            piece_square_key(Piece::WhitePawn, 0),
            piece_square_key(Piece::BlackPawn, 0)
        );
        assert_ne!(
            piece_square_key(Piece::WhitePawn, 0),
            piece_square_key(Piece::WhitePawn, 1)
        );
    }
}
