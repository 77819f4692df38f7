//! From-scratch recomputation of incremental state.
//!
//! Position setup uses these to build the initial attack tables and keys,
//! and the consistency checker uses them as the reference the incremental
//! updates are compared against. Nothing on the make/unmake path calls
//! into this module.

use crate::attack::attack_board::{add_knight, xor_king, xor_pawn, xor_rays};
use crate::board_state::board_state::SideState;
use crate::board_state::board_types::*;
use crate::tables::geometry_tables::{bishop_diagonal_mask, RAY_DIRS};
use crate::tables::material_keys::material_key;
use crate::tables::zobrist_keys::piece_square_key;

/// Build one side's attack state from board occupancy alone. The returned
/// state has a fully populated attack table, promotion file mask, and
/// bishop diagonal aggregate; the piece list is left empty for the caller.
pub fn recalc_side(squares: &Squares, color: Color) -> SideState {
    let mut side = SideState::new(color);

    for sq in 0..BOARD_SIZE as Square {
        let piece = match squares[sq as usize].piece {
            Some(piece) if piece.color() == color => piece,
            _ => continue,
        };

        match piece {
            Piece::WhiteKing | Piece::BlackKing => xor_king(&mut side, sq),
            Piece::WhiteQueen | Piece::BlackQueen => xor_rays(
                &mut side,
                squares,
                sq,
                ATTACK_QUEEN_RAYS & RAY_DIRS[sq as usize],
            ),
            Piece::WhiteRook | Piece::BlackRook => xor_rays(
                &mut side,
                squares,
                sq,
                ATTACK_ROOK_RAYS & RAY_DIRS[sq as usize],
            ),
            Piece::WhiteBishopLight
            | Piece::WhiteBishopDark
            | Piece::BlackBishopLight
            | Piece::BlackBishopDark => {
                xor_rays(
                    &mut side,
                    squares,
                    sq,
                    ATTACK_BISHOP_RAYS & RAY_DIRS[sq as usize],
                );
                side.bishop_diagonals ^= bishop_diagonal_mask(sq);
            }
            Piece::WhiteKnight | Piece::BlackKnight => add_knight(&mut side, sq),
            Piece::WhitePawn | Piece::BlackPawn => {
                xor_pawn(&mut side, sq, color);
                if rank_of(sq) == color.pre_promotion_rank() {
                    side.last_rank_pawns |= 1 << file_of(sq);
                }
            }
        }
    }

    side
}

/// Compute the position hash and the pawn/king hash from scratch.
///
/// The position hash is complemented when Black is to move: every made move
/// complements it once, so ply parity is encoded in the hash value itself.
pub fn recalc_hashes(squares: &Squares, side_to_move: Color) -> (u64, u64) {
    let mut board_hash = 0u64;
    let mut pawn_king_hash = 0u64;

    for sq in 0..BOARD_SIZE as Square {
        if let Some(piece) = squares[sq as usize].piece {
            let key = piece_square_key(piece, sq);
            board_hash ^= key;
            if piece.in_pawn_king_hash() {
                pawn_king_hash ^= key;
            }
        }
    }

    if side_to_move == Color::Black {
        board_hash = !board_hash;
    }

    (board_hash, pawn_king_hash)
}

/// Sum the material weights of every piece on the board.
pub fn recalc_material_key(squares: &Squares) -> u64 {
    squares
        .iter()
        .filter_map(|cell| cell.piece)
        .fold(0u64, |key, piece| key.wrapping_add(material_key(piece)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_state::board_state::Board;
    use crate::tables::material_keys::material_counts;

    #[test]
    fn side_to_move_flips_hash_parity() {
        let board =
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let (white_hash, _) = recalc_hashes(&board.squares, Color::White);
        let (black_hash, _) = recalc_hashes(&board.squares, Color::Black);
        assert_eq!(white_hash, !black_hash);
    }

    #[test]
    fn recalc_matches_setup_state() {
        let board = Board::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let frame = board.current();

        let white = recalc_side(&board.squares, Color::White);
        assert_eq!(white.attacks, frame.active.attacks);
        assert_eq!(white.bishop_diagonals, frame.active.bishop_diagonals);
        assert_eq!(white.last_rank_pawns, 0);

        let (board_hash, pawn_king_hash) = recalc_hashes(&board.squares, Color::White);
        assert_eq!(board_hash, frame.board_hash);
        assert_eq!(pawn_king_hash, frame.pawn_king_hash);
    }

    #[test]
    fn material_counts_of_the_starting_position() {
        let board = Board::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let key = recalc_material_key(&board.squares);
        // 8 pawns, 2 knights, 1 bishop per square color, 2 rooks, and a
        // queen per side, each in its own nibble.
        assert_eq!(material_counts(key), 0x1211_2812_1128);
    }

    #[test]
    fn promotion_candidates_show_in_the_file_mask() {
        let board =
            Board::from_fen("4k3/P6P/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let white = recalc_side(&board.squares, Color::White);
        assert_eq!(white.last_rank_pawns, 0b1000_0001);
    }
}
