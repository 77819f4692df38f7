//! Removal of captured pieces from the attack board and piece list.
//!
//! `take_piece` is the capture dispatcher: given an occupied destination it
//! strips the occupant's hash, material, attack, and piece-list footprint
//! from the side that owns it. The destination cell itself is left in place;
//! the calling move maker overwrites it. Dispatch is a total match over the
//! occupant type so a missing case cannot slip through.

use crate::attack::attack_board::{sub_knight, xor_pawn, xor_rays};
use crate::board_state::board_state::StackFrame;
use crate::board_state::board_types::*;
use crate::tables::geometry_tables::{bishop_diagonal_mask, RAY_DIRS};
use crate::tables::material_keys::material_key;
use crate::tables::zobrist_keys::piece_square_key;

/// Remove the piece on `square` from the capturing position's bookkeeping.
/// The occupant must belong to `frame.active` (the side to move next); a
/// king here means the caller let an illegal move through, which is fatal.
pub fn take_piece(squares: &mut Squares, frame: &mut StackFrame, square: Square) {
    let piece = squares[square as usize]
        .piece
        .expect("capture dispatch needs an occupied square");
    debug_assert_eq!(piece.color(), frame.active.color);

    match piece {
        Piece::WhiteQueen | Piece::BlackQueen => take_queen(squares, frame, square, piece),
        Piece::WhiteRook | Piece::BlackRook => take_rook(squares, frame, square, piece),
        Piece::WhiteBishopLight
        | Piece::WhiteBishopDark
        | Piece::BlackBishopLight
        | Piece::BlackBishopDark => take_bishop(squares, frame, square, piece),
        Piece::WhiteKnight | Piece::BlackKnight => take_knight(squares, frame, square, piece),
        Piece::WhitePawn | Piece::BlackPawn => take_pawn(squares, frame, square, piece),
        Piece::WhiteKing | Piece::BlackKing => {
            unreachable!("king capture must be rejected upstream")
        }
    }
}

fn take_queen(squares: &mut Squares, frame: &mut StackFrame, square: Square, piece: Piece) {
    frame.board_hash ^= piece_square_key(piece, square);
    frame.material_key = frame.material_key.wrapping_sub(material_key(piece));

    xor_rays(
        &mut frame.active,
        squares,
        square,
        RAY_DIRS[square as usize] & ATTACK_QUEEN_RAYS,
    );
    remove_from_piece_list(squares, frame, square);
}

fn take_rook(squares: &mut Squares, frame: &mut StackFrame, square: Square, piece: Piece) {
    frame.board_hash ^= piece_square_key(piece, square);
    frame.material_key = frame.material_key.wrapping_sub(material_key(piece));

    xor_rays(
        &mut frame.active,
        squares,
        square,
        RAY_DIRS[square as usize] & ATTACK_ROOK_RAYS,
    );
    remove_from_piece_list(squares, frame, square);
}

fn take_bishop(squares: &mut Squares, frame: &mut StackFrame, square: Square, piece: Piece) {
    frame.board_hash ^= piece_square_key(piece, square);
    frame.material_key = frame.material_key.wrapping_sub(material_key(piece));

    xor_rays(
        &mut frame.active,
        squares,
        square,
        RAY_DIRS[square as usize] & ATTACK_BISHOP_RAYS,
    );
    remove_from_piece_list(squares, frame, square);

    frame.active.bishop_diagonals ^= bishop_diagonal_mask(square);
}

/// Knights need extra care: the piece list keeps all knights directly behind
/// the king, so a knight leaving the middle of that block is first swapped
/// with the last knight, and only then is the gap compacted as usual.
fn take_knight(squares: &mut Squares, frame: &mut StackFrame, square: Square, piece: Piece) {
    frame.board_hash ^= piece_square_key(piece, square);
    frame.material_key = frame.material_key.wrapping_sub(material_key(piece));

    sub_knight(&mut frame.active, square);

    let last_piece = frame.active.piece_count as usize - 1;
    debug_assert!((1..MAX_SIDE_PIECES).contains(&last_piece));

    let other = frame.active.pieces[last_piece];
    frame.push_undo(squares, other);

    let mut index = squares[square as usize].index as usize;
    debug_assert!(index <= last_piece);

    let mut last_knight = index;
    while last_knight < last_piece {
        let next_sq = frame.active.pieces[last_knight + 1];
        let next_is_knight = squares[next_sq as usize]
            .piece
            .is_some_and(Piece::is_knight);
        if !next_is_knight {
            break;
        }
        last_knight += 1;
    }

    if index < last_knight && last_knight < last_piece {
        let square_a = frame.active.pieces[index];
        let square_b = frame.active.pieces[last_knight];

        frame.push_undo(squares, square_b);

        squares[square_a as usize].index = last_knight as u8;
        squares[square_b as usize].index = index as u8;

        frame.active.pieces[last_knight] = square_a;
        frame.active.pieces[index] = square_b;

        index = last_knight;
    }

    // Index now points at the last knight, so the normal compaction is safe.
    squares[other as usize].index = index as u8;
    frame.active.pieces[index] = other;

    frame.active.pieces[last_piece] = 0;
    frame.active.piece_count = last_piece as u8;
}

fn take_pawn(squares: &mut Squares, frame: &mut StackFrame, square: Square, piece: Piece) {
    let color = piece.color();

    frame.board_hash ^= piece_square_key(piece, square);
    frame.pawn_king_hash ^= piece_square_key(piece, square);
    frame.material_key = frame.material_key.wrapping_sub(material_key(piece));

    xor_pawn(&mut frame.active, square, color);

    // A pawn one step from promotion also leaves the candidate file mask.
    if rank_of(square) == color.pre_promotion_rank() {
        frame.active.last_rank_pawns ^= 1 << file_of(square);
    }

    remove_from_piece_list(squares, frame, square);
}

/// Close the gap the captured piece leaves: its slot is taken over by the
/// last listed piece. The relocated piece's cell is recorded for unmake.
fn remove_from_piece_list(squares: &mut Squares, frame: &mut StackFrame, square: Square) {
    let last_piece = frame.active.piece_count as usize - 1;
    debug_assert!((1..MAX_SIDE_PIECES).contains(&last_piece));

    let other = frame.active.pieces[last_piece];
    frame.push_undo(squares, other);

    let index = squares[square as usize].index;
    debug_assert!((index as usize) <= last_piece);

    squares[other as usize].index = index;
    frame.active.pieces[index as usize] = other;

    frame.active.pieces[last_piece] = 0;
    frame.active.piece_count = last_piece as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_state::board_state::Board;
    use crate::board_state::board_types::SquareCell;
    use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

    /// Run the dispatcher the way a capturing move maker would: take the
    /// piece, then overwrite the destination cell (here: clear it outright).
    /// The occupant must belong to the side to move, so the FENs below give
    /// the move to the side losing the piece; removal keeps the hash chain
    /// consistent, which lets the full consistency oracle run afterwards.
    fn take_and_clear(board: &mut Board, square_name: &str) {
        let square = algebraic_to_square(square_name).expect("square should parse");
        let Board { squares, stack, .. } = board;
        let frame = stack.last_mut().expect("frame stack is never empty");

        take_piece(squares, frame, square);
        squares[square as usize] = SquareCell::EMPTY;
    }

    #[test]
    fn taking_a_rook_clears_its_rays_and_slot() {
        let mut board =
            Board::from_fen("4k3/8/8/8/3r4/8/8/4K3 b - - 0 1").expect("FEN should parse");
        take_and_clear(&mut board, "d4");

        board
            .check_consistency()
            .expect("rook removal should leave a consistent position");
        assert_eq!(board.current().active.piece_count, 1);
    }

    #[test]
    fn taking_a_bishop_updates_the_diagonal_mask() {
        let mut board =
            Board::from_fen("4k3/8/8/8/3b4/8/8/4K3 b - - 0 1").expect("FEN should parse");
        assert_ne!(board.current().active.bishop_diagonals, 0);

        take_and_clear(&mut board, "d4");
        assert_eq!(board.current().active.bishop_diagonals, 0);
        board
            .check_consistency()
            .expect("bishop removal should leave a consistent position");
    }

    #[test]
    fn taking_a_middle_knight_keeps_the_prefix_closed() {
        // Black list order from setup: king, knights b4/d4/f4, then the rook.
        // Removing the first-listed knight must swap the last knight forward
        // before compaction; afterwards knights still sit in slots 1..=2.
        let mut board =
            Board::from_fen("4k3/8/8/r7/1n1n1n2/8/8/4K3 b - - 0 1").expect("FEN should parse");

        let first_knight = board.current().active.pieces[1];
        let name = square_to_algebraic(first_knight).expect("square should format");
        take_and_clear(&mut board, &name);

        board
            .check_consistency()
            .expect("knight removal should leave a consistent position");
        assert_eq!(board.current().active.piece_count, 4);
    }

    #[test]
    fn taking_a_promotion_candidate_pawn_clears_its_file_bit() {
        let mut board =
            Board::from_fen("4k3/8/8/8/8/8/2p5/4K3 b - - 0 1").expect("FEN should parse");
        assert_eq!(board.current().active.last_rank_pawns, 0b0000_0100);

        take_and_clear(&mut board, "c2");
        assert_eq!(board.current().active.last_rank_pawns, 0);
        board
            .check_consistency()
            .expect("pawn removal should leave a consistent position");
    }

    #[test]
    fn taking_a_queen_removes_material_weight() {
        use crate::tables::material_keys::{material_counts, material_key};

        let mut board =
            Board::from_fen("4k3/8/8/8/3q4/8/8/4K3 b - - 0 1").expect("FEN should parse");
        let before = board.current().material_key;

        take_and_clear(&mut board, "d4");
        let after = board.current().material_key;
        assert_eq!(before.wrapping_sub(after), material_key(Piece::BlackQueen));
        assert_eq!(material_counts(after), 0);
    }
}
