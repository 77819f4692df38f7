//! Reconstruction of the last move from the undo log.
//!
//! The hot path never stores move objects: everything needed to describe a
//! made move is already sitting in the frame's undo record. The from- and
//! to-entries name the squares and the pieces that stood there, and the
//! promotion stamp supplies the one fact the entries cannot: which piece a
//! promoting pawn turned into.

use crate::board_state::board_state::Board;
use crate::board_state::board_types::{Piece, Square};
use crate::board_state::undo_frame::{UNDO_FROM, UNDO_TO};

/// A move read back out of the undo log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInfo {
    pub from: Square,
    pub to: Square,
    /// Piece that moved, as it stood on the from-square.
    pub moved: Piece,
    /// Prior occupant of the destination, if any.
    pub captured: Option<Piece>,
    /// Piece a promotion produced, `None` for every other move.
    pub promotion: Option<Piece>,
}

/// Describe the move that produced the current frame. Returns `None` at the
/// setup position and after a null move, which leave no undo entries.
pub fn last_move_info(board: &Board) -> Option<MoveInfo> {
    let frame = board.current();
    if frame.undo.len < 2 {
        return None;
    }

    let from_entry = frame.undo.entries[UNDO_FROM];
    let to_entry = frame.undo.entries[UNDO_TO];
    let moved = from_entry.cell.piece?;

    Some(MoveInfo {
        from: from_entry.square,
        to: to_entry.square,
        moved,
        captured: to_entry.cell.piece,
        promotion: frame.undo.promotion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_state::board_state::Board;
    use crate::move_apply::make_move::{
        make_move, make_null_move, promotion_move, PromotionTarget,
    };
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn setup_position_has_no_last_move() {
        let board =
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(last_move_info(&board), None);
    }

    #[test]
    fn null_move_has_no_last_move() {
        let mut board =
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        make_null_move(&mut board);
        assert_eq!(last_move_info(&board), None);
    }

    #[test]
    fn promotion_reconstructs_with_its_target() {
        let mut board =
            Board::from_fen("4k3/2P5/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mv = promotion_move(sq("c7"), sq("c8"), PromotionTarget::Knight);
        make_move(&mut board, &mv);

        let info = last_move_info(&board).expect("a move was made");
        assert_eq!(info.from, sq("c7"));
        assert_eq!(info.to, sq("c8"));
        assert_eq!(info.moved, Piece::WhitePawn);
        assert_eq!(info.captured, None);
        assert_eq!(info.promotion, Some(Piece::WhiteKnight));
    }

    #[test]
    fn capturing_promotion_names_the_victim() {
        let mut board =
            Board::from_fen("3rk3/2P5/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mv = promotion_move(sq("c7"), sq("d8"), PromotionTarget::Queen);
        make_move(&mut board, &mv);

        let info = last_move_info(&board).expect("a move was made");
        assert_eq!(info.to, sq("d8"));
        assert_eq!(info.captured, Some(Piece::BlackRook));
        assert_eq!(info.promotion, Some(Piece::WhiteQueen));
    }
}
