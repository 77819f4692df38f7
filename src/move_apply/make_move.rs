//! Move staging and the make/unmake drivers.
//!
//! `make_move` owns the per-ply frame discipline: it pushes the next frame
//! with the two sides swapped, stages preliminary undo records, and hands
//! control to the move's maker. Makers never return anything; everything
//! needed to reverse them lands in the frame's undo record, and `unmake_move`
//! restores cells from it and pops the frame. Make and unmake must nest
//! strictly: unmake always reverses the most recent make.

use crate::board_state::board_state::{Board, StackFrame, MAX_PLY};
use crate::board_state::board_types::*;
use crate::board_state::undo_frame::UndoFrame;
use crate::move_apply::promotion_moves::apply_promotion;

/// Destination encodings for promotion moves, one per target piece.
///
/// A promotion's to-square is XORed with its target's constant when the move
/// is built, which makes the four promotions on a file distinguishable from
/// each other and from every other move in 12 bits of from/to. The values
/// map the back ranks onto squares a pawn on the seventh (or second) rank
/// could never reach, so an encoded move can't collide with a real one.
pub const XOR_PROMOTE_QUEEN: Square = square_at(4, 0);
pub const XOR_PROMOTE_ROOK: Square = square_at(4, 2);
pub const XOR_PROMOTE_BISHOP: Square = square_at(4, 3);
pub const XOR_PROMOTE_KNIGHT: Square = square_at(4, 7);

/// Piece a pawn can promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionTarget {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionTarget {
    /// XOR constant carried by this target's encoded destinations.
    #[inline]
    pub const fn encode_mask(self) -> Square {
        match self {
            PromotionTarget::Queen => XOR_PROMOTE_QUEEN,
            PromotionTarget::Rook => XOR_PROMOTE_ROOK,
            PromotionTarget::Bishop => XOR_PROMOTE_BISHOP,
            PromotionTarget::Knight => XOR_PROMOTE_KNIGHT,
        }
    }

    /// Ray directions the promoted piece projects; empty for knights.
    #[inline]
    pub const fn base_rays(self) -> AttackSet {
        match self {
            PromotionTarget::Queen => ATTACK_QUEEN_RAYS,
            PromotionTarget::Rook => ATTACK_ROOK_RAYS,
            PromotionTarget::Bishop => ATTACK_BISHOP_RAYS,
            PromotionTarget::Knight => 0,
        }
    }

    /// The piece this target produces on `to` for the given color.
    #[inline]
    pub const fn piece_for(self, color: Color, to: Square) -> Piece {
        match (self, color) {
            (PromotionTarget::Queen, Color::White) => Piece::WhiteQueen,
            (PromotionTarget::Queen, Color::Black) => Piece::BlackQueen,
            (PromotionTarget::Rook, Color::White) => Piece::WhiteRook,
            (PromotionTarget::Rook, Color::Black) => Piece::BlackRook,
            (PromotionTarget::Knight, Color::White) => Piece::WhiteKnight,
            (PromotionTarget::Knight, Color::Black) => Piece::BlackKnight,
            (PromotionTarget::Bishop, Color::White) => {
                if is_light_square(to) {
                    Piece::WhiteBishopLight
                } else {
                    Piece::WhiteBishopDark
                }
            }
            (PromotionTarget::Bishop, Color::Black) => {
                if is_light_square(to) {
                    Piece::BlackBishopLight
                } else {
                    Piece::BlackBishopDark
                }
            }
        }
    }
}

/// Maker tag dispatched on by `make_move`, a closed set in place of
/// per-move function pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMaker {
    Promote(PromotionTarget),
}

/// A stageable move. `to` carries the maker's destination encoding; the
/// maker removes it before touching the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub maker: MoveMaker,
}

/// Build a promotion move from its real destination square.
#[inline]
pub fn promotion_move(from: Square, to: Square, target: PromotionTarget) -> Move {
    Move {
        from,
        to: to ^ target.encode_mask(),
        maker: MoveMaker::Promote(target),
    }
}

/// Make any staged move.
pub fn make_move(board: &mut Board, mv: &Move) {
    debug_assert!(board.ply() < MAX_PLY);

    let previous = board.current();

    // The next frame swaps the two sides and inherits the keys the maker
    // adjusts incrementally. The position hash is the maker's to write.
    let mut frame = StackFrame {
        active: previous.passive.clone(),
        passive: previous.active.clone(),
        undo: UndoFrame::default(),
        halfmove_clock: 0,
        board_hash: 0,
        pawn_king_hash: previous.pawn_king_hash,
        material_key: previous.material_key,
    };

    // Preliminary undo records. For promotions the to-square is still
    // encoded here; the handler repairs the record once it has decoded the
    // real destination.
    frame.push_undo(&board.squares, mv.from);
    frame.push_undo(&board.squares, mv.to);

    board.stack.push(frame);

    match mv.maker {
        MoveMaker::Promote(target) => apply_promotion(board, mv.from, mv.to, target),
    }

    // The mover must not leave its own king attacked.
    debug_assert_eq!(
        {
            let frame = board.current();
            frame.active.attacks[frame.passive.king_square() as usize]
        },
        0
    );
}

/// Undo the most recently made move.
pub fn unmake_move(board: &mut Board) {
    let frame = board.stack.pop().expect("frame stack is never empty");
    debug_assert!(!board.stack.is_empty(), "cannot unmake past the setup frame");
    debug_assert!(frame.undo.len >= 2);

    for entry in frame.undo.entries() {
        board.squares[entry.square as usize] = entry.cell;
    }
}

/// Make the null move: pass the turn without touching a piece.
pub fn make_null_move(board: &mut Board) {
    debug_assert!(board.ply() < MAX_PLY);

    let previous = board.current();
    let frame = StackFrame {
        active: previous.passive.clone(),
        passive: previous.active.clone(),
        undo: UndoFrame::default(),
        // Reversible for one ply only; resetting to zero would make the
        // null move look like a conversion.
        halfmove_clock: 1,
        board_hash: !previous.board_hash,
        pawn_king_hash: previous.pawn_king_hash,
        material_key: previous.material_key,
    };
    board.stack.push(frame);
}

/// Undo the null move.
pub fn unmake_null_move(board: &mut Board) {
    let frame = board.stack.pop().expect("frame stack is never empty");
    debug_assert!(!board.stack.is_empty(), "cannot unmake past the setup frame");
    debug_assert_eq!(frame.undo.len, 0);
}
