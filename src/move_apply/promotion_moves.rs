//! Move making for pawn promotion.
//!
//! Promotion is the one move that changes piece identity, attack geometry,
//! material, and history bookkeeping in a single step. One handler covers
//! all four target pieces for both colors; the color comes from the frame
//! (the promoting side is `passive`, having just moved) and the target
//! carries its own destination-encoding mask and base attack shape.
//!
//! The driver stages the move before dispatching here: it has already pushed
//! the new frame and recorded preliminary undo entries using the still
//! XOR-encoded destination. This handler first decodes the real destination
//! and repairs that record, then walks one straight line to completion:
//! hashes, destination occupation (with capture dispatch when the pawn moved
//! diagonally), piece list, origin clearing, promotion stamp. No step ever
//! branches back, so callers observe the promotion atomically.

use crate::board_state::board_state::Board;
use crate::board_state::board_types::*;
use crate::board_state::undo_frame::{UndoEntry, UNDO_TO};
use crate::move_apply::capture_taking::take_piece;
use crate::move_apply::make_move::PromotionTarget;
use crate::attack::attack_board::{add_knight, xor_pawn, xor_rays};
use crate::tables::geometry_tables::{bishop_diagonal_mask, RAY_DIRS};
use crate::tables::material_keys::material_key;
use crate::tables::zobrist_keys::piece_square_key;

/// Apply one promotion. `to` is still carrying the target's encoding mask;
/// `from` must sit on the promotion-adjacent rank for the moving color.
pub fn apply_promotion(board: &mut Board, from: Square, to: Square, target: PromotionTarget) {
    let Board { squares, stack, .. } = board;

    let ply = stack.len();
    debug_assert!(ply >= 2, "a move must have been staged");
    let previous_hash = stack[ply - 2].board_hash;
    let frame = &mut stack[ply - 1];

    let color = frame.passive.color;
    assert_eq!(rank_of(from), color.pre_promotion_rank());

    // Recover the true destination and repair the undo record the staging
    // wrote with the encoded square.
    let to = to ^ target.encode_mask();
    frame.undo.entries[UNDO_TO] = UndoEntry {
        square: to,
        cell: squares[to as usize],
    };

    let pawn = Piece::pawn_of(color);
    let new_piece = target.piece_for(color, to);

    // Hashes and material: the pawn's key leaves both hashes at the origin,
    // the new piece's key enters the position hash at the destination.
    frame.board_hash = !previous_hash
        ^ piece_square_key(pawn, from)
        ^ piece_square_key(new_piece, to);

    frame.pawn_king_hash ^= piece_square_key(pawn, from);

    frame.material_key = frame
        .material_key
        .wrapping_add(material_key(new_piece))
        .wrapping_sub(material_key(pawn));

    // Occupy the destination.
    if file_of(to) == file_of(from) {
        // Straight push onto an empty square. Own rays already passing
        // through the destination cancel against the new piece's rays
        // beyond it, so only the difference needs flipping; the opponent's
        // through-rays are cut at the now-occupied square.
        let rays = (frame.passive.attacks[to as usize] ^ target.base_rays())
            & RAY_DIRS[to as usize];
        if rays != 0 {
            xor_rays(&mut frame.passive, squares, to, rays);
        }

        let rays = frame.active.attacks[to as usize] & RAY_DIRS[to as usize];
        if rays != 0 {
            xor_rays(&mut frame.active, squares, to, rays);
        }
    } else {
        // Diagonal capture: strip the captured piece first, then radiate the
        // new piece's full shape from an already-occupied square.
        take_piece(squares, frame, to);

        let rays = target.base_rays() & RAY_DIRS[to as usize];
        if rays != 0 {
            xor_rays(&mut frame.passive, squares, to, rays);
        }
    }

    if target == PromotionTarget::Knight {
        add_knight(&mut frame.passive, to);
    }

    // Reassign the pawn's list slot to the promoted piece.
    let index = squares[from as usize].index;
    frame.passive.pieces[index as usize] = to;

    if target == PromotionTarget::Bishop {
        frame.passive.bishop_diagonals ^= bishop_diagonal_mask(to);
    }

    squares[to as usize] = SquareCell {
        piece: Some(new_piece),
        index,
    };

    // A new knight must join the knight block behind the king. At most one
    // non-knight can sit before the new knight's slot; swap the two and the
    // prefix is closed again.
    if target == PromotionTarget::Knight {
        for slot in 1..index {
            let other_sq = frame.passive.pieces[slot as usize];
            let other_is_knight = squares[other_sq as usize]
                .piece
                .is_some_and(Piece::is_knight);
            if other_is_knight {
                continue;
            }

            debug_assert!(
                (slot + 1..index).all(|later| {
                    let sq = frame.passive.pieces[later as usize];
                    !squares[sq as usize].piece.is_some_and(Piece::is_knight)
                }),
                "knights must already be contiguous before the new slot"
            );

            frame.push_undo(squares, other_sq);

            squares[to as usize].index = slot;
            squares[other_sq as usize].index = index;

            frame.passive.pieces[slot as usize] = to;
            frame.passive.pieces[index as usize] = other_sq;
            break;
        }
    }

    // Clear the origin: rays blocked by the pawn extend on both sides, the
    // pawn's own contacts and its candidate file bit disappear.
    let rays = frame.passive.attacks[from as usize] & RAY_DIRS[from as usize];
    if rays != 0 {
        xor_rays(&mut frame.passive, squares, from, rays);
    }

    let rays = frame.active.attacks[from as usize] & RAY_DIRS[from as usize];
    if rays != 0 {
        xor_rays(&mut frame.active, squares, from, rays);
    }

    xor_pawn(&mut frame.passive, from, color);

    frame.passive.last_rank_pawns ^= 1 << file_of(from);

    squares[from as usize] = SquareCell::EMPTY;

    // Stamp the result for later move reconstruction. Everything else about
    // the move can already be read back from the undo entries; only the
    // chosen piece would be lost, and only promotions pay to record it.
    debug_assert!(frame.undo.promotion.is_none());
    frame.undo.promotion = Some(new_piece);
}
