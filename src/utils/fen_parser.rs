//! FEN-to-Board parser.
//!
//! Builds fully-populated incremental state from a Forsyth-Edwards Notation
//! string: board cells, per-side piece lists (king first, knights directly
//! behind it), attack tables, promotion file masks, bishop diagonal
//! aggregates, both hashes, and the material key.

use crate::attack::attack_recalc::{recalc_hashes, recalc_material_key, recalc_side};
use crate::board_state::board_errors::BoardStateError;
use crate::board_state::board_state::{Board, SideState, StackFrame, MAX_PLY};
use crate::board_state::board_types::*;
use crate::board_state::undo_frame::UndoFrame;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<Board, BoardStateError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| BoardStateError::InvalidFen("Missing board layout in FEN".to_owned()))?;
    let side_part = parts
        .next()
        .ok_or_else(|| BoardStateError::InvalidFen("Missing side-to-move in FEN".to_owned()))?;
    let castling_part = parts.next().ok_or_else(|| {
        BoardStateError::InvalidFen("Missing castling rights in FEN".to_owned())
    })?;
    let en_passant_part = parts.next().ok_or_else(|| {
        BoardStateError::InvalidFen("Missing en-passant square in FEN".to_owned())
    })?;
    let halfmove_part = parts
        .next()
        .ok_or_else(|| BoardStateError::InvalidFen("Missing halfmove clock in FEN".to_owned()))?;
    let fullmove_part = parts
        .next()
        .ok_or_else(|| BoardStateError::InvalidFen("Missing fullmove number in FEN".to_owned()))?;

    if parts.next().is_some() {
        return Err(BoardStateError::InvalidFen(
            "FEN has extra trailing fields".to_owned(),
        ));
    }

    let squares = parse_board(board_part)?;
    let side_to_move = parse_side_to_move(side_part)?;
    let castling_rights = parse_castling_rights(castling_part)?;
    let en_passant_square = parse_en_passant_square(en_passant_part)?;

    let halfmove_clock = halfmove_part.parse::<u8>().map_err(|_| {
        BoardStateError::InvalidFen(format!("Invalid halfmove clock: {halfmove_part}"))
    })?;
    let fullmove_number = fullmove_part.parse::<u16>().map_err(|_| {
        BoardStateError::InvalidFen(format!("Invalid fullmove number: {fullmove_part}"))
    })?;

    let mut white = recalc_side(&squares, Color::White);
    let mut black = recalc_side(&squares, Color::Black);
    let mut squares = squares;
    build_piece_list(&mut squares, &mut white)?;
    build_piece_list(&mut squares, &mut black)?;

    let (board_hash, pawn_king_hash) = recalc_hashes(&squares, side_to_move);
    let material_key = recalc_material_key(&squares);

    let (active, passive) = match side_to_move {
        Color::White => (white, black),
        Color::Black => (black, white),
    };

    let mut stack = Vec::with_capacity(MAX_PLY + 1);
    stack.push(StackFrame {
        active,
        passive,
        undo: UndoFrame::default(),
        halfmove_clock,
        board_hash,
        pawn_king_hash,
        material_key,
    });

    Ok(Board {
        squares,
        stack,
        castling_rights,
        en_passant_square,
        fullmove_number,
    })
}

fn parse_board(board_part: &str) -> Result<Squares, BoardStateError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(BoardStateError::InvalidFen(
            "Board layout must contain 8 ranks".to_owned(),
        ));
    }

    let mut squares = [SquareCell::EMPTY; BOARD_SIZE];

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(BoardStateError::InvalidFen(format!(
                        "Invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
                continue;
            }

            if file > 7 {
                return Err(BoardStateError::InvalidFen(format!(
                    "Rank has more than 8 squares: {rank_str}"
                )));
            }

            let square = square_at(file, rank);
            let piece = Piece::from_fen_char(ch, square).ok_or_else(|| {
                BoardStateError::InvalidFen(format!("Invalid piece character '{ch}'"))
            })?;
            squares[square as usize] = SquareCell {
                piece: Some(piece),
                index: 0,
            };
            file += 1;
        }

        if file != 8 {
            return Err(BoardStateError::InvalidFen(format!(
                "Rank does not cover 8 squares: {rank_str}"
            )));
        }
    }

    Ok(squares)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, BoardStateError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(BoardStateError::InvalidFen(format!(
            "Invalid side-to-move: {other}"
        ))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, BoardStateError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            other => {
                return Err(BoardStateError::InvalidFen(format!(
                    "Invalid castling character '{other}'"
                )))
            }
        };
    }
    Ok(rights)
}

fn parse_en_passant_square(
    en_passant_part: &str,
) -> Result<Option<Square>, BoardStateError> {
    if en_passant_part == "-" {
        Ok(None)
    } else {
        Ok(Some(algebraic_to_square(en_passant_part)?))
    }
}

/// Fill a side's piece list from the board. The king takes slot 0 and all
/// knights follow it directly, which is what the knight bookkeeping in move
/// making maintains from then on.
fn build_piece_list(
    squares: &mut Squares,
    side: &mut SideState,
) -> Result<(), BoardStateError> {
    let color = side.color;

    let mut king_square = None;
    for sq in 0..BOARD_SIZE as Square {
        let piece = match squares[sq as usize].piece {
            Some(piece) if piece.color() == color => piece,
            _ => continue,
        };
        if piece.is_king() {
            if king_square.is_some() {
                return Err(BoardStateError::InvalidFen(format!(
                    "More than one {color:?} king"
                )));
            }
            king_square = Some(sq);
        }
    }
    let king_square = king_square.ok_or(BoardStateError::MissingKing(color))?;

    squares[king_square as usize].index = side.push_piece(king_square);

    for knights_pass in [true, false] {
        for sq in 0..BOARD_SIZE as Square {
            let piece = match squares[sq as usize].piece {
                Some(piece) if piece.color() == color => piece,
                _ => continue,
            };
            if piece.is_king() || piece.is_knight() != knights_pass {
                continue;
            }
            if side.piece_count as usize == MAX_SIDE_PIECES {
                return Err(BoardStateError::InvalidFen(format!(
                    "More than {MAX_SIDE_PIECES} {color:?} pieces"
                )));
            }
            squares[sq as usize].index = side.push_piece(sq);
        }
    }

    Ok(())
}
