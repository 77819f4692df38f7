//! Core incremental board state representation.
//!
//! `Board` is the central model: the 64-cell square array plus a stack of
//! per-ply frames. Each frame carries both sides' attack state, the undo
//! record for the move that created it, and the incrementally maintained
//! hashes and material key. Make/unmake push and pop frames; nothing in
//! between ever rebuilds state from scratch.

use crate::attack::attack_recalc::{recalc_hashes, recalc_material_key, recalc_side};
use crate::board_state::board_errors::BoardStateError;
use crate::board_state::board_types::*;
use crate::board_state::undo_frame::UndoFrame;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// A fixed maximum ply depth that is large enough to never be reached.
pub const MAX_PLY: usize = 250;

/// Attack and piece bookkeeping for one side.
///
/// `pieces` maps list slots to squares: slot 0 is always the king, slots
/// 1..k hold all knights (in any order), and everything else follows. The
/// board cells store the inverse mapping. `color` is a constant tag so no
/// side-to-move flag has to be flipped on every make and unmake; the frame
/// swap does that implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideState {
    /// Attack details per square: ray direction bits, contact bits, and the
    /// knight counter.
    pub attacks: [AttackSet; BOARD_SIZE],

    /// Square of the piece in each list slot.
    pub pieces: [Square; MAX_SIDE_PIECES],
    pub piece_count: u8,

    pub color: Color,

    /// One bit per file holding a pawn a single step from promotion.
    pub last_rank_pawns: u8,

    /// Aggregate diagonal-color bits of this side's bishops.
    pub bishop_diagonals: u32,
}

impl SideState {
    pub fn new(color: Color) -> Self {
        Self {
            attacks: [0; BOARD_SIZE],
            pieces: [0; MAX_SIDE_PIECES],
            piece_count: 0,
            color,
            last_rank_pawns: 0,
            bishop_diagonals: 0,
        }
    }

    #[inline]
    pub fn king_square(&self) -> Square {
        self.pieces[0]
    }

    /// Append a square to the piece list, returning its slot.
    #[inline]
    pub fn push_piece(&mut self, square: Square) -> u8 {
        let slot = self.piece_count;
        debug_assert!((slot as usize) < MAX_SIDE_PIECES);
        self.pieces[slot as usize] = square;
        self.piece_count += 1;
        slot
    }
}

/// One ply of board history.
///
/// `active` is the side to move, `passive` the side that just moved; the
/// make driver swaps them when it pushes the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub active: SideState,
    pub passive: SideState,

    pub undo: UndoFrame,

    /// Halfmoves since the last pawn advance or capture.
    pub halfmove_clock: u8,

    /// Position hash. Complemented every ply, so ply parity lives in the
    /// hash itself instead of a separate side-to-move term.
    pub board_hash: u64,

    /// Secondary hash over pawns and kings only.
    pub pawn_king_hash: u64,

    /// Running sum of material weights for both sides.
    pub material_key: u64,
}

impl StackFrame {
    /// Record the current cell of `square` in this frame's undo list.
    #[inline]
    pub fn push_undo(&mut self, squares: &Squares, square: Square) {
        self.undo.push(squares, square);
    }
}

/// Chess board with incremental make/unmake state.
#[derive(Debug, Clone)]
pub struct Board {
    /// The board cells with pieces and piece-list back references.
    pub squares: Squares,

    /// Frame stack; the last element is the current position. Depth equals
    /// the ply count from the setup position.
    pub stack: Vec<StackFrame>,

    // Setup metadata carried for FEN round-trips. Castling and en-passant
    // move making live outside this subsystem, so nothing here maintains
    // these past setup.
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
    pub fullmove_number: u16,
}

impl Board {
    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, BoardStateError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn current(&self) -> &StackFrame {
        self.stack.last().expect("frame stack is never empty")
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut StackFrame {
        self.stack.last_mut().expect("frame stack is never empty")
    }

    /// Plies made since the setup position.
    #[inline]
    pub fn ply(&self) -> usize {
        self.stack.len() - 1
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        let frame = self.current();
        frame.passive.attacks[frame.active.king_square() as usize] != 0
    }

    /// Verify every incrementally maintained structure against the board.
    ///
    /// Checks the piece-list/board bijection, the king slot, the knight
    /// prefix, and recomputes attack tables, file masks, diagonal masks,
    /// both hashes, and the material key from scratch. Used as the oracle
    /// in tests and for debugging; a failure means the incremental updates
    /// have drifted and the position is unrecoverable.
    pub fn check_consistency(&self) -> Result<(), BoardStateError> {
        let frame = self.current();

        for side in [&frame.active, &frame.passive] {
            self.check_piece_list(side)?;

            let fresh = recalc_side(&self.squares, side.color);
            for sq in 0..BOARD_SIZE {
                if side.attacks[sq] != fresh.attacks[sq] {
                    return Err(BoardStateError::AttackTableDrift {
                        color: side.color,
                        square: sq as Square,
                        stored: side.attacks[sq],
                        recomputed: fresh.attacks[sq],
                    });
                }
            }
            if side.last_rank_pawns != fresh.last_rank_pawns {
                return Err(BoardStateError::LastRankPawnsDrift {
                    color: side.color,
                    stored: side.last_rank_pawns,
                    recomputed: fresh.last_rank_pawns,
                });
            }
            if side.bishop_diagonals != fresh.bishop_diagonals {
                return Err(BoardStateError::BishopDiagonalsDrift {
                    color: side.color,
                    stored: side.bishop_diagonals,
                    recomputed: fresh.bishop_diagonals,
                });
            }
        }

        let (board_hash, pawn_king_hash) = recalc_hashes(&self.squares, frame.active.color);
        if frame.board_hash != board_hash {
            return Err(BoardStateError::BoardHashDrift {
                stored: frame.board_hash,
                recomputed: board_hash,
            });
        }
        if frame.pawn_king_hash != pawn_king_hash {
            return Err(BoardStateError::PawnKingHashDrift {
                stored: frame.pawn_king_hash,
                recomputed: pawn_king_hash,
            });
        }

        let material_key = recalc_material_key(&self.squares);
        if frame.material_key != material_key {
            return Err(BoardStateError::MaterialKeyDrift {
                stored: frame.material_key,
                recomputed: material_key,
            });
        }

        Ok(())
    }

    fn check_piece_list(&self, side: &SideState) -> Result<(), BoardStateError> {
        let count = side.piece_count as usize;

        // Every listed square must point back at its slot.
        for slot in 0..count {
            let sq = side.pieces[slot];
            let cell = self.squares[sq as usize];
            let listed_ok = match cell.piece {
                Some(piece) => piece.color() == side.color && cell.index as usize == slot,
                None => false,
            };
            if !listed_ok {
                return Err(BoardStateError::PieceListDesync {
                    square: sq,
                    slot: slot as u8,
                });
            }
        }

        // Slot 0 holds the king.
        let king_ok = count > 0
            && self.squares[side.pieces[0] as usize]
                .piece
                .is_some_and(|piece| piece.is_king());
        if !king_ok {
            return Err(BoardStateError::MissingKing(side.color));
        }

        // Knights form a contiguous block right after the king.
        let mut next_knight = 1;
        for slot in 1..count {
            let sq = side.pieces[slot];
            let is_knight = self.squares[sq as usize]
                .piece
                .is_some_and(|piece| piece.is_knight());
            if is_knight {
                if slot != next_knight {
                    return Err(BoardStateError::KnightPrefixBroken {
                        color: side.color,
                        slot: slot as u8,
                    });
                }
                next_knight += 1;
            }
        }

        // The census must match: together with the back-reference check this
        // makes the list and the board a bijection.
        let on_board = self
            .squares
            .iter()
            .filter(|cell| cell.piece.is_some_and(|piece| piece.color() == side.color))
            .count();
        if on_board != count {
            return Err(BoardStateError::PieceCountMismatch {
                color: side.color,
                listed: count as u8,
                on_board: on_board as u8,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_setup_is_consistent() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .expect("FEN should parse");
        board.check_consistency().expect("setup should be consistent");
        assert_eq!(board.ply(), 0);
        assert!(!board.in_check());
    }

    #[test]
    fn consistency_check_catches_attack_drift() {
        let mut board =
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        board.current_mut().active.attacks[0] ^= ATTACK_NORTH;
        assert!(matches!(
            board.check_consistency(),
            Err(BoardStateError::AttackTableDrift { .. })
        ));
    }

    #[test]
    fn consistency_check_catches_hash_drift() {
        let mut board =
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        board.current_mut().board_hash ^= 1;
        assert!(matches!(
            board.check_consistency(),
            Err(BoardStateError::BoardHashDrift { .. })
        ));
    }

    #[test]
    fn knight_prefix_is_validated() {
        // Knights must directly follow the king in the piece list; build a
        // position and corrupt the list order by swapping a knight with a
        // rook behind it.
        let mut board =
            Board::from_fen("4k3/8/8/8/8/8/8/NR2K3 w - - 0 1").expect("FEN should parse");
        let frame = board.stack.last().expect("frame stack is never empty");
        let knight_sq = frame.active.pieces[1];
        let rook_sq = frame.active.pieces[2];

        let frame = board.stack.last_mut().expect("frame stack is never empty");
        frame.active.pieces[1] = rook_sq;
        frame.active.pieces[2] = knight_sq;
        board.squares[knight_sq as usize].index = 2;
        board.squares[rook_sq as usize].index = 1;

        assert!(matches!(
            board.check_consistency(),
            Err(BoardStateError::KnightPrefixBroken { .. })
        ));
    }
}
