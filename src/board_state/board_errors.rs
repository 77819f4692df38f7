//! Errors used throughout the board core.
//!
//! This module defines the canonical error type returned by position setup
//! and by the consistency checker. Parsing variants are recoverable and
//! suitable for presenting to callers; the drift/desync variants indicate
//! that an incremental structure no longer matches the board and are not
//! intended to be recovered from.

use crate::board_state::board_types::{AttackSet, Color, Square};

/// Unified error type for the board core.
#[derive(Debug)]
pub enum BoardStateError {
    /// A FEN string (or one of its fields) failed to parse.
    ///
    /// Payload: a description of the offending field or character.
    InvalidFen(String),

    /// Setup found no king (or more than one) for the given side.
    MissingKing(Color),

    /// A piece-list slot and its board cell disagree.
    ///
    /// Payload: the square and the list slot that should reference it.
    PieceListDesync { square: Square, slot: u8 },

    /// The piece list and the board disagree on how many pieces a side has.
    PieceCountMismatch { color: Color, listed: u8, on_board: u8 },

    /// A knight was found outside the contiguous block following the king.
    KnightPrefixBroken { color: Color, slot: u8 },

    /// A stored attack mask differs from a fresh ray-cast.
    AttackTableDrift {
        color: Color,
        square: Square,
        stored: AttackSet,
        recomputed: AttackSet,
    },

    /// The promotion-candidate file mask differs from the board.
    LastRankPawnsDrift { color: Color, stored: u8, recomputed: u8 },

    /// The bishop diagonal aggregate differs from the board.
    BishopDiagonalsDrift { color: Color, stored: u32, recomputed: u32 },

    /// The incremental board hash differs from a full recomputation.
    BoardHashDrift { stored: u64, recomputed: u64 },

    /// The incremental pawn/king hash differs from a full recomputation.
    PawnKingHashDrift { stored: u64, recomputed: u64 },

    /// The incremental material key differs from a full recomputation.
    MaterialKeyDrift { stored: u64, recomputed: u64 },
}
