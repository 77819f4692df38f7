//! Crate root module declarations for the Quince Chess board core.
//!
//! This file exposes all top-level subsystems (board state, attack-table
//! maintenance, move application, lookup tables, and utility helpers) so
//! binaries, tests, and external tooling can import stable module paths.

pub mod board_state {
    pub mod board_errors;
    pub mod board_state;
    pub mod board_types;
    pub mod undo_frame;
}

pub mod attack {
    pub mod attack_board;
    pub mod attack_recalc;
}

pub mod move_apply {
    pub mod capture_taking;
    pub mod make_move;
    pub mod move_rebuild;
    pub mod promotion_moves;
}

pub mod tables {
    pub mod geometry_tables;
    pub mod material_keys;
    pub mod zobrist_keys;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_board;
}
