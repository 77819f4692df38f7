//! Terminal-oriented board renderer.
//!
//! Creates a human-readable board view from the cell array for debugging,
//! tests, and diagnostics in text environments.

use crate::board_state::board_state::Board;
use crate::board_state::board_types::square_at;

/// Render the board to a string for terminal output, White at the bottom.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let cell = board.squares[square_at(file, rank) as usize];
            match cell.piece {
                Some(piece) => out.push(piece.fen_char()),
                None => out.push('.'),
            }

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use crate::board_state::board_state::Board;

    #[test]
    fn renders_the_setup_with_white_at_the_bottom() {
        let board =
            Board::from_fen("4k3/2P5/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let rendered = render_board(&board);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8 . . . . k . . . 8");
        assert_eq!(lines[2], "7 . . P . . . . . 7");
        assert_eq!(lines[9], "  a b c d e f g h");
    }
}
