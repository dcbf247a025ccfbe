//! Text rendering of a board for the terminal.

use crate::config::ViewerConfig;
use chess_core::{Color, File, Piece, PieceId, Rank, Square};
use chess_engine::Board;

/// Draws `board` as an 8x8 grid, one rank per line.
pub fn render_board(board: &Board, config: &ViewerConfig) -> String {
    let mut ranks = Rank::ALL.to_vec();
    let mut files = File::ALL.to_vec();
    if config.flip {
        files.reverse();
    } else {
        ranks.reverse();
    }

    let mut out = String::new();
    for &rank in &ranks {
        if config.coordinates {
            out.push(rank.to_char());
            out.push(' ');
        }
        let row: Vec<String> = files
            .iter()
            .map(|&file| glyph(board.piece_at(Square::new(file, rank)), config).to_string())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    if config.coordinates {
        let labels: Vec<String> = files.iter().map(|f| f.to_char().to_string()).collect();
        out.push_str("  ");
        out.push_str(&labels.join(" "));
        out.push('\n');
    }
    out
}

fn glyph(piece: Option<PieceId>, config: &ViewerConfig) -> char {
    let Some(id) = piece else {
        return config.empty_square;
    };
    if !config.unicode {
        return id.fen_char();
    }
    match (id.color(), id.piece()) {
        (Color::White, Piece::King) => '♔',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Pawn) => '♙',
        (Color::Black, Piece::King) => '♚',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Pawn) => '♟',
    }
}
