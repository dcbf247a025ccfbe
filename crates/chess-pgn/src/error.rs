//! Error type shared by the lexer, parser and replay.

use chess_core::FenError;
use chess_engine::SanError;
use thiserror::Error;

/// Errors produced while reading, parsing or replaying PGN.
#[derive(Debug, Error)]
pub enum PgnError {
    /// The PGN file could not be read.
    #[error("failed to read PGN: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed PGN text at a 1-based line and column.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The `FEN` tag of a set-up game is not a valid position.
    #[error("invalid FEN tag: {0}")]
    Fen(#[from] FenError),

    /// A move in the movetext does not resolve on the current board.
    #[error("ply {ply} ({san}): {source}")]
    UnresolvedMove {
        ply: usize,
        san: String,
        source: SanError,
    },
}

impl PgnError {
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        PgnError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}
