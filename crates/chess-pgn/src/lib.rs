//! Portable Game Notation support for the chess engine.
//!
//! This crate provides:
//! - [`Lexer`] - position-tracking PGN tokenizer
//! - [`parse_str`] / [`read_file`] - tag pairs and mainline movetext into [`PgnGame`]
//! - [`replay`] / [`Replay`] - SAN resolution of a game onto a [`chess_engine::Board`]
//!
//! # Example
//!
//! ```
//! use chess_engine::init_attack_tables;
//!
//! let games = chess_pgn::parse_str("[White \"A\"]\n1. e4 e5 2. Nf3 *").unwrap();
//! let moves = chess_pgn::replay(&games[0], init_attack_tables()).unwrap();
//! assert_eq!(moves.len(), 3);
//! assert_eq!(moves[2].to_string(), "g1f3");
//! ```

mod error;
pub mod lexer;
mod parser;
mod replay;

use std::path::Path;

pub use error::PgnError;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_str, GameResult, PgnGame, PgnMove};
pub use replay::{replay, Replay, ReplayStep};

/// Reads and parses every game in the file at `path`.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<PgnGame>, PgnError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "reading PGN");
    parse_str(&text)
}
