//! Bitboard chess position engine.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with bit-scans and directional shifts
//! - [`LineAttacks`] - per-square line masks and classical sliding attacks
//! - [`Board`] - piece array kept in sync with per-kind and per-color bitboards
//! - [`generate`] - pseudo-legal move generation by piece kind and category
//! - [`Board::apply`] / [`Board::undo`] - reversible move application
//! - [`perft`] node counting and [`resolve_san`] for SAN text
//!
//! # Example
//!
//! ```
//! use chess_engine::{generate_all, init_attack_tables, perft, Board, MoveList};
//!
//! let tables = init_attack_tables();
//! let mut board = Board::startpos();
//!
//! let mut moves = MoveList::new();
//! let count = generate_all(&board, tables, board.side_to_move(), &mut moves);
//! assert_eq!(count, 20);
//!
//! let m = moves.as_slice()[0];
//! let undo = board.apply(m);
//! board.undo(m, &undo);
//! assert_eq!(board, Board::startpos());
//!
//! assert_eq!(perft(&mut board, tables, 2), 400);
//! ```

mod bitboard;
mod board;
pub mod movegen;
pub mod san;

pub use bitboard::{Bitboard, BitboardIter, Direction};
pub use board::{Board, CastlingRights, MoveUndo};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    generate, generate_all, init_attack_tables, is_square_attacked, GenType, Line, LineAttacks,
    MoveList,
};
pub use san::{resolve_san, SanError};
