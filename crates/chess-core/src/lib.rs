//! Core types for chess.
//!
//! This crate provides the fundamental value types shared by the engine,
//! the PGN importer and the terminal viewer:
//! - [`Piece`], [`PieceId`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for the packed 16-bit half-move encoding
//! - [`Fen`] for FEN parsing

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{CastleSide, Move, MoveKind};
pub use piece::{Piece, PieceId};
pub use square::{File, Rank, Square};
