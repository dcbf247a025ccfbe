//! Pseudo-legal move generation.
//!
//! [`generate`] enumerates one category of moves for one piece kind and color,
//! restricted to a target mask. Moves are not checked for leaving the mover's
//! king attacked; [`is_square_attacked`] is provided for callers that need to.

mod attacks;
mod lines;
pub mod perft;

use crate::{Bitboard, Board};
use chess_core::{CastleSide, Color, File, Move, Piece, PieceId, Rank, Square};

pub use attacks::{king_attacks, knight_attacks, pawn_attacks, piece_attacks};
pub use lines::{
    antidiagonal_mask, diagonal_mask, file_mask, init_attack_tables, rank_mask, Line, LineAttacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// Pseudo-legal positions stay well under 256 moves, so a fixed-size array
/// avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity of the list.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES, "move list overflow");
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Category of moves to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenType {
    /// Moves onto empty squares, including pawn pushes but not promotions.
    Quiet,
    /// Captures, including en passant but not promotions.
    Capture,
    /// Pawn pushes onto the last rank.
    Promotion,
    /// Pawn captures onto the last rank.
    PromotionCapture,
    /// King-and-rook castles.
    Castle,
}

impl GenType {
    pub const ALL: [GenType; 5] = [
        GenType::Quiet,
        GenType::Capture,
        GenType::Promotion,
        GenType::PromotionCapture,
        GenType::Castle,
    ];

    /// Whether `piece` can produce moves of this category at all.
    #[inline]
    pub const fn applies_to(self, piece: Piece) -> bool {
        match self {
            GenType::Quiet | GenType::Capture => true,
            GenType::Promotion | GenType::PromotionCapture => matches!(piece, Piece::Pawn),
            GenType::Castle => matches!(piece, Piece::King),
        }
    }
}

/// Appends the `category` moves of every `piece` of `color` whose destination lies
/// in `target`, and returns how many were appended.
///
/// Requesting a category the piece kind cannot produce (promotions for a
/// knight, castles for a rook) is a caller error.
pub fn generate(
    board: &Board,
    tables: &LineAttacks,
    piece: Piece,
    color: Color,
    category: GenType,
    target: Bitboard,
    list: &mut MoveList,
) -> usize {
    let valid = category.applies_to(piece);
    debug_assert!(valid, "{:?} moves requested for {}", category, piece);
    if !valid {
        return 0;
    }

    let start = list.len();
    match (piece, category) {
        (Piece::Pawn, _) => pawn_moves(board, color, category, target, list),
        (Piece::King, GenType::Castle) => castle_moves(board, tables, color, target, list),
        _ => piece_moves(board, tables, piece, color, category, target, list),
    }
    list.len() - start
}

/// Appends every pseudo-legal move of `color` and returns how many were appended.
pub fn generate_all(
    board: &Board,
    tables: &LineAttacks,
    color: Color,
    list: &mut MoveList,
) -> usize {
    let start = list.len();
    for piece in Piece::ALL {
        for category in GenType::ALL {
            if category.applies_to(piece) {
                generate(board, tables, piece, color, category, Bitboard::FULL, list);
            }
        }
    }
    list.len() - start
}

/// Returns true if any piece of `by` attacks `sq`.
pub fn is_square_attacked(board: &Board, tables: &LineAttacks, sq: Square, by: Color) -> bool {
    let occupied = board.occupied();
    let queens = board.pieces(Piece::Queen, by);

    (pawn_attacks(sq, by.opposite()) & board.pieces(Piece::Pawn, by)).is_not_empty()
        || (knight_attacks(sq) & board.pieces(Piece::Knight, by)).is_not_empty()
        || (king_attacks(sq) & board.pieces(Piece::King, by)).is_not_empty()
        || (tables.bishop_attacks(sq, occupied) & (board.pieces(Piece::Bishop, by) | queens))
            .is_not_empty()
        || (tables.rook_attacks(sq, occupied) & (board.pieces(Piece::Rook, by) | queens))
            .is_not_empty()
}

/// Square `ranks` steps behind `sq` from the point of view of a `color` pawn.
#[inline]
fn behind(sq: Square, color: Color, ranks: u8) -> Square {
    match color {
        Color::White => Square::from_index_masked((sq.index() - 8 * ranks) as u32),
        Color::Black => Square::from_index_masked((sq.index() + 8 * ranks) as u32),
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, capture: bool) {
    for piece in Piece::PROMOTIONS {
        list.push(Move::promotion(from, to, capture, piece));
    }
}

fn pawn_moves(board: &Board, color: Color, category: GenType, target: Bitboard, list: &mut MoveList) {
    let pawns = board.pieces(Piece::Pawn, color);
    let empty = !board.occupied();
    let enemies = board.color_bb(color.opposite());
    let (last_rank, double_rank) = match color {
        Color::White => (Bitboard::RANK_8, Bitboard::RANK_4),
        Color::Black => (Bitboard::RANK_1, Bitboard::RANK_5),
    };
    let forward = |bb: Bitboard| match color {
        Color::White => bb.north(),
        Color::Black => bb.south(),
    };
    let single = forward(pawns) & empty;

    match category {
        GenType::Quiet => {
            for to in single & !last_rank & target {
                list.push(Move::quiet(behind(to, color, 1), to));
            }
            for to in forward(single) & empty & double_rank & target {
                list.push(Move::quiet(behind(to, color, 2), to));
            }
        }
        GenType::Promotion => {
            for to in single & last_rank & target {
                push_promotions(list, behind(to, color, 1), to, false);
            }
        }
        GenType::Capture => {
            for from in pawns {
                for to in pawn_attacks(from, color) & enemies & !last_rank & target {
                    list.push(Move::capture(from, to));
                }
            }
            if let Some(ep) = en_passant_target(board, color) {
                if target.contains(ep) {
                    for from in pawn_attacks(ep, color.opposite()) & pawns {
                        list.push(Move::en_passant(from, ep));
                    }
                }
            }
        }
        GenType::PromotionCapture => {
            let promoting = color.pre_promotion_rank();
            for from in pawns.into_iter().filter(|sq| sq.rank() == promoting) {
                for to in pawn_attacks(from, color) & enemies & target {
                    push_promotions(list, from, to, true);
                }
            }
        }
        GenType::Castle => {}
    }
}

/// The board's en passant square, if a `color` pawn could capture onto it.
fn en_passant_target(board: &Board, color: Color) -> Option<Square> {
    let ep = board.en_passant()?;
    let expected_rank = match color {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    };
    if ep.rank() != expected_rank || board.piece_at(ep).is_some() {
        return None;
    }
    let victim = behind(ep, color, 1);
    (board.piece_at(victim) == Some(PieceId::new(Piece::Pawn, color.opposite()))).then_some(ep)
}

fn piece_moves(
    board: &Board,
    tables: &LineAttacks,
    piece: Piece,
    color: Color,
    category: GenType,
    target: Bitboard,
    list: &mut MoveList,
) {
    let occupied = board.occupied();
    let destinations = match category {
        GenType::Quiet => !occupied,
        GenType::Capture => board.color_bb(color.opposite()),
        _ => return,
    } & target;

    for from in board.pieces(piece, color) {
        for to in piece_attacks(tables, piece, color, from, occupied) & destinations {
            list.push(if category == GenType::Capture {
                Move::capture(from, to)
            } else {
                Move::quiet(from, to)
            });
        }
    }
}

/// Castles are found by following the horizontal ray from the king: the rook
/// is reachable only when every square between them is empty. Whether the
/// king passes through attacked squares is not checked.
fn castle_moves(
    board: &Board,
    tables: &LineAttacks,
    color: Color,
    target: Bitboard,
    list: &mut MoveList,
) {
    let back_rank = color.back_rank();
    let king = Square::new(File::E, back_rank);
    if board.piece_at(king) != Some(PieceId::new(Piece::King, color)) {
        return;
    }
    let reach = tables.line_attacks(Line::Horizontal, king, board.occupied()) & target;

    for (side, file) in [(CastleSide::Kingside, File::H), (CastleSide::Queenside, File::A)] {
        let rook = Square::new(file, back_rank);
        if board.castling().has(color, side)
            && board.piece_at(rook) == Some(PieceId::new(Piece::Rook, color))
            && reach.contains(rook)
        {
            list.push(Move::castle(king, rook));
        }
    }
}
