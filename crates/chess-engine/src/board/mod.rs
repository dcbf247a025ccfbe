//! Board state.
//!
//! The square array is authoritative for what stands where; the per-kind,
//! per-color and aggregate bitboards mirror it for the move generator. Every
//! change to either goes through [`Board::toggle`].

mod apply;

pub use apply::MoveUndo;

use crate::Bitboard;
use chess_core::{CastleSide, Color, File, Fen, FenError, Piece, PieceId, Rank, Square};
use std::fmt;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(0b0001);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(0b0010);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(0b0100);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(0b1000);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates castling rights from raw flags; bits above the low four are dropped.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// The single right for `color` castling toward `side`.
    #[inline]
    pub const fn for_side(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Rights lost when a piece leaves or arrives on `sq`.
    ///
    /// Only the king and rook home squares revoke anything.
    #[inline]
    pub const fn revoked_by(sq: Square) -> Self {
        match sq.index() {
            0 => Self::WHITE_QUEENSIDE,
            4 => CastlingRights(Self::WHITE_KINGSIDE.0 | Self::WHITE_QUEENSIDE.0),
            7 => Self::WHITE_KINGSIDE,
            56 => Self::BLACK_QUEENSIDE,
            60 => CastlingRights(Self::BLACK_KINGSIDE.0 | Self::BLACK_QUEENSIDE.0),
            63 => Self::BLACK_KINGSIDE,
            _ => Self::NONE,
        }
    }

    #[inline]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.contains(Self::for_side(color, side))
    }

    #[inline]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for CastlingRights {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        CastlingRights(self.0 | rhs.0)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (right, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(right) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// A chess board with redundant square-array and bitboard views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<PieceId>; 64],
    kinds: [Bitboard; Piece::COUNT],
    colors: [Bitboard; 2],
    occupied: Bitboard,
    castling: CastlingRights,
    en_passant: Option<Square>,
    side_to_move: Color,
    halfmove_clock: u32,
    fullmove_number: u32,
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Board {
    /// A board with no pieces, no castling rights and white to move.
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            kinds: [Bitboard::EMPTY; Piece::COUNT],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            castling: CastlingRights::NONE,
            en_passant: None,
            side_to_move: Color::White,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting position with full castling rights.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        for color in Color::ALL {
            for (file, piece) in File::ALL.into_iter().zip(BACK_RANK) {
                board.put_piece(
                    Square::new(file, color.back_rank()),
                    PieceId::new(piece, color),
                );
                board.put_piece(
                    Square::new(file, color.pawn_rank()),
                    PieceId::new(Piece::Pawn, color),
                );
            }
        }
        board.castling = CastlingRights::ALL;
        board
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;
        let mut board = Board::empty();
        for (sq, piece) in parsed.placement {
            board.put_piece(sq, piece);
        }
        let rights = [
            CastlingRights::WHITE_KINGSIDE,
            CastlingRights::WHITE_QUEENSIDE,
            CastlingRights::BLACK_KINGSIDE,
            CastlingRights::BLACK_QUEENSIDE,
        ];
        for (right, held) in rights.into_iter().zip(parsed.castling) {
            if held {
                board.castling.insert(right);
            }
        }
        board.en_passant = parsed.en_passant;
        board.side_to_move = parsed.side_to_move;
        board.halfmove_clock = parsed.halfmove_clock;
        board.fullmove_number = parsed.fullmove_number;
        Ok(board)
    }

    /// Converts the board to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_count = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::R1 {
                fen.push('/');
            }
        }

        let en_passant = match self.en_passant {
            Some(sq) => sq.to_algebraic(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.fen_char(),
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.squares[sq.index() as usize]
    }

    /// Pieces of the given kind and color.
    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.kinds[piece.index()] & self.colors[color.index()]
    }

    /// Pieces of the given kind, both colors.
    #[inline]
    pub fn pieces_of_kind(&self, piece: Piece) -> Bitboard {
        self.kinds[piece.index()]
    }

    /// All pieces of one color.
    #[inline]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Square a pawn may capture onto en passant.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Square of the king of `color`, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(Piece::King, color).lsb()
    }

    /// Places `piece` on the empty square `sq`.
    pub fn put_piece(&mut self, sq: Square, piece: PieceId) {
        debug_assert!(
            self.piece_at(sq).is_none(),
            "put_piece: {} already holds {:?}",
            sq,
            self.piece_at(sq)
        );
        self.toggle(sq, piece);
    }

    /// Clears `sq` and returns what stood there.
    pub fn remove_piece(&mut self, sq: Square) -> Option<PieceId> {
        let piece = self.piece_at(sq)?;
        self.toggle(sq, piece);
        Some(piece)
    }

    /// Moves the piece on `from` to the empty square `to` and returns it.
    pub fn relocate_piece(&mut self, from: Square, to: Square) -> Option<PieceId> {
        debug_assert!(
            self.piece_at(to).is_none(),
            "relocate_piece: {} is occupied",
            to
        );
        let piece = self.piece_at(from)?;
        self.toggle(from, piece);
        self.toggle(to, piece);
        Some(piece)
    }

    /// Flips `piece` in or out of `sq` in all four views at once.
    ///
    /// Toggling out requires `piece` to be the occupant; toggling in requires
    /// the square to be empty.
    #[inline]
    fn toggle(&mut self, sq: Square, piece: PieceId) {
        let bit = Bitboard::from_square(sq);
        self.kinds[piece.piece().index()] ^= bit;
        self.colors[piece.color().index()] ^= bit;
        self.occupied ^= bit;
        let slot = &mut self.squares[sq.index() as usize];
        *slot = match *slot {
            Some(current) => {
                debug_assert_eq!(current, piece, "toggle: {} holds another piece", sq);
                None
            }
            None => Some(piece),
        };
    }

    /// Verifies that the square array and all bitboards agree.
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut union = Bitboard::EMPTY;
        for bb in self.kinds {
            union |= bb;
        }
        if union != self.occupied {
            return Err(format!(
                "aggregate {:#018x} != union of kinds {:#018x}",
                self.occupied.0, union.0
            ));
        }
        if (self.colors[0] & self.colors[1]).is_not_empty() {
            return Err("color bitboards overlap".to_string());
        }
        if self.colors[0] | self.colors[1] != self.occupied {
            return Err("color bitboards do not cover the aggregate".to_string());
        }

        for sq in Square::all() {
            let piece = self.piece_at(sq);
            if self.occupied.contains(sq) != piece.is_some() {
                return Err(format!("{}: aggregate bit disagrees with {:?}", sq, piece));
            }
            for kind in Piece::ALL {
                let expected = piece.map(PieceId::piece) == Some(kind);
                if self.kinds[kind.index()].contains(sq) != expected {
                    return Err(format!("{}: {} bitboard disagrees with {:?}", sq, kind, piece));
                }
            }
            for color in Color::ALL {
                let expected = piece.map(PieceId::color) == Some(color);
                if self.colors[color.index()].contains(sq) != expected {
                    return Err(format!("{}: {:?} bitboard disagrees with {:?}", sq, color, piece));
                }
            }
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{}", rank)?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', PieceId::fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for file in File::ALL {
            write!(f, " {}", file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_matches_fen() {
        let board = Board::startpos();
        assert_eq!(board.to_fen(), Fen::STARTPOS);
        assert_eq!(Board::from_fen(Fen::STARTPOS).unwrap(), board);
        assert!(board.check_consistency().is_ok());
    }

    #[test]
    fn custom_fen_roundtrip() {
        for fen in [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1",
            "8/8/8/8/8/8/8/4K2k b Kq - 12 40",
        ] {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.to_fen(), fen);
            assert!(board.check_consistency().is_ok());
        }
    }

    #[test]
    fn startpos_bitboards() {
        let board = Board::startpos();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.color_bb(Color::White).count(), 16);
        assert_eq!(board.pieces(Piece::Pawn, Color::White).count(), 8);
        assert_eq!(board.pieces(Piece::Pawn, Color::Black).count(), 8);
        assert_eq!(board.pieces_of_kind(Piece::King).count(), 2);
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(
            board.piece_at(Square::D1),
            Some(PieceId::new(Piece::Queen, Color::White))
        );
        assert_eq!(board.piece_at(Square::E4), None);
    }

    #[test]
    fn mutators_keep_views_in_sync() {
        let mut board = Board::empty();
        let knight = PieceId::new(Piece::Knight, Color::Black);
        board.put_piece(Square::G8, knight);
        assert!(board.check_consistency().is_ok());
        assert_eq!(board.relocate_piece(Square::G8, Square::F6), Some(knight));
        assert!(board.check_consistency().is_ok());
        assert!(board.pieces(Piece::Knight, Color::Black).contains(Square::F6));
        assert_eq!(board.remove_piece(Square::F6), Some(knight));
        assert_eq!(board.remove_piece(Square::F6), None);
        assert_eq!(board, Board::empty());
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.has(Color::White, CastleSide::Kingside));
        rights.remove(CastlingRights::revoked_by(Square::E1));
        assert_eq!(
            rights,
            CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
        );
        rights.remove(CastlingRights::revoked_by(Square::H8));
        assert_eq!(rights, CastlingRights::BLACK_QUEENSIDE);
        assert_eq!(CastlingRights::revoked_by(Square::D4), CastlingRights::NONE);
        assert_eq!(rights.to_string(), "q");
        assert_eq!(CastlingRights::NONE.to_string(), "-");
        assert_eq!(CastlingRights::new(0xFF), CastlingRights::ALL);
    }

    #[test]
    fn display_diagram() {
        let text = Board::startpos().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[4], "4 . . . . . . . .");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }
}
