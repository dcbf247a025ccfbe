//! Packed half-move representation.

use crate::{Piece, Square};
use std::fmt;

const FROM_MASK: u16 = 0x3F;
const TO_SHIFT: u16 = 6;
const CAPTURE_BIT: u16 = 1 << 12;
const PROMOTION_BIT: u16 = 1 << 13;
const SPECIAL_SHIFT: u16 = 14;

/// Which rook a castling move uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Short castling, with the h-file rook (O-O).
    Kingside,
    /// Long castling, with the a-file rook (O-O-O).
    Queenside,
}

/// Classification of a [`Move`], derived purely from its packed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Relocation onto an empty square.
    Quiet,
    /// Capture of the piece standing on the destination.
    Capture,
    /// Pawn capture of a pawn that just double-pushed past the destination.
    EnPassant,
    /// Pawn reaching the last rank, optionally capturing on the way.
    Promotion { piece: Piece, capture: bool },
    /// King and rook swap sides.
    Castle(CastleSide),
}

/// A chess half-move.
///
/// Encoded in 16 bits:
///
/// | bits  | field                                     |
/// |-------|-------------------------------------------|
/// | 0-5   | from square                               |
/// | 6-11  | to square                                 |
/// | 12    | capture flag                              |
/// | 13    | promotion flag                            |
/// | 14-15 | special: promotion piece, castle or e.p.  |
///
/// The special field holds the promotion piece (0 knight .. 3 queen) when the
/// promotion flag is set. Otherwise a nonzero value marks a castle on a quiet
/// move and an en-passant capture on a capturing move. Moves are only built
/// through the typed constructors, so no quiet move can carry a nonzero special
/// field without being a castle.
///
/// Castles are stored as king square to rook square; see
/// [`Move::castle_targets`] for where the two pieces land.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Placeholder used to fill unused move buffer slots.
    pub const NULL: Move = Move(0);

    #[inline]
    const fn pack(from: Square, to: Square, capture: bool, promotion: bool, special: u16) -> Self {
        let mut bits = (from.index() as u16) | ((to.index() as u16) << TO_SHIFT);
        if capture {
            bits |= CAPTURE_BIT;
        }
        if promotion {
            bits |= PROMOTION_BIT;
        }
        Move(bits | ((special & 0b11) << SPECIAL_SHIFT))
    }

    /// A move onto an empty square.
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::pack(from, to, false, false, 0)
    }

    /// A capture of the piece on `to`.
    #[inline]
    pub const fn capture(from: Square, to: Square) -> Self {
        Self::pack(from, to, true, false, 0)
    }

    /// An en-passant capture landing on `to`.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self::pack(from, to, true, false, 1)
    }

    /// A pawn promotion to `piece`, which must be a knight, bishop, rook or queen.
    #[inline]
    pub const fn promotion(from: Square, to: Square, capture: bool, piece: Piece) -> Self {
        debug_assert!(matches!(
            piece,
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen
        ));
        Self::pack(from, to, capture, true, piece as u16 - Piece::Knight as u16)
    }

    /// A castle encoded as the king's square and the castling rook's square.
    #[inline]
    pub const fn castle(king: Square, rook: Square) -> Self {
        Self::pack(king, rook, false, false, 1)
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_masked((self.0 & FROM_MASK) as u32)
    }

    /// Returns the destination square (the rook's square for castles).
    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_masked((self.0 >> TO_SHIFT) as u32)
    }

    #[inline]
    const fn special(self) -> u16 {
        self.0 >> SPECIAL_SHIFT
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE_BIT != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 & PROMOTION_BIT != 0
    }

    /// Neither capture nor promotion. Castles are quiet too.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.is_quiet() && self.special() != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.is_capture() && !self.is_promotion() && self.special() != 0
    }

    /// The piece a promotion produces.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        if self.is_promotion() {
            Piece::from_index(Piece::Knight as usize + self.special() as usize)
        } else {
            None
        }
    }

    /// Side of a castle, inferred from the rook being east or west of the king.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        if !self.is_castle() {
            None
        } else if self.to().index() > self.from().index() {
            Some(CastleSide::Kingside)
        } else {
            Some(CastleSide::Queenside)
        }
    }

    /// Landing squares `(king, rook)` of a castle.
    ///
    /// The king moves two files toward the rook and the rook lands on the
    /// square the king crossed.
    pub const fn castle_targets(self) -> Option<(Square, Square)> {
        let king = self.from().index();
        let rook = self.to().index();
        match self.castle_side() {
            Some(CastleSide::Kingside) => Some((
                Square::from_index_masked(king as u32 + 2),
                Square::from_index_masked(rook as u32 - 2),
            )),
            Some(CastleSide::Queenside) => Some((
                Square::from_index_masked(king as u32 - 2),
                Square::from_index_masked(rook as u32 + 3),
            )),
            None => None,
        }
    }

    /// Classifies the move.
    pub const fn kind(self) -> MoveKind {
        if let Some(piece) = self.promotion_piece() {
            MoveKind::Promotion {
                piece,
                capture: self.is_capture(),
            }
        } else if self.is_en_passant() {
            MoveKind::EnPassant
        } else if self.is_capture() {
            MoveKind::Capture
        } else if let Some(side) = self.castle_side() {
            MoveKind::Castle(side)
        } else {
            MoveKind::Quiet
        }
    }

    /// Coordinate notation (e.g., "e2e4", "e7e8q"); castles show the king's
    /// landing square ("e1g1").
    pub fn to_coordinate(self) -> String {
        let promo = match self.promotion_piece() {
            Some(piece) => piece.to_fen_char(crate::Color::Black).to_string(),
            None => String::new(),
        };
        let to = match self.castle_targets() {
            Some((king, _)) => king,
            None => self.to(),
        };
        format!("{}{}{}", self.from(), to, promo)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self.to_coordinate(), self.kind())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}
