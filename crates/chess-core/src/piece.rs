//! Piece kinds and colored piece identities.

use crate::Color;

/// The six kinds of chess pieces, ignoring color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// Number of piece kinds.
    pub const COUNT: usize = 6;

    /// All piece kinds in index order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Kinds a pawn may promote to, in promotion-code order.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

    /// Returns the index of this piece kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a piece kind from its index (0-5).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Piece::Pawn),
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            5 => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = self.to_san_char().to_ascii_lowercase();
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Self::from_san_char(c.to_ascii_uppercase()) {
            Some(piece) => Some((piece, color)),
            None => None,
        }
    }

    /// Uppercase letter used in SAN (`P` for pawns, which SAN omits).
    pub const fn to_san_char(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    /// Parses an uppercase SAN piece letter.
    pub const fn from_san_char(c: char) -> Option<Piece> {
        match c {
            'P' => Some(Piece::Pawn),
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// One of the twelve colored piece identities.
///
/// Packed as `kind + 6 * color`, so white identities are 0-5 and black
/// identities 6-11. An empty square is represented as `Option::<PieceId>::None`
/// by the board rather than as a thirteenth value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(u8);

impl PieceId {
    /// Number of distinct identities.
    pub const COUNT: usize = 12;

    /// Combines a kind and a color.
    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Self {
        PieceId(piece as u8 + (color as u8) * Piece::COUNT as u8)
    }

    /// Creates an identity from its packed index (0-11).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(PieceId(index as u8))
        } else {
            None
        }
    }

    /// Packed index (0-11).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Color of the piece.
    #[inline]
    pub const fn color(self) -> Color {
        if self.0 >= Piece::COUNT as u8 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Kind of the piece, with the color offset removed.
    #[inline]
    pub const fn piece(self) -> Piece {
        let kind = self.0 - (self.color() as u8) * Piece::COUNT as u8;
        match Piece::from_index(kind as usize) {
            Some(p) => p,
            None => unreachable!(),
        }
    }

    /// FEN character, uppercase for white.
    #[inline]
    pub const fn fen_char(self) -> char {
        self.piece().to_fen_char(self.color())
    }
}

impl std::fmt::Debug for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PieceId({})", self.fen_char())
    }
}
