//! Player color representation.

use crate::Rank;

/// The two sides. White moves first and owns ranks 1 and 2 at the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors in index order.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank holding this side's king and rooks at the start.
    #[inline]
    pub const fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// Rank this side's pawns start on (and double-push from).
    #[inline]
    pub const fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// Rank from which a pawn of this side promotes on its next step.
    #[inline]
    pub const fn pre_promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::R7,
            Color::Black => Rank::R2,
        }
    }

    /// FEN side-to-move character.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_color() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn pawn_ranks_mirror() {
        assert_eq!(Color::White.pawn_rank(), Rank::R2);
        assert_eq!(Color::Black.pawn_rank(), Rank::R7);
        assert_eq!(Color::White.pre_promotion_rank(), Rank::R7);
        assert_eq!(Color::Black.pre_promotion_rank(), Rank::R2);
        assert_eq!(Color::Black.back_rank(), Rank::R8);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(Color::Black.fen_char(), 'b');
    }
}
