//! Bitboard representation and operations.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the
//! chess board. This allows efficient parallel operations on multiple squares.

use chess_core::{File, Rank, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// One of the eight compass directions a bitboard can be shifted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}


/// A 64-bit board representation.
///
/// Bit 0 = a1, bit 1 = b1, ..., bit 63 = h8 (little-endian rank-file mapping).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Full bitboard (all squares set).
    pub const FULL: Bitboard = Bitboard(!0);

    // File masks
    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    // Rank masks
    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_4: Bitboard = Bitboard(0x0000_0000_FF00_0000);
    pub const RANK_5: Bitboard = Bitboard(0x0000_00FF_0000_0000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    /// Creates a bitboard from a raw u64.
    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    /// Creates a bitboard with a single square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bitboard())
    }

    /// Returns true if the bitboard is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the bitboard is not empty.
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns the number of set bits (population count).
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & sq.bitboard()) != 0
    }

    /// Sets the given square.
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.bitboard();
    }

    /// Clears the given square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !sq.bitboard();
    }

    /// Toggles the given square.
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= sq.bitboard();
    }

    /// Lowest set square, or `None` for an empty bitboard.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_masked(self.0.trailing_zeros()))
        }
    }

    /// Highest set square, or `None` for an empty bitboard.
    #[inline]
    pub const fn msb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_masked(63 - self.0.leading_zeros()))
        }
    }

    /// Pops and returns the least significant bit.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Shifts every bit one step in `dir`, dropping bits that would wrap
    /// around the a- or h-file.
    #[inline]
    pub const fn shift(self, dir: Direction) -> Bitboard {
        match dir {
            Direction::North => self.north(),
            Direction::South => self.south(),
            Direction::East => self.east(),
            Direction::West => self.west(),
            Direction::NorthEast => self.north_east(),
            Direction::NorthWest => self.north_west(),
            Direction::SouthEast => self.south_east(),
            Direction::SouthWest => self.south_west(),
        }
    }

    /// Shifts the bitboard north (toward rank 8).
    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    /// Shifts the bitboard south (toward rank 1).
    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    /// Shifts the bitboard east (toward file H).
    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 << 1) & !Self::FILE_A.0)
    }

    /// Shifts the bitboard west (toward file A).
    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 >> 1) & !Self::FILE_H.0)
    }

    #[inline]
    pub const fn north_east(self) -> Bitboard {
        Bitboard((self.0 << 9) & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn north_west(self) -> Bitboard {
        Bitboard((self.0 << 7) & !Self::FILE_H.0)
    }

    #[inline]
    pub const fn south_east(self) -> Bitboard {
        Bitboard((self.0 >> 7) & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn south_west(self) -> Bitboard {
        Bitboard((self.0 >> 9) & !Self::FILE_H.0)
    }
}

macro_rules! bitwise_ops {
    ($($op:ident :: $method:ident, $assign:ident :: $assign_method:ident => $sym:tt;)+) => {
        $(
            impl $op for Bitboard {
                type Output = Bitboard;

                #[inline]
                fn $method(self, rhs: Bitboard) -> Bitboard {
                    Bitboard(self.0 $sym rhs.0)
                }
            }

            impl $assign for Bitboard {
                #[inline]
                fn $assign_method(&mut self, rhs: Bitboard) {
                    *self = *self $sym rhs;
                }
            }
        )+
    };
}

bitwise_ops! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
    BitXor::bitxor, BitXorAssign::bitxor_assign => ^;
}

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

/// Prints the raw value and an 8x8 diagram with rank 8 on top.
impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in Rank::ALL.into_iter().rev() {
            let row: Vec<&str> = File::ALL
                .into_iter()
                .map(|file| {
                    if self.contains(Square::new(file, rank)) {
                        "X"
                    } else {
                        "."
                    }
                })
                .collect();
            writeln!(f, "{} {}", rank, row.join(" "))?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// Iterator over set squares in a bitboard, lowest first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Bitboard::EMPTY, |bb, sq| bb | Bitboard::from_square(sq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_bit_operations() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E4);
        assert!(bb.contains(Square::E4));
        assert_eq!(bb.count(), 1);
        bb.toggle(Square::E4);
        assert!(bb.is_empty());
        bb.set(Square::A1);
        bb.clear(Square::A1);
        assert!(bb.is_empty());
    }

    #[test]
    fn bit_scans() {
        let bb = Bitboard::from_square(Square::C3) | Bitboard::from_square(Square::F7);
        assert_eq!(bb.lsb(), Some(Square::C3));
        assert_eq!(bb.msb(), Some(Square::F7));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
        assert_eq!(Bitboard::EMPTY.msb(), None);
        assert_eq!(Bitboard::FULL.msb(), Some(Square::H8));
    }

    #[test]
    fn pop_lsb_walks_upward() {
        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.pop_lsb(), Some(Square::B1));
        assert_eq!(bb.pop_lsb(), Some(Square::D1));
        assert_eq!(bb.pop_lsb(), None);
    }

    #[test]
    fn shifts_mask_file_wraparound() {
        let h4 = Bitboard::from_square(Square::H4);
        assert!(h4.east().is_empty());
        assert!(h4.north_east().is_empty());
        assert!(h4.south_east().is_empty());
        assert_eq!(h4.west(), Bitboard::from_square(Square::G4));

        let a4 = Bitboard::from_square(Square::A4);
        assert!(a4.west().is_empty());
        assert!(a4.north_west().is_empty());
        assert!(a4.south_west().is_empty());
        assert_eq!(a4.shift(Direction::NorthEast), Bitboard::from_square(Square::B5));

        assert!(Bitboard::RANK_8.north().is_empty());
        assert!(Bitboard::RANK_1.south().is_empty());
    }

    #[test]
    fn iterator_and_collect() {
        let squares: Vec<Square> = Bitboard::FILE_A.into_iter().collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares[0], Square::A1);
        assert_eq!(squares[7], Square::A8);
        let back: Bitboard = squares.into_iter().collect();
        assert_eq!(back, Bitboard::FILE_A);
    }

    proptest! {
        #[test]
        fn shift_matches_coordinate_step(index in 0u8..64) {
            let sq = Square::from_index(index).unwrap();
            let file = (index % 8) as i8;
            let rank = (index / 8) as i8;
            let steps = [
                (Direction::North, 0, 1),
                (Direction::South, 0, -1),
                (Direction::East, 1, 0),
                (Direction::West, -1, 0),
                (Direction::NorthEast, 1, 1),
                (Direction::NorthWest, -1, 1),
                (Direction::SouthEast, 1, -1),
                (Direction::SouthWest, -1, -1),
            ];
            for (dir, df, dr) in steps {
                let (f, r) = (file + df, rank + dr);
                let expected = if (0..8).contains(&f) && (0..8).contains(&r) {
                    Bitboard::new(1u64 << (r * 8 + f))
                } else {
                    Bitboard::EMPTY
                };
                prop_assert_eq!(Bitboard::from_square(sq).shift(dir), expected);
            }
        }
    }
}
