//! Board coordinates: files, ranks and squares.

use std::fmt;

/// Defines a board coordinate enum with eight variants numbered 0-7 and a
/// one-character textual form starting at `$first`.
macro_rules! coordinate {
    ($(#[$doc:meta])* $name:ident, $first:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All values in ascending order.
            pub const ALL: [$name; 8] = [$($name::$variant),+];

            /// Value at `index` (0-7).
            #[inline]
            pub const fn from_index(index: u8) -> Option<Self> {
                if index < 8 {
                    Some(Self::ALL[index as usize])
                } else {
                    None
                }
            }

            #[inline]
            pub const fn from_char(c: char) -> Option<Self> {
                let offset = (c as u32).wrapping_sub($first as u32);
                if offset < 8 {
                    Some(Self::ALL[offset as usize])
                } else {
                    None
                }
            }

            #[inline]
            pub const fn index(self) -> u8 {
                self as u8
            }

            #[inline]
            pub const fn to_char(self) -> char {
                ($first as u8 + self as u8) as char
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_char())
            }
        }
    };
}

coordinate!(
    /// A file (column), `a` to `h`.
    ///
    /// Only lowercase letters parse: in SAN an uppercase `B` is a bishop,
    /// not the b-file.
    File,
    'a',
    [A, B, C, D, E, F, G, H]
);

coordinate!(
    /// A rank (row), `1` to `8`.
    Rank,
    '1',
    [R1, R2, R3, R4, R5, R6, R7, R8]
);

/// One of the 64 squares, numbered `rank * 8 + file` (a1 = 0, h1 = 7,
/// a8 = 56, h8 = 63).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

macro_rules! square_consts {
    (@rank $rank:literal, $file:expr,) => {};
    (@rank $rank:literal, $file:expr, $name:ident $($rest:ident)*) => {
        pub const $name: Square = Square($rank * 8 + $file);
        square_consts!(@rank $rank, $file + 1, $($rest)*);
    };
    ($($rank:literal: $($name:ident)+;)+) => {
        impl Square {
            $(square_consts!(@rank $rank, 0u8, $($name)+);)+
        }
    };
}

square_consts! {
    0: A1 B1 C1 D1 E1 F1 G1 H1;
    1: A2 B2 C2 D2 E2 F2 G2 H2;
    2: A3 B3 C3 D3 E3 F3 G3 H3;
    3: A4 B4 C4 D4 E4 F4 G4 H4;
    4: A5 B5 C5 D5 E5 F5 G5 H5;
    5: A6 B6 C6 D6 E6 F6 G6 H6;
    6: A7 B7 C7 D7 E7 F7 G7 H7;
    7: A8 B8 C8 D8 E8 F8 G8 H8;
}

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(((rank as u8) << 3) | file as u8)
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Square for the low six bits of `bits`, for indices that are in range
    /// by construction (bit-scans, packed move fields).
    #[inline]
    pub const fn from_index_masked(bits: u32) -> Self {
        Square((bits & 0x3F) as u8)
    }

    /// a1, b1, ..., h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    /// Parses lowercase algebraic notation such as `e4`.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => {
                Some(Square::new(File::from_char(f)?, Rank::from_char(r)?))
            }
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    /// Single-bit mask of this square.
    #[inline]
    pub const fn bitboard(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
