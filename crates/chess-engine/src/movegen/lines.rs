//! Line geometry and classical sliding-piece attacks.
//!
//! Every square lies on exactly one rank, file, diagonal and antidiagonal.
//! [`LineAttacks`] stores those four lines for all 64 squares; slider attacks
//! are then derived with the obstruction-difference method, one bit-scan per
//! ray and no square-by-square walking.

use crate::Bitboard;
use chess_core::Square;
use std::sync::OnceLock;

/// The four line orientations through a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Line {
    /// Constant `rank - file` (a1-h8 direction).
    Diagonal = 0,
    /// Constant `rank + file` (a8-h1 direction).
    Antidiagonal = 1,
    /// Constant rank.
    Horizontal = 2,
    /// Constant file.
    Vertical = 3,
}

impl Line {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

const MAIN_DIAGONAL: u64 = 0x8040_2010_0804_0201;
const MAIN_ANTIDIAGONAL: u64 = 0x0102_0408_1020_4080;

/// Blocker sentinel for rays toward higher squares.
const HIGH_SENTINEL: u64 = 0x8000_0000_0000_0000;
/// Blocker sentinel for rays toward lower squares.
const LOW_SENTINEL: u64 = 1;

/// Full rank through `sq`.
#[inline]
pub const fn rank_mask(sq: Square) -> Bitboard {
    Bitboard(0xFF << (sq.index() & 56))
}

/// Full file through `sq`.
#[inline]
pub const fn file_mask(sq: Square) -> Bitboard {
    Bitboard(Bitboard::FILE_A.0 << (sq.index() & 7))
}

/// Full diagonal (constant `rank - file`) through `sq`.
#[inline]
pub const fn diagonal_mask(sq: Square) -> Bitboard {
    let offset = (sq.index() / 8) as i32 - (sq.index() % 8) as i32;
    if offset >= 0 {
        Bitboard(MAIN_DIAGONAL << (offset * 8))
    } else {
        Bitboard(MAIN_DIAGONAL >> (-offset * 8))
    }
}

/// Full antidiagonal (constant `rank + file`) through `sq`.
#[inline]
pub const fn antidiagonal_mask(sq: Square) -> Bitboard {
    let offset = (sq.index() / 8) as i32 + (sq.index() % 8) as i32 - 7;
    if offset >= 0 {
        Bitboard(MAIN_ANTIDIAGONAL << (offset * 8))
    } else {
        Bitboard(MAIN_ANTIDIAGONAL >> (-offset * 8))
    }
}

/// Squares with a higher index than `sq`.
#[inline]
const fn above(sq: Square) -> u64 {
    (!0u64 << sq.index()) << 1
}

/// Squares with a lower index than `sq`.
#[inline]
const fn below(sq: Square) -> u64 {
    sq.bitboard() - 1
}

const fn compute_lines() -> [[Bitboard; 64]; 4] {
    let mut table = [[Bitboard::EMPTY; 64]; 4];
    let mut i = 0u8;
    while i < 64 {
        let sq = Square::from_index_masked(i as u32);
        let own = sq.bitboard();
        table[Line::Diagonal.index()][i as usize] = Bitboard(diagonal_mask(sq).0 & !own);
        table[Line::Antidiagonal.index()][i as usize] = Bitboard(antidiagonal_mask(sq).0 & !own);
        table[Line::Horizontal.index()][i as usize] = Bitboard(rank_mask(sq).0 & !own);
        table[Line::Vertical.index()][i as usize] = Bitboard(file_mask(sq).0 & !own);
        i += 1;
    }
    table
}

static GLOBAL: OnceLock<LineAttacks> = OnceLock::new();

/// Builds the process-wide table on first call and returns it.
///
/// Later calls return the same table.
pub fn init_attack_tables() -> &'static LineAttacks {
    GLOBAL.get_or_init(LineAttacks::new)
}

/// Per-square line masks, `[line][square]`, each excluding the square itself.
#[derive(Clone, PartialEq, Eq)]
pub struct LineAttacks {
    lines: [[Bitboard; 64]; 4],
}

impl LineAttacks {
    /// Builds a fresh table.
    pub fn new() -> Self {
        tracing::debug!("building line attack table");
        LineAttacks {
            lines: compute_lines(),
        }
    }

    /// The shared table, built on first use.
    #[inline]
    pub fn global() -> &'static LineAttacks {
        init_attack_tables()
    }

    /// Unobstructed line through `sq` in both directions.
    #[inline]
    pub fn line(&self, line: Line, sq: Square) -> Bitboard {
        self.lines[line.index()][sq.index() as usize]
    }

    /// Attacks along `line` toward higher square indices, up to and including
    /// the first blocker in `occupied`.
    #[inline]
    pub fn positive_ray_attacks(&self, line: Line, sq: Square, occupied: Bitboard) -> Bitboard {
        let ray = self.line(line, sq).0 & above(sq);
        let blockers = (ray & occupied.0) | HIGH_SENTINEL;
        let first = Square::from_index_masked(blockers.trailing_zeros());
        Bitboard(ray ^ (self.line(line, first).0 & above(first)))
    }

    /// Attacks along `line` toward lower square indices, up to and including
    /// the first blocker in `occupied`.
    #[inline]
    pub fn negative_ray_attacks(&self, line: Line, sq: Square, occupied: Bitboard) -> Bitboard {
        let ray = self.line(line, sq).0 & below(sq);
        let blockers = (ray & occupied.0) | LOW_SENTINEL;
        let first = Square::from_index_masked(63 - blockers.leading_zeros());
        Bitboard(ray ^ (self.line(line, first).0 & below(first)))
    }

    /// Both rays along `line`.
    #[inline]
    pub fn line_attacks(&self, line: Line, sq: Square, occupied: Bitboard) -> Bitboard {
        self.positive_ray_attacks(line, sq, occupied) | self.negative_ray_attacks(line, sq, occupied)
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.line_attacks(Line::Diagonal, sq, occupied)
            | self.line_attacks(Line::Antidiagonal, sq, occupied)
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.line_attacks(Line::Horizontal, sq, occupied)
            | self.line_attacks(Line::Vertical, sq, occupied)
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks(sq, occupied) | self.rook_attacks(sq, occupied)
    }
}

impl Default for LineAttacks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LineAttacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineAttacks").finish_non_exhaustive()
    }
}
