//! Attack sets for every piece kind.
//!
//! Leapers are computed per query by shifting a single-bit board; sliders
//! come from the [`LineAttacks`] table.

use super::lines::LineAttacks;
use crate::Bitboard;
use chess_core::{Color, Piece, Square};

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    let bb = Bitboard::from_square(sq);
    let one = bb.east() | bb.west();
    let two = bb.east().east() | bb.west().west();
    one.north().north() | one.south().south() | two.north() | two.south()
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    let bb = Bitboard::from_square(sq);
    let row = bb | bb.east() | bb.west();
    (row | row.north() | row.south()) ^ bb
}

/// Returns the squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    let bb = Bitboard::from_square(sq);
    match color {
        Color::White => bb.north_east() | bb.north_west(),
        Color::Black => bb.south_east() | bb.south_west(),
    }
}

/// Attack set of a `piece` of `color` on `sq` given the board occupancy.
pub fn piece_attacks(
    tables: &LineAttacks,
    piece: Piece,
    color: Color,
    sq: Square,
    occupied: Bitboard,
) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => tables.bishop_attacks(sq, occupied),
        Piece::Rook => tables.rook_attacks(sq, occupied),
        Piece::Queen => tables.queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attack_counts() {
        assert_eq!(knight_attacks(Square::D4).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(Square::A4).count(), 4);
        assert_eq!(knight_attacks(Square::H8).count(), 2);
        assert_eq!(knight_attacks(Square::G2).count(), 4);
    }

    #[test]
    fn knight_on_e4() {
        let attacks = knight_attacks(Square::E4);
        for sq in [
            Square::D6,
            Square::F6,
            Square::G5,
            Square::G3,
            Square::F2,
            Square::D2,
            Square::C3,
            Square::C5,
        ] {
            assert!(attacks.contains(sq), "missing {}", sq);
        }
    }

    #[test]
    fn king_attack_counts() {
        assert_eq!(king_attacks(Square::D4).count(), 8);
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(Square::A4).count(), 5);
        assert!(!king_attacks(Square::D4).contains(Square::D4));
    }

    #[test]
    fn pawn_attacks_by_color() {
        let white = pawn_attacks(Square::D4, Color::White);
        assert_eq!(white.count(), 2);
        assert!(white.contains(Square::C5));
        assert!(white.contains(Square::E5));

        let black = pawn_attacks(Square::D4, Color::Black);
        assert!(black.contains(Square::C3));
        assert!(black.contains(Square::E3));

        assert_eq!(pawn_attacks(Square::A4, Color::White), Bitboard::from_square(Square::B5));
        assert!(pawn_attacks(Square::D8, Color::White).is_empty());
    }

    #[test]
    fn piece_attacks_dispatch() {
        let tables = LineAttacks::global();
        let occupied = Bitboard::EMPTY;
        assert_eq!(
            piece_attacks(tables, Piece::Queen, Color::White, Square::D4, occupied).count(),
            27
        );
        assert_eq!(
            piece_attacks(tables, Piece::Knight, Color::Black, Square::D4, occupied),
            knight_attacks(Square::D4)
        );
        assert_eq!(
            piece_attacks(tables, Piece::Pawn, Color::Black, Square::D4, occupied),
            pawn_attacks(Square::D4, Color::Black)
        );
    }
}
