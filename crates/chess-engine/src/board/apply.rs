//! Reversible move application.

use super::{Board, CastlingRights};
use chess_core::{Color, Move, Piece, PieceId, Square};

/// Board state a move destroys, recorded by [`Board::apply`] and consumed by
/// [`Board::undo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveUndo {
    captured: Option<PieceId>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

impl MoveUndo {
    /// The piece the move captured, if any.
    #[inline]
    pub fn captured(&self) -> Option<PieceId> {
        self.captured
    }

    /// Castling rights before the move.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// En passant square before the move.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
}

/// Square of the pawn removed by an en passant capture landing on `to`.
#[inline]
fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::new(to.file(), from.rank())
}

impl Board {
    /// Plays `m` in place and returns what [`Board::undo`] needs to revert it.
    ///
    /// `m` must have been generated for this board: the mover must stand on
    /// `m.from()`.
    pub fn apply(&mut self, m: Move) -> MoveUndo {
        let undo = MoveUndo {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        };
        let from = m.from();
        let to = m.to();
        let mover = self.piece_at(from);
        debug_assert!(mover.is_some(), "apply {:?}: {} is empty", m, from);
        let color = mover.map_or(self.side_to_move, PieceId::color);
        let is_pawn = mover.map(PieceId::piece) == Some(Piece::Pawn);

        let mut captured = None;
        if let Some((king_to, rook_to)) = m.castle_targets() {
            self.relocate_piece(from, king_to);
            self.relocate_piece(to, rook_to);
        } else {
            if m.is_en_passant() {
                captured = self.remove_piece(en_passant_victim(from, to));
            } else if m.is_capture() {
                captured = self.remove_piece(to);
            }
            self.relocate_piece(from, to);
            if let Some(promoted) = m.promotion_piece() {
                self.remove_piece(to);
                self.put_piece(to, PieceId::new(promoted, color));
            }
        }

        self.castling
            .remove(CastlingRights::revoked_by(from) | CastlingRights::revoked_by(to));
        self.en_passant = if is_pawn && from.index().abs_diff(to.index()) == 16 {
            Square::from_index((from.index() + to.index()) / 2)
        } else {
            None
        };
        self.halfmove_clock = if is_pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.opposite();

        MoveUndo { captured, ..undo }
    }

    /// Reverts `m`, which must be the last move applied to this board, using
    /// the record [`Board::apply`] returned for it.
    pub fn undo(&mut self, m: Move, undo: &MoveUndo) {
        self.side_to_move = self.side_to_move.opposite();
        if self.side_to_move == Color::Black {
            self.fullmove_number -= 1;
        }

        let from = m.from();
        let to = m.to();
        if let Some((king_to, rook_to)) = m.castle_targets() {
            self.relocate_piece(rook_to, to);
            self.relocate_piece(king_to, from);
        } else {
            if m.is_promotion() {
                if let Some(promoted) = self.remove_piece(to) {
                    self.put_piece(to, PieceId::new(Piece::Pawn, promoted.color()));
                }
            }
            self.relocate_piece(to, from);
            if let Some(captured) = undo.captured {
                let sq = if m.is_en_passant() {
                    en_passant_victim(from, to)
                } else {
                    to
                };
                self.put_piece(sq, captured);
            }
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Square;

    fn roundtrip(fen: &str, m: Move) -> Board {
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let undo = board.apply(m);
        assert!(board.check_consistency().is_ok());
        let after = board.clone();
        board.undo(m, &undo);
        assert_eq!(board, before);
        after
    }

    #[test]
    fn double_push_sets_en_passant() {
        let after = roundtrip(chess_core::Fen::STARTPOS, Move::quiet(Square::E2, Square::E4));
        assert_eq!(after.en_passant(), Some(Square::E3));
        assert_eq!(after.side_to_move(), Color::Black);
        assert_eq!(
            after.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn capture_records_victim() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let m = Move::capture(Square::E4, Square::D5);
        let undo = board.apply(m);
        assert_eq!(undo.captured(), Some(PieceId::new(Piece::Pawn, Color::Black)));
        assert_eq!(undo.en_passant(), Some(Square::D6));
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_removes_pawn_behind() {
        let after = roundtrip(
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            Move::en_passant(Square::E5, Square::F6),
        );
        assert_eq!(after.piece_at(Square::F5), None);
        assert_eq!(
            after.piece_at(Square::F6),
            Some(PieceId::new(Piece::Pawn, Color::White))
        );
    }

    #[test]
    fn promotion_and_demotion() {
        let after = roundtrip(
            "3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1",
            Move::promotion(Square::E7, Square::D8, true, Piece::Knight),
        );
        assert_eq!(
            after.piece_at(Square::D8),
            Some(PieceId::new(Piece::Knight, Color::White))
        );
        assert_eq!(after.pieces(Piece::Pawn, Color::White).count(), 0);
    }

    #[test]
    fn castle_moves_king_and_rook() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10";
        let after = roundtrip(fen, Move::castle(Square::E1, Square::H1));
        assert_eq!(
            after.piece_at(Square::G1),
            Some(PieceId::new(Piece::King, Color::White))
        );
        assert_eq!(
            after.piece_at(Square::F1),
            Some(PieceId::new(Piece::Rook, Color::White))
        );
        assert_eq!(
            after.castling(),
            CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
        );
        assert_eq!(after.halfmove_clock(), 4);

        let mut board = Board::from_fen(fen).unwrap();
        board.apply(Move::quiet(Square::A1, Square::B1));
        let after = roundtrip(&board.to_fen(), Move::castle(Square::E8, Square::A8));
        assert_eq!(
            after.piece_at(Square::C8),
            Some(PieceId::new(Piece::King, Color::Black))
        );
        assert_eq!(
            after.piece_at(Square::D8),
            Some(PieceId::new(Piece::Rook, Color::Black))
        );
        assert_eq!(after.castling(), CastlingRights::WHITE_KINGSIDE);
        assert_eq!(after.fullmove_number(), 11);
    }

    #[test]
    fn undo_restores_revoked_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let first = Move::quiet(Square::E1, Square::E2);
        let first_undo = board.apply(first);
        let second = Move::quiet(Square::A8, Square::A7);
        let second_undo = board.apply(second);
        assert_eq!(board.castling(), CastlingRights::BLACK_KINGSIDE);
        board.undo(second, &second_undo);
        board.undo(first, &first_undo);
        assert_eq!(board.castling(), CastlingRights::ALL);
    }
}
