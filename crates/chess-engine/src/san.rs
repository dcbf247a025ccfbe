//! Standard Algebraic Notation (SAN) resolution.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1".
//!
//! Resolution maps the text onto one move produced by the pseudo-legal
//! generator for the side to move. The destination square narrows generation
//! to a single target; disambiguation hints and, as a last resort, king
//! safety pick between the remaining candidates.

use crate::movegen::{generate, is_square_attacked, GenType, LineAttacks, MoveList};
use crate::{Bitboard, Board};
use chess_core::{File, Move, Piece, Rank, Square};
use thiserror::Error;

/// Error type for SAN resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    #[error("no move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Components of a SAN string other than castling.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<Piece>,
    capture: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SanMove {
    Castle { kingside: bool },
    Regular(ParsedSan),
}

/// Resolves `text` to a move for the side to move on `board`.
pub fn resolve_san(board: &Board, tables: &LineAttacks, text: &str) -> Result<Move, SanError> {
    let parsed = parse_san(text)?;
    let color = board.side_to_move();
    let mut candidates = MoveList::new();

    match &parsed {
        SanMove::Castle { kingside } => {
            let file = if *kingside { File::H } else { File::A };
            let rook = Square::new(file, color.back_rank());
            generate(
                board,
                tables,
                Piece::King,
                color,
                GenType::Castle,
                Bitboard::from_square(rook),
                &mut candidates,
            );
        }
        SanMove::Regular(san) => {
            let category = match (san.promotion.is_some(), san.capture) {
                (false, false) => GenType::Quiet,
                (false, true) => GenType::Capture,
                (true, false) => GenType::Promotion,
                (true, true) => GenType::PromotionCapture,
            };
            if san.promotion.is_some() && san.piece != Piece::Pawn {
                return Err(SanError::InvalidFormat(text.to_string()));
            }
            generate(
                board,
                tables,
                san.piece,
                color,
                category,
                Bitboard::from_square(san.to),
                &mut candidates,
            );
            candidates.retain(|m| {
                san.promotion.map_or(true, |p| m.promotion_piece() == Some(p))
                    && san.from_file.map_or(true, |f| m.from().file() == f)
                    && san.from_rank.map_or(true, |r| m.from().rank() == r)
            });
        }
    }

    if candidates.len() > 1 {
        tracing::debug!(san = text, count = candidates.len(), "filtering by king safety");
        candidates.retain(|&m| leaves_king_safe(board, tables, m));
    }

    match candidates.as_slice() {
        [m] => {
            tracing::trace!(san = text, mv = %m, "resolved");
            Ok(*m)
        }
        [] => Err(SanError::NoMatchingMove(text.to_string())),
        _ => Err(SanError::AmbiguousMove(text.to_string())),
    }
}

/// Whether the mover's king is safe after `m`.
fn leaves_king_safe(board: &Board, tables: &LineAttacks, m: Move) -> bool {
    let color = board.side_to_move();
    let mut scratch = board.clone();
    scratch.apply(m);
    match scratch.king_square(color) {
        Some(king) => !is_square_attacked(&scratch, tables, king, color.opposite()),
        None => true,
    }
}

fn parse_san(text: &str) -> Result<SanMove, SanError> {
    let trimmed = text
        .trim()
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'));
    let trimmed = trimmed.strip_suffix("e.p.").unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return Err(SanError::Empty);
    }

    match trimmed {
        "O-O" | "0-0" => return Ok(SanMove::Castle { kingside: true }),
        "O-O-O" | "0-0-0" => return Ok(SanMove::Castle { kingside: false }),
        _ => {}
    }

    let invalid = || SanError::InvalidFormat(text.to_string());
    let promotion_piece = |c: char| match Piece::from_san_char(c) {
        Some(piece) if Piece::PROMOTIONS.contains(&piece) => Ok(piece),
        _ => Err(invalid()),
    };

    let (body, promotion) = match trimmed.split_once('=') {
        Some((body, promo)) => {
            let mut chars = promo.chars();
            let piece = match (chars.next(), chars.next()) {
                (Some(c), None) => promotion_piece(c)?,
                _ => return Err(invalid()),
            };
            (body, Some(piece))
        }
        // `e8Q`: the piece letter follows the destination directly.
        None => match trimmed.char_indices().last() {
            Some((at, c)) if at >= 2 && c.is_ascii_uppercase() => {
                (&trimmed[..at], Some(promotion_piece(c)?))
            }
            _ => (trimmed, None),
        },
    };

    let mut chars: Vec<char> = body.chars().collect();
    let piece = match chars.first().copied().and_then(Piece::from_san_char) {
        Some(piece) => {
            chars.remove(0);
            piece
        }
        None => Piece::Pawn,
    };

    let capture = chars.contains(&'x');
    chars.retain(|&c| c != 'x');

    if chars.len() < 2 || chars.len() > 4 {
        return Err(invalid());
    }
    let (hint, dest) = chars.split_at(chars.len() - 2);
    let to = File::from_char(dest[0])
        .zip(Rank::from_char(dest[1]))
        .map(|(f, r)| Square::new(f, r))
        .ok_or_else(invalid)?;

    let mut from_file = None;
    let mut from_rank = None;
    for &c in hint {
        if let Some(f) = File::from_char(c) {
            if from_file.replace(f).is_some() {
                return Err(invalid());
            }
        } else if let Some(r) = Rank::from_char(c) {
            if from_rank.replace(r).is_some() {
                return Err(invalid());
            }
        } else {
            return Err(invalid());
        }
    }

    Ok(SanMove::Regular(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
        capture,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(fen: &str, san: &str) -> Result<Move, SanError> {
        let board = Board::from_fen(fen).unwrap();
        resolve_san(&board, LineAttacks::global(), san)
    }

    const START: &str = chess_core::Fen::STARTPOS;

    #[test]
    fn pawn_and_piece_moves() {
        assert_eq!(resolve(START, "e4"), Ok(Move::quiet(Square::E2, Square::E4)));
        assert_eq!(resolve(START, "Nf3"), Ok(Move::quiet(Square::G1, Square::F3)));
        assert_eq!(resolve(START, "Nc3!?"), Ok(Move::quiet(Square::B1, Square::C3)));
    }

    #[test]
    fn pawn_capture_uses_file_hint() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/2P1P3/8/PP1P1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(resolve(fen, "exd5"), Ok(Move::capture(Square::E4, Square::D5)));
        assert_eq!(resolve(fen, "cxd5"), Ok(Move::capture(Square::C4, Square::D5)));
        assert_eq!(
            resolve(fen, "xd5"),
            Err(SanError::AmbiguousMove("xd5".to_string()))
        );
    }

    #[test]
    fn en_passant_capture() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        assert_eq!(
            resolve(fen, "exf6"),
            Ok(Move::en_passant(Square::E5, Square::F6))
        );
    }

    #[test]
    fn castling() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(resolve(fen, "O-O"), Ok(Move::castle(Square::E1, Square::H1)));
        assert_eq!(resolve(fen, "0-0-0+"), Ok(Move::castle(Square::E1, Square::A1)));
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1";
        assert_eq!(resolve(fen, "O-O-O"), Ok(Move::castle(Square::E8, Square::A8)));
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQq - 0 1";
        assert_eq!(
            resolve(fen, "O-O"),
            Err(SanError::NoMatchingMove("O-O".to_string()))
        );
    }

    #[test]
    fn promotion() {
        let fen = "3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(
            resolve(fen, "e8=Q+"),
            Ok(Move::promotion(Square::E7, Square::E8, false, Piece::Queen))
        );
        assert_eq!(
            resolve(fen, "exd8=N"),
            Ok(Move::promotion(Square::E7, Square::D8, true, Piece::Knight))
        );
        assert!(matches!(resolve(fen, "e8=K"), Err(SanError::InvalidFormat(_))));
    }

    #[test]
    fn promotion_without_equals_sign() {
        let fen = "3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(
            resolve(fen, "e8Q"),
            Ok(Move::promotion(Square::E7, Square::E8, false, Piece::Queen))
        );
        assert_eq!(
            resolve(fen, "exd8N+"),
            Ok(Move::promotion(Square::E7, Square::D8, true, Piece::Knight))
        );
        assert!(matches!(resolve(fen, "e8K"), Err(SanError::InvalidFormat(_))));
    }

    #[test]
    fn en_passant_suffix_is_ignored() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let expected = Ok(Move::en_passant(Square::E5, Square::F6));
        assert_eq!(resolve(fen, "exf6e.p."), expected);
        assert_eq!(resolve(fen, "exf6 e.p.+"), expected);
    }

    #[test]
    fn disambiguation_by_file_and_rank() {
        let fen = "4k3/8/8/8/8/8/4K3/R6R w - - 0 1";
        assert_eq!(resolve(fen, "Rad1"), Ok(Move::quiet(Square::A1, Square::D1)));
        assert_eq!(resolve(fen, "Rhd1"), Ok(Move::quiet(Square::H1, Square::D1)));
        assert_eq!(
            resolve(fen, "Rf1"),
            Err(SanError::AmbiguousMove("Rf1".to_string()))
        );
        let fen = "4k3/8/8/8/R7/8/8/R3K3 w - - 0 1";
        assert_eq!(resolve(fen, "R1a2"), Ok(Move::quiet(Square::A1, Square::A2)));
        assert_eq!(resolve(fen, "Ra4a3"), Ok(Move::quiet(Square::A4, Square::A3)));
    }

    #[test]
    fn pinned_piece_is_not_a_candidate() {
        // The c3 knight is pinned by the b4 bishop, so Ne2 can only be the g1 knight.
        let fen = "4k3/8/8/8/1b6/2N5/8/4K1N1 w - - 0 1";
        assert_eq!(resolve(fen, "Ne2"), Ok(Move::quiet(Square::G1, Square::E2)));
    }

    #[test]
    fn malformed_text() {
        assert_eq!(resolve(START, ""), Err(SanError::Empty));
        assert_eq!(resolve(START, "+"), Err(SanError::Empty));
        assert!(matches!(resolve(START, "Zz9"), Err(SanError::InvalidFormat(_))));
        assert!(matches!(resolve(START, "e"), Err(SanError::InvalidFormat(_))));
        assert!(matches!(resolve(START, "Nbb1c3"), Err(SanError::InvalidFormat(_))));
        assert_eq!(
            resolve(START, "e5"),
            Err(SanError::NoMatchingMove("e5".to_string()))
        );
    }
}
