//! FEN (Forsyth-Edwards Notation) parsing into typed fields.

use crate::{Color, File, Piece, PieceId, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// A FEN record decoded into typed values.
///
/// The engine turns this into its board representation; this type only
/// guarantees the text was well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Occupied squares, in FEN reading order (a8 first).
    pub placement: Vec<(Square, PieceId)>,
    /// Side to move.
    pub side_to_move: Color,
    /// Castling availability in `KQkq` order (`[white K, white Q, black k, black q]`).
    pub castling: [bool; 4],
    /// En passant target square, if any.
    pub en_passant: Option<Square>,
    /// Halfmove clock (0 when the field is omitted).
    pub halfmove_clock: u32,
    /// Fullmove number (1 when the field is omitted).
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. The two clock fields may be omitted.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let placement = Self::parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(fields[2])?;
        let en_passant = Self::parse_en_passant(fields[3])?;

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            let halfmove = fields[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(fields[4].to_string()))?;
            let fullmove = fields[5]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(fields[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<Vec<(Square, PieceId)>, FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut pieces = Vec::with_capacity(32);
        for (row, text) in rows.iter().enumerate() {
            let rank_number = 8 - row;
            let rank = Rank::ALL[7 - row];
            let too_long = || {
                FenError::InvalidPiecePlacement(format!(
                    "rank {} has more than 8 squares",
                    rank_number
                ))
            };
            let mut file = 0u8;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if u32::from(file) + skip > 8 {
                        return Err(too_long());
                    }
                    file += skip as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let square = File::from_index(file)
                        .map(|f| Square::new(f, rank))
                        .ok_or_else(too_long)?;
                    pieces.push((square, PieceId::new(piece, color)));
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank_number
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank_number, file
                )));
            }
        }
        Ok(pieces)
    }

    fn parse_castling(castling: &str) -> Result<[bool; 4], FenError> {
        let mut rights = [false; 4];
        if castling == "-" {
            return Ok(rights);
        }
        for c in castling.chars() {
            let slot = match c {
                'K' => 0,
                'Q' => 1,
                'k' => 2,
                'q' => 3,
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            };
            rights[slot] = true;
        }
        Ok(rights)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank() == Rank::R3 || sq.rank() == Rank::R6 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }
}
