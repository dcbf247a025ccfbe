//! Replaying a parsed game onto an engine [`Board`].

use crate::{PgnError, PgnGame, PgnMove};
use chess_core::Move;
use chess_engine::{resolve_san, Board, LineAttacks};

/// One replayed ply.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    /// 1-based ply index.
    pub ply: usize,
    pub san: String,
    pub mv: Move,
    /// Position after the move.
    pub board: Board,
}

/// Iterator resolving a game's moves one ply at a time.
///
/// Stops after the first move that fails to resolve.
pub struct Replay<'a> {
    board: Board,
    tables: &'a LineAttacks,
    moves: std::slice::Iter<'a, PgnMove>,
    ply: usize,
    failed: bool,
}

impl<'a> Replay<'a> {
    /// Starts a replay from the game's starting position.
    pub fn new(game: &'a PgnGame, tables: &'a LineAttacks) -> Result<Self, PgnError> {
        Ok(Self {
            board: game.starting_board()?,
            tables,
            moves: game.moves.iter(),
            ply: 0,
            failed: false,
        })
    }

    /// The position after the last replayed ply.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl Iterator for Replay<'_> {
    type Item = Result<ReplayStep, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let pgn_move = self.moves.next()?;
        self.ply += 1;

        match resolve_san(&self.board, self.tables, &pgn_move.san) {
            Ok(mv) => {
                self.board.apply(mv);
                tracing::trace!(ply = self.ply, san = %pgn_move.san, mv = %mv, "replayed");
                Some(Ok(ReplayStep {
                    ply: self.ply,
                    san: pgn_move.san.clone(),
                    mv,
                    board: self.board.clone(),
                }))
            }
            Err(source) => {
                tracing::warn!(ply = self.ply, san = %pgn_move.san, error = %source, "unresolved move");
                self.failed = true;
                Some(Err(PgnError::UnresolvedMove {
                    ply: self.ply,
                    san: pgn_move.san.clone(),
                    source,
                }))
            }
        }
    }
}

/// Resolves every mainline move of `game`, in order.
pub fn replay(game: &PgnGame, tables: &LineAttacks) -> Result<Vec<Move>, PgnError> {
    Replay::new(game, tables)?
        .map(|step| step.map(|step| step.mv))
        .collect()
}
