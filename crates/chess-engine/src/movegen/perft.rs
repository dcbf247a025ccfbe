//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Every node is visited by applying and undoing moves on a single board.

use super::{generate_all, LineAttacks, MoveList};
use crate::Board;

/// Counts the leaf nodes `depth` plies below `board`.
///
/// The board is mutated during the walk and restored before returning.
pub fn perft(board: &mut Board, tables: &LineAttacks, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    let count = generate_all(board, tables, board.side_to_move(), &mut moves);

    if depth == 1 {
        return count as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        let undo = board.apply(m);
        nodes += perft(board, tables, depth - 1);
        board.undo(m, &undo);
    }
    nodes
}

/// Perft with divide: the node count below each root move, sorted by the
/// move's coordinate notation.
pub fn perft_divide(board: &mut Board, tables: &LineAttacks, depth: u32) -> Vec<(String, u64)> {
    let mut moves = MoveList::new();
    generate_all(board, tables, board.side_to_move(), &mut moves);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let undo = board.apply(m);
        let nodes = if depth > 1 {
            perft(board, tables, depth - 1)
        } else {
            1
        };
        board.undo(m, &undo);
        tracing::trace!(mv = %m, nodes, "perft divide");
        results.push((m.to_coordinate(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_startpos_shallow() {
        let mut board = Board::startpos();
        let tables = LineAttacks::global();
        assert_eq!(perft(&mut board, tables, 0), 1);
        assert_eq!(perft(&mut board, tables, 1), 20);
        assert_eq!(perft(&mut board, tables, 2), 400);
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::startpos();
        let tables = LineAttacks::global();
        let divide = perft_divide(&mut board, tables, 2);
        assert_eq!(divide.len(), 20);
        assert!(divide.iter().all(|(_, n)| *n == 20));
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert_eq!(divide[0].0, "a2a3");
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn divide_depth_one_counts_each_move_once() {
        let mut board =
            Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let tables = LineAttacks::global();
        let divide = perft_divide(&mut board, tables, 1);
        assert_eq!(divide.len() as u64, perft(&mut board, tables, 1));
        assert!(divide.iter().any(|(m, _)| m == "e1g1"));
        assert!(divide.iter().any(|(m, _)| m == "e1c1"));
    }
}
