//! Win detection for five in a row.

use crate::board::Board;
use crate::types::{Cell, Coord, Side};

/// Stones in an unbroken line needed to win. Overlines also win.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Returns the winning side if the stone at `coord` completes a line.
///
/// Only lines through `coord` are inspected, so this is meant to be called
/// right after a placement.
pub fn winner_at(board: &Board, coord: Coord) -> Option<Side> {
    let Some(Cell::Stone(side)) = board.get(coord) else {
        return None;
    };

    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| {
            1 + run_length(board, coord, side, dr, dc) + run_length(board, coord, side, -dr, -dc)
                >= WIN_LENGTH
        })
        .then_some(side)
}

/// Counts consecutive stones of `side` starting next to `coord`.
fn run_length(board: &Board, coord: Coord, side: Side, dr: isize, dc: isize) -> usize {
    let mut count = 0;
    let mut row = coord.row as isize + dr;
    let mut col = coord.col as isize + dc;
    while row >= 0 && col >= 0 {
        if board.get(Coord::new(row as usize, col as usize)) != Some(Cell::Stone(side)) {
            break;
        }
        count += 1;
        row += dr;
        col += dc;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(stones: &[(usize, usize, Side)]) -> Board {
        let mut board = Board::new(9).unwrap();
        for &(row, col, side) in stones {
            board.place(Coord::new(row, col), side).unwrap();
        }
        board
    }

    #[test]
    fn test_horizontal_five_wins() {
        let stones: Vec<_> = (2..7).map(|col| (4, col, Side::Black)).collect();
        let board = board_with(&stones);
        assert_eq!(winner_at(&board, Coord::new(4, 4)), Some(Side::Black));
    }

    #[test]
    fn test_anti_diagonal_five_wins() {
        let stones: Vec<_> = (0..5).map(|i| (i, 6 - i, Side::White)).collect();
        let board = board_with(&stones);
        assert_eq!(winner_at(&board, Coord::new(0, 6)), Some(Side::White));
    }

    #[test]
    fn test_four_does_not_win() {
        let stones: Vec<_> = (0..4).map(|row| (row, 0, Side::Black)).collect();
        let board = board_with(&stones);
        assert_eq!(winner_at(&board, Coord::new(3, 0)), None);
    }

    #[test]
    fn test_broken_line_does_not_win() {
        let mut stones: Vec<_> = (0..5).map(|col| (0, col, Side::Black)).collect();
        stones[2].2 = Side::White;
        let board = board_with(&stones);
        assert_eq!(winner_at(&board, Coord::new(0, 4)), None);
    }

    #[test]
    fn test_empty_cell_has_no_winner() {
        let board = Board::new(9).unwrap();
        assert_eq!(winner_at(&board, Coord::new(4, 4)), None);
    }
}
