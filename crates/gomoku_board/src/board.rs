//! Square gomoku board.

use crate::types::{BoardError, Cell, Coord, Side};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Standard tournament board size.
pub const DEFAULT_SIZE: usize = 15;

/// Smallest board on which five in a row is possible.
pub const MIN_SIZE: usize = 5;

/// Largest supported board.
pub const MAX_SIZE: usize = 26;

/// An N×N board of cells stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] unless `MIN_SIZE <= size <= MAX_SIZE`.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize { size });
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Returns the side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the coordinate lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// Gets the cell at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if !self.contains(coord) {
            return None;
        }
        self.cells.get(coord.row * self.size + coord.col).copied()
    }

    /// Checks if a cell is on the board and empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Cell::Empty))
    }

    /// Places a stone on an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] or [`BoardError::Occupied`].
    pub(crate) fn place(&mut self, coord: Coord, side: Side) -> Result<(), BoardError> {
        if !self.contains(coord) {
            return Err(BoardError::OutOfBounds { coord });
        }
        let index = coord.row * self.size + coord.col;
        if !self.cells[index].is_empty() {
            return Err(BoardError::Occupied { coord });
        }
        self.cells[index] = Cell::Stone(side);
        Ok(())
    }

    /// Counts the stones of one side.
    pub fn stone_count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Stone(side))
            .count()
    }

    /// Lists every empty coordinate in row-major order.
    pub fn empty_coords(&self) -> Vec<Coord> {
        self.coords().filter(|coord| self.is_empty(*coord)).collect()
    }

    /// Returns `true` if no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Iterates rows as slices of cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Coord::new(row, col)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            cells: vec![Cell::Empty; DEFAULT_SIZE * DEFAULT_SIZE],
        }
    }
}
