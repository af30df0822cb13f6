//! Core domain types for gomoku.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// One of the two players.
///
/// Black plays `X` and moves first unless a game is created otherwise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Side {
    /// Black stones, marker `X`.
    #[default]
    #[display("X")]
    #[serde(rename = "X", alias = "black", alias = "Black", alias = "x")]
    Black,
    /// White stones, marker `O`.
    #[display("O")]
    #[serde(rename = "O", alias = "white", alias = "White", alias = "o")]
    White,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Returns the board marker for this side.
    pub fn marker(self) -> char {
        match self {
            Side::Black => 'X',
            Side::White => 'O',
        }
    }

    /// Parses a board marker.
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'X' => Some(Side::Black),
            'O' => Some(Side::White),
            _ => None,
        }
    }
}

/// A single intersection on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// A stone of the given side.
    Stone(Side),
}

impl Cell {
    /// Marker used for empty cells in renderings.
    pub const EMPTY_MARKER: char = '.';

    /// Returns the rendering marker for this cell.
    pub fn marker(self) -> char {
        match self {
            Cell::Empty => Self::EMPTY_MARKER,
            Cell::Stone(side) => side.marker(),
        }
    }

    /// Parses a rendering marker (`X`, `O` or `.`).
    pub fn from_marker(marker: char) -> Option<Self> {
        if marker == Self::EMPTY_MARKER {
            return Some(Cell::Empty);
        }
        Side::from_marker(marker).map(Cell::Stone)
    }

    /// Returns `true` if no stone occupies the cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Zero-indexed board coordinate.
///
/// Ordering is row-major, which keeps collections of coordinates in
/// reading order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("({row}, {col})")]
pub struct Coord {
    /// Row index, top to bottom.
    pub row: usize,
    /// Column index, left to right.
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Errors raised by board construction and stone placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Requested board size is outside the supported range.
    #[display("Board size {size} is outside the supported range")]
    InvalidSize {
        /// Requested size.
        size: usize,
    },
    /// Coordinate lies outside the board.
    #[display("Coordinate {coord} is outside the board")]
    OutOfBounds {
        /// Offending coordinate.
        coord: Coord,
    },
    /// Cell already holds a stone.
    #[display("Cell {coord} is already occupied")]
    Occupied {
        /// Offending coordinate.
        coord: Coord,
    },
    /// The game has already finished.
    #[display("Game is already over")]
    GameOver,
}
