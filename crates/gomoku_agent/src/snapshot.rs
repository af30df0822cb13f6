//! Board snapshot extraction from a text rendering.
//!
//! The engine is read only through its rendering: every line is reduced to
//! the `X`, `O` and `.` markers it contains, lines without markers are
//! dropped, and the remaining rows are padded into a square grid.

use crate::error::{MoveError, MoveErrorKind};
use crate::source::MoveSource;
use gomoku_board::{BoardFormat, Cell, Coord, Side};
use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// A stone read from the rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new)]
pub struct PlacedStone {
    /// Cell holding the stone.
    pub coord: Coord,
    /// Owner of the stone.
    pub side: Side,
}

impl Serialize for PlacedStone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.coord.row)?;
        tuple.serialize_element(&self.coord.col)?;
        tuple.serialize_element(&self.side)?;
        tuple.end()
    }
}

/// Normalized copy of board occupancy and turn at one instant.
///
/// `stones` and `empty_cells` partition the `size`×`size` grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    #[serde(rename = "bot_side")]
    acting_side: Side,
    #[serde(rename = "opponent_side")]
    opposing_side: Side,
    stones: Vec<PlacedStone>,
    #[serde(rename = "empty_positions", serialize_with = "serialize_coords")]
    empty_cells: BTreeSet<Coord>,
    size: usize,
}

fn serialize_coords<S: Serializer>(coords: &BTreeSet<Coord>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(coords.iter().map(|coord| (coord.row, coord.col)))
}

impl BoardSnapshot {
    /// Snapshot signalling an unreadable board.
    pub fn degenerate(acting_side: Side) -> Self {
        Self {
            acting_side,
            opposing_side: acting_side.opponent(),
            stones: Vec::new(),
            empty_cells: BTreeSet::new(),
            size: 0,
        }
    }

    /// Side to move.
    pub fn acting_side(&self) -> Side {
        self.acting_side
    }

    /// Side not to move.
    pub fn opposing_side(&self) -> Side {
        self.opposing_side
    }

    /// Stones in row-major order.
    pub fn stones(&self) -> &[PlacedStone] {
        &self.stones
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> &BTreeSet<Coord> {
        &self.empty_cells
    }

    /// Grid side length; `0` when the board could not be read.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if no board rows were recognized.
    pub fn is_degenerate(&self) -> bool {
        self.size == 0
    }

    /// Compact JSON form used in prompts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveErrorKind::Render`] error if serialization fails.
    pub fn to_compact_json(&self) -> Result<String, MoveError> {
        serde_json::to_string(self).map_err(|e| {
            MoveError::new(
                MoveErrorKind::Render,
                format!("Failed to serialize snapshot: {}", e),
            )
        })
    }
}

/// Builds [`BoardSnapshot`]s from a [`MoveSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotExtractor {
    first_side: Side,
}

impl SnapshotExtractor {
    /// Creates an extractor that assumes `first_side` opens the game.
    ///
    /// The first side decides the turn when stone counts are equal and the
    /// engine does not report the side to move.
    pub fn new(first_side: Side) -> Self {
        Self { first_side }
    }

    /// Side assumed to move first.
    pub fn first_side(&self) -> Side {
        self.first_side
    }

    /// Renders the board, preferring the standard format.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveErrorKind::Render`] error if both the standard and
    /// the default format fail.
    #[instrument(skip(self, source))]
    pub fn render_board<S: MoveSource + ?Sized>(&self, source: &S) -> Result<String, MoveError> {
        match source.render(BoardFormat::Standard) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "Standard rendering failed, retrying with default format");
                source.render(BoardFormat::default())
            }
        }
    }

    /// Extracts a snapshot from the live engine.
    ///
    /// Never fails: an unrenderable board yields a degenerate snapshot.
    #[instrument(skip(self, source))]
    pub fn extract<S: MoveSource + ?Sized>(&self, source: &S) -> BoardSnapshot {
        match self.render_board(source) {
            Ok(text) => self.parse(&text, source.current_side()),
            Err(e) => {
                warn!(error = %e, "Board could not be rendered");
                BoardSnapshot::degenerate(source.current_side().unwrap_or(self.first_side))
            }
        }
    }

    /// Parses a rendering into a snapshot.
    ///
    /// `current_side` is used when known; otherwise the side to move is
    /// inferred from stone counts.
    #[instrument(skip(self, rendering), fields(rendering_len = rendering.len()))]
    pub fn parse(&self, rendering: &str, current_side: Option<Side>) -> BoardSnapshot {
        let mut rows: Vec<Vec<Cell>> = rendering
            .lines()
            .map(|line| line.chars().filter_map(Cell::from_marker).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            debug!("No board rows in rendering");
            return BoardSnapshot::degenerate(current_side.unwrap_or(self.first_side));
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let size = width.max(rows.len());
        rows.resize_with(size, Vec::new);
        for row in &mut rows {
            row.resize(size, Cell::Empty);
        }

        let mut stones = Vec::new();
        let mut empty_cells = BTreeSet::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let coord = Coord::new(r, c);
                match cell {
                    Cell::Empty => {
                        empty_cells.insert(coord);
                    }
                    Cell::Stone(side) => stones.push(PlacedStone::new(coord, *side)),
                }
            }
        }

        let acting_side = current_side.unwrap_or_else(|| {
            let black = stones.iter().filter(|s| s.side == Side::Black).count();
            let white = stones.len() - black;
            infer_acting_side(black, white, self.first_side)
        });

        debug!(
            size,
            stones = stones.len(),
            empty = empty_cells.len(),
            acting_side = %acting_side,
            "Snapshot extracted"
        );

        BoardSnapshot {
            acting_side,
            opposing_side: acting_side.opponent(),
            stones,
            empty_cells,
            size,
        }
    }
}

/// Infers the side to move from stone counts.
///
/// The side with fewer stones moves; on equal counts the first side moves.
pub fn infer_acting_side(black: usize, white: usize, first_side: Side) -> Side {
    match black.cmp(&white) {
        Ordering::Greater => Side::White,
        Ordering::Less => Side::Black,
        Ordering::Equal => first_side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD_5: &str = "    0  1  2  3  4
 0  .  .  .  .  .
 1  .  X  .  .  .
 2  .  .  O  .  .
 3  .  .  .  X  .
 4  .  .  .  .  .";

    #[test]
    fn test_parse_standard_rendering() {
        let snapshot = SnapshotExtractor::default().parse(STANDARD_5, None);

        assert_eq!(snapshot.size(), 5);
        assert_eq!(snapshot.stones().len(), 3);
        assert_eq!(snapshot.empty_cells().len(), 22);
        assert_eq!(
            snapshot.stones()[0],
            PlacedStone::new(Coord::new(1, 1), Side::Black)
        );
        assert_eq!(snapshot.acting_side(), Side::White);
        assert_eq!(snapshot.opposing_side(), Side::Black);
    }

    #[test]
    fn test_parse_pads_jagged_rows() {
        let snapshot = SnapshotExtractor::default().parse("X..\n.O\n.", None);

        assert_eq!(snapshot.size(), 3);
        assert_eq!(snapshot.stones().len() + snapshot.empty_cells().len(), 9);
        assert!(snapshot.empty_cells().contains(&Coord::new(1, 2)));
        assert!(snapshot.empty_cells().contains(&Coord::new(2, 2)));
    }

    #[test]
    fn test_parse_pads_missing_rows_to_square() {
        let snapshot = SnapshotExtractor::default().parse("....\n.X..", None);

        assert_eq!(snapshot.size(), 4);
        assert_eq!(snapshot.stones().len(), 1);
        assert_eq!(snapshot.empty_cells().len(), 15);
    }

    #[test]
    fn test_parse_without_board_rows_is_degenerate() {
        let snapshot = SnapshotExtractor::default().parse("nothing to see here\n  12 34", None);

        assert!(snapshot.is_degenerate());
        assert!(snapshot.stones().is_empty());
        assert!(snapshot.empty_cells().is_empty());
        assert_eq!(snapshot.acting_side(), Side::Black);
    }

    #[test]
    fn test_degenerate_snapshot_keeps_reported_side() {
        let extractor = SnapshotExtractor::new(Side::Black);
        assert_eq!(extractor.parse("", Some(Side::White)).acting_side(), Side::White);

        let extractor = SnapshotExtractor::new(Side::White);
        assert_eq!(extractor.parse("", None).acting_side(), Side::White);
    }

    #[test]
    fn test_reported_side_wins_over_counts() {
        let snapshot = SnapshotExtractor::default().parse("X....", Some(Side::Black));
        assert_eq!(snapshot.acting_side(), Side::Black);
    }

    #[test]
    fn test_infer_acting_side() {
        assert_eq!(infer_acting_side(3, 2, Side::Black), Side::White);
        assert_eq!(infer_acting_side(2, 3, Side::Black), Side::Black);
        assert_eq!(infer_acting_side(2, 2, Side::Black), Side::Black);
        assert_eq!(infer_acting_side(0, 0, Side::White), Side::White);
    }

    #[test]
    fn test_compact_json_shape() {
        let snapshot = SnapshotExtractor::default().parse("X.\n.O", None);
        let json = snapshot.to_compact_json().unwrap();

        assert_eq!(
            json,
            r#"{"bot_side":"X","opponent_side":"O","stones":[[0,0,"X"],[1,1,"O"]],"empty_positions":[[0,1],[1,0]],"size":2}"#
        );
    }
}
