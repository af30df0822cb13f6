//! Game flow: turn order, status and history.

use crate::board::Board;
use crate::render::BoardFormat;
use crate::rules::winner_at;
use crate::types::{BoardError, Coord, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with five in a row.
    Won(Side),
    /// Board filled without a winner.
    Draw,
}

/// Gomoku game engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Side,
    first_side: Side,
    status: GameStatus,
    history: Vec<Coord>,
}

impl Game {
    /// Creates a new game on a `size`×`size` board with Black to move.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] for unsupported sizes.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, BoardError> {
        Self::with_first_side(size, Side::Black)
    }

    /// Creates a new game where `first_side` makes the opening move.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] for unsupported sizes.
    #[instrument]
    pub fn with_first_side(size: usize, first_side: Side) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::new(size)?,
            to_move: first_side,
            first_side,
            status: GameStatus::InProgress,
            history: Vec::new(),
        })
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Returns the side that made the opening move.
    pub fn first_side(&self) -> Side {
        self.first_side
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns `true` once the game has a winner or is drawn.
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Returns the coordinates played so far, oldest first.
    pub fn history(&self) -> &[Coord] {
        &self.history
    }

    /// Lists the cells the side to move may play, in row-major order.
    ///
    /// Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Coord> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.empty_coords()
    }

    /// Renders the board.
    pub fn render(&self, format: BoardFormat) -> String {
        self.board.render(format)
    }

    /// Places a stone for the side to move and returns the new status.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::GameOver`] after the game has ended, or
    /// [`BoardError::OutOfBounds`] / [`BoardError::Occupied`] for an
    /// unplayable cell. The game is unchanged on error.
    #[instrument(skip(self), fields(coord = %coord, side = %self.to_move))]
    pub fn place(&mut self, coord: Coord) -> Result<GameStatus, BoardError> {
        if self.is_over() {
            return Err(BoardError::GameOver);
        }

        self.board.place(coord, self.to_move)?;
        self.history.push(coord);
        debug!(moves = self.history.len(), "Stone placed");

        if let Some(winner) = winner_at(&self.board, coord) {
            info!(winner = %winner, "Five in a row");
            self.status = GameStatus::Won(winner);
        } else if self.board.is_full() {
            info!("Board full, game drawn");
            self.status = GameStatus::Draw;
        } else {
            self.to_move = self.to_move.opponent();
        }

        Ok(self.status)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            board: Board::default(),
            to_move: Side::Black,
            first_side: Side::Black,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }
}
