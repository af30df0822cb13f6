//! Read-only view of a game engine.

use crate::error::MoveError;
use gomoku_board::{BoardFormat, Coord, Game, Side};

/// Capabilities the move resolver needs from a game engine.
///
/// The resolver only ever reads through this trait; applying the chosen
/// move stays with the engine.
pub trait MoveSource {
    /// Renders the board as text.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveErrorKind::Render`](crate::MoveErrorKind::Render)
    /// error if the engine cannot produce this format.
    fn render(&self, format: BoardFormat) -> Result<String, MoveError>;

    /// Side to move, if the engine knows it.
    fn current_side(&self) -> Option<Side>;

    /// Cells the side to move may play. Empty once the game is over.
    fn legal_moves(&self) -> Vec<Coord>;

    /// Board side length.
    fn size(&self) -> usize;
}

impl MoveSource for Game {
    fn render(&self, format: BoardFormat) -> Result<String, MoveError> {
        Ok(Game::render(self, format))
    }

    fn current_side(&self) -> Option<Side> {
        (!self.is_over()).then(|| self.to_move())
    }

    fn legal_moves(&self) -> Vec<Coord> {
        Game::legal_moves(self)
    }

    fn size(&self) -> usize {
        self.board().size()
    }
}
