//! Pure gomoku (five-in-a-row) game logic.
//!
//! This crate owns board representation, turn order, legality and win
//! detection. It knows nothing about agents or language models; callers
//! read it through [`Game`] and its rendering.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod game;
mod render;
mod rules;
mod types;

pub use board::{Board, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
pub use game::{Game, GameStatus};
pub use render::BoardFormat;
pub use rules::{WIN_LENGTH, winner_at};
pub use types::{BoardError, Cell, Coord, Side};
