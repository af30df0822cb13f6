//! Move values flowing through the resolver.

use crate::error::MoveErrorKind;
use derive_more::Display;
use gomoku_board::Coord;
use serde::{Deserialize, Serialize};

/// A coordinate read from untrusted reply text.
///
/// Signed because the reply may name negative cells; nothing here has been
/// checked against the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, derive_new::new,
)]
#[display("({row}, {col})")]
pub struct MoveCandidate {
    /// Row named in the reply.
    pub row: i64,
    /// Column named in the reply.
    pub col: i64,
}

/// Where a resolved move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MoveOrigin {
    /// The completion reply named a legal cell.
    #[display("model")]
    Model,
    /// The primary path failed and a random legal cell was chosen.
    #[display("fallback after {_0} error")]
    Fallback(MoveErrorKind),
}

/// A legal move ready to hand back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{coord} [{origin}]")]
pub struct ResolvedMove {
    coord: Coord,
    origin: MoveOrigin,
}

impl ResolvedMove {
    pub(crate) fn new(coord: Coord, origin: MoveOrigin) -> Self {
        Self { coord, origin }
    }

    /// The cell to play.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// How the move was obtained.
    pub fn origin(&self) -> MoveOrigin {
        self.origin
    }

    /// Returns `true` if the move came from the fallback selector.
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, MoveOrigin::Fallback(_))
    }
}
