//! Move-resolution error types.

use crate::llm_client::LlmError;
use derive_more::{Display, Error};
use tracing::instrument;

/// Which stage of move resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MoveErrorKind {
    /// Engine rendering failed or produced nothing parseable.
    #[display("render")]
    Render,
    /// Completion call failed, timed out, was cancelled or returned no text.
    #[display("transport")]
    Transport,
    /// Reply contained no brace-delimited object.
    #[display("parse")]
    Parse,
    /// Object did not decode or lacked integer `row` / `col`.
    #[display("schema")]
    Schema,
    /// Coordinate out of bounds or not a legal move.
    #[display("illegal move")]
    IllegalMove,
    /// The engine offered no legal move at all.
    #[display("no legal moves")]
    NoLegalMoves,
}

/// Move-resolution error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Move error ({}): {} at {}:{}", kind, message, file, line)]
pub struct MoveError {
    /// Failure category.
    pub kind: MoveErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MoveError {
    /// Creates a new move error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: MoveErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> MoveErrorKind {
        self.kind
    }

    /// Returns `true` if the orchestrator may recover by falling back.
    pub fn is_recoverable(&self) -> bool {
        self.kind != MoveErrorKind::NoLegalMoves
    }
}

impl From<LlmError> for MoveError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(MoveErrorKind::Transport, err.message)
    }
}
