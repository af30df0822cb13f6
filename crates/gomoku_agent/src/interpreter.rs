//! Lenient extraction of a move from free-form reply text.
//!
//! Replies often wrap the JSON object in prose or reasoning. The object is
//! located as the first `{` followed by at least one character and a `}`;
//! the span ends at the first closing brace, so nested objects are not
//! supported.

use crate::error::{MoveError, MoveErrorKind};
use crate::moves::MoveCandidate;
use tracing::{debug, instrument};

/// Finds the first brace-delimited span in `text`.
///
/// Empty `{}` spans are skipped. Returns `None` when no span exists.
pub fn find_object_span(text: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(open) = text[offset..].find('{').map(|i| offset + i) {
        let close = open + 1 + text[open + 1..].find('}')?;
        if close > open + 1 {
            return Some(&text[open..=close]);
        }
        offset = open + 1;
    }
    None
}

/// Extracts a row/column candidate from a reply.
///
/// # Errors
///
/// - [`MoveErrorKind::Parse`] if the reply holds no brace-delimited span.
/// - [`MoveErrorKind::Schema`] if the span is not JSON or lacks integer
///   `row` and `col` fields.
#[instrument(skip(reply), fields(reply_len = reply.len()))]
pub fn interpret_reply(reply: &str) -> Result<MoveCandidate, MoveError> {
    let span = find_object_span(reply).ok_or_else(|| {
        MoveError::new(MoveErrorKind::Parse, "No JSON object found in reply")
    })?;
    debug!(span = %span, "Found object span");

    let candidate: MoveCandidate = serde_json::from_str(span.trim()).map_err(|e| {
        MoveError::new(
            MoveErrorKind::Schema,
            format!("Reply object is not a valid move: {}", e),
        )
    })?;

    debug!(candidate = %candidate, "Interpreted reply");
    Ok(candidate)
}
