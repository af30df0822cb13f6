//! Request payload construction.

use crate::error::MoveError;
use crate::snapshot::BoardSnapshot;
use derive_more::Display;
use serde::Serialize;
use tracing::{debug, instrument};

/// Speaker of a prompt block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing instructions.
    #[display("system")]
    System,
    /// Per-turn situation.
    #[display("user")]
    User,
}

/// A role-tagged block of prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptBlock {
    role: Role,
    content: String,
}

impl PromptBlock {
    /// Creates a block.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Speaker of the block.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Block text.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered blocks sent to the completion client for one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestPayload {
    blocks: Vec<PromptBlock>,
}

impl RequestPayload {
    /// Creates a payload from blocks in send order.
    pub fn new(blocks: Vec<PromptBlock>) -> Self {
        Self { blocks }
    }

    /// All blocks in send order.
    pub fn blocks(&self) -> &[PromptBlock] {
        &self.blocks
    }

    /// System blocks joined by blank lines.
    pub fn system_text(&self) -> String {
        self.joined(Role::System)
    }

    /// User blocks joined by blank lines.
    pub fn user_text(&self) -> String {
        self.joined(Role::User)
    }

    fn joined(&self, role: Role) -> String {
        self.blocks
            .iter()
            .filter(|block| block.role == role)
            .map(PromptBlock::content)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Builds the two-block payload for one move.
///
/// The instructions are passed through untouched; the user block carries
/// the raw rendering, the side to move and the compact snapshot.
///
/// # Errors
///
/// Returns a render error if the snapshot cannot be serialized.
#[instrument(skip_all, fields(instructions_len = instructions.len(), size = snapshot.size()))]
pub fn build_payload(
    instructions: &str,
    snapshot: &BoardSnapshot,
    rendering: &str,
) -> Result<RequestPayload, MoveError> {
    let state_json = snapshot.to_compact_json()?;
    let situation = format!(
        "Current board state:\n{}\nCurrent player: {}\n\nSTATE_JSON:\n{}\n\nPlease provide your next move as JSON.",
        rendering,
        snapshot.acting_side(),
        state_json
    );
    debug!(situation_len = situation.len(), "Built situational block");

    Ok(RequestPayload::new(vec![
        PromptBlock::new(Role::System, instructions),
        PromptBlock::new(Role::User, situation),
    ]))
}
