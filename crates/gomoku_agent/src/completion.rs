//! Completion capability consumed by the move resolver.

use crate::llm_client::{LlmClient, LlmError};
use crate::prompt::RequestPayload;
use async_trait::async_trait;
use tracing::instrument;

/// Turns a request payload into reply text.
///
/// Implementations may block for a while and may fail; the resolver treats
/// every failure like a malformed reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the payload and returns the raw reply.
    async fn complete(&self, payload: &RequestPayload) -> Result<String, LlmError>;
}

#[async_trait]
impl CompletionClient for LlmClient {
    #[instrument(skip(self, payload), fields(blocks = payload.blocks().len()))]
    async fn complete(&self, payload: &RequestPayload) -> Result<String, LlmError> {
        self.send(payload).await
    }
}
