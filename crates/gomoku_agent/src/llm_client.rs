//! LLM API client for OpenAI-compatible endpoints and Anthropic.

use crate::prompt::{RequestPayload, Role};
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use backoff::ExponentialBackoffBuilder;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Default Anthropic Messages API endpoint.
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI or any OpenAI-compatible chat completions endpoint.
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    endpoint: Option<String>,
}

impl LlmConfig {
    /// Creates a new LLM configuration against the provider's default endpoint.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            endpoint: None,
        }
    }

    /// Points the client at a different base URL (OpenAI) or messages URL (Anthropic).
    #[instrument(skip(self))]
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the endpoint override, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

/// LLM client that abstracts over multiple providers.
///
/// Each call is sent exactly once; failed calls are reported, never retried.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
    openai: OpenAIClient<OpenAIConfig>,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(endpoint) = config.endpoint() {
            debug!(endpoint = %endpoint, "Using custom OpenAI-compatible endpoint");
            openai_config = openai_config.with_api_base(endpoint);
        }
        // Zero elapsed budget: async-openai gives up after the first attempt.
        let single_attempt = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let openai = OpenAIClient::with_config(openai_config).with_backoff(single_attempt);

        Self {
            config,
            http: reqwest::Client::new(),
            openai,
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends the payload to the configured provider and returns the reply text.
    #[instrument(skip(self, payload), fields(provider = ?self.config.provider, model = %self.config.model, blocks = payload.blocks().len()))]
    pub async fn send(&self, payload: &RequestPayload) -> Result<String, LlmError> {
        debug!("Sending payload");
        match self.config.provider {
            LlmProvider::OpenAI => self.send_openai(payload).await,
            LlmProvider::Anthropic => self.send_anthropic(payload).await,
        }
    }

    /// Builds the Anthropic Messages body: system blocks go to `system`,
    /// user blocks become `messages` in payload order.
    pub(crate) fn anthropic_body(&self, payload: &RequestPayload) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = payload
            .blocks()
            .iter()
            .filter(|block| block.role() == Role::User)
            .map(|block| serde_json::json!({ "role": "user", "content": block.content() }))
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": payload.system_text(),
            "messages": messages,
        })
    }

    #[instrument(skip(self, payload))]
    async fn send_anthropic(&self, payload: &RequestPayload) -> Result<String, LlmError> {
        let url = self.config.endpoint().unwrap_or(ANTHROPIC_MESSAGES_URL);

        debug!(url = %url, "Building Anthropic API request");
        let request_body = self.anthropic_body(payload);

        let response = self
            .http
            .post(url)
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Anthropic response");
            LlmError::new(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(LlmError::new(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        let response_json: serde_json::Value =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = ?e, response = %response_text, "Failed to parse Anthropic response");
                LlmError::new(format!("Failed to parse response: {}", e))
            })?;

        // Thinking models may lead with non-text blocks.
        let content = response_json["content"]
            .as_array()
            .and_then(|blocks| blocks.iter().find_map(|block| block["text"].as_str()))
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    #[instrument(skip(self, payload))]
    async fn send_openai(&self, payload: &RequestPayload) -> Result<String, LlmError> {
        let messages = openai_messages(payload)?;

        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                LlmError::new(format!("Failed to build request: {}", e))
            })?;

        debug!("Sending request to OpenAI-compatible endpoint");
        let response = self.openai.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                LlmError::new("No content in OpenAI response".to_string())
            })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// Maps each prompt block to a chat message, keeping order and role.
pub(crate) fn openai_messages(
    payload: &RequestPayload,
) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
    payload
        .blocks()
        .iter()
        .map(|block| match block.role() {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(block.content())
                .build()
                .map(ChatCompletionRequestMessage::System),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(block.content())
                .build()
                .map(ChatCompletionRequestMessage::User),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            error!(error = ?e, "Failed to build chat message");
            LlmError::new(format!("Failed to build chat message: {}", e))
        })
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBlock;

    fn payload() -> RequestPayload {
        RequestPayload::new(vec![
            PromptBlock::new(Role::System, "Play gomoku."),
            PromptBlock::new(Role::User, "Board one"),
            PromptBlock::new(Role::User, "Board two"),
        ])
    }

    #[test]
    fn test_openai_messages_keep_order_and_roles() {
        let messages = openai_messages(&payload()).unwrap();
        let value = serde_json::to_value(&messages).unwrap();

        let pairs: Vec<(&str, &str)> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|m| (m["role"].as_str().unwrap(), m["content"].as_str().unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("system", "Play gomoku."),
                ("user", "Board one"),
                ("user", "Board two"),
            ]
        );
    }

    #[test]
    fn test_anthropic_body_splits_system_from_messages() {
        let config = LlmConfig::new(
            LlmProvider::Anthropic,
            "key".to_string(),
            "claude-test".to_string(),
            64,
        );
        let body = LlmClient::new(config).anthropic_body(&payload());

        assert_eq!(body["system"], "Play gomoku.");
        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 64);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Board one");
        assert_eq!(messages[1]["content"], "Board two");
    }
}
