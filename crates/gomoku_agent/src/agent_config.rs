//! Agent configuration loaded from TOML presets.

use crate::instructions::DEFAULT_INSTRUCTIONS;
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use gomoku_board::Side;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Configuration for one LLM-backed gomoku agent.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name (used in logs and the preset library).
    name: String,

    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gpt-4o-mini", "deepseek/deepseek-r1-0528-qwen3-8b").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Optional endpoint override for self-hosted or proxied APIs.
    #[serde(default)]
    llm_endpoint: Option<String>,

    /// Seconds to wait for a reply before falling back.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Side assumed to open the game when the turn must be inferred.
    #[serde(default)]
    first_side: Side,

    /// Strategy instructions sent verbatim as the system prompt.
    #[serde(default)]
    instructions: Option<String>,

    /// File holding the instructions, relative to the config file.
    #[serde(default)]
    instructions_file: Option<PathBuf>,

    /// Seed for the fallback generator; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Directory of the file this config was loaded from.
    #[serde(skip)]
    #[getter(skip)]
    base_dir: Option<PathBuf>,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    20
}

impl AgentConfig {
    /// Creates a configuration with default LLM settings and instructions.
    #[instrument(skip(name), fields(agent_name = %name))]
    pub fn new(name: String) -> Self {
        Self {
            name,
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_endpoint: None,
            timeout_secs: default_timeout_secs(),
            first_side: Side::default(),
            instructions: None,
            instructions_file: None,
            seed: None,
            base_dir: None,
        }
    }

    /// Creates a configuration with explicit LLM settings.
    #[instrument(skip(name), fields(agent_name = %name))]
    pub fn with_llm(
        name: String,
        llm_provider: LlmProvider,
        llm_model: String,
        llm_max_tokens: u32,
    ) -> Self {
        Self {
            llm_provider,
            llm_model,
            llm_max_tokens,
            ..Self::new(name)
        }
    }

    /// Replaces the inline instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Sets the fallback seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        info!(agent_name = %config.name, "Config loaded successfully");
        Ok(config)
    }

    /// Completion timeout as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the instruction text.
    ///
    /// Inline `instructions` win, then `instructions_file`, then the
    /// built-in default.
    #[instrument(skip(self), fields(agent_name = %self.name))]
    pub fn instructions_text(&self) -> Result<String, ConfigError> {
        if let Some(text) = &self.instructions {
            return Ok(text.clone());
        }

        if let Some(file) = &self.instructions_file {
            let path = match &self.base_dir {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            debug!(path = %path.display(), "Reading instructions file");
            return std::fs::read_to_string(&path).map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read instructions file {}: {}",
                    path.display(),
                    e
                ))
            });
        }

        debug!("Using built-in instructions");
        Ok(DEFAULT_INSTRUCTIONS.to_string())
    }

    /// Creates LLM configuration from this agent config.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY environment variable.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let api_key = match self.llm_provider {
            LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::new("OPENAI_API_KEY environment variable not set".to_string())
            })?,
            LlmProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ConfigError::new("ANTHROPIC_API_KEY environment variable not set".to_string())
            })?,
        };

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        )
        .with_endpoint(self.llm_endpoint.clone()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
