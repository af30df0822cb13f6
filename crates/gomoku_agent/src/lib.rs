//! Gomoku agent library - lets a text-generating model play gomoku.
//!
//! Each move runs a short pipeline: the board is rendered and reduced to a
//! snapshot, a two-block prompt is sent to the completion client, and the
//! first JSON object in the reply is read as a row/column pair. Anything
//! that goes wrong on the way (render, transport, parse, schema or an
//! illegal cell) is replaced by a random legal move, so the engine always
//! gets something it can play.
//!
//! # Architecture
//!
//! - **Source**: read-only [`MoveSource`] view of the engine
//! - **Snapshot**: [`SnapshotExtractor`] and [`BoardSnapshot`]
//! - **Prompt**: [`build_payload`] and [`RequestPayload`]
//! - **Interpreter**: [`interpret_reply`]
//! - **Resolver**: [`MoveResolver`], with [`select_fallback`] as its safety net
//! - **Client**: [`CompletionClient`], implemented by [`LlmClient`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gomoku_agent::{AgentConfig, LlmClient, MoveResolver};
//! use gomoku_board::Game;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AgentConfig::from_file("agents/center.toml")?;
//! let client = LlmClient::new(config.create_llm_config()?);
//! let mut resolver = MoveResolver::from_config(&config, Arc::new(client))?;
//!
//! let mut game = Game::new(15)?;
//! let mv = resolver.resolve(&game).await?;
//! game.place(mv.coord())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod agent_config;
mod agent_library;
mod completion;
mod error;
mod fallback;
mod instructions;
mod interpreter;
mod llm_client;
mod moves;
mod prompt;
mod resolver;
mod snapshot;
mod source;

// Crate-level exports - Configuration
pub use agent_config::{AgentConfig, ConfigError};
pub use agent_library::AgentLibrary;
pub use instructions::DEFAULT_INSTRUCTIONS;

// Crate-level exports - LLM client
pub use completion::CompletionClient;
pub use llm_client::{ANTHROPIC_MESSAGES_URL, LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Move pipeline
pub use error::{MoveError, MoveErrorKind};
pub use fallback::select_fallback;
pub use interpreter::{find_object_span, interpret_reply};
pub use moves::{MoveCandidate, MoveOrigin, ResolvedMove};
pub use prompt::{PromptBlock, RequestPayload, Role, build_payload};
pub use resolver::{DEFAULT_TIMEOUT, MoveResolver, validate};
pub use snapshot::{BoardSnapshot, PlacedStone, SnapshotExtractor, infer_acting_side};
pub use source::MoveSource;
