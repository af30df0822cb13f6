//! Command-line interface for gomoku_agent.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gomoku Agent - let an LLM play five-in-a-row
#[derive(Parser, Debug)]
#[command(name = "gomoku_agent")]
#[command(about = "LLM-backed gomoku player with guaranteed-legal fallback", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Which agent configuration to load.
#[derive(Args, Debug)]
pub struct AgentSelection {
    /// Path to agent config
    #[arg(short, long, default_value = "agent_config.toml")]
    pub config: PathBuf,

    /// Preset name from the agent library (overrides --config)
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Directory containing agent .toml presets
    #[arg(long)]
    pub agents_dir: Option<PathBuf>,
}

/// Who plays against the agent in `play`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opponent {
    /// Uniformly random legal moves
    Random,
    /// A second copy of the same agent
    Agent,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a full local game against a random or mirrored opponent
    Play {
        #[command(flatten)]
        agent: AgentSelection,

        /// Board size
        #[arg(long, default_value_t = gomoku_board::DEFAULT_SIZE)]
        size: usize,

        /// Opponent for the agent
        #[arg(long, value_enum, default_value_t = Opponent::Random)]
        opponent: Opponent,
    },

    /// Print the request payload for a position without calling any model
    Prompt {
        #[command(flatten)]
        agent: AgentSelection,

        /// Board size
        #[arg(long, default_value_t = gomoku_board::DEFAULT_SIZE)]
        size: usize,

        /// Moves already played, as `row,col`, in order
        #[arg(long = "move", value_name = "ROW,COL")]
        moves: Vec<String>,
    },

    /// List agent presets
    Agents {
        /// Directory containing agent .toml presets
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
