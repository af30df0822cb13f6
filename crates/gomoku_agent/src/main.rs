//! Gomoku Agent - Unified CLI
//!
//! Plays local games and inspects prompts for LLM-backed gomoku agents.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{AgentSelection, Cli, Command, Opponent};
use gomoku_agent::{
    AgentConfig, AgentLibrary, CompletionClient, LlmClient, MoveResolver, SnapshotExtractor,
    build_payload,
};
use gomoku_board::{BoardFormat, Coord, Game, GameStatus, Side};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            agent,
            size,
            opponent,
        } => run_play(agent, size, opponent).await,
        Command::Prompt { agent, size, moves } => run_prompt(agent, size, moves),
        Command::Agents { dir } => run_agents(dir),
    }
}

/// Play a full game on the local engine and print every position.
#[instrument]
async fn run_play(selection: AgentSelection, size: usize, opponent: Opponent) -> Result<()> {
    let config = load_config(&selection)?;
    let client: Arc<dyn CompletionClient> = Arc::new(LlmClient::new(config.create_llm_config()?));

    let mut agent = MoveResolver::from_config(&config, Arc::clone(&client))?;
    let mut mirror = match opponent {
        Opponent::Agent => Some(MoveResolver::from_config(&config, client)?),
        Opponent::Random => None,
    };
    let mut rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::with_first_side(size, *config.first_side())?;
    let agent_side = game.to_move();
    info!(agent = %config.name(), side = %agent_side, ?opponent, "Starting game");

    while !game.is_over() {
        let side = game.to_move();
        let coord = if side == agent_side {
            let mv = agent.resolve(&game).await?;
            println!("{} ({}) plays {}", config.name(), side, mv);
            mv.coord()
        } else if let Some(mirror) = mirror.as_mut() {
            let mv = mirror.resolve(&game).await?;
            println!("mirror ({}) plays {}", side, mv);
            mv.coord()
        } else {
            let coord = *game
                .legal_moves()
                .choose(&mut rng)
                .context("Opponent has no legal move")?;
            println!("random ({}) plays {}", side, coord);
            coord
        };

        game.place(coord)?;
        println!("{}\n", game.render(BoardFormat::Standard));
    }

    match game.status() {
        GameStatus::Won(winner) if winner == agent_side => println!("{} wins", config.name()),
        GameStatus::Won(winner) => println!("{} wins", winner),
        GameStatus::Draw => println!("Draw"),
        GameStatus::InProgress => warn!("Game stopped before it finished"),
    }
    for side in Side::iter() {
        println!("{}: {} stones", side, game.board().stone_count(side));
    }
    Ok(())
}

/// Print the payload the agent would send for a position.
#[instrument]
fn run_prompt(selection: AgentSelection, size: usize, moves: Vec<String>) -> Result<()> {
    let config = load_config(&selection)?;
    let mut game = Game::with_first_side(size, *config.first_side())?;
    for text in &moves {
        game.place(parse_coord(text)?)
            .with_context(|| format!("Cannot play {}", text))?;
    }

    let extractor = SnapshotExtractor::new(*config.first_side());
    let rendering = extractor.render_board(&game)?;
    let snapshot = extractor.parse(&rendering, Some(game.to_move()));
    let payload = build_payload(&config.instructions_text()?, &snapshot, &rendering)?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// List the presets in the agent library.
#[instrument]
fn run_agents(dir: Option<PathBuf>) -> Result<()> {
    let library = AgentLibrary::scan(dir.unwrap_or_else(AgentLibrary::default_dir))?;

    for agent in library.presets() {
        println!(
            "{:<24} {:?} {}",
            agent.name(),
            agent.llm_provider(),
            agent.llm_model()
        );
    }
    Ok(())
}

/// Loads the selected preset, or the config file, or defaults when the file is missing.
fn load_config(selection: &AgentSelection) -> Result<AgentConfig> {
    if let Some(name) = &selection.agent {
        let dir = selection
            .agents_dir
            .clone()
            .unwrap_or_else(AgentLibrary::default_dir);
        info!(agent = %name, dir = %dir.display(), "Selecting agent preset");
        return Ok(AgentLibrary::scan(&dir)?.select(name)?.clone());
    }

    let path = &selection.config;
    if path.exists() {
        info!(path = %path.display(), "Loading agent config");
        Ok(AgentConfig::from_file(path)?)
    } else {
        warn!(path = %path.display(), "Config file not found, using defaults");
        Ok(AgentConfig::new("gomoku_agent".to_string()))
    }
}

/// Parses `row,col`.
fn parse_coord(text: &str) -> Result<Coord> {
    let (row, col) = text
        .split_once(',')
        .with_context(|| format!("Expected ROW,COL, got {:?}", text))?;
    Ok(Coord::new(row.trim().parse()?, col.trim().parse()?))
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
