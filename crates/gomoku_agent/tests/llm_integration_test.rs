//! Integration test for live LLM moves.

use std::sync::Arc;

use gomoku_agent::{AgentConfig, LlmClient, LlmProvider, MoveResolver};
use gomoku_board::Game;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_anthropic_move() {
    dotenvy::dotenv().ok();

    let config = AgentConfig::with_llm(
        "TestAgent".to_string(),
        LlmProvider::Anthropic,
        "claude-3-5-haiku-20241022".to_string(),
        256,
    );
    let client = LlmClient::new(config.create_llm_config().expect("ANTHROPIC_API_KEY not set"));
    let mut resolver = MoveResolver::from_config(&config, Arc::new(client)).expect("resolver");

    let game = Game::new(15).expect("board");
    let mv = resolver.resolve(&game).await.expect("move");

    assert!(game.legal_moves().contains(&mv.coord()));
    eprintln!("Move: {}", mv);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_openai_move() {
    dotenvy::dotenv().ok();

    let config = AgentConfig::with_llm(
        "TestAgent".to_string(),
        LlmProvider::OpenAI,
        "gpt-4o-mini".to_string(),
        256,
    );
    let client = LlmClient::new(config.create_llm_config().expect("OPENAI_API_KEY not set"));
    let mut resolver = MoveResolver::from_config(&config, Arc::new(client)).expect("resolver");

    let game = Game::new(15).expect("board");
    let mv = resolver.resolve(&game).await.expect("move");

    assert!(game.legal_moves().contains(&mv.coord()));
    eprintln!("Move: {}", mv);
}
