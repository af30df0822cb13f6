//! Tests for the move resolution pipeline with scripted completion clients.

use async_trait::async_trait;
use gomoku_agent::{
    CompletionClient, LlmError, MoveError, MoveErrorKind, MoveOrigin, MoveResolver, MoveSource,
    RequestPayload, Role,
};
use gomoku_board::{BoardFormat, Coord, Game, Side};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replies with the same text every time and records what it was sent.
struct ScriptedClient {
    reply: String,
    seen: Mutex<Vec<RequestPayload>>,
}

impl ScriptedClient {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, payload: &RequestPayload) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(payload.clone());
        Ok(self.reply.clone())
    }
}

/// Always fails like a dropped connection.
struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _payload: &RequestPayload) -> Result<String, LlmError> {
        Err(LlmError::new("connection refused".to_string()))
    }
}

/// Never answers within any reasonable timeout.
struct StalledClient;

#[async_trait]
impl CompletionClient for StalledClient {
    async fn complete(&self, _payload: &RequestPayload) -> Result<String, LlmError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(r#"{"row":0,"col":0}"#.to_string())
    }
}

/// Panics inside the completion task.
struct PanickingClient;

#[async_trait]
impl CompletionClient for PanickingClient {
    async fn complete(&self, _payload: &RequestPayload) -> Result<String, LlmError> {
        panic!("client bug");
    }
}

/// Engine whose renderer is broken.
struct UnrenderableGame(Game);

impl MoveSource for UnrenderableGame {
    fn render(&self, _format: BoardFormat) -> Result<String, MoveError> {
        Err(MoveError::new(MoveErrorKind::Render, "renderer offline"))
    }

    fn current_side(&self) -> Option<Side> {
        Some(self.0.to_move())
    }

    fn legal_moves(&self) -> Vec<Coord> {
        self.0.legal_moves()
    }

    fn size(&self) -> usize {
        self.0.board().size()
    }
}

fn resolver(client: Arc<dyn CompletionClient>) -> MoveResolver {
    MoveResolver::new("Play gomoku.", client).with_seed(11)
}

#[tokio::test]
async fn test_model_move_on_empty_board() {
    let client = ScriptedClient::new(r#"{"row":7,"col":7,"reasoning":"center"}"#);
    let game = Game::new(15).unwrap();

    let mv = resolver(client.clone()).resolve(&game).await.unwrap();

    assert_eq!(mv.coord(), Coord::new(7, 7));
    assert_eq!(mv.origin(), MoveOrigin::Model);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_occupied_reply_falls_back_to_other_legal_cell() {
    let client = ScriptedClient::new(r#"{"row":7,"col":7}"#);
    let mut game = Game::new(15).unwrap();
    let mut resolver = resolver(client);

    let first = resolver.resolve(&game).await.unwrap();
    game.place(first.coord()).unwrap();

    let second = resolver.resolve(&game).await.unwrap();
    assert_ne!(second.coord(), Coord::new(7, 7));
    assert!(game.legal_moves().contains(&second.coord()));
    assert_eq!(
        second.origin(),
        MoveOrigin::Fallback(MoveErrorKind::IllegalMove)
    );
}

#[tokio::test]
async fn test_out_of_bounds_reply_falls_back() {
    let client = ScriptedClient::new(r#"{"row":15,"col":-2}"#);
    let game = Game::new(15).unwrap();

    let mv = resolver(client).resolve(&game).await.unwrap();

    assert!(game.legal_moves().contains(&mv.coord()));
    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::IllegalMove));
}

#[tokio::test]
async fn test_reply_without_object_falls_back() {
    let client = ScriptedClient::new("I think the center looks nice.");
    let game = Game::new(9).unwrap();

    let mv = resolver(client).resolve(&game).await.unwrap();

    assert!(game.legal_moves().contains(&mv.coord()));
    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Parse));
}

#[tokio::test]
async fn test_reply_with_bad_field_falls_back() {
    let client = ScriptedClient::new(r#"{"row":"a","col":3}"#);
    let game = Game::new(9).unwrap();

    let mv = resolver(client).resolve(&game).await.unwrap();

    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Schema));
}

#[tokio::test]
async fn test_empty_reply_is_transport_failure() {
    let client = ScriptedClient::new("   \n");
    let game = Game::new(9).unwrap();

    let mv = resolver(client).resolve(&game).await.unwrap();

    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Transport));
}

#[tokio::test]
async fn test_failing_client_always_yields_legal_move() {
    let mut game = Game::new(9).unwrap();
    let mut resolver = resolver(Arc::new(FailingClient));

    while !game.is_over() {
        let mv = resolver.resolve(&game).await.unwrap();
        assert!(game.legal_moves().contains(&mv.coord()));
        assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Transport));
        game.place(mv.coord()).unwrap();
    }
}

#[tokio::test]
async fn test_stalled_client_times_out_to_fallback() {
    let game = Game::new(9).unwrap();
    let mut resolver = resolver(Arc::new(StalledClient)).with_timeout(Duration::from_millis(50));

    let mv = resolver.resolve(&game).await.unwrap();

    assert!(game.legal_moves().contains(&mv.coord()));
    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Transport));
}

#[tokio::test]
async fn test_panicking_client_falls_back() {
    let game = Game::new(9).unwrap();

    let mv = resolver(Arc::new(PanickingClient)).resolve(&game).await.unwrap();

    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Transport));
}

#[tokio::test]
async fn test_unrenderable_board_skips_client() {
    let client = ScriptedClient::new(r#"{"row":0,"col":0}"#);
    let game = UnrenderableGame(Game::new(9).unwrap());

    let mv = resolver(client.clone()).resolve(&game).await.unwrap();

    assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Render));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_finished_game_reports_no_legal_moves() {
    let mut game = Game::new(5).unwrap();
    for col in 0..4 {
        game.place(Coord::new(0, col)).unwrap();
        game.place(Coord::new(1, col)).unwrap();
    }
    game.place(Coord::new(0, 4)).unwrap();

    let err = resolver(Arc::new(FailingClient))
        .resolve(&game)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), MoveErrorKind::NoLegalMoves);
}

#[tokio::test]
async fn test_payload_carries_instructions_and_board() {
    let client = ScriptedClient::new(r#"{"row":0,"col":1}"#);
    let mut game = Game::new(5).unwrap();
    game.place(Coord::new(2, 2)).unwrap();

    resolver(client.clone()).resolve(&game).await.unwrap();

    let seen = client.seen.lock().unwrap();
    let blocks = seen[0].blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].role(), Role::System);
    assert_eq!(blocks[0].content(), "Play gomoku.");
    assert_eq!(blocks[1].role(), Role::User);
    assert!(blocks[1].content().contains("Current player: O"));
    assert!(blocks[1].content().contains(r#"[2,2,"X"]"#));
}

#[tokio::test]
async fn test_seeded_fallbacks_are_reproducible() {
    let game = Game::new(15).unwrap();

    let a = resolver(Arc::new(FailingClient)).resolve(&game).await.unwrap();
    let b = resolver(Arc::new(FailingClient)).resolve(&game).await.unwrap();

    assert_eq!(a.coord(), b.coord());
}
