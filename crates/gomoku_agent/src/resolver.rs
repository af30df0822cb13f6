//! Move resolution pipeline.
//!
//! One call runs `snapshot → prompt → completion → parse → validate`.
//! Any failure along the way drops to the fallback selector, so the caller
//! always gets a legal coordinate while one exists.

use crate::agent_config::{AgentConfig, ConfigError};
use crate::completion::CompletionClient;
use crate::error::{MoveError, MoveErrorKind};
use crate::fallback::select_fallback;
use crate::interpreter::interpret_reply;
use crate::moves::{MoveCandidate, MoveOrigin, ResolvedMove};
use crate::prompt::{RequestPayload, build_payload};
use crate::snapshot::SnapshotExtractor;
use crate::source::MoveSource;
use gomoku_board::{Coord, Side};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Default bound on a single completion call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Orchestrates one move request against a completion client.
pub struct MoveResolver {
    instructions: Arc<str>,
    client: Arc<dyn CompletionClient>,
    extractor: SnapshotExtractor,
    timeout: Duration,
    rng: StdRng,
}

impl std::fmt::Debug for MoveResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveResolver")
            .field("instructions_len", &self.instructions.len())
            .field("extractor", &self.extractor)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl MoveResolver {
    /// Creates a resolver with an entropy-seeded generator and the default timeout.
    #[instrument(skip_all, fields(instructions_len = instructions.as_ref().len()))]
    pub fn new(instructions: impl AsRef<str>, client: Arc<dyn CompletionClient>) -> Self {
        debug!("Creating move resolver");
        Self {
            instructions: Arc::from(instructions.as_ref()),
            client,
            extractor: SnapshotExtractor::default(),
            timeout: DEFAULT_TIMEOUT,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a resolver from an agent preset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the preset's instructions file cannot be read.
    #[instrument(skip_all, fields(agent_name = %config.name()))]
    pub fn from_config(
        config: &AgentConfig,
        client: Arc<dyn CompletionClient>,
    ) -> Result<Self, ConfigError> {
        let resolver = Self::new(config.instructions_text()?, client)
            .with_timeout(config.timeout())
            .with_first_side(*config.first_side());
        Ok(match config.seed() {
            Some(seed) => resolver.with_seed(*seed),
            None => resolver,
        })
    }

    /// Seeds the fallback generator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Bounds the completion call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the side assumed to open the game when inferring turns.
    pub fn with_first_side(mut self, first_side: Side) -> Self {
        self.extractor = SnapshotExtractor::new(first_side);
        self
    }

    /// Instruction text sent as the system block.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Completion timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves the next move for the side to act.
    ///
    /// Failures of the primary path are logged and replaced by a random
    /// legal move; [`ResolvedMove::origin`] tells the two apart.
    ///
    /// # Errors
    ///
    /// Only [`MoveErrorKind::NoLegalMoves`], when the engine has nothing
    /// left to play.
    #[instrument(skip(self, source), fields(size = source.size()))]
    pub async fn resolve<S>(&mut self, source: &S) -> Result<ResolvedMove, MoveError>
    where
        S: MoveSource + ?Sized,
    {
        match self.try_resolve(source).await {
            Ok(resolved) => {
                info!(coord = %resolved.coord(), "Model move accepted");
                Ok(resolved)
            }
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "Primary move path failed, falling back");
                select_fallback(source, &mut self.rng, e.kind())
            }
        }
    }

    async fn try_resolve<S>(&self, source: &S) -> Result<ResolvedMove, MoveError>
    where
        S: MoveSource + ?Sized,
    {
        debug!(stage = "build_snapshot");
        let rendering = self.extractor.render_board(source)?;
        let snapshot = self.extractor.parse(&rendering, source.current_side());
        if snapshot.is_degenerate() {
            return Err(MoveError::new(
                MoveErrorKind::Render,
                "Rendering contained no board rows",
            ));
        }

        debug!(stage = "build_prompt");
        let payload = build_payload(&self.instructions, &snapshot, &rendering)?;
        debug!(
            system = %payload.system_text(),
            user = %payload.user_text(),
            "Full prompt"
        );

        debug!(stage = "await_response");
        let reply = self.complete(payload).await?;
        debug!(reply = %reply, "Raw reply");

        debug!(stage = "parse");
        let candidate = interpret_reply(&reply)?;

        debug!(stage = "validate");
        let coord = validate(candidate, snapshot.size(), &source.legal_moves())?;

        Ok(ResolvedMove::new(coord, MoveOrigin::Model))
    }

    /// Runs the completion on its own task so a panic, abort or timeout
    /// surfaces as a transport error instead of unwinding through the caller.
    async fn complete(&self, payload: RequestPayload) -> Result<String, MoveError> {
        let client = Arc::clone(&self.client);
        let mut task = AbortOnDrop(tokio::spawn(async move { client.complete(&payload).await }));

        let reply = match tokio::time::timeout(self.timeout, &mut task.0).await {
            Err(_) => {
                return Err(MoveError::new(
                    MoveErrorKind::Transport,
                    format!("Completion timed out after {:?}", self.timeout),
                ));
            }
            Ok(Err(join_err)) => {
                return Err(MoveError::new(
                    MoveErrorKind::Transport,
                    format!("Completion task did not finish: {}", join_err),
                ));
            }
            Ok(Ok(result)) => result?,
        };

        if reply.trim().is_empty() {
            return Err(MoveError::new(
                MoveErrorKind::Transport,
                "Completion returned no text",
            ));
        }
        Ok(reply)
    }
}

/// Aborts the wrapped task when dropped, so abandoned completions do not
/// keep running in the background.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Checks a candidate against the board bounds and the live legal moves.
///
/// # Errors
///
/// Returns [`MoveErrorKind::IllegalMove`] if the cell is off the board or
/// not in `legal`.
pub fn validate(candidate: MoveCandidate, size: usize, legal: &[Coord]) -> Result<Coord, MoveError> {
    let in_bounds = |value: i64| usize::try_from(value).ok().filter(|v| *v < size);
    let (Some(row), Some(col)) = (in_bounds(candidate.row), in_bounds(candidate.col)) else {
        return Err(MoveError::new(
            MoveErrorKind::IllegalMove,
            format!("{} is outside the {}x{} board", candidate, size, size),
        ));
    };

    let coord = Coord::new(row, col);
    if !legal.contains(&coord) {
        return Err(MoveError::new(
            MoveErrorKind::IllegalMove,
            format!("{} is not a legal move", coord),
        ));
    }
    Ok(coord)
}
