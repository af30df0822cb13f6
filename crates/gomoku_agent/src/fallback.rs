//! Guaranteed-legal move selection.

use crate::error::{MoveError, MoveErrorKind};
use crate::moves::{MoveOrigin, ResolvedMove};
use crate::source::MoveSource;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, instrument};

/// Picks a legal move uniformly at random.
///
/// `reason` records which failure sent the resolver here.
///
/// # Errors
///
/// Returns [`MoveErrorKind::NoLegalMoves`] when the engine offers no
/// legal move, which means the game is already over.
#[instrument(skip(source, rng))]
pub fn select_fallback<S, R>(
    source: &S,
    rng: &mut R,
    reason: MoveErrorKind,
) -> Result<ResolvedMove, MoveError>
where
    S: MoveSource + ?Sized,
    R: Rng + ?Sized,
{
    let legal = source.legal_moves();
    let coord = *legal.choose(rng).ok_or_else(|| {
        MoveError::new(
            MoveErrorKind::NoLegalMoves,
            "Engine reports no legal moves; the game is over",
        )
    })?;

    info!(coord = %coord, candidates = legal.len(), reason = %reason, "Fallback move selected");
    Ok(ResolvedMove::new(coord, MoveOrigin::Fallback(reason)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_board::{Coord, Game};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fallback_returns_legal_move() {
        let mut game = Game::new(5).unwrap();
        game.place(Coord::new(2, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let mv = select_fallback(&game, &mut rng, MoveErrorKind::Parse).unwrap();
            assert!(game.legal_moves().contains(&mv.coord()));
            assert_eq!(mv.origin(), MoveOrigin::Fallback(MoveErrorKind::Parse));
        }
    }

    #[test]
    fn test_fallback_is_reproducible_with_seed() {
        let game = Game::new(15).unwrap();
        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            select_fallback(&game, &mut rng, MoveErrorKind::Transport)
                .unwrap()
                .coord()
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn test_finished_game_has_no_fallback() {
        let mut game = Game::new(5).unwrap();
        for col in 0..4 {
            game.place(Coord::new(0, col)).unwrap();
            game.place(Coord::new(1, col)).unwrap();
        }
        game.place(Coord::new(0, 4)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let err = select_fallback(&game, &mut rng, MoveErrorKind::Parse).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::NoLegalMoves);
        assert!(!err.is_recoverable());
    }
}
