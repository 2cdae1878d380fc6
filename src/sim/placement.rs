//! Constrained random placement of targets
//!
//! Three tiers, tried in order:
//! 1. Up to `MAX_PLACEMENT_ATTEMPTS` uniform random candidates
//! 2. Centers of a square grid with room for one more target, row-major
//! 3. One unconditional random candidate (overlap accepted)
//!
//! A stalled round is worse than two letters touching, so the solver never
//! fails once the bounds are usable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::{PlayAreaBounds, Rect};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::error::RoundError;

/// Which tier produced a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    Random,
    Grid,
    /// Separation could not be satisfied
    Overlap,
}

/// A solved position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub strategy: PlacementStrategy,
}

/// Find a position at least `min_separation` away from every `existing` center.
///
/// `min_separation` below `target_size` is raised to `target_size`.
pub fn place<R: Rng + ?Sized>(
    existing: &[Vec2],
    bounds: &PlayAreaBounds,
    target_size: f32,
    min_separation: f32,
    rng: &mut R,
) -> Result<Placement, RoundError> {
    let rect = bounds.placement_rect(target_size)?;
    let min_sep = min_separation.max(target_size);

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = rect.sample(rng);
        if is_clear(candidate, existing, min_sep) {
            return Ok(Placement {
                pos: candidate,
                strategy: PlacementStrategy::Random,
            });
        }
    }

    if let Some(pos) = grid_candidate(existing, &rect, min_sep) {
        log::debug!("Random placement exhausted, using grid cell at {pos}");
        return Ok(Placement {
            pos,
            strategy: PlacementStrategy::Grid,
        });
    }

    log::warn!(
        "No room for target #{} at separation {min_sep}, accepting overlap",
        existing.len() + 1
    );
    Ok(Placement {
        pos: rect.sample(rng),
        strategy: PlacementStrategy::Overlap,
    })
}

fn is_clear(candidate: Vec2, existing: &[Vec2], min_sep: f32) -> bool {
    let min_sq = min_sep * min_sep;
    existing
        .iter()
        .all(|p| candidate.distance_squared(*p) >= min_sq)
}

/// First grid cell center (row-major) that clears every existing target
fn grid_candidate(existing: &[Vec2], rect: &Rect, min_sep: f32) -> Option<Vec2> {
    let cells = existing.len() + 1;
    let side = (cells as f32).sqrt().ceil().max(1.0) as usize;
    let cell = rect.size() / side as f32;

    (0..side)
        .flat_map(|row| (0..side).map(move |col| (row, col)))
        .map(|(row, col)| {
            rect.min + Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y)
        })
        .find(|center| is_clear(*center, existing, min_sep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_pcg::Pcg32;

    /// Always yields zero, so every random candidate lands on `rect.min`
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn test_first_target_is_random_and_inside() {
        let bounds = PlayAreaBounds::new(300.0, 300.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let placed = place(&[], &bounds, 40.0, 50.0, &mut rng).unwrap();
        assert_eq!(placed.strategy, PlacementStrategy::Random);
        assert!(bounds.placement_rect(40.0).unwrap().contains(placed.pos));
    }

    #[test]
    fn test_respects_separation() {
        let bounds = PlayAreaBounds::new(400.0, 400.0);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut placed: Vec<Vec2> = Vec::new();
        for _ in 0..6 {
            let p = place(&placed, &bounds, 40.0, 60.0, &mut rng).unwrap();
            assert_ne!(p.strategy, PlacementStrategy::Overlap);
            placed.push(p.pos);
        }
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(a.distance(*b) >= 60.0);
            }
        }
    }

    #[test]
    fn test_grid_fallback_when_random_keeps_colliding() {
        let bounds = PlayAreaBounds::new(200.0, 200.0);
        let rect = bounds.placement_rect(20.0).unwrap();
        // Occupy the corner every random candidate lands on
        let existing = [rect.min];
        let placed = place(&existing, &bounds, 20.0, 50.0, &mut ZeroRng).unwrap();
        assert_eq!(placed.strategy, PlacementStrategy::Grid);
        assert!(placed.pos.distance(rect.min) >= 50.0);
        // 2 cells -> 2x2 grid; first clear cell in row-major order is (0, 0)
        let cell = rect.size() / 2.0;
        assert_eq!(placed.pos, rect.min + cell * 0.5);
    }

    #[test]
    fn test_overlap_when_nothing_fits() {
        let bounds = PlayAreaBounds::new(100.0, 100.0);
        let existing = [Vec2::new(50.0, 50.0)];
        let mut rng = Pcg32::seed_from_u64(3);
        let placed = place(&existing, &bounds, 10.0, 500.0, &mut rng).unwrap();
        assert_eq!(placed.strategy, PlacementStrategy::Overlap);
        assert!(bounds.placement_rect(10.0).unwrap().contains(placed.pos));
    }

    #[test]
    fn test_separation_raised_to_target_size() {
        let bounds = PlayAreaBounds::new(100.0, 100.0);
        let rect = bounds.placement_rect(40.0).unwrap();
        let existing = [rect.min];
        // Separation 5 < size 40: the grid must still keep 40 apart
        let placed = place(&existing, &bounds, 40.0, 5.0, &mut ZeroRng).unwrap();
        assert!(placed.pos.distance(rect.min) >= 40.0);
    }

    #[test]
    fn test_invalid_bounds() {
        let bounds = PlayAreaBounds::new(0.0, 300.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let err = place(&[], &bounds, 40.0, 50.0, &mut rng).unwrap_err();
        assert!(matches!(err, RoundError::InvalidBounds { .. }));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let bounds = PlayAreaBounds::new(640.0, 480.0);
        let a = place(&[], &bounds, 40.0, 50.0, &mut Pcg32::seed_from_u64(99)).unwrap();
        let b = place(&[], &bounds, 40.0, 50.0, &mut Pcg32::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
