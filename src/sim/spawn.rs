//! Collectible spawning

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, CollectibleType};

/// True once more than `interval_ms` has passed since the last spawn
#[inline]
pub fn should_spawn(now_ms: f64, last_spawn_ms: f64, interval_ms: u32) -> bool {
    now_ms - last_spawn_ms > f64::from(interval_ms)
}

/// Create a collectible of a random kind at a random position.
///
/// The kind is uniform over `catalog`; the position is uniform over
/// `[padding, bounds.x - padding] x [padding, bounds.y - padding]`.
/// Callers guarantee a non-empty catalog and bounds of at least
/// `2 * padding` on each axis.
pub fn spawn<R: Rng>(
    rng: &mut R,
    catalog: &[CollectibleType],
    bounds: Vec2,
    padding: f32,
    now_ms: f64,
    id: u32,
) -> Collectible {
    debug_assert!(!catalog.is_empty(), "spawn needs a non-empty catalog");
    debug_assert!(
        bounds.x >= padding * 2.0 && bounds.y >= padding * 2.0,
        "bounds {bounds:?} too small for padding {padding}"
    );

    let kind = rng.random_range(0..catalog.len());
    let x = rng.random::<f32>() * (bounds.x - padding * 2.0) + padding;
    let y = rng.random::<f32>() * (bounds.y - padding * 2.0) + padding;

    Collectible {
        id,
        kind,
        pos: Vec2::new(x, y),
        spawned_at_ms: now_ms,
    }
}

/// Tracks when the next collectible is due
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub interval_ms: u32,
    pub last_spawn_ms: f64,
}

impl SpawnScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_spawn_ms: 0.0,
        }
    }

    /// Restart the interval from `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms;
    }

    /// If a spawn is due, record it and return true
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if should_spawn(now_ms, self.last_spawn_ms, self.interval_ms) {
            self.last_spawn_ms = now_ms;
            true
        } else {
            false
        }
    }
}
