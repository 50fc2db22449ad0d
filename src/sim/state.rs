//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::PlayerConfig;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for start; the host shows the splash prompt
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Timer expired; waiting for start or restart
    Ended,
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// Units per second
    pub speed: f32,
}

impl Player {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            pos: config.start,
            size: config.size,
            speed: config.speed,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Keep the whole avatar inside `bounds`.
    ///
    /// If the canvas is narrower than the avatar the lower bound wins, so the
    /// avatar sits against the left/top edge instead of panicking.
    pub fn clamp_to(&mut self, bounds: Vec2) {
        let r = self.radius();
        self.pos.x = self.pos.x.min(bounds.x - r).max(r);
        self.pos.y = self.pos.y.min(bounds.y - r).max(r);
    }
}

/// Catalog entry describing one kind of collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleType {
    pub name: String,
    pub points: u32,
    /// Diameter
    pub size: f32,
    /// Opaque sprite handle resolved by the host
    pub sprite: String,
}

impl CollectibleType {
    pub fn new(name: &str, points: u32, size: f32, sprite: &str) -> Self {
        Self {
            name: name.to_string(),
            points,
            size,
            sprite: sprite.to_string(),
        }
    }
}

/// A spawned collectible
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub id: u32,
    /// Index into the catalog
    pub kind: usize,
    pub pos: Vec2,
    /// Clock timestamp at creation (ms)
    pub spawned_at_ms: f64,
}

/// Final result of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub score: u32,
    pub tip: String,
}

/// Things that happened during `advance`, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ItemSpawned { id: u32, kind: usize },
    ItemCollected { id: u32, kind: usize, points: u32 },
    RoundEnded(RoundSummary),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            size: 28.0,
            speed: 250.0,
        }
    }

    #[test]
    fn test_clamp_inside_is_noop() {
        let mut p = player_at(100.0, 100.0);
        p.clamp_to(Vec2::new(720.0, 420.0));
        assert_eq!(p.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_clamp_pulls_back_to_edges() {
        let mut p = player_at(-50.0, 1000.0);
        p.clamp_to(Vec2::new(720.0, 420.0));
        assert_eq!(p.pos, Vec2::new(14.0, 406.0));

        let mut p = player_at(5000.0, -3.0);
        p.clamp_to(Vec2::new(720.0, 420.0));
        assert_eq!(p.pos, Vec2::new(706.0, 14.0));
    }

    #[test]
    fn test_clamp_tiny_canvas_does_not_panic() {
        let mut p = player_at(10.0, 10.0);
        p.clamp_to(Vec2::new(20.0, 20.0));
        assert_eq!(p.pos, Vec2::new(14.0, 14.0));
    }
}
