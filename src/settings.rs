//! Level selection and game configuration
//!
//! Settings are plain data: the host builds them once (defaults or JSON)
//! and hands them to the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::CollectibleType;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    #[default]
    Normal,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Normal => "normal",
        }
    }

    /// Parse a level name from the level selector. Anything other than
    /// "easy" plays as Normal.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Level::Easy,
            _ => Level::Normal,
        }
    }

    /// Minimum delay between spawns (ms)
    pub fn spawn_interval_ms(&self) -> u32 {
        match self {
            Level::Easy => EASY_SPAWN_INTERVAL_MS,
            Level::Normal => NORMAL_SPAWN_INTERVAL_MS,
        }
    }

    /// Round length applied on start (seconds)
    pub fn round_seconds(&self) -> f32 {
        match self {
            Level::Easy => ROUND_SECONDS,
            Level::Normal => ROUND_SECONDS,
        }
    }
}

/// Player avatar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Position after a restart
    pub start: Vec2,
    /// Diameter of the pickup circle
    pub size: f32,
    /// Units per second
    pub speed: f32,
    /// Opaque sprite handle resolved by the host
    #[serde(default = "default_player_sprite")]
    pub sprite: String,
}

fn default_player_sprite() -> String {
    "assets/trash.png".to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            sprite: default_player_sprite(),
        }
    }
}

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("collectible catalog is empty")]
    EmptyCatalog,
    #[error("tip list is empty")]
    NoTips,
    #[error("canvas {width}x{height} cannot fit spawn padding {padding}")]
    InvalidBounds { width: f32, height: f32, padding: f32 },
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Level applied at startup
    #[serde(default)]
    pub level: Level,
    /// Canvas size in game units
    pub bounds: Vec2,
    #[serde(default)]
    pub player: PlayerConfig,
    /// Distance kept between spawned items and the canvas edge
    #[serde(default = "default_spawn_padding")]
    pub spawn_padding: f32,
    /// Collectible catalog (fixed for the lifetime of the game)
    pub catalog: Vec<CollectibleType>,
    /// Tips shown with the round summary
    pub tips: Vec<String>,
}

fn default_spawn_padding() -> f32 {
    SPAWN_PADDING
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Normal,
            bounds: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            player: PlayerConfig::default(),
            spawn_padding: SPAWN_PADDING,
            catalog: vec![
                CollectibleType::new("plastic", 10, 90.0, "assets/plastik.png"),
                CollectibleType::new("can", 8, 50.0, "assets/kaleng.png"),
                CollectibleType::new("peel", 5, 50.0, "assets/pisang.png"),
            ],
            tips: vec![
                "Get your neighbours sorting their rubbish at home too!".to_string(),
                "Cut down on single-use plastic.".to_string(),
                "Carry a refillable bottle to reduce waste.".to_string(),
                "Keep organic and inorganic waste apart.".to_string(),
            ],
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the preconditions the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.catalog.is_empty() {
            return Err(SettingsError::EmptyCatalog);
        }
        if self.tips.is_empty() {
            return Err(SettingsError::NoTips);
        }
        let min_extent = self.spawn_padding * 2.0;
        if self.bounds.x <= 0.0
            || self.bounds.y <= 0.0
            || self.bounds.x < min_extent
            || self.bounds.y < min_extent
        {
            return Err(SettingsError::InvalidBounds {
                width: self.bounds.x,
                height: self.bounds.y,
                padding: self.spawn_padding,
            });
        }
        Ok(())
    }

    /// Settings with a different starting level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}
