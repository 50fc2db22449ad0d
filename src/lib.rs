//! Clean Sweep - a timed arcade litter-collecting game
//!
//! Core modules:
//! - `sim`: Simulation (movement, spawning, pickups, round timer)
//! - `host`: Frame driver and display sink interface
//! - `renderer`: Draw command generation (and the 2D canvas backend on wasm)
//! - `platform`: Browser/native platform helpers
//! - `settings`: Level selection and data-driven game configuration

pub mod host;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use host::{Game, HostSinks};
pub use settings::{Level, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Largest simulation step per frame (seconds); longer frame gaps are truncated
    pub const MAX_STEP: f32 = 0.05;

    /// Canvas dimensions (game units == canvas pixels)
    pub const CANVAS_WIDTH: f32 = 720.0;
    pub const CANVAS_HEIGHT: f32 = 420.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 80.0;
    pub const PLAYER_START_Y: f32 = 80.0;
    pub const PLAYER_SIZE: f32 = 28.0;
    /// Units per second
    pub const PLAYER_SPEED: f32 = 250.0;

    /// Distance kept between spawned items and the canvas edge
    pub const SPAWN_PADDING: f32 = 30.0;

    /// Pickup triggers this many units before the sprites' edges touch
    pub const COLLISION_SLACK: f32 = 2.0;

    /// Round length applied by `start()` (seconds)
    pub const ROUND_SECONDS: f32 = 60.0;
    /// Time shown after `restart()` (seconds). Differs from ROUND_SECONDS on purpose.
    pub const RESTART_TIME_LEFT: f32 = 30.0;

    /// Spawn intervals per level (ms)
    pub const EASY_SPAWN_INTERVAL_MS: u32 = 2000;
    pub const NORMAL_SPAWN_INTERVAL_MS: u32 = 1200;

    /// Player sprite is drawn this many times larger than its hit circle
    pub const PLAYER_SPRITE_SCALE: f32 = 2.0;

    /// Delay before the round summary popup appears (ms)
    pub const ROUND_END_POPUP_DELAY_MS: i32 = 80;
}
