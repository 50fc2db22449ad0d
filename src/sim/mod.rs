//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes from an injected `Clock` and the `dt` passed to `advance`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod simulation;
pub mod spawn;
pub mod state;

pub use clock::{Clock, ManualClock};
pub use collision::{CollisionOutcome, is_collected, resolve};
pub use input::InputState;
pub use simulation::{Simulation, Snapshot};
pub use spawn::{SpawnScheduler, should_spawn, spawn};
pub use state::{Collectible, CollectibleType, GameEvent, Phase, Player, RoundSummary};
