//! Frame driver and host display interface
//!
//! `Game` sits between the platform (clock, DOM, key events) and the
//! simulation: it turns frame timestamps into clamped deltas, forwards held
//! keys, and pushes score/time/round-end updates to the host's sinks.

use crate::consts::MAX_STEP;
use crate::settings::{Level, Settings};
use crate::sim::{Clock, GameEvent, InputState, RoundSummary, Simulation};

/// Write-only outputs provided by the host
pub trait HostSinks {
    /// Current score
    fn show_score(&mut self, score: u32);
    /// Whole seconds left, already rounded up and floored at zero
    fn show_time(&mut self, seconds: u32);
    /// Called once per finished round
    fn round_ended(&mut self, summary: &RoundSummary);
}

/// A running game: simulation, held keys and display sinks
pub struct Game<C: Clock, S: HostSinks> {
    sim: Simulation<C>,
    input: InputState,
    sinks: S,
    last_frame_ms: f64,
}

impl<C: Clock, S: HostSinks> Game<C, S> {
    pub fn new(settings: Settings, clock: C, sinks: S, seed: u64) -> Self {
        let mut game = Self {
            sim: Simulation::new(settings, clock, seed),
            input: InputState::new(),
            sinks,
            last_frame_ms: 0.0,
        };
        game.push_display();
        game
    }

    /// Start a round. Returns true if the host should begin requesting frames.
    pub fn start(&mut self) -> bool {
        if self.sim.is_running() {
            return false;
        }
        self.sim.start();
        self.last_frame_ms = self.sim.now_ms();
        self.push_display();
        true
    }

    /// Reset to the idle splash
    pub fn restart(&mut self) {
        self.sim.restart();
        self.push_display();
        log::info!("Game reset");
    }

    pub fn set_level(&mut self, level: Level) {
        self.sim.set_level(level);
        if !self.sim.is_running() {
            self.push_display();
        }
    }

    /// Key down/up from the platform
    pub fn set_key(&mut self, name: &str, pressed: bool) {
        self.input.set_key(name, pressed);
    }

    /// Release all keys (focus lost)
    pub fn release_keys(&mut self) {
        self.input.clear();
    }

    /// Run one animation frame at timestamp `now_ms`.
    ///
    /// Returns true while the round is still running, i.e. while the host
    /// should keep requesting frames.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.sim.is_running() {
            return false;
        }
        let dt = frame_delta(self.last_frame_ms, now_ms);
        self.last_frame_ms = now_ms;

        self.sim.advance(dt, &self.input);

        for event in self.sim.drain_events() {
            if let GameEvent::RoundEnded(summary) = event {
                self.sinks.round_ended(&summary);
            }
        }
        self.push_display();

        self.sim.is_running()
    }

    fn push_display(&mut self) {
        let snapshot = self.sim.snapshot();
        let (score, seconds) = (snapshot.score, snapshot.display_seconds());
        self.sinks.show_score(score);
        self.sinks.show_time(seconds);
    }

    pub fn sim(&self) -> &Simulation<C> {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation<C> {
        &mut self.sim
    }

    pub fn sinks(&self) -> &S {
        &self.sinks
    }

    pub fn sinks_mut(&mut self) -> &mut S {
        &mut self.sinks
    }
}

/// Seconds between two frame timestamps, truncated to `MAX_STEP`
pub fn frame_delta(last_frame_ms: f64, now_ms: f64) -> f32 {
    (((now_ms - last_frame_ms) / 1000.0) as f32).clamp(0.0, MAX_STEP)
}
