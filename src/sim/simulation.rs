//! Round state machine and per-frame advance
//!
//! `Simulation` owns the player, the active collectibles, score and timer.
//! The host feeds it frame deltas and the held-key state, then reads a
//! `Snapshot` and drains `GameEvent`s for display.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::Clock;
use super::collision;
use super::input::InputState;
use super::spawn::{self, SpawnScheduler};
use super::state::{Collectible, CollectibleType, GameEvent, Phase, Player, RoundSummary};
use crate::consts::{MAX_STEP, RESTART_TIME_LEFT};
use crate::settings::{Level, PlayerConfig, Settings};

/// Read-only view of the simulation for rendering and display sinks
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub score: u32,
    pub time_left: f32,
    pub player: &'a Player,
    pub items: &'a [Collectible],
    pub catalog: &'a [CollectibleType],
    pub bounds: Vec2,
}

impl Snapshot<'_> {
    /// Whole seconds shown on the timer: rounded up, never negative
    pub fn display_seconds(&self) -> u32 {
        display_seconds(self.time_left)
    }
}

/// Whole seconds for the timer display: `max(0, ceil(time_left))`
pub fn display_seconds(time_left: f32) -> u32 {
    time_left.ceil().max(0.0) as u32
}

/// The game simulation
pub struct Simulation<C: Clock> {
    clock: C,
    rng: Pcg32,
    phase: Phase,
    level: Level,
    score: u32,
    time_left: f32,
    bounds: Vec2,
    spawn_padding: f32,
    player_config: PlayerConfig,
    player: Player,
    catalog: Vec<CollectibleType>,
    tips: Vec<String>,
    items: Vec<Collectible>,
    scheduler: SpawnScheduler,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl<C: Clock> Simulation<C> {
    /// Create an idle simulation.
    ///
    /// `settings` should already be validated; a bad catalog or canvas only
    /// trips debug assertions when the first item spawns.
    pub fn new(settings: Settings, clock: C, seed: u64) -> Self {
        let Settings {
            level,
            bounds,
            player,
            spawn_padding,
            catalog,
            tips,
        } = settings;

        let mut sim = Self {
            clock,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Idle,
            level,
            score: 0,
            time_left: level.round_seconds(),
            bounds,
            spawn_padding,
            player: Player::from_config(&player),
            player_config: player,
            catalog,
            tips,
            items: Vec::new(),
            scheduler: SpawnScheduler::new(level.spawn_interval_ms()),
            events: Vec::new(),
            next_id: 1,
        };
        sim.restart();
        sim
    }

    /// Begin a round. Does nothing if a round is already running.
    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            return;
        }
        let now = self.clock.now_ms();
        self.phase = Phase::Running;
        self.score = 0;
        self.items.clear();
        self.time_left = self.level.round_seconds();
        self.scheduler.reset(now);
        log::info!(
            "Round started ({} level, {}s, spawn every {}ms)",
            self.level.as_str(),
            self.time_left,
            self.scheduler.interval_ms
        );
    }

    /// Hard reset to Idle from any phase
    pub fn restart(&mut self) {
        self.phase = Phase::Idle;
        self.score = 0;
        self.items.clear();
        self.events.clear();
        self.player = Player::from_config(&self.player_config);
        self.time_left = RESTART_TIME_LEFT;
    }

    /// Select the level for subsequent rounds.
    ///
    /// The spawn interval changes immediately; a running round keeps its
    /// remaining time.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
        self.scheduler.interval_ms = level.spawn_interval_ms();
        if self.phase != Phase::Running {
            self.time_left = level.round_seconds();
        }
        log::info!("Level set to {}", level.as_str());
    }

    /// Resize the playfield. Positions are only clamped on the next advance.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// Advance a running round by `dt` seconds.
    ///
    /// `dt` is clamped to `MAX_STEP`. Outside the Running phase this does
    /// nothing.
    pub fn advance(&mut self, dt: f32, input: &InputState) {
        if self.phase != Phase::Running {
            return;
        }
        debug_assert!(dt >= 0.0, "negative dt: {dt}");
        let dt = dt.clamp(0.0, MAX_STEP);

        // Movement
        let dir = input.direction();
        self.player.pos += dir * self.player.speed * dt;
        self.player.clamp_to(self.bounds);

        // Spawning
        let now = self.clock.now_ms();
        if self.scheduler.poll(now) {
            self.spawn_item(now);
        }

        // Pickups
        let outcome = collision::resolve(
            &self.player,
            std::mem::take(&mut self.items),
            &self.catalog,
        );
        self.items = outcome.remaining;
        self.score += outcome.points;
        for item in outcome.collected {
            let points = self.catalog[item.kind].points;
            log::debug!(
                "Collected {} #{} (+{})",
                self.catalog[item.kind].name,
                item.id,
                points
            );
            self.events.push(GameEvent::ItemCollected {
                id: item.id,
                kind: item.kind,
                points,
            });
        }

        // Timer
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.end_round();
        }
    }

    fn spawn_item(&mut self, now: f64) {
        let id = self.next_id;
        self.next_id += 1;
        let item = spawn::spawn(
            &mut self.rng,
            &self.catalog,
            self.bounds,
            self.spawn_padding,
            now,
            id,
        );
        log::debug!(
            "Spawned {} #{} at ({:.0}, {:.0}), {} on field",
            self.catalog[item.kind].name,
            id,
            item.pos.x,
            item.pos.y,
            self.items.len() + 1
        );
        self.events.push(GameEvent::ItemSpawned {
            id,
            kind: item.kind,
        });
        self.items.push(item);
    }

    fn end_round(&mut self) {
        self.phase = Phase::Ended;
        let tip = if self.tips.is_empty() {
            String::new()
        } else {
            self.tips[self.rng.random_range(0..self.tips.len())].clone()
        };
        log::info!("Round ended with score {}", self.score);
        self.events.push(GameEvent::RoundEnded(RoundSummary {
            score: self.score,
            tip,
        }));
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            time_left: self.time_left,
            player: &self.player,
            items: &self.items,
            catalog: &self.catalog,
            bounds: self.bounds,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn spawn_interval_ms(&self) -> u32 {
        self.scheduler.interval_ms
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    pub fn catalog(&self) -> &[CollectibleType] {
        &self.catalog
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Place a collectible directly (scripted scenarios and tests)
    pub fn place_item(&mut self, kind: usize, pos: Vec2) -> u32 {
        debug_assert!(kind < self.catalog.len(), "kind {kind} not in catalog");
        let id = self.next_id;
        self.next_id += 1;
        let now = self.clock.now_ms();
        self.items.push(Collectible {
            id,
            kind,
            pos,
            spawned_at_ms: now,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ManualClock;
    use proptest::prelude::*;

    fn new_sim(level: Level) -> (Simulation<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0.0);
        let sim = Simulation::new(Settings::default().with_level(level), clock.clone(), 12345);
        (sim, clock)
    }

    fn held(keys: &[&str]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.set_key(key, true);
        }
        input
    }

    #[test]
    fn test_starts_idle_with_restart_time() {
        let (sim, _) = new_sim(Level::Normal);
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.time_left(), RESTART_TIME_LEFT);
        assert_eq!(sim.player().pos, Vec2::new(80.0, 80.0));
    }

    #[test]
    fn test_advance_is_noop_when_idle() {
        let (mut sim, clock) = new_sim(Level::Normal);
        clock.set(5000.0);
        sim.advance(0.05, &held(&["d"]));
        assert_eq!(sim.player().pos, Vec2::new(80.0, 80.0));
        assert_eq!(sim.time_left(), RESTART_TIME_LEFT);
        assert!(sim.items().is_empty());
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        sim.place_item(1, Vec2::new(600.0, 300.0));
        clock.set(100.0);
        sim.advance(0.05, &InputState::new());
        let time_left = sim.time_left();

        sim.start();
        assert_eq!(sim.time_left(), time_left);
        assert_eq!(sim.items().len(), 1);
    }

    #[test]
    fn test_one_spawn_after_1300ms() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.spawn_interval_ms(), 1200);

        clock.set(1300.0);
        sim.advance(1.3, &InputState::new());

        let spawned = sim
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ItemSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        clock.set(1200.0);
        sim.advance(0.05, &InputState::new());
        assert!(sim.items().is_empty());
    }

    #[test]
    fn test_spawn_interval_restarts_after_each_spawn() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        let mut spawns = 0;
        for frame in 1..=100 {
            clock.set(frame as f64 * 50.0);
            sim.advance(0.05, &InputState::new());
            spawns += sim
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ItemSpawned { .. }))
                .count();
        }
        // 5000ms of frames at 50ms: spawns at 1250, 2500, 3750, 5000
        assert_eq!(spawns, 4);
    }

    #[test]
    fn test_dt_is_clamped() {
        let (mut sim, _) = new_sim(Level::Normal);
        sim.start();
        sim.advance(10.0, &held(&["ArrowRight"]));
        assert!((sim.time_left() - (60.0 - MAX_STEP)).abs() < 1e-5);
        assert!((sim.player().pos.x - (80.0 + 250.0 * MAX_STEP)).abs() < 1e-4);
    }

    #[test]
    fn test_diagonal_speed_matches_axial() {
        let (mut axial, _) = new_sim(Level::Normal);
        let (mut diagonal, _) = new_sim(Level::Normal);
        axial.start();
        diagonal.start();
        let start = axial.player().pos;

        axial.advance(0.04, &held(&["d"]));
        diagonal.advance(0.04, &held(&["d", "s"]));

        let axial_dist = axial.player().pos.distance(start);
        let diagonal_dist = diagonal.player().pos.distance(start);
        assert!((axial_dist - diagonal_dist).abs() < 1e-4);
        assert!((axial_dist - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_collecting_adds_points_and_removes_item() {
        let (mut sim, _) = new_sim(Level::Normal);
        sim.start();
        let near = sim.place_item(0, Vec2::new(90.0, 85.0));
        let far = sim.place_item(2, Vec2::new(600.0, 350.0));

        sim.advance(0.016, &InputState::new());

        assert_eq!(sim.score(), 10);
        assert_eq!(sim.items().len(), 1);
        assert_eq!(sim.items()[0].id, far);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::ItemCollected {
            id: near,
            kind: 0,
            points: 10
        }));
    }

    #[test]
    fn test_round_ends_when_time_runs_out() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        let mut now = 0.0;
        let mut frames = 0;
        while sim.is_running() {
            now += 50.0;
            clock.set(now);
            sim.advance(0.05, &InputState::new());
            frames += 1;
            assert!(frames <= 1201, "round never ended");
        }
        assert_eq!(sim.phase(), Phase::Ended);
        assert!(sim.time_left() <= 0.0);
        assert_eq!(sim.snapshot().display_seconds(), 0);

        let ended: Vec<_> = sim
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::RoundEnded(summary) => Some(summary),
                _ => None,
            })
            .collect();
        assert_eq!(ended.len(), 1);
        assert!(Settings::default().tips.contains(&ended[0].tip));

        // Ended rounds no longer advance
        let before = sim.time_left();
        sim.advance(0.05, &InputState::new());
        assert_eq!(sim.time_left(), before);
    }

    #[test]
    fn test_items_accumulate_without_cap() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        // Park the player in a corner and never pick anything up
        for frame in 1..=600 {
            clock.set(frame as f64 * 50.0);
            sim.advance(0.05, &InputState::new());
        }
        assert!(sim.is_running());
        assert!(sim.items().len() >= 15);
    }

    #[test]
    fn test_restart_resets_everything() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        for _ in 0..5 {
            sim.place_item(1, Vec2::new(500.0, 300.0));
        }
        sim.place_item(0, Vec2::new(80.0, 80.0));
        clock.set(50.0);
        sim.advance(0.05, &held(&["s"]));
        assert!(sim.score() > 0);

        sim.restart();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.score(), 0);
        assert!(sim.items().is_empty());
        assert_eq!(sim.player().pos, Vec2::new(80.0, 80.0));
        assert_eq!(sim.time_left(), RESTART_TIME_LEFT);
    }

    #[test]
    fn test_easy_level_before_start() {
        let (mut sim, _) = new_sim(Level::Normal);
        sim.set_level(Level::Easy);
        sim.start();
        assert_eq!(sim.spawn_interval_ms(), 2000);
        assert_eq!(sim.time_left(), 60.0);
    }

    #[test]
    fn test_set_level_keeps_running_time() {
        let (mut sim, _) = new_sim(Level::Normal);
        sim.start();
        sim.advance(0.05, &InputState::new());
        let time_left = sim.time_left();
        sim.set_level(Level::Easy);
        assert_eq!(sim.time_left(), time_left);
        assert_eq!(sim.spawn_interval_ms(), 2000);
    }

    #[test]
    fn test_start_after_end_begins_fresh_round() {
        let (mut sim, clock) = new_sim(Level::Normal);
        sim.start();
        let mut now = 0.0;
        while sim.is_running() {
            now += 50.0;
            clock.set(now);
            sim.advance(0.05, &InputState::new());
        }
        sim.start();
        assert!(sim.is_running());
        assert_eq!(sim.time_left(), 60.0);
        assert_eq!(sim.score(), 0);
        assert!(sim.items().is_empty());
    }

    #[test]
    fn test_resize_clamps_on_next_advance() {
        let (mut sim, _) = new_sim(Level::Normal);
        sim.start();
        sim.place_item(1, Vec2::new(700.0, 400.0));
        sim.set_bounds(Vec2::new(60.0, 60.0));
        assert_eq!(sim.player().pos, Vec2::new(80.0, 80.0));
        assert_eq!(sim.items()[0].pos, Vec2::new(700.0, 400.0));

        sim.advance(0.0, &InputState::new());
        assert_eq!(sim.player().pos, Vec2::new(46.0, 46.0));
        assert_eq!(sim.items()[0].pos, Vec2::new(700.0, 400.0));
    }

    #[test]
    fn test_determinism() {
        let (mut a, clock_a) = new_sim(Level::Normal);
        let (mut b, clock_b) = new_sim(Level::Normal);
        a.start();
        b.start();
        let input = held(&["d", "s"]);
        for frame in 1..=200 {
            clock_a.set(frame as f64 * 50.0);
            clock_b.set(frame as f64 * 50.0);
            a.advance(0.05, &input);
            b.advance(0.05, &input);
        }
        assert_eq!(a.score(), b.score());
        assert_eq!(a.items(), b.items());
        assert_eq!(a.player().pos, b.player().pos);
    }

    fn key_set() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(
            prop::sample::select(vec!["a", "d", "w", "s", "arrowleft", "arrowdown", "x"]),
            0..4,
        )
    }

    proptest! {
        #[test]
        fn prop_timer_drops_by_clamped_dt(dt in 0.0f32..1.0) {
            let (mut sim, _) = new_sim(Level::Normal);
            sim.start();
            let before = sim.time_left();
            sim.advance(dt, &InputState::new());
            let expected = before - dt.min(MAX_STEP);
            prop_assert!((sim.time_left() - expected).abs() < 1e-5);
            prop_assert_eq!(sim.phase() == Phase::Ended, sim.time_left() <= 0.0);
        }

        #[test]
        fn prop_player_stays_in_bounds(
            frames in prop::collection::vec((key_set(), 0.0f32..0.2), 1..60),
            width in 60.0f32..900.0,
            height in 60.0f32..600.0,
        ) {
            let (mut sim, _) = new_sim(Level::Normal);
            sim.set_bounds(Vec2::new(width, height));
            sim.start();
            for (keys, dt) in frames {
                sim.advance(dt, &held(&keys));
                let p = sim.player();
                let r = p.radius();
                prop_assert!(p.pos.x >= r && p.pos.x <= width - r);
                prop_assert!(p.pos.y >= r && p.pos.y <= height - r);
            }
        }

        #[test]
        fn prop_score_never_decreases(
            frames in prop::collection::vec((key_set(), 0.0f32..0.1), 1..200),
            seed in any::<u64>(),
        ) {
            let clock = ManualClock::new(0.0);
            let mut sim = Simulation::new(Settings::default(), clock.clone(), seed);
            sim.start();
            let mut now = 0.0;
            let mut last_score = 0;
            for (keys, dt) in frames {
                now += 250.0;
                clock.set(now);
                sim.advance(dt, &held(&keys));
                prop_assert!(sim.score() >= last_score);
                last_score = sim.score();
            }
        }
    }
}
