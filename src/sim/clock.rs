//! Time source for the simulation

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Hand-driven clock for tests and headless runs.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the simulation.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        debug_assert!(ms >= self.now.get(), "clock must not run backwards");
        self.now.set(ms);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
