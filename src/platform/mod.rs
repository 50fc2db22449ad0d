//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (performance.now() on web)
//! - Responsive canvas sizing

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Canvas aspect ratio (width / height)
pub const ASPECT_RATIO: f64 = CANVAS_WIDTH as f64 / CANVAS_HEIGHT as f64;

/// Largest CSS size with the canvas aspect ratio that fits the container.
///
/// Fills the container width unless that would overflow its height.
pub fn fit_to_container(container_w: f64, container_h: f64) -> (f64, f64) {
    let mut width = container_w;
    let mut height = container_w / ASPECT_RATIO;
    if height > container_h {
        height = container_h;
        width = height * ASPECT_RATIO;
    }
    (width, height)
}

/// Clock backed by `window.performance.now()`, the same timebase as
/// `requestAnimationFrame` timestamps
#[cfg(target_arch = "wasm32")]
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Option<Self> {
        let performance = web_sys::window()?.performance()?;
        Some(Self { performance })
    }
}

#[cfg(target_arch = "wasm32")]
impl crate::sim::Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}
