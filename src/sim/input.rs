//! Held-key state for movement

use std::collections::HashSet;

use glam::Vec2;

const LEFT: [&str; 2] = ["arrowleft", "a"];
const RIGHT: [&str; 2] = ["arrowright", "d"];
const UP: [&str; 2] = ["arrowup", "w"];
const DOWN: [&str; 2] = ["arrowdown", "s"];

/// Set of currently held logical keys.
///
/// Key names are stored lower-cased, so "ArrowLeft" and "arrowleft" are the
/// same key. Unknown keys are accepted and simply never affect movement.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release
    pub fn set_key(&mut self, name: &str, pressed: bool) {
        let key = name.to_lowercase();
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_pressed(&self, name: &str) -> bool {
        self.held.contains(&name.to_lowercase())
    }

    /// Release everything (e.g. when the window loses focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    /// Movement direction from the held keys.
    ///
    /// Opposing keys on one axis resolve toward the positive direction.
    /// Diagonals have unit length.
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.any(&LEFT) {
            dir.x = -1.0;
        }
        if self.any(&RIGHT) {
            dir.x = 1.0;
        }
        if self.any(&UP) {
            dir.y = -1.0;
        }
        if self.any(&DOWN) {
            dir.y = 1.0;
        }
        if dir.x != 0.0 && dir.y != 0.0 {
            dir *= std::f32::consts::FRAC_1_SQRT_2;
        }
        dir
    }
}
