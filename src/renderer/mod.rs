//! Rendering
//!
//! The simulation is turned into a flat list of `DrawCommand`s each frame.
//! Layout (sprite rects, labels, splash text) is decided here so it can be
//! tested natively; the wasm build replays the commands on a 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::consts::PLAYER_SPRITE_SCALE;
use crate::sim::Snapshot;

/// Splash prompt shown while idle
pub const SPLASH_TEXT: &str = "Press \"Start\" to begin the clean-up mission";

const SPLASH_MARGIN: f32 = 12.0;
const SPLASH_FILL: &str = "#fff";
const SPLASH_TEXT_COLOR: &str = "#a6171c";
const SPLASH_FONT: &str = "20px Poppins";
const LABEL_COLOR: &str = "rgba(0,0,0,0.12)";
const LABEL_FONT: &str = "11px Arial";

/// Axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Square of side `size` centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            w: size,
            h: size,
        }
    }
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<'a> {
    /// Clear the whole canvas
    Clear { width: f32, height: f32 },
    /// Solid rectangle
    FillRect { rect: Rect, color: &'static str },
    /// Sprite looked up by its opaque key
    Sprite { key: &'a str, rect: Rect },
    /// Text with its baseline-left corner at `pos`
    Text {
        text: String,
        pos: Vec2,
        color: &'static str,
        font: &'static str,
    },
}

/// Commands for the idle splash screen
pub fn splash_commands(bounds: Vec2) -> Vec<DrawCommand<'static>> {
    vec![
        DrawCommand::Clear {
            width: bounds.x,
            height: bounds.y,
        },
        DrawCommand::FillRect {
            rect: Rect {
                x: SPLASH_MARGIN,
                y: SPLASH_MARGIN,
                w: bounds.x - SPLASH_MARGIN * 2.0,
                h: bounds.y - SPLASH_MARGIN * 2.0,
            },
            color: SPLASH_FILL,
        },
        DrawCommand::Text {
            text: SPLASH_TEXT.to_string(),
            pos: Vec2::new(50.0, 70.0),
            color: SPLASH_TEXT_COLOR,
            font: SPLASH_FONT,
        },
    ]
}

/// Commands for one gameplay frame: items with point labels, then the player
pub fn frame_commands<'a>(snapshot: &Snapshot<'a>, player_sprite: &'a str) -> Vec<DrawCommand<'a>> {
    let mut commands = Vec::with_capacity(snapshot.items.len() * 2 + 2);
    commands.push(DrawCommand::Clear {
        width: snapshot.bounds.x,
        height: snapshot.bounds.y,
    });

    for item in snapshot.items {
        let kind = &snapshot.catalog[item.kind];
        commands.push(DrawCommand::Sprite {
            key: &kind.sprite,
            rect: Rect::centered(item.pos, kind.size),
        });
        commands.push(DrawCommand::Text {
            text: format!("+{}", kind.points),
            pos: item.pos + Vec2::new(-8.0, 4.0),
            color: LABEL_COLOR,
            font: LABEL_FONT,
        });
    }

    let player = snapshot.player;
    commands.push(DrawCommand::Sprite {
        key: player_sprite,
        rect: Rect::centered(player.pos, player.size * PLAYER_SPRITE_SCALE),
    });

    commands
}
