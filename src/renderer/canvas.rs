//! 2D canvas backend (wasm only)

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{DrawCommand, Snapshot, frame_commands, splash_commands};
use glam::Vec2;

/// Draws command lists onto a canvas with preloaded sprites
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    sprites: HashMap<String, HtmlImageElement>,
    player_sprite: String,
}

impl CanvasRenderer {
    /// Grab the 2D context and start loading every sprite once
    pub fn new<'a>(
        canvas: &HtmlCanvasElement,
        sprite_keys: impl IntoIterator<Item = &'a str>,
        player_sprite: &str,
    ) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let mut sprites = HashMap::new();
        for key in sprite_keys.into_iter().chain(std::iter::once(player_sprite)) {
            if sprites.contains_key(key) {
                continue;
            }
            let img = HtmlImageElement::new()?;
            img.set_src(key);
            sprites.insert(key.to_string(), img);
        }
        log::info!("Loading {} sprites", sprites.len());

        Ok(Self {
            ctx,
            sprites,
            player_sprite: player_sprite.to_string(),
        })
    }

    pub fn draw_frame(&self, snapshot: &Snapshot<'_>) {
        self.execute(&frame_commands(snapshot, &self.player_sprite));
    }

    pub fn draw_splash(&self, bounds: Vec2) {
        self.execute(&splash_commands(bounds));
    }

    fn execute(&self, commands: &[DrawCommand<'_>]) {
        let ctx = &self.ctx;
        for command in commands {
            match command {
                DrawCommand::Clear { width, height } => {
                    ctx.clear_rect(0.0, 0.0, f64::from(*width), f64::from(*height));
                }
                DrawCommand::FillRect { rect, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(
                        f64::from(rect.x),
                        f64::from(rect.y),
                        f64::from(rect.w),
                        f64::from(rect.h),
                    );
                }
                DrawCommand::Sprite { key, rect } => {
                    let Some(img) = self.sprites.get(*key) else {
                        log::warn!("Unknown sprite: {}", key);
                        continue;
                    };
                    // Images that are still loading draw nothing
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        f64::from(rect.x),
                        f64::from(rect.y),
                        f64::from(rect.w),
                        f64::from(rect.h),
                    );
                }
                DrawCommand::Text {
                    text,
                    pos,
                    color,
                    font,
                } => {
                    ctx.set_fill_style_str(color);
                    ctx.set_font(font);
                    let _ = ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y));
                }
            }
        }
    }
}
