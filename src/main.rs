//! Clean Sweep entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlElement, HtmlSelectElement, KeyboardEvent,
        MouseEvent,
    };

    use clean_sweep::consts::ROUND_END_POPUP_DELAY_MS;
    use clean_sweep::platform::{PerformanceClock, fit_to_container};
    use clean_sweep::renderer::CanvasRenderer;
    use clean_sweep::sim::RoundSummary;
    use clean_sweep::{Game, HostSinks, Level, Settings};

    /// Score/time labels and the round summary popup
    struct DomSinks {
        score: Option<Element>,
        time: Option<Element>,
        popup: Option<HtmlElement>,
        popup_message: Option<Element>,
    }

    impl DomSinks {
        fn new(document: &Document) -> Self {
            let sinks = Self {
                score: document.get_element_by_id("scoreDisplay"),
                time: document.get_element_by_id("timeDisplay"),
                popup: document
                    .get_element_by_id("popup")
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
                popup_message: document.get_element_by_id("popup-message"),
            };
            if sinks.score.is_none() || sinks.time.is_none() {
                log::warn!("Score or time display missing from the page");
            }
            sinks
        }

        fn hide_popup(&self) {
            if let Some(popup) = &self.popup {
                let _ = popup.style().set_property("display", "none");
            }
        }
    }

    impl HostSinks for DomSinks {
        fn show_score(&mut self, score: u32) {
            if let Some(el) = &self.score {
                el.set_text_content(Some(&score.to_string()));
            }
        }

        fn show_time(&mut self, seconds: u32) {
            if let Some(el) = &self.time {
                el.set_text_content(Some(&seconds.to_string()));
            }
        }

        fn round_ended(&mut self, summary: &RoundSummary) {
            let (Some(popup), Some(message)) = (self.popup.clone(), self.popup_message.clone())
            else {
                log::warn!("Popup missing, final score {}", summary.score);
                return;
            };
            let html = format!("Your score: {} <br> Tip: {}", summary.score, summary.tip);
            let closure = Closure::once(move || {
                message.set_inner_html(&html);
                let _ = popup.style().set_property("display", "flex");
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    ROUND_END_POPUP_DELAY_MS,
                );
            }
            closure.forget();
        }
    }

    /// Everything the browser callbacks share
    struct App {
        game: Game<PerformanceClock, DomSinks>,
        renderer: CanvasRenderer,
        /// A requestAnimationFrame callback is pending
        loop_active: bool,
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Clean Sweep starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let level_select: Option<HtmlSelectElement> = document
            .get_element_by_id("levelSelect")
            .and_then(|el| el.dyn_into().ok());

        let mut settings = Settings::default();
        if canvas.width() > 0 && canvas.height() > 0 {
            settings.bounds = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        }
        if let Some(select) = &level_select {
            settings.level = Level::from_name(&select.value());
        }
        if let Err(e) = settings.validate() {
            log::error!("Invalid settings ({}), using defaults", e);
            settings = Settings::default();
        }

        let renderer = CanvasRenderer::new(
            &canvas,
            settings.catalog.iter().map(|kind| kind.sprite.as_str()),
            &settings.player.sprite,
        )?;
        let clock =
            PerformanceClock::new().ok_or_else(|| JsValue::from_str("no performance timer"))?;
        let seed = js_sys::Date::now() as u64;
        let bounds = settings.bounds;
        let game = Game::new(settings, clock, DomSinks::new(&document), seed);
        log::info!("Game initialized with seed: {}", seed);

        renderer.draw_splash(bounds);
        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            loop_active: false,
        }));

        resize_canvas(&canvas);
        setup_resize(&canvas)?;
        setup_welcome_screen(&document)?;
        setup_keyboard(app.clone())?;
        setup_buttons(&document, app.clone())?;
        if let Some(select) = level_select {
            setup_level_select(&select, app.clone())?;
        }
        setup_popup_close(&document)?;
        setup_canvas_focus(&canvas)?;

        log::info!("Clean Sweep ready");
        Ok(())
    }

    /// Fit the canvas CSS size to its container, keeping the aspect ratio
    fn resize_canvas(canvas: &HtmlCanvasElement) {
        let Some(container) = canvas.parent_element() else {
            return;
        };
        let (w, h) = fit_to_container(
            f64::from(container.client_width()),
            f64::from(container.client_height()),
        );
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{w}px"));
        let _ = style.set_property("height", &format!("{h}px"));
    }

    fn setup_resize(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            resize_canvas(&canvas);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_welcome_screen(document: &Document) -> Result<(), JsValue> {
        let Some(welcome) = document.get_element_by_id("welcome-screen") else {
            return Ok(());
        };
        let target = welcome.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let _ = target.class_list().add_1("slide-up");
        });
        welcome.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.set_key(&event.key(), pressed);
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keys released while unfocused never send keyup
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            app.borrow_mut().game.release_keys();
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("startBtn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.game.start() && !a.loop_active {
                    a.loop_active = true;
                    drop(a);
                    request_animation_frame(app.clone());
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        } else {
            log::warn!("Start button missing");
        }

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.game.restart();
                a.game.sinks().hide_popup();
                let bounds = a.game.sim().bounds();
                a.renderer.draw_splash(bounds);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        } else {
            log::warn!("Restart button missing");
        }
        Ok(())
    }

    fn setup_level_select(select: &HtmlSelectElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let target = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let level = Level::from_name(&target.value());
            app.borrow_mut().game.set_level(level);
        });
        select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_popup_close(document: &Document) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id("close-popup") else {
            return Ok(());
        };
        let popup: Option<HtmlElement> = document
            .get_element_by_id("popup")
            .and_then(|el| el.dyn_into().ok());
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            if let Some(popup) = &popup {
                let _ = popup.style().set_property("display", "none");
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Clicking the canvas focuses it so key events arrive
    fn setup_canvas_focus(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let _ = target.focus();
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = {
            let mut a = app.borrow_mut();
            if !a.game.sim().is_running() {
                // Restarted while a frame was pending
                a.loop_active = false;
                return;
            }
            let running = a.game.frame(time);
            a.renderer.draw_frame(&a.game.sim().snapshot());
            if !running {
                a.loop_active = false;
            }
            running
        };

        if running {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Clean Sweep (native) starting...");
    log::info!("Native mode plays one headless round - build for wasm32 to play in the browser");

    let settings = load_settings();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let summary = headless::play_round(settings, seed);
    println!("Final score: {}", summary.score);
    println!("Tip: {}", summary.tip);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Settings from the file named by `CLEAN_SWEEP_SETTINGS`, or defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> clean_sweep::Settings {
    use clean_sweep::Settings;

    let Ok(path) = std::env::var("CLEAN_SWEEP_SETTINGS") else {
        return Settings::default();
    };
    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(e) => {
            log::error!("Could not load settings from {}: {}", path, e);
            Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clean_sweep::sim::{Clock, ManualClock, RoundSummary};
    use clean_sweep::{Game, HostSinks, Settings};

    /// Frame length of the simulated display (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Distance at which the autopilot stops steering along an axis
    const DEADZONE: f32 = 4.0;

    /// Sinks that log instead of drawing
    #[derive(Default)]
    struct LogSinks {
        last_time: Option<u32>,
        summary: Option<RoundSummary>,
    }

    impl HostSinks for LogSinks {
        fn show_score(&mut self, _score: u32) {}

        fn show_time(&mut self, seconds: u32) {
            if self.last_time != Some(seconds) && seconds % 10 == 0 {
                log::info!("{}s left", seconds);
            }
            self.last_time = Some(seconds);
        }

        fn round_ended(&mut self, summary: &RoundSummary) {
            self.summary = Some(summary.clone());
        }
    }

    /// Play one round, steering toward the nearest item each frame
    pub fn play_round(settings: Settings, seed: u64) -> RoundSummary {
        let clock = ManualClock::new(0.0);
        let mut game = Game::new(settings, clock.clone(), LogSinks::default(), seed);
        game.start();

        loop {
            steer(&mut game);
            clock.advance_ms(FRAME_MS);
            if !game.frame(clock.now_ms()) {
                break;
            }
        }

        game.sinks().summary.clone().unwrap_or_else(|| RoundSummary {
            score: game.sim().score(),
            tip: String::new(),
        })
    }

    fn steer(game: &mut Game<ManualClock, LogSinks>) {
        let player = game.sim().player().pos;
        let target = game
            .sim()
            .items()
            .iter()
            .map(|item| item.pos)
            .min_by(|a, b| {
                a.distance_squared(player)
                    .partial_cmp(&b.distance_squared(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let delta = target.map(|t| t - player).unwrap_or_default();

        game.set_key("a", delta.x < -DEADZONE);
        game.set_key("d", delta.x > DEADZONE);
        game.set_key("w", delta.y < -DEADZONE);
        game.set_key("s", delta.y > DEADZONE);
    }
}
