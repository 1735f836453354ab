//! Bubble Sum entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use bubble_sum::consts::*;
    use bubble_sum::history::{ScoreHistory, format_date};
    use bubble_sum::persistence::{HistoryStore, LocalStorage};
    use bubble_sum::platform::web::WebFeedback;
    use bubble_sum::renderer::CanvasRenderer;
    use bubble_sum::sim::GamePhase;
    use bubble_sum::{GameMode, Session, Settings};

    /// History rows shown on the game over screen
    const HISTORY_ROWS: usize = 5;

    /// Game instance holding all state
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        settings: Settings,
        last_time: f64,
        /// A rAF callback is queued
        running: bool,
    }

    impl Game {
        /// Re-measure the canvas and hand the new size to the sim
        fn resize(&mut self) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (w, h) = self.renderer.resize(dpr);
            self.session.state.set_field_size(w, h);
        }

        fn start(&mut self, seed: u64) {
            self.session.set_config(self.settings.game_config());
            self.session.restart(seed);
            self.last_time = 0.0;
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.session.state;

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-target .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.target.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.time_left.to_string()));
                // Last ten seconds flash
                let class = if state.time_left <= 10 { "hud-value warn" } else { "hud-value" };
                let _ = el.set_attribute("class", class);
            }

            show(document, "pause-menu", state.phase == GamePhase::Paused);
        }

        /// Fill in and reveal the game over screen
        fn show_game_over(&self, document: &Document) {
            let score = self.session.state.score;
            let history = ScoreHistory::from_entries(self.session.history());

            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("best-score") {
                let best = history.best().unwrap_or(score);
                el.set_text_content(Some(&best.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-rank") {
                el.set_text_content(Some(&format!("#{}", history.rank_of(score))));
            }
            if let Some(el) = document.get_element_by_id("history-list") {
                let rows: String = history
                    .entries()
                    .iter()
                    .take(HISTORY_ROWS)
                    .map(|e| {
                        format!(
                            "<li><span>{}</span><span>{}</span></li>",
                            e.score,
                            format_date(e.timestamp)
                        )
                    })
                    .collect();
                el.set_inner_html(&rows);
            }

            show(document, "hud", false);
            show(document, "game-over", true);
        }
    }

    /// Toggle the `hidden` class on an element
    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bubble Sum starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        show(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let renderer = CanvasRenderer::new(canvas.clone()).expect("no 2d context");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(
            seed,
            settings.game_config(),
            Box::new(WebFeedback::new(&settings)),
            Box::new(HistoryStore::new(LocalStorage)),
        );
        session.set_show_indicators(!settings.reduced_motion);

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            settings,
            last_time: 0.0,
            running: false,
        }));
        game.borrow_mut().resize();

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_start_buttons(game.clone());
        setup_mode_buttons(game.clone());
        setup_pause_menu(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game);

        show(&document, "start-screen", true);
        log::info!("Bubble Sum ready");
    }

    /// Canvas-relative CSS pixels, which are playfield units
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down (tap)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().session.tap(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (tap); suppresses the emulated mousedown
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.changed_touches();
                let mut g = game.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let point = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                        g.session.tap(point);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let "Escape" | "p" | "P" = event.key().as_str() {
                    toggle_pause(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn toggle_pause(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if !g.session.is_active() {
            return;
        }
        g.session.toggle_pause();
        g.last_time = 0.0;
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            g.update_hud(&document);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Queue the loop unless one is already queued
    fn ensure_running(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
        }
        request_animation_frame(game);
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let running = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            let running = g.session.frame(dt);
            let Game {
                session, renderer, ..
            } = &mut *g;
            session.render(renderer);
            g.update_hud(&document);

            if !running {
                g.running = false;
                g.show_game_over(&document);
            }
            running
        };

        if running {
            request_animation_frame(game);
        }
    }

    fn setup_start_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["start-btn", "restart-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().start(seed);

                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    show(&document, "start-screen", false);
                    show(&document, "game-over", false);
                    show(&document, "hud", true);
                }
                ensure_running(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Mode picker on the start screen; the choice is remembered
    fn setup_mode_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for mode in [GameMode::Easy, GameMode::Normal, GameMode::Hard] {
            let Some(btn) = document.get_element_by_id(&format!("mode-{}", mode.as_str())) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.mode = mode;
                g.settings.save();
                log::info!("Mode set to {}", mode.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_menu(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_pause(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        let pause_if_playing = |game: &Rc<RefCell<Game>>, why: &str| {
            let should_pause = {
                let g = game.borrow();
                g.settings.pause_on_blur && g.session.state.phase == GamePhase::Playing
            };
            if should_pause {
                toggle_pause(game);
                log::info!("Auto-paused ({})", why);
            }
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause_if_playing(&game, "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                pause_if_playing(&game, "window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Frames between bot taps in the headless demo (~4 taps a second)
#[cfg(not(target_arch = "wasm32"))]
const BOT_TAP_INTERVAL: u64 = 15;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubble_sum::consts::SIM_DT_MS;
    use bubble_sum::persistence::{HistoryStore, MemoryStorage};
    use bubble_sum::platform::NullHaptics;
    use bubble_sum::sim::next_tap;
    use bubble_sum::{GameMode, Session, Settings};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .map(|arg| {
            GameMode::from_str(&arg).unwrap_or_else(|| {
                log::warn!("Unknown mode '{}', using normal", arg);
                GameMode::Normal
            })
        })
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    log::info!("Bubble Sum (native) auto-play: mode={} seed={}", mode.as_str(), seed);

    let settings = Settings::for_mode(mode);
    let mut session = Session::new(
        seed,
        settings.game_config(),
        Box::new(NullHaptics),
        Box::new(HistoryStore::new(MemoryStorage::new())),
    );

    let mut frame = 0u64;
    while session.frame(SIM_DT_MS) {
        frame += 1;
        if frame % BOT_TAP_INTERVAL == 0 {
            if let Some(point) = next_tap(&session.state) {
                let outcome = session.tap(point);
                log::debug!(
                    "frame {}: tap ({:.0}, {:.0}) -> {:?}",
                    frame,
                    point.x,
                    point.y,
                    outcome
                );
            }
        }
    }

    let stats = session.state.stats;
    log::info!(
        "Final score {} after {} frames: {} matches, {} mismatches, {} misses, {} bonuses",
        session.state.score,
        frame,
        stats.matches,
        stats.mismatches,
        stats.misses,
        stats.bonuses
    );
    log::info!("{} bubbles spawned", stats.spawned);
    println!("{}", session.state.score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
