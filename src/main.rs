//! Bounce Clock entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{OnceCell, RefCell};
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent};

    use bounce_clock::{Settings, SettingsError};
    use bounce_clock::audio::AudioManager;
    use bounce_clock::panel::PanelText;
    use bounce_clock::platform::IntervalScheduler;
    use bounce_clock::renderer::{FrameInfo, SdfRenderState};
    use bounce_clock::session::{
        LocalClock, PcgRandom, SessionController, StartOutcome, TickOutcome,
    };
    use bounce_clock::sim::{Arena, FrameStepper};

    type WebController =
        SessionController<PcgRandom, LocalClock, IntervalScheduler, AudioManager, Arena>;

    /// Game instance holding all state
    struct Game {
        controller: WebController,
        render_state: Option<SdfRenderState>,
        stepper: FrameStepper,
        last_time: f64,
        // Last panel written to the DOM
        panel: Option<PanelText>,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64) -> Result<Rc<RefCell<Self>>, SettingsError> {
            // Filled once the game exists; the interval callback only holds a Weak
            let slot: Rc<OnceCell<Weak<RefCell<Game>>>> = Rc::default();
            let scheduler = IntervalScheduler::new({
                let slot = slot.clone();
                move || {
                    if let Some(game) = slot.get().and_then(Weak::upgrade) {
                        game.borrow_mut().on_timer();
                    }
                }
            });
            let controller = SessionController::new(
                settings.session.clone(),
                PcgRandom::new(seed),
                LocalClock,
                scheduler,
                AudioManager::new(settings),
                Arena::default(),
            )?;
            let game = Rc::new(RefCell::new(Self {
                controller,
                render_state: None,
                stepper: FrameStepper::new(),
                last_time: 0.0,
                panel: None,
            }));
            let _ = slot.set(Rc::downgrade(&game));
            Ok(game)
        }

        fn on_start(&mut self) {
            if let StartOutcome::Started { id, .. } = self.controller.start() {
                self.stepper.reset();
                log::info!("Session {} running", id);
            }
        }

        fn on_timer(&mut self) {
            if let TickOutcome::Ended(session) = self.controller.tick() {
                log::info!(
                    "Session {} complete after {}s",
                    session.id,
                    session.duration_secs
                );
            }
        }

        /// Run motion substeps
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;
            self.stepper.advance(self.controller.motion_mut(), dt);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let frame = FrameInfo {
                time_ms: time,
                running: self.controller.is_running(),
                remaining_secs: self.controller.remaining_secs(),
                duration_secs: self
                    .controller
                    .active()
                    .map(|a| a.duration_secs)
                    .unwrap_or(0),
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.controller.motion(), &frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update side panel elements in DOM (only when something changed)
        fn update_panel(&mut self, document: &Document) {
            let panel = PanelText::from_snapshot(&self.controller.snapshot());
            if self.panel.as_ref() == Some(&panel) {
                return;
            }

            for (id, text) in [
                ("sessionId", &panel.session_id),
                ("startTime", &panel.start_time),
                ("endTime", &panel.end_time),
                ("counter", &panel.counter),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            }

            let history_changed = self
                .panel
                .as_ref()
                .is_none_or(|old| old.history != panel.history);
            if history_changed {
                if let Some(list) = document.get_element_by_id("sessionList") {
                    list.set_text_content(None);
                    for line in &panel.history {
                        if let Ok(item) = document.create_element("li") {
                            item.set_text_content(Some(line));
                            let _ = list.append_child(&item);
                        }
                    }
                }
            }

            self.panel = Some(panel);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Bounce Clock starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(&settings, seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid session rules: {}", e);
                return;
            }
        };

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match SdfRenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Renderer unavailable: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        // Sessions keep running without a canvas
        setup_start_button(&document, game.clone());
        setup_teardown(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Bounce Clock running!");
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("startSessionBtn") else {
            log::warn!("No #startSessionBtn element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().on_start();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the countdown and sound before the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().controller.teardown();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_panel(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bounce_clock::session::{Clock, LocalClock};

    env_logger::init();
    log::info!("Bounce Clock (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let sessions: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    log::info!("Seed: {}", seed);

    let history = match headless::run(
        &bounce_clock::Settings::load(),
        sessions,
        seed,
        LocalClock.now(),
    ) {
        Ok(history) => history,
        Err(e) => {
            log::error!("Invalid session rules: {}", e);
            std::process::exit(1);
        }
    };

    match history.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to export history: {}", e),
    }
}

/// Runs sessions back to back with simulated time
///
/// The clock only moves when a countdown period elapses, so every logged
/// session spans exactly its length in periods.
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bounce_clock::consts::SIM_DT;
    use bounce_clock::session::{
        ManualScheduler, PcgRandom, SessionController, SessionHistory, SilentAudio, StepClock,
        TickOutcome,
    };
    use bounce_clock::sim::{Arena, step};
    use bounce_clock::{Settings, SettingsError};
    use chrono::{NaiveTime, TimeDelta};

    pub fn run(
        settings: &Settings,
        sessions: usize,
        seed: u64,
        start: NaiveTime,
    ) -> Result<SessionHistory, SettingsError> {
        let mut controller = SessionController::new(
            settings.session.clone(),
            PcgRandom::new(seed),
            StepClock::new(start, TimeDelta::zero()),
            ManualScheduler::new(),
            SilentAudio,
            Arena::default(),
        )?;
        let period = TimeDelta::milliseconds(i64::from(settings.session.tick_period_ms));
        let steps_per_tick =
            (settings.session.tick_period().as_secs_f32() / SIM_DT).round() as u32;

        for _ in 0..sessions {
            controller.start();
            loop {
                for _ in 0..steps_per_tick {
                    step(controller.motion_mut(), SIM_DT);
                }
                controller.clock().advance(period);
                match controller.tick() {
                    TickOutcome::Counting { remaining_secs } if remaining_secs % 10 == 0 => {
                        let ball = &controller.motion().ball;
                        log::info!(
                            "{}s left, ball at ({:.0}, {:.0})",
                            remaining_secs,
                            ball.pos.x,
                            ball.pos.y
                        );
                    }
                    TickOutcome::Counting { .. } => {}
                    TickOutcome::Ended(session) => {
                        log::info!(
                            "Session {} done, {} wall bounces so far",
                            session.id,
                            controller.motion().bounces
                        );
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
        }

        Ok(controller.history().clone())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use bounce_clock::SessionRules;

        fn nine_am() -> NaiveTime {
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        }

        fn short_sessions() -> Settings {
            Settings {
                session: SessionRules {
                    min_secs: 3,
                    max_secs: 6,
                    ..Default::default()
                },
                ..Default::default()
            }
        }

        #[test]
        fn test_logged_times_span_session_length() {
            let history = run(&short_sessions(), 4, 11, nine_am()).unwrap();
            assert_eq!(history.len(), 4);

            let mut expected_start = nine_am();
            for session in &history {
                assert_eq!(session.started_at, expected_start);
                assert_eq!(
                    session.ended_at - session.started_at,
                    TimeDelta::seconds(i64::from(session.duration_secs))
                );
                assert!((3..=6).contains(&session.duration_secs));
                expected_start = session.ended_at;
            }
        }

        #[test]
        fn test_longer_period_scales_logged_span() {
            let mut settings = short_sessions();
            settings.session.tick_period_ms = 2000;
            let history = run(&settings, 1, 5, nine_am()).unwrap();
            let session = history.last().unwrap();
            assert_eq!(
                session.ended_at - session.started_at,
                TimeDelta::seconds(2 * i64::from(session.duration_secs))
            );
        }

        #[test]
        fn test_midnight_wraps_time_of_day() {
            let late = NaiveTime::from_hms_opt(23, 59, 58).unwrap();
            let history = run(&short_sessions(), 1, 7, late).unwrap();
            let session = history.last().unwrap();
            assert!(session.ended_at < session.started_at);
            assert_eq!(
                session.ended_at - session.started_at + TimeDelta::days(1),
                TimeDelta::seconds(i64::from(session.duration_secs))
            );
        }

        #[test]
        fn test_invalid_rules_are_reported() {
            let mut settings = short_sessions();
            settings.session.max_vy = i32::MIN;
            assert!(matches!(
                run(&settings, 1, 5, nine_am()),
                Err(SettingsError::InvalidRange {
                    field: "vertical speed",
                    ..
                })
            ));
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
