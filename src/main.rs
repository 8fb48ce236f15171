//! Vocab Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! Browser: canvas + DOM HUD. Native: a headless autoplay round for testing
//! word lists and tuning.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use vocab_pop::audio::{AudioManager, SoundEffect};
    use vocab_pop::renderer::CanvasRenderer;
    use vocab_pop::sim::{
        FrameClock, GameEvent, GamePhase, GameState, TickInput, catch_up, handle_hit, start, tick,
    };
    use vocab_pop::{BestScore, Settings, Tuning, vocab};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        settings: Settings,
        best: BestScore,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement) -> Self {
            let settings = Settings::load();
            let best = BestScore::load();
            let tuning = load_tuning();

            let mut state = GameState::new(seed, tuning);
            state.apply_settings(&settings);
            state.best_score = best.score;

            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            let renderer = CanvasRenderer::new(&canvas);
            if renderer.is_none() {
                log::error!("Canvas 2D context unavailable");
            }

            Self {
                state,
                clock: FrameClock::new(),
                renderer,
                audio,
                settings,
                best,
                canvas,
            }
        }

        /// Match canvas resolution and play area to its CSS size
        fn resize(&mut self) {
            let w = self.canvas.client_width().max(1) as u32;
            let h = self.canvas.client_height().max(1) as u32;
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.state.set_play_area(w as f32, h as f32);
            if let Some(r) = self.renderer.as_mut() {
                r.resize(w as f64, h as f64);
            }
        }

        /// Convert client coordinates to play-area coordinates
        fn to_play_area(&self, client_x: f64, client_y: f64) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new((client_x - rect.left()) as f32, (client_y - rect.top()) as f32)
        }

        /// Read vocabulary and sliders, then start a round
        fn start_round(&mut self) {
            let document = document();
            set_notice(&document, None);

            let entries = match read_vocabulary(&document) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Vocabulary unavailable: {}", e);
                    set_notice(&document, Some(&format!("Cannot start: {e}")));
                    return;
                }
            };

            if let Some(speed) = slider_value(&document, "speed-slider") {
                self.settings.fall_speed = Settings::snap_fall_speed(speed as f32);
            }
            if let Some(secs) = slider_value(&document, "duration-slider") {
                self.settings.round_secs = Settings::snap_round_secs(secs.max(0.0) as u32);
            }
            self.settings = self.settings.clamped();
            self.settings.save();
            self.audio.apply_settings(&self.settings);

            self.state.set_vocabulary(entries);
            self.state.apply_settings(&self.settings);
            self.audio.resume();

            match start(&mut self.state) {
                Ok(()) => {
                    self.clock.reset();
                    self.audio.play(SoundEffect::Start);
                    self.audio.start_music();
                    show(&document, "start-screen", false);
                    show(&document, "game-over-screen", false);
                }
                Err(e) => {
                    set_notice(&document, Some(&format!("Cannot start: {e}")));
                }
            }
        }

        /// Run simulation steps for one animation frame
        fn update(&mut self, time: f64) {
            let dt = self.clock.frame_delta(time);
            let steps = self.clock.advance(dt);
            let input = TickInput::default();
            for _ in 0..steps {
                tick(&mut self.state, &input);
            }
            catch_up(&mut self.state, self.clock.take_backlog());
            self.process_events();
        }

        /// Sound cues, best score persistence and the game over screen
        fn process_events(&mut self) {
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::GameOver { final_score } => {
                        self.audio.stop_music();
                        let document = document();
                        if let Some(el) = document.get_element_by_id("final-score") {
                            el.set_text_content(Some(&format!("Final Score: {final_score}")));
                        }
                        show(&document, "game-over-screen", true);
                    }
                    GameEvent::NewBest { score } => {
                        if self.best.submit(score) {
                            self.best.save();
                        }
                    }
                    _ => {}
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.state);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let document = document();

            if let Some(el) = document.get_element_by_id("current-word") {
                el.set_text_content(Some(self.state.target_word()));
            }
            if let Some(el) = document.get_element_by_id("score-val") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("time-val") {
                el.set_text_content(Some(&self.state.time_remaining.to_string()));
            }
            if let Some(el) = document.get_element_by_id("best-val") {
                el.set_text_content(Some(&self.best.score.to_string()));
            }
            if let Some(el) = document
                .get_element_by_id("timer-bar-fill")
                .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let pct = self.state.time_fraction() * 100.0;
                let _ = el.style().set_property("width", &format!("{pct}%"));
            }
        }
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "screen" } else { "screen hidden" });
        }
    }

    fn set_notice(document: &Document, text: Option<&str>) {
        if let Some(el) = document.get_element_by_id("notice") {
            el.set_text_content(text);
            let _ = el.set_attribute("class", if text.is_some() { "" } else { "hidden" });
        }
    }

    fn slider_value(document: &Document, id: &str) -> Option<f64> {
        let input: HtmlInputElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        let value = input.value_as_number();
        value.is_finite().then_some(value)
    }

    /// Vocabulary JSON is placed in `<script id="vocab-data">` by the upload page
    fn read_vocabulary(document: &Document) -> Result<Vec<vocab::VocabEntry>, vocab::VocabError> {
        let json = document
            .get_element_by_id("vocab-data")
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        vocab::parse_json(&json)
    }

    /// Optional balance overrides from `<script id="tuning-data">`
    fn load_tuning() -> Tuning {
        let json = document()
            .get_element_by_id("tuning-data")
            .and_then(|el| el.text_content());
        match json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring bad tuning overrides: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Vocab Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone())));
        game.borrow_mut().resize();
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        game.borrow().update_hud();
        request_animation_frame(game);

        log::info!("Vocab Pop running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - pop immediately, inside the current frame
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.to_play_area(event.client_x() as f64, event.client_y() as f64);
                handle_hit(&mut g.state, point);
                g.process_events();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - first finger only
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let point = g.to_play_area(touch.client_x() as f64, touch.client_y() as f64);
                handle_hit(&mut g.state, point);
                g.process_events();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = document();

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    if g.state.phase != GamePhase::Running {
                        g.start_round();
                    }
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
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
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Vocab Pop (native) starting...");
    log::info!("Native mode plays a headless demo round - run with `trunk serve` for the web version");

    if let Err(e) = native::run_demo(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use vocab_pop::consts::SIM_DT;
    use vocab_pop::sim::{FrameClock, GameEvent, GamePhase, GameState, TickInput, start, tick};
    use vocab_pop::{Settings, Tuning, VocabError, vocab};

    /// Errors from the headless demo
    #[derive(Debug, thiserror::Error)]
    pub enum DemoError {
        #[error("cannot read {path}: {source}")]
        Read {
            path: String,
            source: std::io::Error,
        },
        #[error(transparent)]
        Vocab(#[from] VocabError),
    }

    /// Play one autoplay round with a word list (JSON file) or the built-in one
    pub fn run_demo(path: Option<String>) -> Result<(), DemoError> {
        let entries = match path {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| DemoError::Read { path: path.clone(), source })?;
                vocab::parse_json(&json)?
            }
            None => vocab::demo_vocabulary(),
        };

        let settings = Settings::load();
        let mut state = GameState::new(0x5EED, Tuning::default());
        state.set_vocabulary(entries);
        state.apply_settings(&settings);
        start(&mut state)?;

        // Drive it like a 60 fps display
        let mut clock = FrameClock::new();
        let input = TickInput {
            taps: Vec::new(),
            autoplay: true,
        };
        let (mut correct, mut wrong) = (0u32, 0u32);
        while state.phase == GamePhase::Running {
            for _ in 0..clock.advance(SIM_DT) {
                tick(&mut state, &input);
            }
            for event in state.drain_events() {
                match event {
                    GameEvent::TargetChanged { word } => log::debug!("Target: {}", word),
                    GameEvent::Hit { correct: true, .. } => correct += 1,
                    GameEvent::Hit { correct: false, .. } => wrong += 1,
                    GameEvent::GameOver { final_score } => {
                        log::info!("Final score: {} ({} correct, {} wrong)", final_score, correct, wrong);
                    }
                    GameEvent::NewBest { score } => log::info!("New best: {}", score),
                    GameEvent::Miss { .. } => {}
                }
            }
        }
        Ok(())
    }
}
