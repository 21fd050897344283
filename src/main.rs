//! Medieval Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use medieval_invaders::audio::AudioManager;
    use medieval_invaders::input::TouchButton;
    use medieval_invaders::persistence::LocalStorage;
    use medieval_invaders::renderer::view::OrbitCamera;
    use medieval_invaders::renderer::{Projection, RenderState, build};
    use medieval_invaders::{HeldKeys, Phase, RenderMode, Session, SoundCue, Tuning};

    /// Simulation rate the per-frame speeds are tuned for
    const FRAME_DT: f64 = 1000.0 / 60.0;
    /// Maximum catch-up frames per animation frame
    const MAX_SUBSTEPS: u32 = 4;
    /// How long the level-up banner stays up, in ms
    const BANNER_MS: f64 = 2000.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        keys: HeldKeys,
        audio: AudioManager,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        accumulator: f64,
        last_time: f64,
        /// Phase the DOM currently shows
        shown_phase: Option<Phase>,
        camera: OrbitCamera,
        /// Last pointer position while orbiting the 3D camera
        drag_from: Option<(i32, i32)>,
        /// Animation time at which the level banner hides
        banner_until: Option<f64>,
    }

    impl Game {
        /// Run simulation frames owed since the last animation frame
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                FRAME_DT
            };
            self.last_time = time;
            self.accumulator = (self.accumulator + elapsed).min(FRAME_DT * MAX_SUBSTEPS as f64);

            while self.accumulator >= FRAME_DT {
                let input = self.keys.snapshot();
                self.session.frame(&input);
                self.accumulator -= FRAME_DT;
            }

            for cue in self.session.drain_cues() {
                if cue == SoundCue::LevelUp {
                    self.banner_until = Some(time + BANNER_MS);
                }
                self.audio.play(cue);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let snapshot = self.session.snapshot();
            let projection =
                Projection::for_playfield(&snapshot.playfield, &self.camera, render_state.aspect());
            let vertices = build(&snapshot, &projection);

            match render_state.render(&vertices) {
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

        /// Size the canvas to the 2D playfield for the current viewport
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(840.0) as f32;
            self.session.set_viewport_width(viewport);

            let field = Tuning::planar(viewport).playfield;
            let dpr = window.device_pixel_ratio();
            let (w, h) = (field.move_extent() as f64, field.advance_extent() as f64);
            let _ = self
                .canvas
                .set_attribute("style", &format!("width:{w}px;height:{h}px"));
            let (pw, ph) = ((w * dpr) as u32, (h * dpr) as u32);
            self.canvas.set_width(pw);
            self.canvas.set_height(ph);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(pw, ph);
            }
        }

        /// Update HUD elements and show the right screen
        fn update_hud(&mut self, document: &Document) {
            let phase = self.session.phase();
            let s = &self.session;

            set_text(document, "#hud-score .hud-value", &s.score().to_string());
            set_text(document, "#hud-level .hud-value", &s.level().to_string());
            set_text(document, "#hud-lives .hud-value", &s.lives().to_string());
            set_text(document, "#hud-best .hud-value", &s.high_score().to_string());

            let banner = phase == Phase::Playing
                && self.banner_until.is_some_and(|until| self.last_time < until);
            if banner {
                let text = format!("Level {} - Enemies are getting stronger!", s.level());
                set_text(document, "#level-banner", &text);
            } else {
                self.banner_until = None;
            }
            show(document, "level-banner", banner);

            if self.shown_phase == Some(phase) {
                return;
            }
            self.shown_phase = Some(phase);

            show(document, "start-screen", phase == Phase::Start);
            show(document, "hud", phase == Phase::Playing);
            show(document, "controls", phase == Phase::Playing);
            show(document, "game-over", phase == Phase::GameOver);

            match phase {
                Phase::Start => refresh_start_screen(document, s),
                Phase::GameOver => {
                    set_text(document, "#final-score", &s.score().to_string());
                    set_text(document, "#final-best", &s.high_score().to_string());
                    show(document, "new-best", s.is_new_best());
                }
                Phase::Playing => {}
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn refresh_start_screen(document: &Document, session: &Session) {
        let mode = session.render_mode();
        let title = match mode {
            RenderMode::Planar => "Medieval Invaders",
            RenderMode::Volumetric => "Medieval Invaders 3D",
        };
        set_text(document, "#start-title", title);
        set_text(document, "#mode-btn", &format!("Switch to {}", mode.toggled().as_str()));
        let best = session.high_score();
        show(document, "start-best", best > 0);
        set_text(document, "#start-best-value", &best.to_string());
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Medieval Invaders starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        show(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let viewport = window.inner_width()?.as_f64().unwrap_or(840.0) as f32;
        let session = Session::new(Box::new(LocalStorage::new()), viewport, seed);
        let audio = AudioManager::new(session.settings());

        let game = Rc::new(RefCell::new(Game {
            session,
            keys: HeldKeys::new(),
            audio,
            render_state: None,
            canvas: canvas.clone(),
            accumulator: 0.0,
            last_time: 0.0,
            shown_phase: None,
            camera: OrbitCamera::default(),
            drag_from: None,
            banner_until: None,
        }));
        game.borrow_mut().fit_canvas();

        log::info!("Game initialized with seed: {}", seed);

        // WebGPU where available, WebGL2 otherwise
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone())?;
        setup_touch_buttons(&document, game.clone());
        setup_orbit(&canvas, game.clone())?;
        setup_buttons(&document, game.clone());
        setup_window_events(game.clone())?;

        request_animation_frame(game);

        log::info!("Medieval Invaders running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.keys.key_down(&event.key()) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
                if event.key() == "Enter" && g.session.phase() != Phase::Playing {
                    g.audio.resume();
                    g.session.start();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_touch_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["leftBtn", "rightBtn", "shootBtn"] {
            let (Some(btn), Some(button)) = (
                document.get_element_by_id(id),
                TouchButton::from_element_id(id),
            ) else {
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().keys.touch_start(button);
                });
                let _ = btn.add_event_listener_with_callback(
                    "touchstart",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }

            for end in ["touchend", "touchcancel"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().keys.touch_end(button);
                });
                let _ = btn.add_event_listener_with_callback(end, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Drag on the canvas orbits the 3D camera
    fn setup_orbit(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.session.render_mode() == RenderMode::Volumetric {
                    g.drag_from = Some((event.client_x(), event.client_y()));
                }
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let Some((x, y)) = g.drag_from else {
                    return;
                };
                let (nx, ny) = (event.client_x(), event.client_y());
                g.camera.drag((nx - x) as f32, (ny - y) as f32);
                g.drag_from = Some((nx, ny));
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().drag_from = None;
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            let game = game.clone();
            on_click(document, id, move || {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.fit_canvas();
                g.session.start();
            });
        }

        {
            let game = game.clone();
            let doc = document.clone();
            on_click(document, "mode-btn", move || {
                let mut g = game.borrow_mut();
                if g.session.toggle_render_mode() {
                    refresh_start_screen(&doc, &g.session);
                }
            });
        }

        {
            let doc = document.clone();
            on_click(document, "mute-btn", move || {
                let mut g = game.borrow_mut();
                let muted = !g.session.settings().muted;
                g.session.set_muted(muted);
                let settings = g.session.settings().clone();
                g.audio.apply_settings(&settings);
                set_text(&doc, "#mute-btn", if muted { "Unmute" } else { "Mute" });
            });
        }

        {
            let doc = document.clone();
            on_click(document, "help-btn", move || show(&doc, "help", true));
        }
        {
            let doc = document.clone();
            on_click(document, "help-close", move || show(&doc, "help", false));
        }
    }

    fn setup_window_events(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Held keys would otherwise stick when focus leaves mid-press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                // The playfield only changes between runs
                if g.session.phase() != Phase::Playing {
                    g.fit_canvas();
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Medieval Invaders (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in a browser");

    let mut args = std::env::args().skip(1);
    let mut frames: u64 = 60 * 60 * 5;
    let mut seed: u64 = 42;
    let mut volumetric = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--3d" => volumetric = true,
            "--frames" => frames = args.next().and_then(|v| v.parse().ok()).unwrap_or(frames),
            "--seed" => seed = args.next().and_then(|v| v.parse().ok()).unwrap_or(seed),
            other => log::warn!("Ignoring unknown argument {other}"),
        }
    }

    headless::run(frames, seed, volumetric);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use medieval_invaders::persistence::{MemoryStorage, Storage};
    use medieval_invaders::settings::Settings;
    use medieval_invaders::sim::{FrameOutcome, FrameSnapshot};
    use medieval_invaders::{InputState, Phase, Session};

    /// Play one session with a simple autopilot
    pub fn run(frames: u64, seed: u64, volumetric: bool) {
        let mut storage = MemoryStorage::new();
        if volumetric {
            storage.set(Settings::MODE_KEY, "true");
        }
        let mut session = Session::new(Box::new(storage), 840.0, seed);
        session.start();

        let mut played = 0;
        while played < frames && session.phase() == Phase::Playing {
            let input = autopilot(&session.snapshot());
            match session.frame(&input) {
                FrameOutcome::LevelCleared => {
                    log::info!(
                        "Frame {played}: reached level {} ({} points)",
                        session.level(),
                        session.score()
                    );
                }
                FrameOutcome::GameOver | FrameOutcome::Continue => {}
            }
            session.drain_cues();
            played += 1;
        }

        log::info!(
            "Demo finished after {played} frames: level {}, score {}, lives {}",
            session.level(),
            session.score(),
            session.lives()
        );
    }

    /// Dodge incoming arrows, otherwise line up under the nearest enemy and fire
    fn autopilot(snap: &FrameSnapshot) -> InputState {
        let axis = snap.playfield.dims.advance_axis();
        let me = snap.player.pos;
        let half = snap.player.size.x;

        let threat = snap
            .arrows
            .iter()
            .filter(|a| !a.from_player)
            .filter(|a| a.pos[axis] < me[axis] && (a.pos.x - me.x).abs() < half)
            .min_by(|a, b| (me[axis] - a.pos[axis]).total_cmp(&(me[axis] - b.pos[axis])));

        if let Some(arrow) = threat {
            // Step away from the arrow, toward the roomier side
            let go_left = (arrow.pos.x >= me.x && me.x - half > snap.playfield.move_min)
                || me.x + half >= snap.playfield.move_max;
            return InputState {
                left: go_left,
                right: !go_left,
                fire: true,
            };
        }

        let target = snap
            .enemies
            .iter()
            .min_by(|a, b| (a.pos.x - me.x).abs().total_cmp(&(b.pos.x - me.x).abs()));
        let dx = target.map_or(0.0, |e| e.pos.x - me.x);
        let dead_zone = snap.player.size.x * 0.1;
        InputState {
            left: dx < -dead_zone,
            right: dx > dead_zone,
            fire: true,
        }
    }
}
