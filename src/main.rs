//! Warp Flap entry point
//!
//! In the browser this is the game client. Natively it runs the leaderboard
//! and share-card service.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, PointerEvent,
        Window,
    };

    use warp_flap::audio::{AudioManager, SoundEffect};
    use warp_flap::consts::*;
    use warp_flap::leaderboard::Leaderboard;
    use warp_flap::profile::PlayerProfile;
    use warp_flap::remote;
    use warp_flap::renderer::{RenderState, build_scene};
    use warp_flap::settings::{QualityPreset, Settings};
    use warp_flap::share;
    use warp_flap::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use warp_flap::tuning::Tuning;

    /// Shown for players without an avatar
    const DEFAULT_AVATAR: &str = "https://warpcast.com/avatar.png";

    /// Game instance holding all client state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        profile: Option<PlayerProfile>,
        /// Last leaderboard read from the service
        leaderboard: Leaderboard,
        show_leaderboard: bool,
        accumulator: f32,
        last_time: f64,
        start_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(
            seed: u64,
            tuning: Tuning,
            settings: Settings,
            profile: Option<PlayerProfile>,
        ) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::with_tuning(seed, tuning),
                render_state: None,
                audio,
                settings,
                profile,
                leaderboard: Leaderboard::new(),
                show_leaderboard: false,
                accumulator: 0.0,
                last_time: 0.0,
                start_time: js_sys::Date::now(),
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks; returns the final score when the run ends
        fn update(&mut self, dt: f32, time: f64) -> Option<u32> {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut run_ended = None;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Flap is one-shot
                self.input.flap = false;

                for event in &self.state.events {
                    self.audio.play(SoundEffect::for_event(event));
                    if let GameEvent::Rekt(score) = event {
                        run_ended = Some(*score);
                    }
                }
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            run_ended
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let seconds = ((time - self.start_time) / 1000.0) as f32;
            let vertices = build_scene(
                &self.state,
                self.settings.sparkle_count(),
                seconds,
                self.settings.animate_background(),
            );
            if let Some(ref mut render_state) = self.render_state {
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
        }

        fn flap(&mut self) {
            self.audio.resume();
            if self.state.phase != GamePhase::Rekt {
                self.input.flap = true;
            }
        }

        /// Start a fresh run
        fn restart(&mut self, seed: u64) {
            self.state.restart(seed);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.show_leaderboard = false;
            if let Err(e) = self.render_leaderboard() {
                log::error!("Failed to update leaderboard: {e:?}");
            }
            log::info!("Game restarted with seed: {}", seed);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            let phase = self.state.phase;

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&share::score_label(self.state.score)));
            }
            if let Some(el) = document.get_element_by_id("hud-meme") {
                el.set_text_content(Some(share::meme_for_score(self.state.score)));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                el.set_text_content(Some(&format!("{} FPS", self.fps)));
                set_visible(&el, self.settings.show_fps);
            }

            set_visible_by_id(&document, "start-prompt", phase == GamePhase::Start);
            set_visible_by_id(&document, "rekt-banner", phase == GamePhase::Rekt);
            set_visible_by_id(&document, "restart-btn", phase == GamePhase::Rekt);
            set_visible_by_id(&document, "leaderboard", self.show_leaderboard);
        }

        /// Rebuild the leaderboard overlay rows
        fn render_leaderboard(&self) -> Result<(), JsValue> {
            let Some(document) = document() else {
                return Ok(());
            };

            if let Some(list) = document.get_element_by_id("leaderboard-list") {
                list.set_inner_html("");
                if self.leaderboard.is_empty() {
                    let empty = document.create_element("li")?;
                    empty.set_attribute("class", "empty")?;
                    empty.set_text_content(Some("No scores yet. Be the first!"));
                    list.append_child(&empty)?;
                }
                for (i, entry) in self.leaderboard.entries().iter().enumerate() {
                    let row = leaderboard_row(
                        &document,
                        &(i + 1).to_string(),
                        entry.pfp_url.as_deref(),
                        &entry.username,
                        None,
                        entry.score,
                    )?;
                    list.append_child(&row)?;
                }
            }

            if let Some(you) = document.get_element_by_id("leaderboard-you") {
                you.set_inner_html("");
                let show = match (&self.profile, self.state.phase) {
                    (Some(profile), GamePhase::Rekt) => {
                        // Best-ever rank once the service has the player's score
                        let rank = self
                            .leaderboard
                            .rank_of(profile.fid)
                            .map_or_else(|| "\u{2605}".to_string(), |r| r.to_string());
                        let row = leaderboard_row(
                            &document,
                            &rank,
                            Some(&profile.pfp_url),
                            "YOU",
                            Some(&format!("@{}", profile.username)),
                            u64::from(self.state.score),
                        )?;
                        you.append_child(&row)?;
                        true
                    }
                    _ => false,
                };
                set_visible(&you, show);
            }

            Ok(())
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_visible(el: &Element, visible: bool) {
        let _ = el.toggle_attribute_with_force("hidden", !visible);
    }

    fn set_visible_by_id(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            set_visible(&el, visible);
        }
    }

    fn leaderboard_row(
        document: &Document,
        rank: &str,
        avatar: Option<&str>,
        name: &str,
        handle: Option<&str>,
        score: u64,
    ) -> Result<Element, JsValue> {
        let row = document.create_element("li")?;

        let rank_el = document.create_element("span")?;
        rank_el.set_attribute("class", "rank")?;
        rank_el.set_text_content(Some(rank));
        row.append_child(&rank_el)?;

        let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
        img.set_src(avatar.filter(|url| !url.is_empty()).unwrap_or(DEFAULT_AVATAR));
        img.set_alt("");
        row.append_child(&img)?;

        let name_el = document.create_element("span")?;
        name_el.set_attribute("class", "name")?;
        name_el.set_text_content(Some(name));
        row.append_child(&name_el)?;

        if let Some(handle) = handle {
            let handle_el = document.create_element("span")?;
            handle_el.set_attribute("class", "handle")?;
            handle_el.set_text_content(Some(handle));
            row.append_child(&handle_el)?;
        }

        let score_el = document.create_element("span")?;
        score_el.set_attribute("class", "score")?;
        score_el.set_text_content(Some(&score.to_string()));
        row.append_child(&score_el)?;

        Ok(row)
    }

    /// Fetch the leaderboard in the background and redraw the overlay
    fn refresh_leaderboard(game: Rc<RefCell<Game>>) {
        wasm_bindgen_futures::spawn_local(async move {
            load_leaderboard(&game).await;
        });
    }

    async fn load_leaderboard(game: &Rc<RefCell<Game>>) {
        match remote::fetch_leaderboard().await {
            Ok(entries) => {
                let mut g = game.borrow_mut();
                g.leaderboard = Leaderboard::from_entries(entries);
                if let Err(e) = g.render_leaderboard() {
                    log::error!("Failed to update leaderboard: {e:?}");
                }
            }
            Err(e) => log::error!("Failed to fetch leaderboard: {e}"),
        }
    }

    /// Show results, then submit the run and re-read the leaderboard
    fn on_run_end(game: Rc<RefCell<Game>>, score: u32) {
        let submission = {
            let mut g = game.borrow_mut();
            g.show_leaderboard = true;
            if let Err(e) = g.render_leaderboard() {
                log::error!("Failed to update leaderboard: {e:?}");
            }
            show_share(g.profile.as_ref(), score);
            g.profile.as_ref().map(|p| p.submission(score))
        };
        log::info!("Run over with score {score}");

        let Some(submission) = submission else {
            log::info!("No player profile, score not submitted");
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            match remote::submit_score(&submission).await {
                Ok(outcome) if outcome.new_high_score => {
                    log::info!("New high score: {score}");
                    game.borrow().audio.play(SoundEffect::HighScore);
                }
                Ok(_) => {}
                Err(e) => log::error!("Failed to save score: {e}"),
            }
            load_leaderboard(&game).await;
        });
    }

    /// Point the share card preview and text at this run
    fn show_share(profile: Option<&PlayerProfile>, score: u32) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        if let Some(img) = document
            .get_element_by_id("share-card")
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        {
            let origin = window.location().origin().unwrap_or_default();
            img.set_src(&share::card_url(&origin, score));
        }
        if let Some(el) = document.get_element_by_id("share-text") {
            match profile {
                Some(profile) => {
                    el.set_text_content(Some(&share::share_text(score, profile.fid)));
                }
                None => el.set_text_content(None),
            }
        }
    }

    /// Size the canvas backing store to its CSS box
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    /// `quality=` from the page query, if present
    fn quality_override(search: &str) -> Option<QualityPreset> {
        search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("quality="))
            .and_then(QualityPreset::parse)
    }

    pub async fn run() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let search = window.location().search().unwrap_or_default();
        let profile = PlayerProfile::from_query(&search);
        match &profile {
            Some(p) => log::info!("Playing as @{} (fid {})", p.username, p.fid),
            None => log::info!("No player profile in page URL, scores will not be saved"),
        }

        let mut settings = Settings::load();
        if let Some(quality) = quality_override(&search) {
            settings.quality = quality;
            settings.save();
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            set_visible(&loading, false);
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let (width, height) = fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Tuning::load(), settings, profile.clone());
        let game = Rc::new(RefCell::new(game));
        log::info!("Game initialized with seed: {}", seed);

        if let (Some(profile), Some(el)) = (&profile, document.get_element_by_id("start-user")) {
            el.set_text_content(Some(&format!("@{}", profile.username)));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, WORLD_HALF_HEIGHT)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            set_visible(&hud, true);
        }

        refresh_leaderboard(game.clone());
        request_animation_frame(game);

        log::info!("Warp Flap running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Tap / click anywhere on the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(document) = document() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        game.borrow_mut().flap();
                    }
                    "r" | "R" => {
                        let mut g = game.borrow_mut();
                        if g.state.phase == GamePhase::Rekt {
                            g.restart(js_sys::Date::now() as u64);
                        }
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        let run_ended = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let run_ended = g.update(dt, time);
            g.render(time);
            g.update_hud();
            run_ended
        };

        if let Some(score) = run_ended {
            on_run_end(game.clone(), score);
        }

        request_animation_frame(game);
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.stop_propagation();
                game.borrow_mut().restart(js_sys::Date::now() as u64);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("leaderboard-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.stop_propagation();
                let opened = {
                    let mut g = game.borrow_mut();
                    g.show_leaderboard = !g.show_leaderboard;
                    g.show_leaderboard
                };
                if opened {
                    refresh_leaderboard(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&window_clone, &canvas);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }
    log::info!("Warp Flap starting...");

    if let Err(e) = wasm_game::run().await {
        log::error!("Warp Flap failed to start: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = warp_flap::config::ServerConfig::parse();
    log::info!("Warp Flap leaderboard service starting...");
    log::debug!("{config:?}");

    warp_flap::server::serve(config)
        .await
        .context("leaderboard service failed")?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
