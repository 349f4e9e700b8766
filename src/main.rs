//! Coin Rush entry point
//!
//! On the web this wires the game into the page: a `<canvas id="canvas">`,
//! HUD spans `#hud-score`, `#hud-time`, `#hud-player`, `#asset-status` and
//! the `#stop-btn` / `#restart-btn` buttons. Natively it plays a seeded
//! headless session with an auto-clicker and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlImageElement, MouseEvent};

    use coin_rush::consts::COUNTDOWN_SAMPLE_MS;
    use coin_rush::platform::{self, Viewport};
    use coin_rush::renderer::{AssetSlot, Assets, CanvasBackend, SceneInfo, build_draw_list, icon_path};
    use coin_rush::sim::{Frame, ItemKind};
    use coin_rush::{FrameStep, Game, GameEvent, LoopToken, PlayerConfig, SessionStatus};

    /// Everything the page callbacks share
    struct App {
        game: Game,
        backend: CanvasBackend,
        assets: Assets<HtmlImageElement>,
        viewport: Viewport,
        config: PlayerConfig,
        raf_handle: Option<i32>,
    }

    impl App {
        fn paint(&self, frame: &Frame) {
            let info = SceneInfo {
                status: self.game.status(),
                score: self.game.session.score,
            };
            let cmds = build_draw_list(frame, &self.game.arena, info);
            self.backend
                .draw(&cmds, &self.assets, self.viewport.arena_scale(&self.game.arena));
        }

        /// Repaint without advancing (summary, resize while stopped)
        fn paint_snapshot(&self) {
            self.paint(&self.game.snapshot(platform::now_ms()));
        }

        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(980.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(540.0);
            self.viewport = Viewport::fit(w, h, window.device_pixel_ratio(), &self.game.arena);
            self.backend.resize(&self.viewport);
        }

        fn cancel_frame(&mut self) {
            if let (Some(handle), Some(window)) = (self.raf_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
        }

        fn handle_events(&mut self) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::ScoreDelta(delta) => {
                        log::debug!("Score {:+}", delta);
                    }
                    GameEvent::SessionEnded { score } => {
                        log::info!("{} finished with {}", self.config.nickname, score);
                        set_visible("restart-btn", true);
                        set_visible("stop-btn", false);
                    }
                }
            }
            self.update_hud();
        }

        fn update_hud(&self) {
            set_text("hud-score", &self.game.session.score.to_string());
            set_text("hud-time", &format!("{}s", self.game.session.remaining_secs));
            set_text("hud-player", &self.config.nickname);
            set_text("asset-status", self.assets.status_label());
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Coin Rush starting...");

        let backend = match CanvasBackend::find("canvas") {
            Ok(backend) => backend,
            Err(e) => {
                log::warn!("Not starting: {}", e);
                return;
            }
        };

        let config = PlayerConfig::load();
        let seed = platform::wall_ms() as u64;
        let mut game = Game::new(seed, config.duration_secs);
        game.set_tier(config.tier);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            backend,
            assets: Assets::default(),
            viewport: Viewport::fit(980.0, 980.0, 1.0, &coin_rush::Arena::default()),
            config,
            raf_handle: None,
        }));
        app.borrow_mut().fit_to_window();

        load_icon(app.clone(), ItemKind::Collectible);
        load_icon(app.clone(), ItemKind::Hazard);

        setup_click_handler(app.clone());
        setup_buttons(app.clone());
        setup_resize(app.clone());
        setup_countdown(app.clone());

        if let Err(e) = app.borrow().config.save() {
            log::warn!("Could not persist player config: {}", e);
        }

        let token = app.borrow_mut().game.start(platform::wall_ms());
        app.borrow().update_hud();
        set_visible("restart-btn", false);
        set_visible("stop-btn", true);
        request_animation_frame(app, token);

        log::info!("Coin Rush running!");
    }

    fn load_icon(app: Rc<RefCell<App>>, kind: ItemKind) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Cannot create image for {:?}: {:?}", kind, e);
                app.borrow_mut().assets.set(kind, AssetSlot::Failed);
                return;
            }
        };

        let onload = {
            let app = app.clone();
            let image = image.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut a = app.borrow_mut();
                a.assets.set(kind, AssetSlot::Ready(image.clone()));
                a.update_hud();
                if !a.game.is_looping() {
                    a.paint_snapshot();
                }
            })
        };
        let onerror = {
            let app = app.clone();
            Closure::<dyn FnMut()>::new(move || {
                log::warn!("Failed to load {}", icon_path(kind));
                app.borrow_mut().assets.set(kind, AssetSlot::Failed);
            })
        };
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        image.set_src(icon_path(kind));
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, token: LoopToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_for_frame = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app_for_frame, token, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        app.borrow_mut().raf_handle = handle;
    }

    fn game_loop(app: Rc<RefCell<App>>, token: LoopToken, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.raf_handle = None;
            match a.game.frame(token, time) {
                FrameStep::Continue(frame) => {
                    a.paint(&frame);
                    true
                }
                FrameStep::Finished(frame) => {
                    a.paint(&frame);
                    a.handle_events();
                    false
                }
                FrameStep::Cancelled => false,
            }
        };

        if keep_going {
            request_animation_frame(app, token);
        }
    }

    fn setup_click_handler(app: Rc<RefCell<App>>) {
        let canvas = app.borrow().backend.canvas().clone();
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let css_x = event.client_x() as f64 - rect.left();
            let css_y = event.client_y() as f64 - rect.top();

            let mut a = app.borrow_mut();
            let point = a.viewport.to_arena(css_x, css_y, &a.game.arena);
            if a.game.click(point, platform::now_ms()).is_some() {
                a.handle_events();
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("stop-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.cancel_frame();
                a.game.stop();
                a.handle_events();
                a.paint_snapshot();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let token = {
                    let mut a = app.borrow_mut();
                    a.cancel_frame();
                    let token = a.game.restart(platform::wall_ms());
                    a.update_hud();
                    token
                };
                set_visible("restart-btn", false);
                set_visible("stop-btn", true);
                request_animation_frame(app.clone(), token);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            a.fit_to_window();
            if !a.game.is_looping() {
                a.paint_snapshot();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_countdown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut a = app.borrow_mut();
            if a.game.status() == SessionStatus::Running {
                a.game.countdown_tick(platform::wall_ms());
                a.update_hud();
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            COUNTDOWN_SAMPLE_MS,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Coin Rush (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in the browser");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);

    headless::solo(seed);
    if let Err(e) = headless::room(seed) {
        log::error!("Room demo failed: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted play with synthetic timestamps
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use coin_rush::consts::COUNTDOWN_SAMPLE_MS;
    use coin_rush::leaderboard::format_row;
    use coin_rush::lobby::{Lobby, RoomPhase};
    use coin_rush::rooms::{CreateRoomInput, RoomDirectory};
    use coin_rush::sim::ItemKind;
    use coin_rush::{FrameStep, Game, GameEvent, PlayerConfig};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Auto-clicker reaction time
    const CLICK_EVERY_MS: f64 = 250.0;

    /// First collectible on screen, if any
    fn pick_target(game: &Game, now_ms: f64) -> Option<glam::Vec2> {
        game.snapshot(now_ms)
            .items
            .into_iter()
            .find(|item| item.kind == ItemKind::Collectible)
            .map(|item| item.center)
    }

    pub fn solo(seed: u64) {
        let config = PlayerConfig::load();
        let mut game = Game::new(seed, config.duration_secs);
        game.set_tier(config.tier);

        let token = game.start(0.0);
        let mut now = 0.0;
        let mut next_countdown = 0.0;
        let mut next_click = CLICK_EVERY_MS;
        let (mut hits, mut misses) = (0u32, 0u32);

        loop {
            now += FRAME_MS;
            if now >= next_countdown {
                game.countdown_tick(now);
                next_countdown += COUNTDOWN_SAMPLE_MS as f64;
            }
            if now >= next_click {
                next_click += CLICK_EVERY_MS;
                match pick_target(&game, now).and_then(|p| game.click(p, now)) {
                    Some(_) => hits += 1,
                    None => misses += 1,
                }
            }
            match game.frame(token, now) {
                FrameStep::Continue(_) => {}
                FrameStep::Finished(_) | FrameStep::Cancelled => break,
            }
        }

        for event in game.drain_events() {
            if let GameEvent::SessionEnded { score } = event {
                log::info!(
                    "{} scored {} in {}s ({} hits, {} empty clicks)",
                    config.nickname,
                    score,
                    game.session.duration_secs,
                    hits,
                    misses
                );
            }
        }
    }

    pub fn room(seed: u64) -> coin_rush::error::Result<()> {
        let config = PlayerConfig::load();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut rooms = RoomDirectory::load();
        let room = rooms.create_room(
            CreateRoomInput {
                owner: "0x00000000000000000000000000000000000000aa".into(),
                room_name: "Headless Arena".into(),
                is_open: true,
            },
            0.0,
            &mut rng,
        )?;

        let mut lobby = Lobby::new(&room.id, &room.owner, &config.nickname, seed, 0.0);
        let mut now = 0.0;
        while !lobby.can_start() {
            now += COUNTDOWN_SAMPLE_MS as f64;
            lobby.tick(now);
        }

        let Some(token) = lobby.start_game(now) else {
            return Ok(());
        };
        let mut next_tick = now;
        let mut next_click = now + CLICK_EVERY_MS;
        while lobby.phase != RoomPhase::Ended {
            now += FRAME_MS;
            if now >= next_tick {
                lobby.tick(now);
                next_tick += COUNTDOWN_SAMPLE_MS as f64;
            }
            if now >= next_click {
                next_click += CLICK_EVERY_MS;
                if let Some(point) = pick_target(lobby.game(), now) {
                    lobby.click(point, now);
                }
            }
            lobby.game_mut().frame(token, now);
        }

        log::info!("Room {} ({}) results:", room.id, room.room_name);
        for standing in lobby.standings() {
            log::info!("  {}", format_row(&standing));
        }
        Ok(())
    }
}
