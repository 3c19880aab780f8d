//! Browser entry point
//!
//! JavaScript owns the canvas and event listeners; it forwards raw events to
//! a [`WebGame`], calls [`WebGame::frame`] from `requestAnimationFrame`, then
//! reads back the vertex buffer, the HUD snapshot and any game events.

use wasm_bindgen::prelude::*;

use super::{FrameClock, InputTracker};
use crate::persistence::Progress;
use crate::renderer::{build_scene, flatten};
use crate::settings::Settings;
use crate::sim::ball::upgrades_from_json;
use crate::sim::{BallKind, GameEvent, GamePhase, Snapshot, World, resolve_config};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Tower Climb loaded");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_ball(name: &str) -> BallKind {
    name.parse().unwrap_or_else(|e| {
        log::warn!("{}, falling back to standard", e);
        BallKind::Standard
    })
}

fn seed_from_clock() -> u64 {
    js_sys::Date::now() as u64
}

fn fresh_world(progress: &Progress, settings: &Settings, kind: BallKind) -> World {
    World::new(
        seed_from_clock(),
        kind,
        progress.config_for(kind),
        settings.control_flags(),
        progress.best_score,
    )
}

/// One browser session: the running world plus everything that outlives it
#[wasm_bindgen]
pub struct WebGame {
    world: World,
    input: InputTracker,
    clock: FrameClock,
    settings: Settings,
    progress: Progress,
    /// Events since JS last asked for them
    pending: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run with the saved ball selection
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        let progress = Progress::load();
        let world = fresh_world(&progress, &settings, progress.selected_ball);
        Self {
            world,
            input: InputTracker::new(),
            clock: FrameClock::new(),
            settings,
            progress,
            pending: Vec::new(),
        }
    }

    /// Start a new run; unknown or locked balls fall back to standard
    pub fn start_run(&mut self, ball: &str) {
        let kind = parse_ball(ball);
        if let Err(e) = self.progress.select_ball(kind) {
            log::warn!("{}", e);
        }
        self.world = fresh_world(&self.progress, &self.settings, self.progress.selected_ball);
        self.input.reset();
        self.clock.reset();
    }

    /// Start a run with an explicit upgrade set, bypassing saved purchases
    pub fn start_run_with_upgrades(&mut self, ball: &str, upgrades_json: &str) -> Result<(), JsValue> {
        let upgrades = upgrades_from_json(upgrades_json).map_err(js_error)?;
        let kind = parse_ball(ball);
        self.world = World::new(
            seed_from_clock(),
            kind,
            resolve_config(kind, &upgrades),
            self.settings.control_flags(),
            self.progress.best_score,
        );
        self.input.reset();
        self.clock.reset();
        Ok(())
    }

    /// Returns true if the key is used by the game (JS should preventDefault)
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Pointer or touch press at a canvas-space x
    pub fn touch_start(&mut self, canvas_x: f32) {
        if self.settings.mobile_controls {
            self.input.touch_start(canvas_x);
        }
    }

    pub fn touch_end(&mut self) {
        self.input.touch_end();
    }

    pub fn device_orientation(&mut self, gamma: Option<f32>) {
        if self.settings.accelerometer {
            self.input.set_tilt(gamma);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.input.request_pause();
    }

    /// Page hidden or focus lost
    pub fn blur(&mut self) {
        self.input.reset();
        if self.world.phase == GamePhase::Playing {
            self.input.request_pause();
        }
    }

    /// Advance to `time_ms` (a `requestAnimationFrame` timestamp); returns the
    /// number of ticks run
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let ran = self.clock.advance(time_ms, &mut self.world, &mut self.input);

        let events = self.world.drain_events();
        if self.progress.apply_events(&events) {
            self.progress.save();
        }
        self.pending.extend(events);
        ran
    }

    /// Triangle list as `[x, y, r, g, b, a, ...]` in canvas pixels
    pub fn vertices(&self) -> Vec<f32> {
        let snapshot = Snapshot::capture(&self.world);
        flatten(&build_scene(&snapshot, &self.settings))
    }

    /// HUD state as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        Snapshot::capture(&self.world).to_json().map_err(js_error)
    }

    /// Drain events for sounds and popups, as a JSON array
    pub fn take_events_json(&mut self) -> Result<String, JsValue> {
        let json = serde_json::to_string(&self.pending).map_err(js_error)?;
        self.pending.clear();
        Ok(json)
    }

    pub fn is_game_over(&self) -> bool {
        self.world.is_game_over()
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.settings).map_err(js_error)
    }

    /// Flip a setting by name and apply it to the running world
    pub fn toggle_setting(&mut self, name: &str) -> bool {
        if !self.settings.toggle(name) {
            log::warn!("Unknown setting: {}", name);
            return false;
        }
        self.settings.save();
        self.world.flags = self.settings.control_flags();
        true
    }

    pub fn progress_json(&self) -> Result<String, JsValue> {
        self.progress.to_json().map_err(js_error)
    }

    pub fn unlock_ball(&mut self, ball: &str) -> Result<(), JsValue> {
        let kind: BallKind = ball.parse().map_err(js_error)?;
        self.progress.unlock_ball(kind).map_err(js_error)?;
        self.progress.save();
        Ok(())
    }

    /// Returns the upgrade's new level
    pub fn purchase_upgrade(&mut self, ball: &str, upgrade: &str) -> Result<u32, JsValue> {
        let kind: BallKind = ball.parse().map_err(js_error)?;
        let level = self.progress.purchase_upgrade(kind, upgrade).map_err(js_error)?;
        self.progress.save();
        Ok(level)
    }

    pub fn set_upgrade_active(&mut self, ball: &str, upgrade: &str, active: bool) -> Result<bool, JsValue> {
        let kind: BallKind = ball.parse().map_err(js_error)?;
        let changed = self.progress.set_upgrade_active(kind, upgrade, active);
        if changed {
            self.progress.save();
        }
        Ok(changed)
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
