//! Player-facing feature toggles
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::ControlFlags;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Jump automatically whenever the ball is grounded
    pub auto_jump: bool,
    /// Touch-half steering and automatic wall boosts
    pub mobile_controls: bool,
    /// Device tilt steering
    pub accelerometer: bool,

    // === HUD ===
    /// Wind direction arrow
    pub show_wind: bool,
    /// Height and floor readout
    pub debug_info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_jump: false,
            mobile_controls: false,
            accelerometer: false,

            show_wind: true,
            debug_info: false,
        }
    }
}

impl Settings {
    /// The subset the simulation reads each tick
    pub fn control_flags(&self) -> ControlFlags {
        ControlFlags {
            auto_jump: self.auto_jump,
            mobile_controls: self.mobile_controls,
            accelerometer: self.accelerometer,
        }
    }

    /// Flip a toggle by name; returns false for an unknown name
    pub fn toggle(&mut self, name: &str) -> bool {
        let flag = match name {
            "auto_jump" => &mut self.auto_jump,
            "mobile_controls" => &mut self.mobile_controls,
            "accelerometer" => &mut self.accelerometer,
            "show_wind" => &mut self.show_wind,
            "debug_info" => &mut self.debug_info,
            _ => return false,
        };
        *flag = !*flag;
        true
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tower_climb_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        if let Ok(json) = serde_json::to_string(self) {
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Failed to save settings");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
