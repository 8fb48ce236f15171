//! Player settings
//!
//! Round settings come from the host's sliders as `{"speed", "duration"}`;
//! the rest are preferences. Persisted in LocalStorage.

use serde::{Deserialize, Serialize};

/// Legal fall speed range (multiplier on gravity)
pub const FALL_SPEED_RANGE: (f32, f32) = (0.5, 1.5);
pub const FALL_SPEED_STEP: f32 = 0.1;
/// Legal round duration range (seconds)
pub const ROUND_SECS_RANGE: (u32, u32) = (30, 300);
pub const ROUND_SECS_STEP: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Gravity multiplier; higher falls faster. Apex height is unaffected.
    #[serde(rename = "speed")]
    pub fall_speed: f32,
    /// Round length in seconds
    #[serde(rename = "duration")]
    pub round_secs: u32,

    // === Effects ===
    /// Particle bursts on hits
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fall_speed: 0.9,
            round_secs: 60,

            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse a settings object, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    /// Copy with every value forced into its legal range
    pub fn clamped(&self) -> Self {
        let fall_speed = if self.fall_speed.is_finite() {
            self.fall_speed.clamp(FALL_SPEED_RANGE.0, FALL_SPEED_RANGE.1)
        } else {
            Self::default().fall_speed
        };
        Self {
            fall_speed,
            round_secs: self.round_secs.clamp(ROUND_SECS_RANGE.0, ROUND_SECS_RANGE.1),
            master_volume: self.master_volume.clamp(0.0, 1.0),
            sfx_volume: self.sfx_volume.clamp(0.0, 1.0),
            ..self.clone()
        }
    }

    /// Snap a slider value to the fall speed grid (0.5, 0.6, ... 1.5)
    pub fn snap_fall_speed(value: f32) -> f32 {
        let snapped = (value / FALL_SPEED_STEP).round() * FALL_SPEED_STEP;
        snapped.clamp(FALL_SPEED_RANGE.0, FALL_SPEED_RANGE.1)
    }

    /// Snap a slider value to the duration grid (30, 40, ... 300)
    pub fn snap_round_secs(value: u32) -> u32 {
        let snapped = (value + ROUND_SECS_STEP / 2) / ROUND_SECS_STEP * ROUND_SECS_STEP;
        snapped.clamp(ROUND_SECS_RANGE.0, ROUND_SECS_RANGE.1)
    }

    /// Effective sound effect volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "vocab_pop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
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

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                } else {
                    log::info!("Settings saved");
                }
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
