//! Player settings and preferences
//!
//! Persisted separately from the score history in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::{GameConfig, GameMode, MissPolicy};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Difficulty mode for the next run
    pub mode: GameMode,
    /// End the run as soon as a number escapes
    pub strict_misses: bool,

    // === Feedback ===
    /// Vibrate on taps and matches (where supported)
    pub haptics: bool,
    /// Sound effects on/off
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,

    // === Accessibility ===
    /// Suppress floating score text
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            strict_misses: false,

            haptics: true,
            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            pause_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings for a mode (other preferences at defaults)
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn miss_policy(&self) -> MissPolicy {
        if self.strict_misses {
            MissPolicy::EndGame
        } else {
            MissPolicy::Tolerate
        }
    }

    /// Run configuration for these preferences
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.mode, self.miss_policy())
    }

    /// Decode stored JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings: {}", e);
            Self::default()
        })
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bubble_sum_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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
