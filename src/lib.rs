//! Bubble Sum - a rising-bubble arithmetic arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, matching, countdown, game state)
//! - `session`: Fixed-timestep driver that wires the sim to its collaborators
//! - `renderer`: Drawing surface abstraction (Canvas 2D on the web)
//! - `platform`: Haptics/audio feedback and wall-clock access
//! - `persistence`: Score history storage
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use history::{HistoryEntry, ScoreHistory};
pub use session::Session;
pub use settings::Settings;
pub use tuning::{GameMode, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame gap fed into the accumulator
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Default playfield size (resized to the canvas by the front end)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 700.0;

    /// Number bubble radius range
    pub const BUBBLE_MIN_RADIUS: f32 = 35.0;
    pub const BUBBLE_RADIUS_SPREAD: f32 = 20.0;
    /// Bonus entities are a fixed, slightly smaller size
    pub const BONUS_RADIUS: f32 = 30.0;

    /// Extra slack around each bubble for fingers
    pub const HIT_MARGIN: f32 = 10.0;

    /// Minimum horizontal distance from recent spawns
    pub const MIN_SPAWN_SEPARATION: f32 = 80.0;
    /// How many recent spawn columns are remembered
    pub const RECENT_SPAWN_WINDOW: usize = 3;
    /// Placement attempts before settling for the best candidate
    pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 8;

    /// Horizontal wobble: x += sin(y * FREQ + phase) * AMPLITUDE
    pub const WOBBLE_FREQ: f32 = 0.05;
    pub const WOBBLE_AMPLITUDE: f32 = 0.5;

    /// Pop animation step per tick (scale grows, opacity decays)
    pub const POP_STEP: f32 = 0.1;

    /// Delay before a failed pair is deselected
    pub const MISMATCH_DELAY_MS: f64 = 200.0;
    /// Delay of the second success pulse after a match
    pub const SUCCESS_ECHO_DELAY_MS: f64 = 100.0;

    /// Countdown cap after time bonuses
    pub const MAX_TIME_SECS: u32 = 120;
    /// Seconds granted by a time bonus
    pub const TIME_BONUS_SECS: u32 = 10;

    /// Floating indicator motion
    pub const INDICATOR_RISE: f32 = 1.0;
    pub const INDICATOR_FADE: f32 = 0.02;

    /// Score history length
    pub const MAX_HISTORY: usize = 100;
}

/// Euclidean distance between two points in playfield space
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}
