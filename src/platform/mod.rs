//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Haptic/audio feedback (vibration + Web Audio on web)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::{Feedback, GameEvent};

/// Feedback collaborator. Fire-and-forget; implementations swallow failures.
pub trait Haptics {
    fn feedback(&mut self, cue: Feedback);

    /// Other sim events (misses, time bonus, game over) for optional cues
    fn notice(&mut self, _event: &GameEvent) {}
}

/// Discards every cue (native runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHaptics;

impl Haptics for NullHaptics {
    fn feedback(&mut self, _cue: Feedback) {}
}

/// Vibration pattern for a cue, in milliseconds
pub fn vibration_ms(cue: Feedback) -> u32 {
    match cue {
        Feedback::Pop => 30,
        Feedback::Match | Feedback::Success => 50,
        Feedback::Bomb => 200,
    }
}

/// Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bomb_buzzes_longest() {
        assert!(vibration_ms(Feedback::Bomb) > vibration_ms(Feedback::Match));
        assert!(vibration_ms(Feedback::Match) > vibration_ms(Feedback::Pop));
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000.0);
    }
}
