//! Browser feedback: `navigator.vibrate` plus synthesized sound

use super::{Haptics, vibration_ms};
use crate::audio::{AudioManager, SoundEffect};
use crate::settings::Settings;
use crate::sim::{Feedback, GameEvent};

/// Vibration and audio driven by player settings
pub struct WebFeedback {
    audio: AudioManager,
    vibrate: bool,
}

impl WebFeedback {
    pub fn new(settings: &Settings) -> Self {
        let mut audio = AudioManager::new();
        audio.apply_settings(settings);
        Self {
            audio,
            vibrate: settings.haptics,
        }
    }

    fn buzz(&self, ms: u32) {
        if !self.vibrate {
            return;
        }
        if let Some(window) = web_sys::window() {
            // Unsupported on most desktops; the return value is meaningless there
            let _ = window.navigator().vibrate_with_duration(ms);
        }
    }
}

impl Haptics for WebFeedback {
    fn feedback(&mut self, cue: Feedback) {
        self.buzz(vibration_ms(cue));
        let effect = match cue {
            Feedback::Pop => SoundEffect::Pop,
            Feedback::Match => SoundEffect::Match,
            Feedback::Success => SoundEffect::Success,
            Feedback::Bomb => SoundEffect::Bomb,
        };
        self.audio.play(effect);
    }

    fn notice(&mut self, event: &GameEvent) {
        let effect = match event {
            GameEvent::Missed { .. } => SoundEffect::Miss,
            GameEvent::TimeBonus { .. } => SoundEffect::TimeBonus,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
            _ => return,
        };
        self.audio.play(effect);
    }
}
