//! Game session
//!
//! Owns the `GameState` and the injected collaborators, turns real frame
//! time into fixed simulation ticks, and routes sim events outward.

use glam::Vec2;

use crate::consts::*;
use crate::history::HistoryEntry;
use crate::persistence::Persistence;
use crate::platform::Haptics;
use crate::renderer::{Renderer, render};
use crate::sim::{GameEvent, GamePhase, GameState, TapOutcome, handle_tap, tick};
use crate::tuning::GameConfig;

/// A run plus everything it talks to
pub struct Session {
    pub state: GameState,
    config: GameConfig,
    haptics: Box<dyn Haptics>,
    persistence: Box<dyn Persistence>,
    accumulator: f64,
    show_indicators: bool,
    /// Events from the last frame/tap, for UI chrome
    last_events: Vec<GameEvent>,
}

impl Session {
    pub fn new(
        seed: u64,
        config: GameConfig,
        haptics: Box<dyn Haptics>,
        persistence: Box<dyn Persistence>,
    ) -> Self {
        Self {
            state: GameState::new(seed, config.clone()),
            config,
            haptics,
            persistence,
            accumulator: 0.0,
            show_indicators: true,
            last_events: Vec::new(),
        }
    }

    /// Reset for a new run, keeping the playfield size
    pub fn restart(&mut self, seed: u64) {
        let field = self.state.field;
        self.state = GameState::new(seed, self.config.clone());
        self.state.set_field_size(field.x, field.y);
        self.accumulator = 0.0;
        self.last_events.clear();
    }

    /// Use a different configuration from the next restart on
    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn set_show_indicators(&mut self, show: bool) {
        self.show_indicators = show;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Feed `dt_ms` of real time. Returns false once the run is over, so
    /// the caller stops scheduling frames.
    pub fn frame(&mut self, dt_ms: f64) -> bool {
        if !self.state.is_active() {
            return false;
        }
        if self.state.phase == GamePhase::Paused {
            return true;
        }

        self.accumulator += dt_ms.clamp(0.0, MAX_FRAME_MS);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
        }
        self.dispatch();

        self.state.is_active()
    }

    /// Tap in playfield coordinates
    pub fn tap(&mut self, point: Vec2) -> TapOutcome {
        let outcome = handle_tap(&mut self.state, point);
        self.dispatch();
        outcome
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        self.accumulator = 0.0;
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        render(&self.state, renderer, self.show_indicators);
    }

    /// Events routed during the last `frame` or `tap`
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.persistence.load_history()
    }

    /// Send drained sim events to the collaborators
    fn dispatch(&mut self) {
        self.last_events = self.state.drain_events();
        for event in &self.last_events {
            match event {
                GameEvent::Feedback(cue) => self.haptics.feedback(*cue),
                GameEvent::GameOver { score } => {
                    self.persistence.save_score(*score);
                    self.haptics.notice(event);
                }
                other => self.haptics.notice(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{HistoryStore, MemoryStorage};
    use crate::platform::NullHaptics;
    use crate::sim::EntityKind;

    fn session() -> Session {
        Session::new(
            5,
            GameConfig::default(),
            Box::new(NullHaptics),
            Box::new(HistoryStore::new(MemoryStorage::new())),
        )
    }

    #[test]
    fn test_frame_runs_fixed_steps() {
        let mut s = session();
        s.frame(SIM_DT_MS * 3.0 + 1.0);
        assert_eq!(s.state.stats.ticks, 3);
        // Long stalls are clamped
        s.frame(10_000.0);
        assert_eq!(s.state.stats.ticks, 3 + 6);
    }

    #[test]
    fn test_game_over_saves_score() {
        let mut s = session();
        s.state.time_left = 1;
        s.state.score = 120;
        let mut running = true;
        for _ in 0..20 {
            running = s.frame(100.0);
            if !running {
                break;
            }
        }
        assert!(!running);
        let history = s.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, 120);
        // Further frames are no-ops
        assert!(!s.frame(100.0));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut s = session();
        s.state.set_field_size(800.0, 600.0);
        s.state.score = 99;
        s.state.end_game();
        s.restart(6);
        assert!(s.is_active());
        assert_eq!(s.state.score, 0);
        assert_eq!(s.state.field, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_pause_stops_time() {
        let mut s = session();
        s.toggle_pause();
        assert!(s.frame(500.0));
        assert_eq!(s.state.stats.ticks, 0);
        s.toggle_pause();
        s.frame(50.0);
        assert!(s.state.stats.ticks > 0);
    }

    #[test]
    fn test_tap_routes_events() {
        let mut s = session();
        s.state.insert_entity(EntityKind::Star, Vec2::new(100.0, 100.0));
        let outcome = s.tap(Vec2::new(100.0, 100.0));
        assert!(matches!(outcome, TapOutcome::Star { .. }));
        assert!(s.state.events.is_empty());
        assert!(!s.last_events().is_empty());
    }

    #[test]
    fn test_tap_outside_field_is_ignored() {
        let mut s = session();
        let id = s.state.insert_entity(EntityKind::Star, Vec2::new(40.0, 300.0));
        assert_eq!(s.tap(Vec2::new(-100.0, 300.0)), TapOutcome::Ignored);
        assert_eq!(s.tap(Vec2::new(40.0, -120.0)), TapOutcome::Ignored);
        assert_eq!(s.state.score, 0);
        assert!(s.state.entity(id).is_some_and(|e| !e.popping));
        assert!(s.last_events().is_empty());
    }
}
