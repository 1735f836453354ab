//! Difficulty and target control
//!
//! Speed and spawn pacing only ever tighten within a run.

use rand::Rng;

use super::state::{GameEvent, GameState};

/// Draw a new target from the mode's range for the current score
pub fn reroll_target(state: &mut GameState) {
    let (min, max) = state.config.tuning.target_bounds(state.score);
    state.target = state.rng.random_range(min..=max);
    log::debug!("Target rerolled to {} (range {}..={})", state.target, min, max);
    state.emit(GameEvent::TargetChanged {
        target: state.target,
    });
}

/// Spawn gap the score alone would call for
pub fn spawn_rate_for_score(state: &GameState) -> f64 {
    let t = &state.config.tuning;
    (t.initial_spawn_rate_ms - state.score as f64 * t.spawn_rate_per_point).max(t.min_spawn_rate_ms)
}

/// Tighten spawn pacing to match the score. Never loosens.
pub fn tighten_spawn_rate(state: &mut GameState) {
    state.spawn_rate_ms = state.spawn_rate_ms.min(spawn_rate_for_score(state));
}

/// Raise the rise-speed multiplier. Negative steps are ignored.
pub fn bump_speed(state: &mut GameState, step: f32) {
    if step > 0.0 {
        state.speed_multiplier += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{GameConfig, GameMode, MissPolicy};

    fn state(mode: GameMode) -> GameState {
        GameState::new(42, GameConfig::new(mode, MissPolicy::Tolerate))
    }

    #[test]
    fn test_reroll_stays_in_mode_range() {
        for (mode, lo, hi) in [
            (GameMode::Easy, 5, 12),
            (GameMode::Normal, 10, 20),
            (GameMode::Hard, 20, 99),
        ] {
            let mut s = state(mode);
            for _ in 0..200 {
                reroll_target(&mut s);
                assert!((lo..=hi).contains(&s.target), "{:?} {}", mode, s.target);
            }
        }
    }

    #[test]
    fn test_normal_range_widens_after_threshold() {
        let mut s = state(GameMode::Normal);
        s.score = 500;
        let mut saw_high = false;
        for _ in 0..500 {
            reroll_target(&mut s);
            assert!((10..=50).contains(&s.target));
            saw_high |= s.target > 20;
        }
        assert!(saw_high);
    }

    #[test]
    fn test_spawn_rate_floor() {
        let mut s = state(GameMode::Normal);
        s.score = 100;
        tighten_spawn_rate(&mut s);
        assert_eq!(s.spawn_rate_ms, 1450.0);
        s.score = 10_000;
        tighten_spawn_rate(&mut s);
        assert_eq!(s.spawn_rate_ms, 800.0);
    }

    #[test]
    fn test_spawn_rate_never_loosens() {
        let mut s = state(GameMode::Normal);
        s.score = 400;
        tighten_spawn_rate(&mut s);
        let tight = s.spawn_rate_ms;
        s.score = 0;
        tighten_spawn_rate(&mut s);
        assert_eq!(s.spawn_rate_ms, tight);
    }

    #[test]
    fn test_bump_speed_monotonic() {
        let mut s = state(GameMode::Normal);
        bump_speed(&mut s, 0.02);
        bump_speed(&mut s, -1.0);
        assert!((s.speed_multiplier - 1.02).abs() < 1e-6);
    }
}
