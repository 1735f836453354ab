//! Fixed timestep simulation tick
//!
//! The clock is the only scheduled unit of work. Each tick, in order:
//! deferred actions, maybe spawn, advance entities (misses, cleanup),
//! advance indicators, countdown.

use glam::Vec2;

use super::difficulty::tighten_spawn_rate;
use super::spawn::spawn;
use super::state::{DeferredAction, GameEvent, GameState, IndicatorTone};
use crate::tuning::MissPolicy;

/// Advance the game state by one timestep of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, dt_ms: f64) {
    // Don't tick if paused or game over
    if !state.is_playing() {
        return;
    }

    state.clock_ms += dt_ms;
    state.stats.ticks += 1;

    run_deferred(state);

    if state.clock_ms - state.last_spawn_ms > state.spawn_rate_ms {
        spawn(state);
        state.last_spawn_ms = state.clock_ms;
        tighten_spawn_rate(state);
    }

    advance_entities(state);
    if !state.is_active() {
        return;
    }

    for indicator in &mut state.indicators {
        indicator.advance();
    }
    state.indicators.retain(|i| i.life > 0.0);

    state.second_acc_ms += dt_ms;
    while state.second_acc_ms >= 1000.0 && state.is_active() {
        state.second_acc_ms -= 1000.0;
        state.time_left = state.time_left.saturating_sub(1);
        if state.time_left == 0 {
            state.end_game();
        }
    }
}

/// Run every deferred action that has come due, in scheduling order
fn run_deferred(state: &mut GameState) {
    let now = state.clock_ms;
    let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut state.deferred)
        .into_iter()
        .partition(|d| d.due_ms <= now);
    state.deferred = pending;

    for d in due {
        match d.action {
            DeferredAction::ClearSelection { generation } => {
                // Stale if the selection was cleared (match, bomb) since scheduling
                if state.selection.generation() != generation {
                    continue;
                }
                for id in state.selection.clear() {
                    if let Some(e) = state.entity_mut(id) {
                        e.selected = false;
                    }
                }
            }
            DeferredAction::Feedback(cue) => state.feedback(cue),
        }
    }
}

/// Move every entity, flag misses, drop faded ones
fn advance_entities(state: &mut GameState) {
    let mut missed = Vec::new();
    for e in &mut state.entities {
        e.advance();
        if e.is_live() && e.is_above_top() {
            e.pop();
            if e.kind.is_number() {
                missed.push((e.id, e.pos.x));
            }
        }
    }
    state.entities.retain(|e| !e.is_faded());

    for (id, x) in missed {
        register_miss(state, id, x);
        if !state.is_active() {
            break;
        }
    }
}

fn register_miss(state: &mut GameState, id: u32, x: f32) {
    state.selection.remove(id);
    state.stats.misses += 1;
    state.emit(GameEvent::Missed { id });
    state.indicate("MISS", Vec2::new(x, 24.0), IndicatorTone::Bad);

    match state.config.miss_policy {
        MissPolicy::EndGame => state.end_game(),
        MissPolicy::Tolerate => {
            let penalty = state.config.tuning.miss_penalty;
            state.penalize(penalty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{EntityKind, Feedback, GamePhase};
    use crate::tuning::{GameConfig, GameMode};

    fn state(mode: GameMode, policy: MissPolicy) -> GameState {
        let mut s = GameState::new(12345, GameConfig::new(mode, policy));
        s.drain_events();
        s
    }

    fn run_ms(s: &mut GameState, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed + 1e-9 < ms {
            tick(s, SIM_DT_MS);
            elapsed += SIM_DT_MS;
        }
    }

    #[test]
    fn test_countdown_one_per_second() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        let start = s.time_left;
        tick(&mut s, 999.0);
        assert_eq!(s.time_left, start);
        tick(&mut s, 1.0);
        assert_eq!(s.time_left, start - 1);
        run_ms(&mut s, 3010.0);
        assert_eq!(s.time_left, start - 4);
    }

    #[test]
    fn test_timer_zero_ends_game_once() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        s.time_left = 1;
        s.score = 70;
        run_ms(&mut s, 1010.0);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.time_left, 0);

        let clock = s.clock_ms;
        run_ms(&mut s, 5000.0);
        assert_eq!(s.clock_ms, clock);
        let overs: Vec<_> = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![GameEvent::GameOver { score: 70 }]);
    }

    #[test]
    fn test_spawns_after_spawn_rate() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        run_ms(&mut s, 1400.0);
        assert!(s.entities.is_empty());
        run_ms(&mut s, 200.0);
        assert_eq!(s.entities.len(), 1);
        assert_eq!(s.stats.spawned, 1);
    }

    #[test]
    fn test_miss_tolerated() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        s.score = 30;
        let id = s.insert_entity(EntityKind::Number(3), Vec2::new(100.0, -44.5));
        tick(&mut s, SIM_DT_MS);
        assert!(s.entity(id).unwrap().popping);
        assert_eq!(s.score, 30);
        assert_eq!(s.stats.misses, 1);
        assert!(s.is_active());
        assert!(s.events.contains(&GameEvent::Missed { id }));
    }

    #[test]
    fn test_hard_miss_penalty_floors() {
        let mut s = state(GameMode::Hard, MissPolicy::Tolerate);
        s.score = 3;
        s.insert_entity(EntityKind::Number(3), Vec2::new(100.0, -44.5));
        tick(&mut s, SIM_DT_MS);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_strict_miss_ends_game() {
        let mut s = state(GameMode::Normal, MissPolicy::EndGame);
        s.insert_entity(EntityKind::Number(3), Vec2::new(100.0, -44.5));
        tick(&mut s, SIM_DT_MS);
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_bonus_off_top_is_not_a_miss() {
        let mut s = state(GameMode::Normal, MissPolicy::EndGame);
        let id = s.insert_entity(EntityKind::Star, Vec2::new(100.0, -30.5));
        tick(&mut s, SIM_DT_MS);
        assert!(s.is_active());
        assert!(s.entity(id).unwrap().popping);
        assert_eq!(s.stats.misses, 0);
    }

    #[test]
    fn test_faded_entities_removed() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        let id = s.insert_entity(EntityKind::Number(3), Vec2::new(100.0, 300.0));
        s.entity_mut(id).unwrap().pop();
        for _ in 0..12 {
            tick(&mut s, SIM_DT_MS);
        }
        assert!(s.entity(id).is_none());
    }

    #[test]
    fn test_stale_clear_is_noop() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        let a = s.insert_entity(EntityKind::Number(3), Vec2::new(100.0, 300.0));
        s.selection.insert(a);
        s.entity_mut(a).unwrap().selected = true;
        let old = s.selection.generation().wrapping_sub(1);
        s.schedule(0.0, DeferredAction::ClearSelection { generation: old });
        tick(&mut s, SIM_DT_MS);
        assert_eq!(s.selection.ids(), &[a]);
        assert!(s.entity(a).unwrap().selected);
    }

    #[test]
    fn test_deferred_feedback_fires_when_due() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        s.schedule(100.0, DeferredAction::Feedback(Feedback::Success));
        run_ms(&mut s, 80.0);
        assert!(!s.events.contains(&GameEvent::Feedback(Feedback::Success)));
        run_ms(&mut s, 40.0);
        assert!(s.events.contains(&GameEvent::Feedback(Feedback::Success)));
        assert!(s.deferred.is_empty());
    }

    #[test]
    fn test_paused_clock_frozen() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        let start = s.time_left;
        s.toggle_pause();
        run_ms(&mut s, 3000.0);
        assert_eq!(s.time_left, start);
        assert_eq!(s.clock_ms, 0.0);
        s.toggle_pause();
        run_ms(&mut s, 1010.0);
        assert_eq!(s.time_left, start - 1);
    }

    #[test]
    fn test_indicators_culled() {
        let mut s = state(GameMode::Normal, MissPolicy::Tolerate);
        s.indicate("+20", Vec2::new(100.0, 100.0), IndicatorTone::Good);
        for _ in 0..60 {
            tick(&mut s, SIM_DT_MS);
        }
        assert!(s.indicators.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut s1 = state(GameMode::Normal, MissPolicy::Tolerate);
        let mut s2 = state(GameMode::Normal, MissPolicy::Tolerate);
        run_ms(&mut s1, 10_000.0);
        run_ms(&mut s2, 10_000.0);
        assert_eq!(s1.entities.len(), s2.entities.len());
        for (a, b) in s1.entities.iter().zip(&s2.entities) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.pos, b.pos);
        }
    }
}
