//! Tap resolution
//!
//! Numbers toggle selection and resolve in pairs; bonus kinds take effect
//! on a single tap.

use glam::Vec2;

use super::difficulty::{bump_speed, reroll_target, tighten_spawn_rate};
use super::hit::hit_test;
use super::state::{
    DeferredAction, EntityKind, Feedback, GameEvent, GameState, IndicatorTone, MAX_SELECTION,
};
use crate::consts::*;

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Nothing tappable there, or the run isn't playing
    Ignored,
    Selected { id: u32 },
    Deselected { id: u32 },
    Matched { first: u32, second: u32 },
    Mismatched { first: u32, second: u32 },
    /// A number tap while a failed pair is still on display
    Locked { id: u32 },
    TimeBonus { id: u32 },
    Star { id: u32 },
    Bomb { id: u32 },
}

/// Handle a tap at `point` (playfield coordinates)
pub fn handle_tap(state: &mut GameState, point: Vec2) -> TapOutcome {
    if !state.is_playing() {
        return TapOutcome::Ignored;
    }
    let Some(hit) = hit_test(&state.entities, point) else {
        return TapOutcome::Ignored;
    };

    let (id, kind) = {
        let e = &state.entities[hit.index];
        (e.id, e.kind)
    };
    match kind {
        EntityKind::Number(_) => toggle_number(state, id),
        EntityKind::TimeBonus => collect_time_bonus(state, id),
        EntityKind::Star => collect_star(state, id),
        EntityKind::Bomb => detonate_bomb(state, id),
    }
}

fn toggle_number(state: &mut GameState, id: u32) -> TapOutcome {
    if state.selection.is_locked() {
        return TapOutcome::Locked { id };
    }

    if state.selection.remove(id) {
        if let Some(e) = state.entity_mut(id) {
            e.selected = false;
        }
        return TapOutcome::Deselected { id };
    }

    if !state.selection.insert(id) {
        return TapOutcome::Ignored;
    }
    if let Some(e) = state.entity_mut(id) {
        e.selected = true;
    }
    state.feedback(Feedback::Pop);

    if state.selection.len() == MAX_SELECTION {
        resolve_pair(state)
    } else {
        TapOutcome::Selected { id }
    }
}

/// Evaluate a full selection against the target
fn resolve_pair(state: &mut GameState) -> TapOutcome {
    let (first, second) = match state.selection.ids() {
        &[a, b] => (a, b),
        _ => return TapOutcome::Ignored,
    };
    let value = |s: &GameState, id| s.entity(id).and_then(|e| e.kind.value()).unwrap_or(0);
    let sum = value(state, first) + value(state, second);

    if sum != state.target {
        state.selection.lock();
        let generation = state.selection.generation();
        state.schedule(MISMATCH_DELAY_MS, DeferredAction::ClearSelection { generation });
        state.stats.mismatches += 1;
        state.emit(GameEvent::Mismatched { first, second, sum });
        return TapOutcome::Mismatched { first, second };
    }

    let mut midpoint = Vec2::ZERO;
    for id in state.selection.clear() {
        if let Some(e) = state.entity_mut(id) {
            e.pop();
            midpoint += e.pos * 0.5;
        }
        let points = state.config.tuning.match_points;
        state.award(points);
    }
    state.stats.matches += 1;

    let gained = state.config.tuning.match_points * 2;
    state.indicate(format!("+{}", gained), midpoint, IndicatorTone::Good);
    state.emit(GameEvent::Matched { first, second, sum });
    state.feedback(Feedback::Match);
    state.schedule(SUCCESS_ECHO_DELAY_MS, DeferredAction::Feedback(Feedback::Success));

    let step = state.config.tuning.match_speed_step;
    bump_speed(state, step);
    tighten_spawn_rate(state);
    reroll_target(state);

    TapOutcome::Matched { first, second }
}

/// Pop a bonus entity, returning its position
fn pop_bonus(state: &mut GameState, id: u32) -> Vec2 {
    state.stats.bonuses += 1;
    match state.entity_mut(id) {
        Some(e) => {
            e.pop();
            e.pos
        }
        None => Vec2::ZERO,
    }
}

fn collect_time_bonus(state: &mut GameState, id: u32) -> TapOutcome {
    let pos = pop_bonus(state, id);
    state.time_left = (state.time_left + TIME_BONUS_SECS).min(MAX_TIME_SECS);
    state.indicate(format!("+{}s", TIME_BONUS_SECS), pos, IndicatorTone::Bonus);
    state.feedback(Feedback::Pop);
    state.emit(GameEvent::TimeBonus {
        time_left: state.time_left,
    });
    TapOutcome::TimeBonus { id }
}

fn collect_star(state: &mut GameState, id: u32) -> TapOutcome {
    let pos = pop_bonus(state, id);
    let points = state.config.tuning.star_points;
    state.award(points);
    let step = state.config.tuning.star_speed_step;
    bump_speed(state, step);
    tighten_spawn_rate(state);
    state.indicate(format!("+{}", points), pos, IndicatorTone::Bonus);
    state.feedback(Feedback::Pop);
    TapOutcome::Star { id }
}

fn detonate_bomb(state: &mut GameState, id: u32) -> TapOutcome {
    let pos = pop_bonus(state, id);
    let penalty = state.config.tuning.bomb_penalty;
    state.penalize(penalty);

    for e in state.entities.iter_mut().filter(|e| e.is_live()) {
        e.pop();
    }
    // Anything selected just popped; outstanding clears become stale
    state.selection.clear();

    state.indicate(format!("-{}", penalty), pos, IndicatorTone::Bad);
    state.feedback(Feedback::Bomb);
    TapOutcome::Bomb { id }
}
