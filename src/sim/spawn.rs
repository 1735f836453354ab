//! Entity spawning
//!
//! Picks a kind by weighted draw, a value for numbers, and a column that
//! keeps clear of the last few spawns.

use rand::Rng;

use glam::Vec2;

use super::state::{Entity, EntityKind, GameState};
use crate::consts::*;

/// Kind draw outcome before a value is assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTag {
    Number,
    TimeBonus,
    Star,
    Bomb,
}

/// Map a roll in [0, 1) onto disjoint kind bands: star, bomb, time bonus, number
fn pick_kind(state: &GameState, roll: f32) -> KindTag {
    let w = &state.config.tuning.weights;
    if roll < w.star {
        KindTag::Star
    } else if roll < w.star + w.bomb {
        KindTag::Bomb
    } else if roll < w.star + w.bomb + w.time_bonus {
        KindTag::TimeBonus
    } else {
        KindTag::Number
    }
}

/// Value for a new number bubble
///
/// Usually uniform over [1, target - 1]. With the guaranteed-match chance it
/// instead completes a pair with a random live number already on screen.
fn pick_value(state: &mut GameState) -> u32 {
    let target = state.target;
    let chance = state.config.tuning.guaranteed_match_chance;

    if state.rng.random::<f32>() < chance {
        let partners: Vec<u32> = state
            .entities
            .iter()
            .filter(|e| e.is_live())
            .filter_map(|e| e.kind.value())
            .filter(|&v| v >= 1 && v < target)
            .collect();
        if !partners.is_empty() {
            let partner = partners[state.rng.random_range(0..partners.len())];
            return target - partner;
        }
    }

    if target <= 2 {
        1
    } else {
        state.rng.random_range(1..target)
    }
}

/// Column for a new entity, nudged away from recent spawns
fn pick_x(state: &mut GameState, radius: f32) -> f32 {
    let width = state.field.x;
    if width <= radius * 2.0 {
        return width / 2.0;
    }

    let clearance = |x: f32, recent: &[f32]| {
        recent
            .iter()
            .map(|r| (x - r).abs())
            .fold(f32::INFINITY, f32::min)
    };

    let mut best_x = width / 2.0;
    let mut best_clearance = f32::NEG_INFINITY;
    for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
        let x = state.rng.random_range(radius..=width - radius);
        let c = clearance(x, state.recent_spawn_x.as_slice());
        if c >= MIN_SPAWN_SEPARATION {
            return x;
        }
        if c > best_clearance {
            best_clearance = c;
            best_x = x;
        }
    }
    best_x
}

/// Create a new entity just below the bottom edge and add it to the state
pub fn spawn(state: &mut GameState) -> u32 {
    let roll = state.rng.random::<f32>();
    let kind = match pick_kind(state, roll) {
        KindTag::Number => EntityKind::Number(pick_value(state)),
        KindTag::TimeBonus => EntityKind::TimeBonus,
        KindTag::Star => EntityKind::Star,
        KindTag::Bomb => EntityKind::Bomb,
    };

    let radius = if kind.is_number() {
        BUBBLE_MIN_RADIUS + state.rng.random::<f32>() * BUBBLE_RADIUS_SPREAD
    } else {
        BONUS_RADIUS
    };
    let x = pick_x(state, radius);
    let (lo, hi) = (
        state.config.tuning.min_rise_speed,
        state.config.tuning.max_rise_speed,
    );
    let speed = state.rng.random_range(lo..=hi) * state.speed_multiplier;
    let phase = state.rng.random_range(0.0..std::f32::consts::TAU);

    let id = state.next_entity_id();
    let mut entity = Entity::new(id, kind, Vec2::new(x, state.field.y + radius), radius, speed);
    entity.phase = phase;
    state.entities.push(entity);

    state.recent_spawn_x.push(x);
    if state.recent_spawn_x.len() > RECENT_SPAWN_WINDOW {
        state.recent_spawn_x.remove(0);
    }
    state.stats.spawned += 1;

    id
}
