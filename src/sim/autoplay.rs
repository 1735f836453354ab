//! Greedy auto-player for headless/demo runs
//!
//! Looks at the board the way a player would: finish a half-made pair,
//! grab bonuses, then start the first pair that sums to the target.
//! Bombs are never tapped.

use glam::Vec2;

use super::state::{EntityKind, GameState};

/// Where the bot would tap next, if anywhere
pub fn next_tap(state: &GameState) -> Option<Vec2> {
    if !state.is_playing() || state.selection.is_locked() {
        return None;
    }

    if let Some(pos) = complete_pair(state) {
        return Some(pos);
    }

    let bonus = state.entities.iter().find(|e| {
        e.is_live() && matches!(e.kind, EntityKind::Star | EntityKind::TimeBonus)
    });
    if let Some(e) = bonus {
        return Some(e.pos);
    }

    if state.selection.is_empty() {
        return first_of_pair(state);
    }

    // Holding a number with no partner on screen; drop it
    let held = state.selection.ids()[0];
    state.entity(held).map(|e| e.pos)
}

fn complete_pair(state: &GameState) -> Option<Vec2> {
    let held = *state.selection.ids().first()?;
    let value = state.entity(held)?.kind.value()?;
    let want = state.target.checked_sub(value)?;
    state
        .entities
        .iter()
        .find(|e| e.is_live() && e.id != held && e.kind.value() == Some(want))
        .map(|e| e.pos)
}

fn first_of_pair(state: &GameState) -> Option<Vec2> {
    let numbers: Vec<_> = state
        .entities
        .iter()
        .filter(|e| e.is_live())
        .filter_map(|e| e.kind.value().map(|v| (e, v)))
        .collect();

    for (i, (a, va)) in numbers.iter().enumerate() {
        if numbers[i + 1..].iter().any(|(_, vb)| va + vb == state.target) {
            return Some(a.pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TapOutcome, handle_tap};
    use crate::tuning::GameConfig;

    fn state() -> GameState {
        let mut state = GameState::new(3, GameConfig::default());
        state.target = 10;
        state
    }

    #[test]
    fn test_idle_on_empty_board() {
        assert_eq!(next_tap(&state()), None);
    }

    #[test]
    fn test_finds_and_finishes_pair() {
        let mut state = state();
        state.insert_entity(EntityKind::Number(7), Vec2::new(50.0, 300.0));
        let a = state.insert_entity(EntityKind::Number(4), Vec2::new(150.0, 300.0));
        let b = state.insert_entity(EntityKind::Number(6), Vec2::new(250.0, 300.0));

        let first = next_tap(&state).unwrap();
        assert_eq!(first, Vec2::new(150.0, 300.0));
        assert_eq!(handle_tap(&mut state, first), TapOutcome::Selected { id: a });

        let second = next_tap(&state).unwrap();
        assert_eq!(second, Vec2::new(250.0, 300.0));
        assert_eq!(
            handle_tap(&mut state, second),
            TapOutcome::Matched { first: a, second: b }
        );
    }

    #[test]
    fn test_prefers_bonus_and_skips_bombs() {
        let mut state = state();
        state.insert_entity(EntityKind::Bomb, Vec2::new(50.0, 300.0));
        state.insert_entity(EntityKind::TimeBonus, Vec2::new(200.0, 300.0));
        assert_eq!(next_tap(&state), Some(Vec2::new(200.0, 300.0)));

        state.entities.retain(|e| e.kind == EntityKind::Bomb);
        assert_eq!(next_tap(&state), None);
    }

    #[test]
    fn test_drops_orphaned_selection() {
        let mut state = state();
        let pos = Vec2::new(100.0, 300.0);
        state.insert_entity(EntityKind::Number(3), pos);
        handle_tap(&mut state, pos);
        assert_eq!(next_tap(&state), Some(pos));
    }

    #[test]
    fn test_waits_while_locked() {
        let mut state = state();
        state.insert_entity(EntityKind::Number(3), Vec2::new(100.0, 300.0));
        state.selection.lock();
        assert_eq!(next_tap(&state), None);
    }
}
