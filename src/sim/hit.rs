//! Tap hit testing
//!
//! A tap picks the nearest live entity whose padded circle contains it,
//! not the topmost one.

use glam::Vec2;

use super::state::Entity;
use crate::consts::HIT_MARGIN;

/// Result of a hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Index into the entity list
    pub index: usize,
    /// Distance from the tap to the entity centre
    pub distance: f32,
}

/// True if `point` lies within the entity's padded circle
pub fn within_reach(entity: &Entity, point: Vec2, margin: f32) -> bool {
    crate::distance(entity.pos, point) <= entity.radius + margin
}

/// Nearest live entity to `point` within reach, if any
pub fn hit_test(entities: &[Entity], point: Vec2) -> Option<HitResult> {
    hit_test_with_margin(entities, point, HIT_MARGIN)
}

pub fn hit_test_with_margin(entities: &[Entity], point: Vec2, margin: f32) -> Option<HitResult> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_live() && within_reach(e, point, margin))
        .map(|(index, e)| HitResult {
            index,
            distance: crate::distance(e.pos, point),
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EntityKind;

    fn bubble(id: u32, x: f32, y: f32) -> Entity {
        Entity::new(id, EntityKind::Number(1), Vec2::new(x, y), 40.0, 1.0)
    }

    #[test]
    fn test_miss_is_none() {
        let entities = vec![bubble(1, 100.0, 100.0)];
        assert!(hit_test(&entities, Vec2::new(300.0, 300.0)).is_none());
        assert!(hit_test(&[], Vec2::ZERO).is_none());
    }

    #[test]
    fn test_margin_extends_reach() {
        let entities = vec![bubble(1, 100.0, 100.0)];
        // 45 from centre: outside radius 40, inside radius + margin
        assert!(hit_test(&entities, Vec2::new(145.0, 100.0)).is_some());
        assert!(hit_test_with_margin(&entities, Vec2::new(145.0, 100.0), 0.0).is_none());
    }

    #[test]
    fn test_nearest_wins_over_topmost() {
        // Later entities draw on top; the earlier one is nearer the tap
        let entities = vec![bubble(1, 100.0, 100.0), bubble(2, 150.0, 100.0)];
        let hit = hit_test(&entities, Vec2::new(110.0, 100.0)).unwrap();
        assert_eq!(entities[hit.index].id, 1);
        let hit = hit_test(&entities, Vec2::new(140.0, 100.0)).unwrap();
        assert_eq!(entities[hit.index].id, 2);
    }

    #[test]
    fn test_popping_excluded() {
        let mut entities = vec![bubble(1, 100.0, 100.0), bubble(2, 150.0, 100.0)];
        entities[0].pop();
        let hit = hit_test(&entities, Vec2::new(105.0, 100.0)).unwrap();
        assert_eq!(entities[hit.index].id, 2);
    }
}
