//! Pointer hit-testing and scoring
//!
//! Items are scanned newest-first so the one drawn on top wins when icons
//! overlap. At most one item is consumed per click.

use glam::Vec2;

use super::state::{ItemKind, RuntimeState, TextCategory};
use super::tick::item_placement;
use crate::Arena;
use crate::consts::HIT_RADIUS_FACTOR;
use crate::tuning::ScoringTuning;

/// Result of a click that landed on an item
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub item_id: u32,
    pub kind: ItemKind,
    /// Score change to forward to the session
    pub delta: i32,
    /// Item center at the moment of the click
    pub center: Vec2,
}

/// Point-in-circle test (inclusive boundary)
#[inline]
pub fn hit_test_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Test a click at `point` (arena coordinates) against the live items.
///
/// On a hit the item is marked consumed, a floating text is queued and, for
/// hazards, the danger overlay snaps to full. Score itself is not touched
/// here: the caller applies `delta` to its session.
pub fn hit_test(
    state: &mut RuntimeState,
    point: Vec2,
    now_ms: f64,
    arena: &Arena,
    scoring: &ScoringTuning,
) -> Option<HitOutcome> {
    let mut outcome = None;

    for item in state.items.iter_mut().rev() {
        if item.consumed {
            continue;
        }
        let placement = item_placement(item, now_ms, arena);
        // Off-screen at this exact instant (not spawned yet or already landed)
        if !(0.0..1.0).contains(&placement.progress) {
            continue;
        }
        if !hit_test_circle(point, placement.center, item.size * HIT_RADIUS_FACTOR) {
            continue;
        }

        item.consumed = true;
        let delta = match item.kind {
            ItemKind::Collectible => scoring.collectible_points,
            ItemKind::Hazard => scoring.hazard_points,
        };
        outcome = Some(HitOutcome {
            item_id: item.id,
            kind: item.kind,
            delta,
            center: placement.center,
        });
        break;
    }

    let hit = outcome.as_ref()?;
    let category = match hit.kind {
        ItemKind::Collectible => TextCategory::Positive,
        ItemKind::Hazard => TextCategory::Negative,
    };
    state.push_text(format!("{:+}", hit.delta), hit.center, category, now_ms);
    if hit.kind == ItemKind::Hazard {
        state.danger_overlay = 1.0;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FallingItem;

    fn push(state: &mut RuntimeState, kind: ItemKind, x: f32, spawned_at_ms: f64) -> u32 {
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            kind,
            x,
            size: 60.0,
            spawned_at_ms,
            fall_duration_ms: 2000.0,
            consumed: false,
        });
        id
    }

    fn center_of(state: &RuntimeState, id: u32, now_ms: f64) -> Vec2 {
        let item = state.items.iter().find(|i| i.id == id).unwrap();
        item_placement(item, now_ms, &Arena::default()).center
    }

    fn click(state: &mut RuntimeState, point: Vec2, now_ms: f64) -> Option<HitOutcome> {
        hit_test(state, point, now_ms, &Arena::default(), &ScoringTuning::default())
    }

    #[test]
    fn test_collectible_hit() {
        let mut state = RuntimeState::new();
        let id = push(&mut state, ItemKind::Collectible, 300.0, 0.0);
        let center = center_of(&state, id, 1000.0);

        let hit = click(&mut state, center, 1000.0).expect("should hit");
        assert_eq!(hit.item_id, id);
        assert_eq!(hit.delta, 10);
        assert!(state.items[0].consumed);
        assert_eq!(state.texts.len(), 1);
        assert_eq!(state.texts[0].text, "+10");
        assert_eq!(state.texts[0].category, TextCategory::Positive);
        assert_eq!(state.danger_overlay, 0.0);
    }

    #[test]
    fn test_hazard_hit_snaps_overlay() {
        let mut state = RuntimeState::new();
        state.danger_overlay = 0.3;
        let id = push(&mut state, ItemKind::Hazard, 300.0, 0.0);
        let center = center_of(&state, id, 700.0);

        let hit = click(&mut state, center, 700.0).expect("should hit");
        assert_eq!(hit.delta, -15);
        assert_eq!(state.danger_overlay, 1.0);
        assert_eq!(state.texts[0].text, "-15");
        assert_eq!(state.texts[0].category, TextCategory::Negative);
    }

    #[test]
    fn test_topmost_wins() {
        let mut state = RuntimeState::new();
        // Same column and timing: fully overlapping
        let older = push(&mut state, ItemKind::Collectible, 300.0, 0.0);
        let newer = push(&mut state, ItemKind::Hazard, 300.0, 0.0);
        let center = center_of(&state, newer, 1000.0);

        let hit = click(&mut state, center, 1000.0).unwrap();
        assert_eq!(hit.item_id, newer);
        assert_eq!(state.items.iter().filter(|i| i.consumed).count(), 1);

        // Second click takes the one underneath
        let hit = click(&mut state, center, 1000.0).unwrap();
        assert_eq!(hit.item_id, older);
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut state = RuntimeState::new();
        let id = push(&mut state, ItemKind::Collectible, 300.0, 0.0);
        let center = center_of(&state, id, 1000.0);
        // Just outside the 0.45 * size radius
        let point = center + Vec2::new(60.0 * HIT_RADIUS_FACTOR + 0.5, 0.0);

        assert!(click(&mut state, point, 1000.0).is_none());
        assert!(!state.items[0].consumed);
        assert!(state.texts.is_empty());
    }

    #[test]
    fn test_hit_radius_boundary_is_inclusive() {
        let mut state = RuntimeState::new();
        let id = push(&mut state, ItemKind::Collectible, 300.0, 0.0);
        let center = center_of(&state, id, 1000.0);
        let point = center + Vec2::new(0.0, 60.0 * HIT_RADIUS_FACTOR - 0.01);
        assert!(click(&mut state, point, 1000.0).is_some());
    }

    #[test]
    fn test_landed_item_cannot_be_hit() {
        let mut state = RuntimeState::new();
        let id = push(&mut state, ItemKind::Collectible, 300.0, 0.0);
        let center = center_of(&state, id, 2000.0);
        assert!(click(&mut state, center, 2000.0).is_none());
    }

    #[test]
    fn test_unspawned_item_cannot_be_hit() {
        let mut state = RuntimeState::new();
        state.danger_overlay = 0.25;
        // Spawn time lies after the click: negative progress
        let id = push(&mut state, ItemKind::Hazard, 300.0, 1500.0);
        let center = center_of(&state, id, 1000.0);

        assert!(click(&mut state, center, 1000.0).is_none());
        assert!(!state.items[0].consumed);
        assert!(state.texts.is_empty());
        assert_eq!(state.danger_overlay, 0.25);
    }

    #[test]
    fn test_label_sign_follows_delta() {
        let scoring = ScoringTuning {
            collectible_points: -5,
            hazard_points: 20,
        };
        let mut state = RuntimeState::new();
        let coin = push(&mut state, ItemKind::Collectible, 200.0, 0.0);
        let bomb = push(&mut state, ItemKind::Hazard, 700.0, 0.0);

        let at = center_of(&state, coin, 800.0);
        hit_test(&mut state, at, 800.0, &Arena::default(), &scoring).unwrap();
        let at = center_of(&state, bomb, 800.0);
        hit_test(&mut state, at, 800.0, &Arena::default(), &scoring).unwrap();

        let labels: Vec<_> = state.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(labels, vec!["-5", "+20"]);
    }

    #[test]
    fn test_consumed_item_cannot_be_hit_twice() {
        let mut state = RuntimeState::new();
        let id = push(&mut state, ItemKind::Collectible, 300.0, 0.0);
        let center = center_of(&state, id, 500.0);
        assert!(click(&mut state, center, 500.0).is_some());
        assert!(click(&mut state, center, 500.0).is_none());
        assert_eq!(state.texts.len(), 1);
    }
}
