//! Runtime entity state for one game session
//!
//! Item positions are never stored: they are derived from the spawn time
//! and fall duration whenever the loop or the hit-test needs them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a falling item does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Coin: adds points
    Collectible,
    /// Bomb: takes points away and flashes the arena red
    Hazard,
}

impl ItemKind {
    /// Asset tag used by the host page
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Collectible => "BTC",
            ItemKind::Hazard => "BOMB",
        }
    }
}

/// A spawned item falling toward the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub kind: ItemKind,
    /// Horizontal center (render units), fixed at spawn
    pub x: f32,
    /// Diameter of the drawn icon
    pub size: f32,
    /// Frame clock reading at creation (ms)
    pub spawned_at_ms: f64,
    pub fall_duration_ms: f64,
    /// Set once when clicked; consumed items are dropped on the next frame
    pub consumed: bool,
}

impl FallingItem {
    /// Elapsed time over fall duration, unclamped
    #[inline]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.fall_duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.spawned_at_ms) / self.fall_duration_ms) as f32
    }
}

/// Color family of a floating score text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextCategory {
    Positive,
    Negative,
}

/// Score feedback that drifts up and fades out. Purely cosmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u32,
    pub text: String,
    pub origin: Vec2,
    pub category: TextCategory,
    pub spawned_at_ms: f64,
    pub duration_ms: f64,
}

impl FloatingText {
    /// Normalized age, 0 at spawn and 1 at expiry
    #[inline]
    pub fn age(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.spawned_at_ms) / self.duration_ms) as f32
    }
}

/// Everything the loop mutates between frames.
///
/// One instance per running game. Only the frame tick and the hit-test
/// write to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeState {
    /// Active items in spawn order
    pub items: Vec<FallingItem>,
    /// Active floating texts in creation order
    pub texts: Vec<FloatingText>,
    /// Red flash intensity (0-1), decays every frame
    pub danger_overlay: f32,
    /// Time since the last spawn (ms)
    pub spawn_accumulator_ms: f64,
    /// Timestamp of the previous frame, only used for frame delta
    #[serde(skip)]
    pub last_frame_ms: Option<f64>,
    /// Next entity ID
    next_id: u32,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Back to the zero state: no items, no texts, no overlay, no pending spawn
    pub fn reset(&mut self) {
        self.items.clear();
        self.texts.clear();
        self.danger_overlay = 0.0;
        self.spawn_accumulator_ms = 0.0;
        self.last_frame_ms = None;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Queue a floating text at `origin`
    pub fn push_text(
        &mut self,
        text: impl Into<String>,
        origin: Vec2,
        category: TextCategory,
        now_ms: f64,
    ) {
        let id = self.next_entity_id();
        self.texts.push(FloatingText {
            id,
            text: text.into(),
            origin,
            category,
            spawned_at_ms: now_ms,
            duration_ms: crate::consts::FLOATING_TEXT_MS,
        });
    }

    /// Items that can still be drawn or clicked
    pub fn live_items(&self) -> impl Iterator<Item = &FallingItem> {
        self.items.iter().filter(|item| !item.consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(spawned_at_ms: f64, fall_duration_ms: f64) -> FallingItem {
        FallingItem {
            id: 1,
            kind: ItemKind::Collectible,
            x: 100.0,
            size: 60.0,
            spawned_at_ms,
            fall_duration_ms,
            consumed: false,
        }
    }

    #[test]
    fn test_progress_is_elapsed_over_duration() {
        let it = item(1000.0, 2000.0);
        assert_eq!(it.progress(1000.0), 0.0);
        assert_eq!(it.progress(2000.0), 0.5);
        assert_eq!(it.progress(3000.0), 1.0);
        assert!(it.progress(500.0) < 0.0);
    }

    #[test]
    fn test_zero_duration_counts_as_landed() {
        assert_eq!(item(0.0, 0.0).progress(0.0), 1.0);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = RuntimeState::new();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);

        // Default-constructed state still hands out non-zero ids
        let mut state = RuntimeState::default();
        assert_eq!(state.next_entity_id(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = RuntimeState::new();
        state.items.push(item(0.0, 1000.0));
        state.push_text("+10", Vec2::new(10.0, 10.0), TextCategory::Positive, 0.0);
        state.danger_overlay = 0.7;
        state.spawn_accumulator_ms = 300.0;
        state.last_frame_ms = Some(42.0);

        state.reset();

        assert!(state.items.is_empty());
        assert!(state.texts.is_empty());
        assert_eq!(state.danger_overlay, 0.0);
        assert_eq!(state.spawn_accumulator_ms, 0.0);
        assert_eq!(state.last_frame_ms, None);
    }

    #[test]
    fn test_live_items_skips_consumed() {
        let mut state = RuntimeState::new();
        state.items.push(item(0.0, 1000.0));
        let mut eaten = item(0.0, 1000.0);
        eaten.consumed = true;
        state.items.push(eaten);
        assert_eq!(state.live_items().count(), 1);
    }
}
