//! Per-frame simulation step
//!
//! Advances spawn timing, retires items that reached the floor, decays the
//! danger overlay and expires floating texts. Returns a draw-ready snapshot
//! of whatever survived.

use glam::Vec2;
use rand::Rng;

use super::easing::{ease_in_out_cubic, lerp};
use super::state::{FallingItem, FloatingText, ItemKind, RuntimeState, TextCategory};
use crate::Arena;
use crate::consts::*;
use crate::tuning::Tuning;

/// Inputs for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Frame clock reading (ms, monotonic)
    pub now_ms: f64,
    /// New items may spawn (session running with time left)
    pub spawning: bool,
}

/// Where an item is at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Unclamped normalized progress
    pub progress: f32,
    pub center: Vec2,
}

/// Position of `item` at `now_ms`.
///
/// The only placement formula in the crate. Rendering and hit-testing both
/// call it so a click lands exactly where the item was drawn.
#[inline]
pub fn item_placement(item: &FallingItem, now_ms: f64, arena: &Arena) -> Placement {
    let progress = item.progress(now_ms);
    let eased = ease_in_out_cubic(progress);
    let y_start = -item.size;
    let y_end = arena.floor_y() - item.size / 2.0 - FLOOR_CLEARANCE;
    Placement {
        progress,
        center: Vec2::new(item.x, lerp(y_start, y_end, eased)),
    }
}

/// An item ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub id: u32,
    pub kind: ItemKind,
    pub center: Vec2,
    pub size: f32,
}

/// A floating text ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub position: Vec2,
    pub alpha: f32,
    pub scale: f32,
    pub category: TextCategory,
}

/// Output of one frame step
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub now_ms: f64,
    pub dt_ms: f64,
    /// Surviving items in spawn order
    pub items: Vec<PlacedItem>,
    /// Surviving texts in creation order
    pub texts: Vec<PlacedText>,
    /// Danger overlay intensity after decay (0-1)
    pub danger_overlay: f32,
    /// ID of the item spawned this frame, if any
    pub spawned: Option<u32>,
}

/// Advance the runtime state by one frame
pub fn tick<R: Rng + ?Sized>(
    state: &mut RuntimeState,
    input: &FrameInput,
    arena: &Arena,
    tuning: &Tuning,
    rng: &mut R,
) -> Frame {
    let now = input.now_ms;
    let dt = match state.last_frame_ms {
        Some(last) => (now - last).max(0.0),
        None => FIRST_FRAME_DT_MS,
    };
    state.last_frame_ms = Some(now);

    // Linear decay, full to zero in OVERLAY_DECAY_MS
    state.danger_overlay = (state.danger_overlay - (dt / OVERLAY_DECAY_MS) as f32).max(0.0);

    let mut spawned = None;
    if input.spawning {
        state.spawn_accumulator_ms += dt;
        let spawn = &tuning.spawn;
        let threshold = spawn.base_interval_ms
            + random_between(rng, spawn.interval_jitter_ms.0, spawn.interval_jitter_ms.1);
        if state.spawn_accumulator_ms >= threshold {
            state.spawn_accumulator_ms = 0.0;
            spawned = Some(spawn_item(state, now, arena, tuning, rng));
        }
    }

    // Rebuild the active set from survivors: consumed items and items that
    // reached the floor are dropped here and nowhere else.
    let mut placed = Vec::with_capacity(state.items.len());
    state.items.retain(|item| match place_item(item, now, arena) {
        Some(p) => {
            placed.push(p);
            true
        }
        None => false,
    });

    let mut texts = Vec::with_capacity(state.texts.len());
    state.texts.retain(|text| match place_text(text, now) {
        Some(p) => {
            texts.push(p);
            true
        }
        None => false,
    });

    Frame {
        now_ms: now,
        dt_ms: dt,
        items: placed,
        texts,
        danger_overlay: state.danger_overlay,
        spawned,
    }
}

/// Draw-ready item at `now_ms`; `None` once consumed or landed
pub fn place_item(item: &FallingItem, now_ms: f64, arena: &Arena) -> Option<PlacedItem> {
    if item.consumed {
        return None;
    }
    let placement = item_placement(item, now_ms, arena);
    if placement.progress >= 1.0 {
        return None;
    }
    Some(PlacedItem {
        id: item.id,
        kind: item.kind,
        center: placement.center,
        size: item.size,
    })
}

/// Draw-ready floating text at `now_ms`; `None` once expired
pub fn place_text(text: &FloatingText, now_ms: f64) -> Option<PlacedText> {
    let age = text.age(now_ms);
    if age >= 1.0 {
        return None;
    }
    let age = age.max(0.0);
    Some(PlacedText {
        text: text.text.clone(),
        position: text.origin - Vec2::new(0.0, FLOATING_TEXT_RISE * age),
        alpha: 1.0 - age,
        scale: 1.0 + FLOATING_TEXT_POP * (1.0 - age),
        category: text.category,
    })
}

/// Create one item with randomized kind, size, column and fall speed
pub fn spawn_item<R: Rng + ?Sized>(
    state: &mut RuntimeState,
    now_ms: f64,
    arena: &Arena,
    tuning: &Tuning,
    rng: &mut R,
) -> u32 {
    let spawn = &tuning.spawn;

    let kind = if rng.random::<f64>() < spawn.collectible_chance {
        ItemKind::Collectible
    } else {
        ItemKind::Hazard
    };
    let size = random_between(rng, spawn.size_range.0 as f64, spawn.size_range.1 as f64) as f32;

    // Keep the whole icon inside the arena
    let half = size / 2.0 + SPAWN_MARGIN;
    let x = random_between(rng, half as f64, (arena.width - half) as f64) as f32;

    let (fall_min, fall_max) = spawn.tier.fall_duration_range();
    let fall_duration_ms = random_between(rng, fall_min, fall_max)
        + random_between(rng, spawn.fall_jitter_ms.0, spawn.fall_jitter_ms.1);

    let id = state.next_entity_id();
    state.items.push(FallingItem {
        id,
        kind,
        x,
        size,
        spawned_at_ms: now_ms,
        fall_duration_ms,
        consumed: false,
    });
    id
}

/// Uniform draw in [min, max); degenerate ranges return `min`
fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}
