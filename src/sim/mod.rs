//! Falling-item simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in as explicit timestamps, never read from a clock
//! - Randomness comes from an injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod easing;
pub mod hit;
pub mod state;
pub mod tick;

pub use easing::{clamp_unit, ease_in_out_cubic, lerp};
pub use hit::{HitOutcome, hit_test, hit_test_circle};
pub use state::{FallingItem, FloatingText, ItemKind, RuntimeState, TextCategory};
pub use tick::{
    Frame, FrameInput, PlacedItem, PlacedText, Placement, item_placement, place_item, place_text,
    spawn_item, tick,
};
