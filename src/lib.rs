//! Coin Rush - click the falling coin, avoid the bomb
//!
//! Core modules:
//! - `sim`: Falling-item simulation (spawn, fall, hit-test, easing)
//! - `session`: Countdown and score for a single play-through
//! - `game`: Per-session driver (tick entry point, loop cancellation, events)
//! - `tuning`: Data-driven spawn/scoring balance and difficulty tiers
//! - `renderer`: Backend-agnostic draw list plus the canvas backend
//! - `platform`: Clock and viewport helpers
//! - `persistence`: Key-value blob storage (LocalStorage on web)
//! - `settings`, `rooms`, `lobby`, `leaderboard`: application layer around the core

pub mod error;
pub mod game;
pub mod leaderboard;
pub mod lobby;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod rooms;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use game::{FrameStep, Game, GameEvent, LoopToken};
pub use session::{Session, SessionStatus};
pub use settings::PlayerConfig;
pub use tuning::{DifficultyTier, Tuning};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Logical arena size (render-space units)
    pub const ARENA_WIDTH: f32 = 980.0;
    pub const ARENA_HEIGHT: f32 = 540.0;
    /// Distance from the bottom edge to the visual floor
    pub const FLOOR_PAD: f32 = 46.0;
    /// Gap between a resting item and the floor line
    pub const FLOOR_CLEARANCE: f32 = 4.0;
    /// Horizontal margin kept free at both arena edges when spawning
    pub const SPAWN_MARGIN: f32 = 12.0;

    /// Frame delta used when there is no previous frame (ms)
    pub const FIRST_FRAME_DT_MS: f64 = 16.0;

    /// Danger overlay decays from 1 to 0 over this many ms
    pub const OVERLAY_DECAY_MS: f64 = 520.0;
    /// Opacity of the danger overlay at full intensity
    pub const OVERLAY_MAX_OPACITY: f32 = 0.42;
    /// Opacity of the end-of-session backdrop
    pub const SUMMARY_OPACITY: f32 = 0.72;

    /// Floating score text lifetime (ms)
    pub const FLOATING_TEXT_MS: f64 = 650.0;
    /// How far a floating text drifts up over its life
    pub const FLOATING_TEXT_RISE: f32 = 28.0;
    /// Extra scale a floating text starts with
    pub const FLOATING_TEXT_POP: f32 = 0.08;

    /// Hit circle radius as a fraction of item size
    pub const HIT_RADIUS_FACTOR: f32 = 0.45;

    /// Countdown sampling interval (ms)
    pub const COUNTDOWN_SAMPLE_MS: i32 = 200;
}

/// Logical arena the items fall through.
///
/// Fixed at 980x540 in normal play; the host scales it to device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub floor_pad: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: consts::ARENA_WIDTH,
            height: consts::ARENA_HEIGHT,
            floor_pad: consts::FLOOR_PAD,
        }
    }
}

impl Arena {
    /// Y coordinate of the floor guide line
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height - self.floor_pad
    }
}
