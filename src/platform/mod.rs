//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame clock and wall clock
//! - Canvas sizing for the window and device pixel ratio
//! - Mapping pointer positions into arena coordinates

use glam::Vec2;

use crate::Arena;

/// Share of the window width the canvas may use
const MAX_WIDTH_FRACTION: f64 = 0.96;
/// Share of the window height the canvas may use (leaves room for the HUD)
const MAX_HEIGHT_FRACTION: f64 = 0.62;

/// Clamp a reported device pixel ratio to [1, 2]
pub fn clamp_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() { dpr.clamp(1.0, 2.0) } else { 1.0 }
}

/// Canvas size in CSS pixels plus the backing store scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_width: u32,
    pub css_height: u32,
    pub dpr: f64,
}

impl Viewport {
    /// Largest aspect-locked canvas that fits the window
    pub fn fit(window_width: f64, window_height: f64, dpr: f64, arena: &Arena) -> Self {
        let aspect = arena.height as f64 / arena.width as f64;
        let max_w = (arena.width as f64).min((window_width * MAX_WIDTH_FRACTION).floor());
        let max_h = (window_height * MAX_HEIGHT_FRACTION).floor();

        let mut css_w = max_w.max(1.0);
        let mut css_h = (css_w * aspect).floor();
        if css_h > max_h {
            css_h = max_h.max(1.0);
            css_w = (css_h / aspect).floor();
        }

        Self {
            css_width: css_w as u32,
            css_height: css_h as u32,
            dpr: clamp_dpr(dpr),
        }
    }

    /// Backing store width in device pixels
    pub fn pixel_width(&self) -> u32 {
        (self.css_width as f64 * self.dpr).floor() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.css_height as f64 * self.dpr).floor() as u32
    }

    /// Device pixels per arena unit
    pub fn arena_scale(&self, arena: &Arena) -> f64 {
        self.pixel_width() as f64 / arena.width as f64
    }

    /// Convert a position relative to the canvas' top-left (CSS px) into arena units
    pub fn to_arena(&self, css_x: f64, css_y: f64, arena: &Arena) -> Vec2 {
        let sx = arena.width as f64 / self.css_width.max(1) as f64;
        let sy = arena.height as f64 / self.css_height.max(1) as f64;
        Vec2::new((css_x * sx) as f32, (css_y * sy) as f32)
    }
}

/// Monotonic frame clock (ms)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Wall clock (ms since the Unix epoch)
#[cfg(target_arch = "wasm32")]
pub fn wall_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn wall_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
