//! Draw list generation
//!
//! Turns a simulation `Frame` into a flat list of backend-agnostic draw
//! commands in arena units. Backends only have to know how to paint each
//! command; layout and styling decisions all live here.

use glam::Vec2;

use crate::Arena;
use crate::consts::*;
use crate::session::SessionStatus;
use crate::sim::{Frame, ItemKind, TextCategory};

/// RGBA color, components in 0-1
pub type Rgba = [f32; 4];

const BG_TOP: Rgba = [8.0 / 255.0, 10.0 / 255.0, 18.0 / 255.0, 1.0];
const BG_BOTTOM: Rgba = [14.0 / 255.0, 18.0 / 255.0, 32.0 / 255.0, 1.0];
const STAR: Rgba = [160.0 / 255.0, 190.0 / 255.0, 1.0, 1.0];
const FRAME_STROKE: Rgba = [120.0 / 255.0, 150.0 / 255.0, 1.0, 0.22];
const FLOOR: Rgba = [140.0 / 255.0, 170.0 / 255.0, 1.0, 0.16];
const FLOOR_GLOW: Rgba = [140.0 / 255.0, 170.0 / 255.0, 1.0, 0.14];
const COIN: Rgba = [1.0, 204.0 / 255.0, 60.0 / 255.0, 0.85];
const BOMB: Rgba = [1.0, 70.0 / 255.0, 70.0 / 255.0, 0.85];
const DANGER: Rgba = [1.0, 40.0 / 255.0, 40.0 / 255.0, 1.0];
const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
const GOOD_TEXT: Rgba = [1.0, 215.0 / 255.0, 80.0 / 255.0, 1.0];
const BAD_TEXT: Rgba = [1.0, 110.0 / 255.0, 110.0 / 255.0, 1.0];
const TEXT_OUTLINE: Rgba = [0.0, 0.0, 0.0, 0.45];

/// Inset of the rounded arena frame
const FRAME_INSET: f32 = 10.0;
const FRAME_RADIUS: f32 = 18.0;
/// Inset of the floor guide from the arena sides
const FLOOR_INSET: f32 = 18.0;
/// Arena area per background star
const STAR_DENSITY: f32 = 22000.0;

/// Base size of floating score text (px before scale)
const FLOATING_TEXT_PX: f32 = 18.0;

/// A single paint operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Vertical gradient over the whole arena
    Background { size: Vec2, top: Rgba, bottom: Rgba },
    Star { center: Vec2, radius: f32, color: Rgba },
    /// Rounded rectangle outline
    Frame { origin: Vec2, size: Vec2, radius: f32, color: Rgba, line_width: f32 },
    /// Floor line over a soft glow band. `glow_rect` is the filled y-span,
    /// `glow_ramp` the y-span the gradient runs over (transparent to `glow`).
    Floor {
        y: f32,
        x0: f32,
        x1: f32,
        color: Rgba,
        line_width: f32,
        glow: Rgba,
        glow_rect: (f32, f32),
        glow_ramp: (f32, f32),
    },
    /// Soft halo behind an item
    Glow { center: Vec2, radius: f32, color: Rgba },
    /// Item icon; backends fall back to `fallback` as a filled circle of
    /// radius `size * 0.45` when the image is missing
    Item { kind: ItemKind, center: Vec2, size: f32, fallback: Rgba },
    /// Full-arena translucent fill
    Tint { color: Rgba, alpha: f32 },
    Text {
        text: String,
        position: Vec2,
        px: f32,
        weight: u16,
        color: Rgba,
        outline: Option<Rgba>,
        alpha: f32,
    },
}

/// What the HUD knows about the session while drawing
#[derive(Debug, Clone, Copy)]
pub struct SceneInfo {
    pub status: SessionStatus,
    pub score: u32,
}

/// Build the full draw list for one frame, back to front
pub fn build_draw_list(frame: &Frame, arena: &Arena, info: SceneInfo) -> Vec<DrawCmd> {
    let w = arena.width;
    let h = arena.height;
    let mut cmds = Vec::with_capacity(64 + frame.items.len() * 2 + frame.texts.len());

    cmds.push(DrawCmd::Background {
        size: Vec2::new(w, h),
        top: BG_TOP,
        bottom: BG_BOTTOM,
    });
    push_stars(&mut cmds, w, h);

    cmds.push(DrawCmd::Frame {
        origin: Vec2::splat(FRAME_INSET),
        size: Vec2::new(w - FRAME_INSET * 2.0, h - FRAME_INSET * 2.0),
        radius: FRAME_RADIUS,
        color: FRAME_STROKE,
        line_width: 2.0,
    });
    let floor_y = arena.floor_y();
    cmds.push(DrawCmd::Floor {
        y: floor_y,
        x0: FLOOR_INSET,
        x1: w - FLOOR_INSET,
        color: FLOOR,
        line_width: 1.0,
        glow: FLOOR_GLOW,
        glow_rect: (floor_y - 18.0, floor_y + 22.0),
        glow_ramp: (floor_y - 16.0, floor_y + 26.0),
    });

    for item in &frame.items {
        let (glow, fallback) = match item.kind {
            ItemKind::Collectible => ([1.0, 204.0 / 255.0, 60.0 / 255.0, 0.09 * 0.7], COIN),
            ItemKind::Hazard => ([1.0, 70.0 / 255.0, 70.0 / 255.0, 0.08 * 0.7], BOMB),
        };
        cmds.push(DrawCmd::Glow {
            center: item.center,
            radius: item.size * 0.52,
            color: glow,
        });
        cmds.push(DrawCmd::Item {
            kind: item.kind,
            center: item.center,
            size: item.size,
            fallback,
        });
    }

    if frame.danger_overlay > 0.0 {
        cmds.push(DrawCmd::Tint {
            color: DANGER,
            alpha: frame.danger_overlay * OVERLAY_MAX_OPACITY,
        });
    }

    if info.status == SessionStatus::Ended {
        push_summary(&mut cmds, w, h, info.score);
    }

    for text in &frame.texts {
        let color = match text.category {
            TextCategory::Positive => GOOD_TEXT,
            TextCategory::Negative => BAD_TEXT,
        };
        cmds.push(DrawCmd::Text {
            text: text.text.clone(),
            position: text.position,
            px: (FLOATING_TEXT_PX * text.scale).floor(),
            weight: 800,
            color,
            outline: Some(TEXT_OUTLINE),
            alpha: text.alpha,
        });
    }

    cmds
}

/// Static starfield; positions depend only on the arena size
fn push_stars(cmds: &mut Vec<DrawCmd>, w: f32, h: f32) {
    let count = ((w * h) / STAR_DENSITY).floor() as u32;
    let (wi, hi) = (w.max(1.0) as u32, h.max(1.0) as u32);
    for i in 0..count {
        let x = (i * 97) % wi;
        let y = (i * 193) % hi;
        let radius = 1 + (i * 13) % 2;
        let alpha = 0.18 + ((i * 11) % 40) as f32 / 200.0;
        cmds.push(DrawCmd::Star {
            center: Vec2::new(x as f32, y as f32),
            radius: radius as f32,
            color: [STAR[0], STAR[1], STAR[2], alpha],
        });
    }
}

fn push_summary(cmds: &mut Vec<DrawCmd>, w: f32, h: f32, score: u32) {
    cmds.push(DrawCmd::Tint {
        color: BLACK,
        alpha: SUMMARY_OPACITY,
    });
    cmds.push(DrawCmd::Text {
        text: "Game Over".to_string(),
        position: Vec2::new(w / 2.0, h / 2.0 - 18.0),
        px: 28.0,
        weight: 700,
        color: [1.0, 1.0, 1.0, 0.92],
        outline: None,
        alpha: 1.0,
    });
    cmds.push(DrawCmd::Text {
        text: format!("Final score: {score}"),
        position: Vec2::new(w / 2.0, h / 2.0 + 12.0),
        px: 16.0,
        weight: 600,
        color: [1.0, 1.0, 1.0, 0.75],
        outline: None,
        alpha: 1.0,
    });
}

/// CSS color string for a canvas backend
pub fn css_rgba(color: Rgba) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}
