//! Canvas 2D backend
//!
//! Paints a draw list onto an `HtmlCanvasElement`. Draw commands are in
//! arena units; one `set_transform` maps them onto the device-pixel
//! backing store.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::assets::Assets;
use super::scene::{DrawCmd, Rgba, css_rgba};
use crate::consts::HIT_RADIUS_FACTOR;
use crate::error::{GameError, Result};
use crate::platform::Viewport;

const FONT_FAMILY: &str = "system-ui, -apple-system, Segoe UI, Roboto, sans-serif";

pub struct CanvasBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasBackend {
    /// Look up `#id` and wrap its 2D context
    pub fn find(id: &str) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GameError::SurfaceUnavailable("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| GameError::SurfaceUnavailable(format!("no #{id} element")))?
            .dyn_into()
            .map_err(|_| GameError::SurfaceUnavailable(format!("#{id} is not a canvas")))?;
        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| GameError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| GameError::SurfaceUnavailable("2d context refused".into()))?
            .dyn_into()
            .map_err(|_| GameError::SurfaceUnavailable("not a 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Apply CSS size and backing store size
    pub fn resize(&self, viewport: &Viewport) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.css_width));
        let _ = style.set_property("height", &format!("{}px", viewport.css_height));
        self.canvas.set_width(viewport.pixel_width().max(1));
        self.canvas.set_height(viewport.pixel_height().max(1));
    }

    /// Paint `cmds`; `scale` is device pixels per arena unit
    pub fn draw(&self, cmds: &[DrawCmd], assets: &Assets<HtmlImageElement>, scale: f64) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0);
        for cmd in cmds {
            ctx.save();
            self.paint(cmd, assets);
            ctx.restore();
        }
    }

    fn paint(&self, cmd: &DrawCmd, assets: &Assets<HtmlImageElement>) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Background { size, top, bottom } => {
                let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, size.y as f64);
                let _ = gradient.add_color_stop(0.0, &css_rgba(*top));
                let _ = gradient.add_color_stop(1.0, &css_rgba(*bottom));
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
            }
            DrawCmd::Star { center, radius, color } => {
                self.fill_circle(center.x as f64, center.y as f64, *radius as f64, *color);
            }
            DrawCmd::Frame {
                origin,
                size,
                radius,
                color,
                line_width,
            } => {
                self.round_rect_path(
                    origin.x as f64,
                    origin.y as f64,
                    size.x as f64,
                    size.y as f64,
                    *radius as f64,
                );
                ctx.set_stroke_style_str(&css_rgba(*color));
                ctx.set_line_width(*line_width as f64);
                ctx.stroke();
            }
            DrawCmd::Floor {
                y,
                x0,
                x1,
                color,
                line_width,
                glow,
                glow_rect,
                glow_ramp,
            } => {
                let (y, x0, x1) = (*y as f64, *x0 as f64, *x1 as f64);
                let gradient =
                    ctx.create_linear_gradient(0.0, glow_ramp.0 as f64, 0.0, glow_ramp.1 as f64);
                let _ = gradient.add_color_stop(0.0, &css_rgba([glow[0], glow[1], glow[2], 0.0]));
                let _ = gradient.add_color_stop(1.0, &css_rgba(*glow));
                ctx.set_fill_style_canvas_gradient(&gradient);
                let (top, bottom) = (glow_rect.0 as f64, glow_rect.1 as f64);
                ctx.fill_rect(x0, top, x1 - x0, bottom - top);

                ctx.begin_path();
                ctx.move_to(x0, y);
                ctx.line_to(x1, y);
                ctx.set_stroke_style_str(&css_rgba(*color));
                ctx.set_line_width(*line_width as f64);
                ctx.stroke();
            }
            DrawCmd::Glow { center, radius, color } => {
                self.fill_circle(center.x as f64, center.y as f64, *radius as f64, *color);
            }
            DrawCmd::Item {
                kind,
                center,
                size,
                fallback,
            } => {
                let (cx, cy, s) = (center.x as f64, center.y as f64, *size as f64);
                let drawn = assets.icon(*kind).is_some_and(|img| {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        cx - s / 2.0,
                        cy - s / 2.0,
                        s,
                        s,
                    )
                    .is_ok()
                });
                if !drawn {
                    self.fill_circle(cx, cy, s * HIT_RADIUS_FACTOR as f64, *fallback);
                }
            }
            DrawCmd::Tint { color, alpha } => {
                ctx.set_global_alpha(*alpha as f64);
                ctx.set_fill_style_str(&css_rgba(*color));
                let w = self.canvas.width() as f64;
                let h = self.canvas.height() as f64;
                // Cover the whole backing store regardless of transform
                let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
                ctx.fill_rect(0.0, 0.0, w, h);
            }
            DrawCmd::Text {
                text,
                position,
                px,
                weight,
                color,
                outline,
                alpha,
            } => {
                ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
                ctx.set_font(&format!("{weight} {px}px {FONT_FAMILY}"));
                // Positions are alphabetic baselines
                ctx.set_text_align("center");
                let (x, y) = (position.x as f64, position.y as f64);
                if let Some(outline) = outline {
                    ctx.set_line_width(4.0);
                    ctx.set_stroke_style_str(&css_rgba(*outline));
                    let _ = ctx.stroke_text(text, x, y);
                }
                ctx.set_fill_style_str(&css_rgba(*color));
                let _ = ctx.fill_text(text, x, y);
            }
        }
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64, color: Rgba) {
        let ctx = &self.ctx;
        ctx.begin_path();
        let _ = ctx.arc(x, y, r, 0.0, TAU);
        ctx.set_fill_style_str(&css_rgba(color));
        ctx.fill();
    }

    fn round_rect_path(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
        let ctx = &self.ctx;
        let r = r.min(w / 2.0).min(h / 2.0);
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = ctx.arc_to(x, y + h, x, y, r);
        let _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
    }
}
