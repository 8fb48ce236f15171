//! Canvas 2D renderer
//!
//! Draws one frame from `GameState`. HUD text (target word, score, timer)
//! lives in DOM elements updated by the host; the canvas only shows the
//! play area.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::label::wrap_label;
use crate::css_color;
use crate::sim::{Bubble, GamePhase, GameState};

const LABEL_FONT: &str = "bold 22px 'Segoe UI', sans-serif";
const FLOAT_FONT: &str = "bold 32px 'Segoe UI', sans-serif";
const GOOD_COLOR: &str = "#00e676";
const BAD_COLOR: &str = "#ff4444";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    pub size: (f64, f64),
}

impl CanvasRenderer {
    /// Wrap a canvas; None if a 2D context is unavailable
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            size: (canvas.width() as f64, canvas.height() as f64),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = (width, height);
    }

    /// Draw the play area
    pub fn render(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.size.0, self.size.1);

        if state.phase == GamePhase::Idle {
            return;
        }

        for ring in &state.rings {
            ctx.save();
            ctx.set_global_alpha(ring.alpha.clamp(0.0, 1.0) as f64);
            ctx.begin_path();
            ctx.arc(ring.pos.x as f64, ring.pos.y as f64, ring.radius as f64, 0.0, TAU)
                .ok();
            ctx.set_stroke_style_str("#fff");
            ctx.set_line_width(3.0);
            ctx.stroke();
            ctx.restore();
        }

        for bubble in &state.bubbles {
            self.draw_bubble(bubble);
        }

        for p in &state.particles {
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(&css_color(p.color));
            ctx.begin_path();
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU).ok();
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);

        ctx.set_font(FLOAT_FONT);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for text in &state.floating_texts {
            ctx.set_global_alpha(text.alpha() as f64);
            ctx.set_fill_style_str(if text.delta >= 0 { GOOD_COLOR } else { BAD_COLOR });
            ctx.fill_text(&text.label(), text.pos.x as f64, text.pos.y as f64).ok();
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_bubble(&self, bubble: &Bubble) {
        let ctx = &self.ctx;
        let r = bubble.radius as f64;
        ctx.save();
        ctx.translate(bubble.pos.x as f64, bubble.pos.y as f64).ok();

        // Body
        ctx.begin_path();
        ctx.arc(0.0, 0.0, r, 0.0, TAU).ok();
        ctx.set_fill_style_str(&css_color(bubble.color));
        ctx.fill();

        // Glassy highlight
        ctx.begin_path();
        ctx.arc(-r / 3.0, -r / 3.0, r / 4.0, 0.0, TAU).ok();
        ctx.set_fill_style_str("rgba(255,255,255,0.2)");
        ctx.fill();

        // Rim
        ctx.begin_path();
        ctx.arc(0.0, 0.0, r, 0.0, TAU).ok();
        ctx.set_line_width(4.0);
        ctx.set_stroke_style_str("rgba(255,255,255,0.8)");
        ctx.stroke();

        // Label
        ctx.set_fill_style_str("#fff");
        ctx.set_font(LABEL_FONT);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_shadow_color("rgba(0,0,0,0.5)");
        ctx.set_shadow_blur(4.0);
        match wrap_label(&bubble.meaning).as_slice() {
            [line] => {
                ctx.fill_text(line, 0.0, 0.0).ok();
            }
            [first, second, ..] => {
                ctx.fill_text(first, 0.0, -10.0).ok();
                ctx.fill_text(second, 0.0, 15.0).ok();
            }
            [] => {}
        }
        ctx.restore();
    }
}
