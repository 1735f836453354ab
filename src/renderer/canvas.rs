//! Canvas 2D renderer
//!
//! Glassy bubbles with a radial highlight, gold ring when selected.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Renderer;
use crate::sim::{Entity, EntityKind, Indicator, IndicatorTone};

/// Bubble fill colours, picked by entity id
const BUBBLE_COLORS: [&str; 5] = [
    "rgba(99, 102, 241, 0.6)",  // Indigo
    "rgba(236, 72, 153, 0.6)",  // Pink
    "rgba(168, 85, 247, 0.6)",  // Purple
    "rgba(34, 197, 94, 0.6)",   // Green
    "rgba(59, 130, 246, 0.6)",  // Blue
];

const SELECTED: &str = "#fbbf24";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Device pixels per playfield unit
    scale: f64,
}

impl CanvasRenderer {
    /// Wrap a canvas. None if a 2D context is unavailable.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            scale: 1.0,
        })
    }

    /// Match the backing store to the CSS size; returns the playfield size
    pub fn resize(&mut self, dpr: f64) -> (f32, f32) {
        let w = self.canvas.client_width().max(1) as f64;
        let h = self.canvas.client_height().max(1) as f64;
        self.canvas.set_width((w * dpr) as u32);
        self.canvas.set_height((h * dpr) as u32);
        self.scale = dpr;
        (w as f32, h as f32)
    }

    fn fill_color(entity: &Entity) -> &'static str {
        match entity.kind {
            EntityKind::Number(_) => BUBBLE_COLORS[entity.id as usize % BUBBLE_COLORS.len()],
            EntityKind::TimeBonus => "rgba(56, 189, 248, 0.75)",
            EntityKind::Star => "rgba(250, 204, 21, 0.8)",
            EntityKind::Bomb => "rgba(30, 30, 30, 0.9)",
        }
    }

    fn label(entity: &Entity) -> String {
        match entity.kind {
            EntityKind::Number(v) => v.to_string(),
            EntityKind::TimeBonus => "⏱".to_string(),
            EntityKind::Star => "★".to_string(),
            EntityKind::Bomb => "💣".to_string(),
        }
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0);
        ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64 / self.scale,
            self.canvas.height() as f64 / self.scale,
        );
    }

    fn draw_entity(&mut self, e: &Entity) {
        let ctx = &self.ctx;
        let (x, y, r) = (e.pos.x as f64, e.pos.y as f64, e.radius as f64);

        ctx.save();
        ctx.set_global_alpha(e.opacity.max(0.0) as f64);

        // Shadow/Glow
        ctx.set_shadow_blur(15.0);
        ctx.set_shadow_color(if e.selected {
            SELECTED
        } else {
            "rgba(255, 255, 255, 0.2)"
        });

        // Inner gradient
        let highlight = (x - r / 3.0, y - r / 3.0);
        if let Ok(gradient) =
            ctx.create_radial_gradient(highlight.0, highlight.1, r / 10.0, x, y, r)
        {
            let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.4)");
            let _ = gradient.add_color_stop(1.0, Self::fill_color(e));
            ctx.set_fill_style_canvas_gradient(&gradient);
        }

        ctx.begin_path();
        let _ = ctx.arc(x, y, r * e.pop_scale as f64, 0.0, std::f64::consts::TAU);
        ctx.fill();

        ctx.set_stroke_style_str(if e.selected {
            SELECTED
        } else {
            "rgba(255, 255, 255, 0.8)"
        });
        ctx.set_line_width(if e.selected { 4.0 } else { 2.0 });
        ctx.stroke();

        ctx.set_fill_style_str("white");
        ctx.set_font(&format!("bold {}px Outfit, sans-serif", (r * 0.8).round()));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(&Self::label(e), x, y);

        ctx.restore();
    }

    fn draw_indicator(&mut self, indicator: &Indicator) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(indicator.life.clamp(0.0, 1.0) as f64);
        ctx.set_fill_style_str(match indicator.tone {
            IndicatorTone::Good => "#4ade80",
            IndicatorTone::Bad => "#f87171",
            IndicatorTone::Bonus => SELECTED,
        });
        ctx.set_font("bold 28px Outfit, sans-serif");
        ctx.set_text_align("center");
        let _ = ctx.fill_text(
            &indicator.text,
            indicator.pos.x as f64,
            indicator.pos.y as f64,
        );
        ctx.restore();
    }
}
