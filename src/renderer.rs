// Painter that handles the 2D canvas calls: clearing the surface each frame
// and drawing every particle as a short heading-aligned line with a round cap.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::color::Theme;
use crate::particle::Particle;

/// Opacity is life raised to this power, so particles hold their brightness
/// for most of their lifetime and drop off near the end.
const OPACITY_EXPONENT: f64 = 1.5;
/// Line length as a multiple of the particle's size.
const TAIL_SCALE: f64 = 3.0;

pub struct CanvasPainter {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    pub fn new(context: CanvasRenderingContext2d, width: f64, height: f64) -> CanvasPainter {
        CanvasPainter {
            context,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&self) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
    }

    /// Draw one frame's worth of particles in the theme's color.
    pub fn draw<'a, I>(&self, particles: I, theme: Theme) -> Result<(), JsValue>
    where
        I: Iterator<Item = &'a Particle>,
    {
        let color = theme.particle_color();
        let ctx = &self.context;
        ctx.set_line_cap("round");

        for p in particles {
            let opacity = p.life.max(0.0).powf(OPACITY_EXPONENT);
            let css = JsValue::from_str(&color.to_css_with_opacity(opacity));

            let tail = p.size * TAIL_SCALE;
            let head_x = p.pos[0];
            let head_y = p.pos[1];
            let tail_x = head_x - p.rotation.cos() * tail;
            let tail_y = head_y - p.rotation.sin() * tail;

            ctx.set_stroke_style(&css);
            ctx.set_line_width(p.size * 0.6);
            ctx.begin_path();
            ctx.move_to(tail_x, tail_y);
            ctx.line_to(head_x, head_y);
            ctx.stroke();

            ctx.set_fill_style(&css);
            ctx.begin_path();
            ctx.arc(head_x, head_y, p.size * 0.5, 0.0, std::f64::consts::PI * 2.0)?;
            ctx.fill();
        }
        Ok(())
    }
}
