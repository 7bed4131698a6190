//! Stateless rasterization routines shared by every drawing tool.
//!
//! Every routine takes the target [`PixelBuffer`] by mutable reference for the
//! duration of the call and clips against its bounds.

mod bezier;
mod fill;
mod gradient;
mod line;
mod shapes;
mod text;

use crate::canvas::PixelBuffer;
use crate::geometry::Color;

pub use bezier::{binomial_coefficient, evaluate_bezier, stroke_bezier, BEZIER_SEGMENTS};
pub use fill::{flood_fill, flood_region, FillOutcome, FillRegion};
pub use gradient::{fill_linear_gradient, fill_radial_gradient};
pub use line::{draw_line, stroke_square, stroke_thick_line};
pub use shapes::{
    fill_ellipse, fill_polygon, fill_rect, stroke_circle, stroke_rect, stroke_thick_circle,
    stroke_thick_rect,
};
pub use text::{draw_text, text_width, GLYPH_HEIGHT, GLYPH_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Composite over the existing texel.
    SourceOver,
    /// Overwrite the existing texel.
    Replace,
}

/// Color plus the way it is written into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub color: Color,
    pub blend: BlendMode,
}

impl Ink {
    pub const fn over(color: Color) -> Self {
        Self {
            color,
            blend: BlendMode::SourceOver,
        }
    }

    pub const fn replace(color: Color) -> Self {
        Self {
            color,
            blend: BlendMode::Replace,
        }
    }

    /// Writes fully transparent texels.
    pub const fn clear() -> Self {
        Self::replace(Color::TRANSPARENT)
    }
}

impl From<Color> for Ink {
    fn from(color: Color) -> Self {
        Self::over(color)
    }
}

pub(crate) fn paint(buffer: &mut PixelBuffer, x: i32, y: i32, ink: Ink) {
    match ink.blend {
        BlendMode::SourceOver => buffer.blend(x, y, ink.color),
        BlendMode::Replace => buffer.set(x, y, ink.color),
    }
}

/// Paints a horizontal run `[x_start, x_end]` on row `y`, clipped to the buffer.
pub(crate) fn paint_span(buffer: &mut PixelBuffer, x_start: i32, x_end: i32, y: i32, ink: Ink) {
    if y < 0 || i64::from(y) >= i64::from(buffer.height()) {
        return;
    }
    let max_x = i32::try_from(buffer.width()).unwrap_or(i32::MAX) - 1;
    let from = x_start.max(0);
    let to = x_end.min(max_x);
    for x in from..=to {
        paint(buffer, x, y, ink);
    }
}

/// Paints a vertical run `[y_start, y_end]` in column `x`, clipped to the buffer.
pub(crate) fn paint_column(buffer: &mut PixelBuffer, x: i32, y_start: i32, y_end: i32, ink: Ink) {
    if x < 0 || i64::from(x) >= i64::from(buffer.width()) {
        return;
    }
    let max_y = i32::try_from(buffer.height()).unwrap_or(i32::MAX) - 1;
    let from = y_start.min(y_end).max(0);
    let to = y_start.max(y_end).min(max_y);
    for y in from..=to {
        paint(buffer, x, y, ink);
    }
}

/// Paints a set of texels, each at most once, so translucent ink is not
/// composited twice where sub-primitives overlap.
pub(crate) fn paint_unique(buffer: &mut PixelBuffer, mut pixels: Vec<(i32, i32)>, ink: Ink) {
    pixels.sort_unstable_by_key(|&(x, y)| (y, x));
    pixels.dedup();
    for (x, y) in pixels {
        paint(buffer, x, y, ink);
    }
}

#[cfg(test)]
pub(crate) fn count_color(buffer: &PixelBuffer, color: Color) -> usize {
    buffer
        .as_raw()
        .chunks_exact(4)
        .filter(|px| *px == color.channels())
        .count()
}
