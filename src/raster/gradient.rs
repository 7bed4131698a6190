use super::{fill_ellipse, paint_column, Ink};
use crate::canvas::PixelBuffer;
use crate::geometry::Color;

/// Column-wise gradient over the bounding box of the two corners: column `i`
/// gets `start.lerp(end, i / width)` and is painted top to bottom, clipped
/// to the buffer.
pub fn fill_linear_gradient(
    buffer: &mut PixelBuffer,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    start: Color,
    end: Color,
    opacity: u8,
) {
    let left = i64::from(x1.min(x2));
    let right = i64::from(x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));
    let width = right - left;

    // Columns outside the buffer are skipped, their ratio still counts.
    let first = left.max(0);
    let last = right.min(i64::from(buffer.width()) - 1);
    for x in first..=last {
        let ratio = if width == 0 {
            0.0
        } else {
            (x - left) as f64 / width as f64
        };
        let ink = Ink::over(start.lerp(end, ratio).with_opacity(opacity));
        paint_column(buffer, x as i32, top, bottom, ink);
    }
}

/// Concentric filled discs from `radius` down to 0, each colored with
/// `start.lerp(end, r / radius)`, so the rim gets `end` and the centre `start`.
pub fn fill_radial_gradient(
    buffer: &mut PixelBuffer,
    cx: i32,
    cy: i32,
    radius: i32,
    start: Color,
    end: Color,
    opacity: u8,
) {
    if radius < 0 {
        return;
    }

    // With opaque ink every disc larger than the smallest one covering the
    // whole buffer is painted over completely.
    let first = if opacity >= 100 {
        radius.min(covering_radius(buffer, cx, cy))
    } else {
        radius
    };
    if first < radius {
        tracing::trace!(radius, first, "skipping fully covered gradient rings");
    }

    for r in (0..=first).rev() {
        let ratio = if radius == 0 {
            0.0
        } else {
            f64::from(r) / f64::from(radius)
        };
        let ink = Ink::over(start.lerp(end, ratio).with_opacity(opacity));
        fill_ellipse(buffer, cx, cy, r, r, ink);
    }
}

/// Smallest radius whose disc is guaranteed to contain every texel.
fn covering_radius(buffer: &PixelBuffer, cx: i32, cy: i32) -> i32 {
    let far_x = f64::from(cx).abs().max((f64::from(buffer.width()) - 1.0 - f64::from(cx)).abs());
    let far_y = f64::from(cy).abs().max((f64::from(buffer.height()) - 1.0 - f64::from(cy)).abs());
    let reach = far_x.hypot(far_y).ceil() + 1.0;
    if reach >= f64::from(i32::MAX) {
        i32::MAX
    } else {
        reach as i32
    }
}
