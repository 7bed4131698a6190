use super::{paint_span, paint_unique, Ink};
use crate::canvas::PixelBuffer;
use crate::geometry::Point;

/// Filled axis-aligned rectangle between two inclusive corners.
pub fn fill_rect(buffer: &mut PixelBuffer, x1: i32, y1: i32, x2: i32, y2: i32, ink: Ink) {
    let (left, right) = (x1.min(x2), x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));
    let last_row = last_index(buffer.height());
    for y in top.max(0)..=bottom.min(last_row) {
        paint_span(buffer, left, right, y, ink);
    }
}

/// One-pixel rectangle outline between two inclusive corners.
pub fn stroke_rect(buffer: &mut PixelBuffer, x1: i32, y1: i32, x2: i32, y2: i32, ink: Ink) {
    stroke_thick_rect(buffer, x1, y1, x2, y2, ink, 1);
}

/// `thickness` nested outlines, each inset by one pixel from the previous.
pub fn stroke_thick_rect(
    buffer: &mut PixelBuffer,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    ink: Ink,
    thickness: u32,
) {
    let (left, right) = (i64::from(x1.min(x2)), i64::from(x1.max(x2)));
    let (top, bottom) = (i64::from(y1.min(y2)), i64::from(y1.max(y2)));

    let mut pixels = Vec::new();
    for inset in 0..i64::from(thickness) {
        let (l, r, t, b) = (left + inset, right - inset, top + inset, bottom - inset);
        if l > r || t > b {
            break;
        }
        collect_rect_outline(buffer, l, t, r, b, &mut pixels);
    }
    paint_unique(buffer, pixels, ink);
}

fn collect_rect_outline(
    buffer: &PixelBuffer,
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    pixels: &mut Vec<(i32, i32)>,
) {
    let max_x = i64::from(buffer.width()) - 1;
    let max_y = i64::from(buffer.height()) - 1;

    for y in [top, bottom] {
        if (0..=max_y).contains(&y) {
            for x in left.max(0)..=right.min(max_x) {
                push_pixel(pixels, x, y);
            }
        }
    }
    for x in [left, right] {
        if (0..=max_x).contains(&x) {
            for y in top.max(0)..=bottom.min(max_y) {
                push_pixel(pixels, x, y);
            }
        }
    }
}

/// One-pixel midpoint circle outline. A negative radius draws nothing.
pub fn stroke_circle(buffer: &mut PixelBuffer, cx: i32, cy: i32, radius: i32, ink: Ink) {
    stroke_thick_circle(buffer, cx, cy, radius, ink, 1);
}

/// `thickness` nested circle outlines, the radius shrinking by one each time.
pub fn stroke_thick_circle(
    buffer: &mut PixelBuffer,
    cx: i32,
    cy: i32,
    radius: i32,
    ink: Ink,
    thickness: u32,
) {
    let mut pixels = Vec::new();
    for inset in 0..i64::from(thickness) {
        let ring = i64::from(radius) - inset;
        if ring < 0 {
            break;
        }
        collect_circle(buffer, i64::from(cx), i64::from(cy), ring, &mut pixels);
    }
    paint_unique(buffer, pixels, ink);
}

// Midpoint circle limited to the rows and columns the raster can show. For
// the minor offset `y` the incremental midpoint walk settles on the largest
// `x` with `x * (x - 1) + y * y < r * r`, so each visible offset is solved
// directly instead of walking the whole octant.
fn collect_circle(
    buffer: &PixelBuffer,
    cx: i64,
    cy: i64,
    radius: i64,
    pixels: &mut Vec<(i32, i32)>,
) {
    let max_x = i64::from(buffer.width()) - 1;
    let max_y = i64::from(buffer.height()) - 1;
    let mut push = |px: i64, py: i64| {
        if (0..=max_x).contains(&px) && (0..=max_y).contains(&py) {
            push_pixel(pixels, px, py);
        }
    };
    if radius == 0 {
        push(cx, cy);
        return;
    }

    // Rows `cy ± y` hold `(cx ± x, cy ± y)`; columns `cx ± y` hold `(cx ± y, cy ± x)`.
    for y in visible_offsets(cy, max_y) {
        if let Some(x) = octant_offset(radius, y) {
            push(cx + x, cy + y);
            push(cx - x, cy + y);
            push(cx + x, cy - y);
            push(cx - x, cy - y);
        }
    }
    for y in visible_offsets(cx, max_x) {
        if let Some(x) = octant_offset(radius, y) {
            push(cx + y, cy + x);
            push(cx - y, cy + x);
            push(cx + y, cy - x);
            push(cx - y, cy - x);
        }
    }
}

/// Offsets `d >= 0` for which `centre + d` or `centre - d` lies in `0..=max`.
fn visible_offsets(centre: i64, max: i64) -> impl Iterator<Item = i64> {
    let forward = (-centre).max(0)..=(max - centre);
    let backward = (centre - max).max(0)..=centre;
    forward.chain(backward)
}

/// Major offset of the first octant at minor offset `y`, or `None` once the
/// octant has ended.
fn octant_offset(radius: i64, y: i64) -> Option<i64> {
    if y > radius {
        return None;
    }
    let bound = i128::from(radius).pow(2) - i128::from(y).pow(2);
    let inside = |x: i64| i128::from(x) * (i128::from(x) - 1) < bound;

    let estimate = (0.5 + (0.25 + bound as f64).sqrt()) as i64;
    let mut x = estimate.clamp(0, radius);
    while x > 0 && !inside(x) {
        x -= 1;
    }
    while x < radius && inside(x + 1) {
        x += 1;
    }
    (inside(x) && x >= y).then_some(x)
}

/// Filled axis-aligned ellipse with radii `rx` and `ry`.
pub fn fill_ellipse(buffer: &mut PixelBuffer, cx: i32, cy: i32, rx: i32, ry: i32, ink: Ink) {
    if rx < 0 || ry < 0 {
        return;
    }
    let last_row = i64::from(last_index(buffer.height()));
    let (cx, cy, rx, ry) = (i64::from(cx), i64::from(cy), i64::from(rx), i64::from(ry));
    let first = (cy - ry).max(0);
    let last = (cy + ry).min(last_row);

    for row in first..=last {
        let dy = row - cy;
        let half = if ry == 0 {
            rx
        } else {
            let t = dy as f64 / ry as f64;
            (rx as f64 * (1.0 - t * t).max(0.0).sqrt()).round() as i64
        };
        paint_span(
            buffer,
            saturate(cx - half),
            saturate(cx + half),
            saturate(row),
            ink,
        );
    }
}

/// Even-odd scanline fill sampled at pixel centres.
pub fn fill_polygon(buffer: &mut PixelBuffer, vertices: &[Point], ink: Ink) {
    if vertices.len() < 3
        || vertices
            .iter()
            .any(|point| !point.x.is_finite() || !point.y.is_finite())
    {
        return;
    }

    let min_y = vertices.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = vertices.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let last_row = f64::from(last_index(buffer.height()));
    let first = (min_y - 0.5).ceil().max(0.0);
    let last = (max_y - 0.5).floor().min(last_row);
    if first > last {
        return;
    }

    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());
    for row in first as i32..=last as i32 {
        let center = f64::from(row) + 0.5;
        crossings.clear();
        for (index, start) in vertices.iter().enumerate() {
            let end = vertices[(index + 1) % vertices.len()];
            let crosses =
                (start.y <= center && end.y > center) || (end.y <= center && start.y > center);
            if crosses {
                let t = (center - start.y) / (end.y - start.y);
                crossings.push(start.x + t * (end.x - start.x));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let from = (pair[0] - 0.5).ceil();
            let to = (pair[1] - 0.5).floor();
            if from <= to {
                paint_span(buffer, saturate_f64(from), saturate_f64(to), row, ink);
            }
        }
    }
}

fn push_pixel(pixels: &mut Vec<(i32, i32)>, x: i64, y: i64) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        pixels.push((x, y));
    }
}

fn last_index(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX) - 1
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn saturate_f64(value: f64) -> i32 {
    value.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
