use super::{fill_ellipse, fill_polygon, fill_rect, paint_unique, Ink};
use crate::canvas::PixelBuffer;
use crate::geometry::Point;

/// One-pixel Bresenham line, endpoints inclusive.
pub fn draw_line(buffer: &mut PixelBuffer, x0: i32, y0: i32, x1: i32, y1: i32, ink: Ink) {
    paint_unique(buffer, line_pixels(x0, y0, x1, y1, buffer), ink);
}

fn line_pixels(x0: i32, y0: i32, x1: i32, y1: i32, buffer: &PixelBuffer) -> Vec<(i32, i32)> {
    let Some(((mut x, mut y), (x1, y1))) = clip_segment(buffer, x0, y0, x1, y1) else {
        return Vec::new();
    };
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut pixels = Vec::new();
    loop {
        if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
            if buffer.contains(px, py) {
                pixels.push((px, py));
            }
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    pixels
}

/// Liang-Barsky clip of a segment against the raster. Endpoints already on
/// the raster are kept exactly; clipped ones snap to the nearest texel.
fn clip_segment(
    buffer: &PixelBuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
) -> Option<((i64, i64), (i64, i64))> {
    let exact = ((i64::from(x0), i64::from(y0)), (i64::from(x1), i64::from(y1)));
    if buffer.contains(x0, y0) && buffer.contains(x1, y1) {
        return Some(exact);
    }

    let (fx, fy) = (f64::from(x0), f64::from(y0));
    let dx = f64::from(x1) - fx;
    let dy = f64::from(y1) - fy;
    let max_x = f64::from(buffer.width()) - 1.0;
    let max_y = f64::from(buffer.height()) - 1.0;

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, fx), (dx, max_x - fx), (-dy, fy), (dy, max_y - fy)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let snap = |t: f64| {
        let x = (fx + t * dx).round().clamp(0.0, max_x) as i64;
        let y = (fy + t * dy).round().clamp(0.0, max_y) as i64;
        (x, y)
    };
    let start = if t0 == 0.0 { exact.0 } else { snap(t0) };
    let end = if t1 == 1.0 { exact.1 } else { snap(t1) };
    Some((start, end))
}

/// Thick segment with flat caps.
///
/// The quadrilateral is built by offsetting both endpoints by
/// `(thickness * sin(angle), thickness * cos(angle))` where
/// `angle = atan2(y1 - y2, x1 - x2)`. A thickness of 1 falls back to
/// [`draw_line`]; a zero-length segment stamps a disc of diameter `thickness`.
pub fn stroke_thick_line(
    buffer: &mut PixelBuffer,
    from: Point,
    to: Point,
    ink: Ink,
    thickness: u32,
) {
    let (x1, y1) = from.rounded();
    let (x2, y2) = to.rounded();
    if thickness <= 1 {
        draw_line(buffer, x1, y1, x2, y2, ink);
        return;
    }
    if (x1, y1) == (x2, y2) {
        let radius = i32::try_from(thickness / 2).unwrap_or(i32::MAX);
        fill_ellipse(buffer, x1, y1, radius, radius, ink);
        return;
    }

    let thickness = f64::from(thickness);
    let angle = (from.y - to.y).atan2(from.x - to.x);
    let dist_x = thickness * angle.sin();
    let dist_y = thickness * angle.cos();

    fill_polygon(
        buffer,
        &[
            Point::new(from.x + dist_x, from.y + dist_y),
            Point::new(to.x + dist_x, to.y + dist_y),
            Point::new(to.x - dist_x, to.y - dist_y),
            Point::new(from.x - dist_x, from.y - dist_y),
        ],
        ink,
    );
}

/// Square-tipped brush segment of side `size`.
///
/// A zero-length segment stamps a `size` x `size` square centred on the point.
pub fn stroke_square(buffer: &mut PixelBuffer, from: Point, to: Point, ink: Ink, size: u32) {
    let half = f64::from(size.max(1)) / 2.0;
    if from.rounded() == to.rounded() {
        let top_left = Point::new(from.x - half, from.y - half).rounded();
        let bottom_right = Point::new(from.x + half, from.y + half).rounded();
        fill_rect(
            buffer,
            top_left.0,
            top_left.1,
            bottom_right.0,
            bottom_right.1,
            ink,
        );
        return;
    }

    let angle = (to.y - from.y).atan2(to.x - from.x);
    let dx = half * angle.sin();
    let dy = half * angle.cos();

    fill_polygon(
        buffer,
        &[
            Point::new(from.x - dx, from.y + dy),
            Point::new(from.x + dx, from.y - dy),
            Point::new(to.x + dx, to.y - dy),
            Point::new(to.x - dx, to.y + dy),
        ],
        ink,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;
    use crate::raster::count_color;

    fn canvas(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(width, height, Color::WHITE).unwrap()
    }

    #[test]
    fn bresenham_covers_both_endpoints() {
        let mut buffer = canvas(10, 10);
        draw_line(&mut buffer, 1, 1, 8, 4, Ink::over(Color::BLACK));
        assert_eq!(buffer.get(1, 1), Some(Color::BLACK));
        assert_eq!(buffer.get(8, 4), Some(Color::BLACK));
        assert_eq!(count_color(&buffer, Color::BLACK), 8);
    }

    #[test]
    fn bresenham_clips_offscreen_segments() {
        let mut buffer = canvas(5, 5);
        draw_line(&mut buffer, -10, 2, 20, 2, Ink::over(Color::BLACK));
        assert_eq!(count_color(&buffer, Color::BLACK), 5);
    }

    #[test]
    fn far_off_endpoints_are_clipped_before_walking() {
        let mut buffer = canvas(12, 10);
        draw_line(&mut buffer, 5, -20_000_000, 5, 20_000_000, Ink::over(Color::BLACK));
        assert_eq!(count_color(&buffer, Color::BLACK), 10);
        assert_eq!(buffer.get(5, 0), Some(Color::BLACK));
        assert_eq!(buffer.get(5, 9), Some(Color::BLACK));

        let mut diagonal = canvas(12, 10);
        let (near, far) = (-i32::MAX, i32::MAX);
        draw_line(&mut diagonal, near, near, far, far, Ink::over(Color::BLACK));
        assert_eq!(diagonal.get(0, 0), Some(Color::BLACK));
        assert_eq!(diagonal.get(9, 9), Some(Color::BLACK));
        assert_eq!(count_color(&diagonal, Color::BLACK), 10);
    }

    #[test]
    fn segments_missing_the_raster_draw_nothing() {
        let mut buffer = canvas(10, 10);
        draw_line(&mut buffer, -500, -3, 500, -3, Ink::over(Color::BLACK));
        draw_line(&mut buffer, 20, -500, 20, 500, Ink::over(Color::BLACK));
        assert_eq!(buffer, canvas(10, 10));
    }

    #[test]
    fn thin_thick_line_matches_bresenham() {
        let mut thick = canvas(10, 10);
        let mut thin = canvas(10, 10);
        stroke_thick_line(
            &mut thick,
            Point::new(0.0, 0.0),
            Point::new(9.0, 6.0),
            Ink::over(Color::BLACK),
            1,
        );
        draw_line(&mut thin, 0, 0, 9, 6, Ink::over(Color::BLACK));
        assert_eq!(thick, thin);
    }

    #[test]
    fn horizontal_thick_line_spans_twice_the_thickness() {
        let mut buffer = canvas(40, 40);
        stroke_thick_line(
            &mut buffer,
            Point::new(5.0, 20.0),
            Point::new(30.0, 20.0),
            Ink::over(Color::BLACK),
            3,
        );
        assert_eq!(buffer.get(15, 20), Some(Color::BLACK));
        assert_eq!(buffer.get(15, 18), Some(Color::BLACK));
        assert_eq!(buffer.get(15, 22), Some(Color::BLACK));
        assert_eq!(buffer.get(15, 25), Some(Color::WHITE));
        assert_eq!(buffer.get(2, 20), Some(Color::WHITE));
        assert_eq!(buffer.get(33, 20), Some(Color::WHITE));
    }

    #[test]
    fn zero_length_eraser_stroke_clears_a_small_blob() {
        let mut buffer = canvas(20, 20);
        stroke_thick_line(
            &mut buffer,
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Ink::clear(),
            5,
        );
        assert_eq!(buffer.get(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(buffer.get(2, 0), Some(Color::TRANSPARENT));
        assert_eq!(buffer.get(0, 2), Some(Color::TRANSPARENT));
        assert_eq!(buffer.get(4, 4), Some(Color::WHITE));
        assert_eq!(buffer.get(10, 10), Some(Color::WHITE));
        let cleared = count_color(&buffer, Color::TRANSPARENT);
        assert!((4..=25).contains(&cleared), "cleared {cleared} texels");
    }

    #[test]
    fn square_brush_stamps_square_for_a_dot() {
        let mut buffer = canvas(20, 20);
        stroke_square(
            &mut buffer,
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
            Ink::over(Color::BLACK),
            4,
        );
        assert_eq!(buffer.get(8, 8), Some(Color::BLACK));
        assert_eq!(buffer.get(12, 12), Some(Color::BLACK));
        assert_eq!(buffer.get(13, 10), Some(Color::WHITE));
        assert_eq!(count_color(&buffer, Color::BLACK), 25);
    }

    #[test]
    fn square_brush_segment_has_half_size_offset() {
        let mut buffer = canvas(30, 30);
        stroke_square(
            &mut buffer,
            Point::new(5.0, 15.0),
            Point::new(25.0, 15.0),
            Ink::over(Color::BLACK),
            6,
        );
        assert_eq!(buffer.get(15, 13), Some(Color::BLACK));
        assert_eq!(buffer.get(15, 17), Some(Color::BLACK));
        assert_eq!(buffer.get(15, 19), Some(Color::WHITE));
    }
}
