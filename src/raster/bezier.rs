use super::{stroke_thick_line, Ink};
use crate::canvas::PixelBuffer;
use crate::geometry::Point;

/// Number of straight segments a curve is flattened into.
pub const BEZIER_SEGMENTS: u32 = 100;

/// `C(n, k)` as an iterative product; zero when `k > n`.
pub fn binomial_coefficient(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * f64::from(n - k + i) / f64::from(i))
}

/// Bernstein evaluation of the curve defined by `points` at `t` (clamped to
/// `[0, 1]`). Returns `None` for an empty control polygon.
pub fn evaluate_bezier(points: &[Point], t: f64) -> Option<Point> {
    let degree = u32::try_from(points.len().checked_sub(1)?).ok()?;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let mut x = 0.0;
    let mut y = 0.0;
    for (j, point) in (0_u32..).zip(points) {
        let weight = binomial_coefficient(degree, j)
            * (1.0 - t).powi((degree - j) as i32)
            * t.powi(j as i32);
        x += weight * point.x;
        y += weight * point.y;
    }
    Some(Point::new(x, y))
}

/// Samples the curve at [`BEZIER_SEGMENTS`] steps and strokes each step as a
/// thick line starting from the first control point.
pub fn stroke_bezier(buffer: &mut PixelBuffer, points: &[Point], ink: Ink, thickness: u32) {
    let Some(&first) = points.first() else {
        return;
    };

    let mut previous = first;
    for step in 1..=BEZIER_SEGMENTS {
        let t = f64::from(step) / f64::from(BEZIER_SEGMENTS);
        let Some(next) = evaluate_bezier(points, t) else {
            return;
        };
        stroke_thick_line(buffer, previous, next, ink, thickness);
        previous = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn binomial_matches_pascal_triangle() {
        assert_eq!(binomial_coefficient(0, 0), 1.0);
        assert_eq!(binomial_coefficient(5, 2), 10.0);
        assert_eq!(binomial_coefficient(5, 5), 1.0);
        assert_eq!(binomial_coefficient(3, 4), 0.0);
        assert_eq!(binomial_coefficient(31, 15), 300_540_195.0);
    }

    #[test]
    fn curve_passes_through_end_points() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 40.0),
            Point::new(30.0, -5.0),
            Point::new(40.0, 10.0),
        ];
        assert!(close(evaluate_bezier(&points, 0.0).unwrap(), points[0]));
        assert!(close(evaluate_bezier(&points, 1.0).unwrap(), points[3]));
        assert!(close(evaluate_bezier(&points, 7.0).unwrap(), points[3]));
    }

    #[test]
    fn quadratic_midpoint_is_weighted_average() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            Point::new(20.0, 0.0),
        ];
        let mid = evaluate_bezier(&points, 0.5).unwrap();
        assert!(close(mid, Point::new(10.0, 10.0)), "got {mid:?}");
    }

    #[test]
    fn empty_control_polygon_has_no_value() {
        assert!(evaluate_bezier(&[], 0.5).is_none());
        let single = [Point::new(3.0, 4.0)];
        assert!(close(evaluate_bezier(&single, 0.3).unwrap(), single[0]));
    }

    #[test]
    fn stroked_curve_touches_both_ends() {
        let mut buffer = PixelBuffer::new(50, 50, Color::WHITE).unwrap();
        let points = [
            Point::new(5.0, 40.0),
            Point::new(25.0, 0.0),
            Point::new(45.0, 40.0),
        ];
        stroke_bezier(&mut buffer, &points, Ink::over(Color::BLACK), 1);
        assert_eq!(buffer.get(5, 40), Some(Color::BLACK));
        assert_eq!(buffer.get(45, 40), Some(Color::BLACK));
        assert_eq!(buffer.get(25, 20), Some(Color::BLACK));
        assert_eq!(buffer.get(25, 40), Some(Color::WHITE));
    }
}
