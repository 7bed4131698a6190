use crate::canvas::PixelBuffer;
use crate::geometry::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Filled { pixels: usize },
    /// The seed already matches the fill color within tolerance.
    AlreadyFilled,
    /// The seed lies outside the buffer.
    OutOfBounds,
}

/// 4-connected set of texels that matched the seed color when it was computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRegion {
    width: u32,
    height: u32,
    mask: Vec<bool>,
    len: usize,
}

impl FillRegion {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width as usize && y < self.height as usize => {
                self.mask[y * self.width as usize + x]
            }
            _ => false,
        }
    }

    /// Overwrites every texel of the region in `buffer` with `color` and
    /// returns how many were written. A buffer with other dimensions is left
    /// untouched.
    pub fn apply(&self, buffer: &mut PixelBuffer, color: Color) -> usize {
        if buffer.width() != self.width || buffer.height() != self.height {
            tracing::warn!(
                region_width = self.width,
                region_height = self.height,
                buffer_width = buffer.width(),
                buffer_height = buffer.height(),
                "fill region does not match buffer dimensions"
            );
            return 0;
        }

        let width = self.width as usize;
        for (index, _) in self.mask.iter().enumerate().filter(|(_, inside)| **inside) {
            let x = (index % width) as i32;
            let y = (index / width) as i32;
            buffer.set(x, y, color);
        }
        self.len
    }
}

/// Scanline flood fill from `(x, y)` replacing every 4-connected texel whose
/// channels each lie within `tolerance` of the seed color.
pub fn flood_fill(
    buffer: &mut PixelBuffer,
    x: i32,
    y: i32,
    fill: Color,
    tolerance: u8,
) -> FillOutcome {
    let Some(target) = buffer.get(x, y) else {
        return FillOutcome::OutOfBounds;
    };
    if fill.within_tolerance(target, tolerance) {
        return FillOutcome::AlreadyFilled;
    }

    match flood_region(buffer, x, y, tolerance) {
        Some(region) => FillOutcome::Filled {
            pixels: region.apply(buffer, fill),
        },
        None => FillOutcome::OutOfBounds,
    }
}

/// Computes the fill region without touching the buffer; `None` when the seed
/// is out of bounds.
pub fn flood_region(buffer: &PixelBuffer, x: i32, y: i32, tolerance: u8) -> Option<FillRegion> {
    let target = buffer.get(x, y)?;
    let seed_x = usize::try_from(x).ok()?;
    let seed_y = usize::try_from(y).ok()?;
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let raw = buffer.as_raw();

    let matches = |index: usize| -> bool {
        let offset = index * 4;
        let texel = Color::new(
            raw[offset],
            raw[offset + 1],
            raw[offset + 2],
            raw[offset + 3],
        );
        texel.within_tolerance(target, tolerance)
    };

    let mut mask = vec![false; width * height];
    let mut len = 0_usize;
    let mut seeds = vec![(seed_x, seed_y)];

    while let Some((sx, sy)) = seeds.pop() {
        let row = sy * width;
        if mask[row + sx] || !matches(row + sx) {
            continue;
        }

        let mut left = sx;
        while left > 0 && !mask[row + left - 1] && matches(row + left - 1) {
            left -= 1;
        }
        let mut right = sx;
        while right + 1 < width && !mask[row + right + 1] && matches(row + right + 1) {
            right += 1;
        }

        for column in left..=right {
            mask[row + column] = true;
        }
        len += right - left + 1;

        let neighbours = [sy.checked_sub(1), (sy + 1 < height).then_some(sy + 1)];
        for neighbour in neighbours.into_iter().flatten() {
            let neighbour_row = neighbour * width;
            let mut in_run = false;
            for column in left..=right {
                let index = neighbour_row + column;
                let open = !mask[index] && matches(index);
                if open && !in_run {
                    seeds.push((column, neighbour));
                }
                in_run = open;
            }
        }
    }

    Some(FillRegion {
        width: buffer.width(),
        height: buffer.height(),
        mask,
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::count_color;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn white(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(width, height, Color::WHITE).unwrap()
    }

    #[test]
    fn uniform_buffer_is_filled_completely() {
        let mut buffer = white(10, 10);
        let outcome = flood_fill(&mut buffer, 0, 0, RED, 0);
        assert_eq!(outcome, FillOutcome::Filled { pixels: 100 });
        assert_eq!(count_color(&buffer, RED), 100);
    }

    #[test]
    fn fill_stops_at_region_boundary() {
        let mut buffer = white(10, 10);
        buffer.fill_rect(0, 0, 5, 5, RED);

        let outcome = flood_fill(&mut buffer, 9, 9, BLUE, 0);
        assert_eq!(outcome, FillOutcome::Filled { pixels: 75 });
        assert_eq!(count_color(&buffer, RED), 25);
        assert_eq!(count_color(&buffer, BLUE), 75);
        assert_eq!(buffer.get(4, 4), Some(RED));
        assert_eq!(buffer.get(5, 0), Some(BLUE));
    }

    #[test]
    fn fill_is_four_connected() {
        let mut buffer = white(3, 3);
        buffer.set(1, 0, Color::BLACK);
        buffer.set(0, 1, Color::BLACK);
        flood_fill(&mut buffer, 0, 0, RED, 0);
        assert_eq!(count_color(&buffer, RED), 1);
    }

    #[test]
    fn fill_handles_concave_regions() {
        // A U-shaped wall forces seeds on both sides of the notch.
        let mut buffer = white(7, 7);
        for y in 1..6 {
            buffer.set(3, y, Color::BLACK);
        }
        flood_fill(&mut buffer, 0, 6, RED, 0);
        assert_eq!(count_color(&buffer, RED), 49 - 5);
    }

    #[test]
    fn fill_is_idempotent() {
        let mut once = white(8, 8);
        once.fill_rect(2, 2, 3, 3, Color::rgb(250, 250, 250));
        let mut twice = once.clone();

        flood_fill(&mut once, 0, 0, BLUE, 10);
        flood_fill(&mut twice, 0, 0, BLUE, 10);
        let second = flood_fill(&mut twice, 0, 0, BLUE, 10);

        assert_eq!(second, FillOutcome::AlreadyFilled);
        assert_eq!(once, twice);
    }

    #[test]
    fn matching_fill_color_is_a_no_op() {
        let mut buffer = white(6, 6);
        buffer.set(3, 3, Color::BLACK);
        let before = buffer.clone();

        assert_eq!(
            flood_fill(&mut buffer, 0, 0, Color::WHITE, 0),
            FillOutcome::AlreadyFilled
        );
        assert_eq!(
            flood_fill(&mut buffer, 0, 0, Color::rgb(250, 250, 250), 5),
            FillOutcome::AlreadyFilled
        );
        assert_eq!(buffer, before);
    }

    #[test]
    fn tolerance_is_per_channel() {
        let mut buffer = white(3, 1);
        buffer.set(1, 0, Color::rgb(245, 245, 245));
        buffer.set(2, 0, Color::rgb(255, 255, 200));

        flood_fill(&mut buffer, 0, 0, RED, 10);
        assert_eq!(buffer.get(1, 0), Some(RED));
        assert_eq!(buffer.get(2, 0), Some(Color::rgb(255, 255, 200)));
    }

    #[test]
    fn alpha_channel_participates_in_matching() {
        let mut buffer = PixelBuffer::new(2, 1, Color::TRANSPARENT).unwrap();
        buffer.set(1, 0, Color::new(0, 0, 0, 255));
        flood_fill(&mut buffer, 0, 0, RED, 0);
        assert_eq!(buffer.get(0, 0), Some(RED));
        assert_eq!(buffer.get(1, 0), Some(Color::BLACK));
    }

    #[test]
    fn out_of_bounds_seed_is_reported() {
        let mut buffer = white(4, 4);
        assert_eq!(flood_fill(&mut buffer, 4, 0, RED, 0), FillOutcome::OutOfBounds);
        assert_eq!(flood_fill(&mut buffer, -1, 0, RED, 0), FillOutcome::OutOfBounds);
        assert!(flood_region(&buffer, 0, 9, 0).is_none());
    }

    #[test]
    fn region_is_computed_against_the_reference_buffer() {
        let mut reference = white(4, 4);
        reference.fill_rect(2, 0, 2, 4, Color::BLACK);
        let region = flood_region(&reference, 0, 0, 0).expect("seed in bounds");
        assert_eq!(region.len(), 8);
        assert!(region.contains(1, 3));
        assert!(!region.contains(2, 3));

        let mut target = white(4, 4);
        assert_eq!(region.apply(&mut target, RED), 8);
        assert_eq!(target.get(2, 0), Some(Color::WHITE));

        let mut other = white(5, 4);
        assert_eq!(region.apply(&mut other, RED), 0);
        assert_eq!(count_color(&other, RED), 0);
    }
}
