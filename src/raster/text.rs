use super::{paint_unique, Ink};
use crate::canvas::PixelBuffer;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SPACING: u32 = 1;

/// Rows of a 5x7 glyph, low five bits per row, bit 4 is the leftmost column.
fn glyph(ch: char) -> Option<[u8; 7]> {
    macro_rules! g {
        ($($row:expr),+ $(,)?) => {
            Some([$($row),+])
        };
    }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110),
        '1' => g!(0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        '2' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111),
        '3' => g!(0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110),
        '4' => g!(0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010),
        '5' => g!(0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110),
        '6' => g!(0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110),
        '7' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000),
        '8' => g!(0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110),
        '9' => g!(0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100),
        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'B' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110),
        'C' => g!(0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'F' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'J' => g!(0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'K' => g!(0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'M' => g!(0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001),
        'N' => g!(0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'P' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000),
        'Q' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'T' => g!(0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        'U' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        'X' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001),
        'Y' => g!(0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100),
        'Z' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111),
        ' ' => g!(0, 0, 0, 0, 0, 0, 0),
        '.' => g!(0, 0, 0, 0, 0, 0b01100, 0b01100),
        ',' => g!(0, 0, 0, 0, 0b01100, 0b00100, 0b01000),
        ':' => g!(0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0),
        '!' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100),
        '?' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100),
        '-' => g!(0, 0, 0, 0b11111, 0, 0, 0),
        '+' => g!(0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0),
        '=' => g!(0, 0, 0b11111, 0, 0b11111, 0, 0),
        '/' => g!(0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000),
        '\'' => g!(0b00100, 0b00100, 0b01000, 0, 0, 0, 0),
        '"' => g!(0b01010, 0b01010, 0, 0, 0, 0, 0),
        '(' => g!(0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010),
        ')' => g!(0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000),
        '#' => g!(0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010),
        '_' => g!(0, 0, 0, 0, 0, 0, 0b11111),
        '|' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        _ => None,
    }
}

/// Integer magnification for a requested font size in points.
fn scale_for(font_size: u32) -> u32 {
    (font_size / 8).max(1)
}

/// Horizontal advance of `text` in pixels, including the trailing spacing.
pub fn text_width(text: &str, font_size: u32) -> u32 {
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale_for(font_size);
    u32::try_from(text.chars().count())
        .unwrap_or(u32::MAX)
        .saturating_mul(advance)
}

/// Draws `text` with its top-left corner at `(x, y)`.
pub fn draw_text(buffer: &mut PixelBuffer, x: i32, y: i32, text: &str, ink: Ink, font_size: u32) {
    let scale = i64::from(scale_for(font_size));
    let advance = i64::from(GLYPH_WIDTH + GLYPH_SPACING) * scale;
    let (x, y) = (i64::from(x), i64::from(y));

    let mut pixels = Vec::new();
    for (index, ch) in (0_i64..).zip(text.chars()) {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let origin_x = x + index * advance;
        for (row, bits) in (0_i64..).zip(rows) {
            for column in 0..i64::from(GLYPH_WIDTH) {
                if bits & (1 << (GLYPH_WIDTH as i64 - 1 - column)) == 0 {
                    continue;
                }
                let block_x = origin_x + column * scale;
                let block_y = y + row * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (Ok(px), Ok(py)) =
                            (i32::try_from(block_x + dx), i32::try_from(block_y + dy))
                        else {
                            continue;
                        };
                        if buffer.contains(px, py) {
                            pixels.push((px, py));
                        }
                    }
                }
            }
        }
    }
    paint_unique(buffer, pixels, ink);
}
