//! Owned RGBA raster that every drawing operation mutates.

mod codec;

use image::{imageops, Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::Color;

pub use codec::{decode_base64_png, encode_base64_png};

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel data length {actual} does not match {width}x{height} RGBA ({expected})")]
    PixelLengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("failed to encode canvas as PNG: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to decode PNG image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type CanvasResult<T> = std::result::Result<T, CanvasError>;

/// Width x height straight-alpha RGBA texels in one contiguous row-major array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, fill: Color) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, Rgba(fill.channels())),
        })
    }

    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        let expected = raw_len(width, height);
        let actual = pixels.len();
        let mismatch = CanvasError::PixelLengthMismatch {
            width,
            height,
            expected,
            actual,
        };
        if actual != expected {
            return Err(mismatch);
        }
        let image = RgbaImage::from_raw(width, height, pixels).ok_or(mismatch)?;
        Ok(Self { image })
    }

    pub(crate) fn from_image(image: RgbaImage) -> CanvasResult<Self> {
        validate_dimensions(image.width(), image.height())?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.pixel_coords(x, y).is_some()
    }

    fn pixel_coords(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x < self.width() && y < self.height() {
            Some((x, y))
        } else {
            None
        }
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        let (x, y) = self.pixel_coords(x, y)?;
        Some(Color::from_channels(self.image.get_pixel(x, y).0))
    }

    /// Overwrites one texel; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some((x, y)) = self.pixel_coords(x, y) {
            self.image.put_pixel(x, y, Rgba(color.channels()));
        }
    }

    /// Source-over composite of `color` onto one texel; out-of-bounds writes are ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if color.a == u8::MAX {
            self.set(x, y, color);
            return;
        }
        if color.a == 0 {
            return;
        }
        if let Some((x, y)) = self.pixel_coords(x, y) {
            let pixel = self.image.get_pixel_mut(x, y);
            pixel.0 = source_over(color, Color::from_channels(pixel.0)).channels();
        }
    }

    pub fn fill(&mut self, color: Color) {
        let channels = color.channels();
        for pixel in self.image.pixels_mut() {
            pixel.0 = channels;
        }
    }

    /// Overwrites the clipped `width` x `height` block whose top-left corner is `(x, y)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let Some((left, top, right, bottom)) = self.clip_span(x, y, width, height) else {
            return;
        };
        let channels = color.channels();
        for row in top..bottom {
            for column in left..right {
                self.image.get_pixel_mut(column, row).0 = channels;
            }
        }
    }

    fn clip_span(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let left = i64::from(x).max(0);
        let top = i64::from(y).max(0);
        let right = (i64::from(x) + i64::from(width)).min(i64::from(self.width()));
        let bottom = (i64::from(y) + i64::from(height)).min(i64::from(self.height()));
        if right <= left || bottom <= top {
            return None;
        }
        Some((
            u32::try_from(left).ok()?,
            u32::try_from(top).ok()?,
            u32::try_from(right).ok()?,
            u32::try_from(bottom).ok()?,
        ))
    }

    /// Replaces this buffer's content with `other`'s, scaling into the current
    /// dimensions when they differ.
    pub fn copy_from(&mut self, other: &PixelBuffer) {
        if self.width() == other.width() && self.height() == other.height() {
            self.image.clone_from(&other.image);
            return;
        }
        self.image = scale_image(&other.image, self.width(), self.height());
    }

    /// New buffer holding this content resampled to `width` x `height`.
    pub fn resized(&self, width: u32, height: u32) -> CanvasResult<PixelBuffer> {
        validate_dimensions(width, height)?;
        if width == self.width() && height == self.height() {
            return Ok(self.clone());
        }
        Ok(Self {
            image: scale_image(&self.image, width, height),
        })
    }

    pub fn to_png(&self) -> CanvasResult<Vec<u8>> {
        codec::encode_png(&self.image)
    }

    pub fn from_png(bytes: &[u8]) -> CanvasResult<Self> {
        Self::from_image(codec::decode_png(bytes)?)
    }
}

fn scale_image(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(source, width, height, imageops::FilterType::Triangle)
}

fn validate_dimensions(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn raw_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

fn source_over(src: Color, dst: Color) -> Color {
    let src_a = f64::from(src.a) / 255.0;
    let dst_a = f64::from(dst.a) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }

    let mix = |s: u8, d: u8| -> u8 {
        let value = (f64::from(s) * src_a + f64::from(d) * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Color::new(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}
