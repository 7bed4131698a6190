use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use super::{CanvasError, CanvasResult, PixelBuffer};

pub(super) fn encode_png(image: &RgbaImage) -> CanvasResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(CanvasError::Encode)?;
    Ok(bytes)
}

pub(super) fn decode_png(bytes: &[u8]) -> CanvasResult<RgbaImage> {
    let decoded =
        image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(CanvasError::Decode)?;
    Ok(decoded.into_rgba8())
}

/// PNG bytes of `buffer`, base64 encoded for JSON transport.
pub fn encode_base64_png(buffer: &PixelBuffer) -> CanvasResult<String> {
    Ok(general_purpose::STANDARD.encode(buffer.to_png()?))
}

pub fn decode_base64_png(payload: &str) -> CanvasResult<PixelBuffer> {
    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    PixelBuffer::from_png(&bytes)
}
