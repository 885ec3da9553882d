//! Frame encoding for transport.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};

use crate::error::MlResult;

/// JPEG quality used for frames sent to the model service.
pub const JPEG_QUALITY: u8 = 85;

/// Encode an RGB frame as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> MlResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)?;
    Ok(buffer)
}

/// Encode an RGB frame as base64 JPEG, ready for a JSON body.
pub fn encode_jpeg_base64(image: &RgbImage) -> MlResult<String> {
    let jpeg = encode_jpeg(image, JPEG_QUALITY)?;
    Ok(STANDARD.encode(jpeg))
}
