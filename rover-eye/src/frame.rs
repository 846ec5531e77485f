//! Encoded frame handling.
//!
//! Frames travel as base64 text, optionally wrapped in a data URL such as
//! `data:image/png;base64,...`. Decoded frames are 8-bit BGR `Mat`s.

use crate::error::VisionError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use opencv::core::{Scalar, Vec3b, VecN, Vector, CV_8UC3};
use opencv::imgcodecs;
use opencv::prelude::*;

/// Strip a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    if trimmed.starts_with("data:") {
        if let Some(idx) = trimmed.find("base64,") {
            return &trimmed[idx + "base64,".len()..];
        }
    }
    trimmed
}

/// Decode a base64 (or data URL) frame into a BGR image.
pub fn decode_frame(encoded: &str) -> Result<Mat, VisionError> {
    let payload = strip_data_url(encoded);
    if payload.is_empty() {
        return Err(VisionError::Decode("Empty frame payload".to_string()));
    }
    let bytes = STANDARD.decode(payload)?;
    let frame = imgcodecs::imdecode(&Vector::<u8>::from_slice(&bytes), imgcodecs::IMREAD_COLOR)?;
    // imdecode signals unknown formats with an empty Mat
    if frame.rows() == 0 || frame.cols() == 0 {
        return Err(VisionError::Decode(format!(
            "Payload of {} bytes is not a supported image",
            bytes.len()
        )));
    }
    Ok(frame)
}

/// Encode a BGR image as a base64 PNG data URL.
pub fn encode_png(frame: &Mat) -> Result<String, VisionError> {
    let mut buffer = Vector::<u8>::new();
    imgcodecs::imencode(".png", frame, &mut buffer, &Vector::<i32>::new())?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(buffer.to_vec())))
}

/// A `width` x `height` frame filled with one RGB color.
pub fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Result<Mat, VisionError> {
    let [r, g, b] = rgb;
    let frame = Mat::new_rows_cols_with_default(
        height as i32,
        width as i32,
        CV_8UC3,
        Scalar::new(b as f64, g as f64, r as f64, 0.0),
    )?;
    Ok(frame)
}

/// Build a frame pixel by pixel from RGB values.
pub fn frame_from_fn<F>(width: u32, height: u32, mut pixel: F) -> Result<Mat, VisionError>
where
    F: FnMut(u32, u32) -> [u8; 3],
{
    let mut frame = solid_frame(width, height, [0, 0, 0])?;
    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = pixel(x, y);
            *frame.at_2d_mut::<Vec3b>(y as i32, x as i32)? = VecN([b, g, r]);
        }
    }
    Ok(frame)
}
