//! # Image Loading and Decoding
//!
//! Avatar photos arrive base64-encoded inside the profile. They are decoded
//! once while the layout tree is prepared, and turned into the circular
//! RGB + alpha bitmap the PDF writer embeds as an image XObject with an
//! SMask.

use std::io::Cursor;

use base64::Engine;
use image::imageops::FilterType;

use crate::error::{Result, VitaeError};

/// Longest side, in pixels, of an embedded avatar.
pub const MAX_AVATAR_PX: u32 = 512;

/// A decoded image ready for PDF embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub width_px: u32,
    pub height_px: u32,
    /// width * height * 3 bytes (RGB).
    pub rgb: Vec<u8>,
    /// width * height bytes of alpha. `None` when fully opaque.
    pub alpha: Option<Vec<u8>>,
}

/// Decode base64 image data. Accepts bare base64 or a
/// `data:image/...;base64,` URI, and tolerates embedded whitespace.
pub fn decode_base64(src: &str) -> Result<Vec<u8>> {
    let payload = match src.trim().strip_prefix("data:") {
        Some(uri) => {
            let comma = uri
                .find(',')
                .ok_or_else(|| VitaeError::Image("Invalid data URI: missing comma".to_string()))?;
            &uri[comma + 1..]
        }
        None => src.trim(),
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(VitaeError::Image("Empty image payload".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| VitaeError::Image(format!("Base64 decode error: {}", e)))
}

/// Decode raw image bytes (PNG, JPEG or WebP), center-crop to a square,
/// downscale to [`MAX_AVATAR_PX`] and mask to a circle.
pub fn load_circular(data: &[u8]) -> Result<LoadedImage> {
    if data.len() < 4 {
        return Err(VitaeError::Image("Image data too short".to_string()));
    }

    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| VitaeError::Image(format!("Image format detection error: {}", e)))?
        .decode()
        .map_err(|e| VitaeError::Image(format!("Failed to decode image: {}", e)))?;

    let side = img.width().min(img.height());
    if side == 0 {
        return Err(VitaeError::Image("Image has no pixels".to_string()));
    }
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;
    let mut square = img.crop_imm(x, y, side, side);
    if side > MAX_AVATAR_PX {
        square = square.resize_exact(MAX_AVATAR_PX, MAX_AVATAR_PX, FilterType::Triangle);
    }

    let rgba = square.to_rgba8();
    let size = rgba.width();
    let pixel_count = (size * size) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);

    let center = size as f64 / 2.0;
    for (px, py, pixel) in rgba.enumerate_pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        let dx = px as f64 + 0.5 - center;
        let dy = py as f64 + 0.5 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        // One-pixel soft edge.
        let coverage = (center - dist + 0.5).clamp(0.0, 1.0);
        alpha.push((coverage * pixel.0[3] as f64).round() as u8);
    }

    Ok(LoadedImage {
        width_px: size,
        height_px: size,
        rgb,
        alpha: Some(alpha),
    })
}
