use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;

use crate::error::BridgeError;

/// Decode `bytes`, scale each axis independently to exactly
/// `width` x `height` (aspect ratio is not preserved), and re-encode as
/// PNG. Degenerate dimensions and undecodable bytes fail before any
/// encoding happens.
pub fn resize_image(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BridgeError> {
    if width == 0 {
        return Err(BridgeError::InvalidArguments("width must be positive".into()));
    }
    if height == 0 {
        return Err(BridgeError::InvalidArguments("height must be positive".into()));
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| BridgeError::Decode(e.to_string()))?;
    let resized = decoded.resize_exact(width, height, FilterType::Triangle);

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| BridgeError::Decode(e.to_string()))?;
    Ok(out.into_inner())
}
