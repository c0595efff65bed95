//! PNG output for extracted sprites, masked sheets and previews

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

use crate::tileset::Rect;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Requested region lies outside the sheet
    #[error("Region {x},{y} {w}x{h} is outside the {width}x{height} image")]
    OutOfBounds { x: u32, y: u32, w: u32, h: u32, width: u32, height: u32 },
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Copy `rect` out of `image`.
pub fn crop(image: &RgbaImage, rect: Rect) -> Result<RgbaImage, OutputError> {
    let (width, height) = image.dimensions();
    if rect.x + rect.w > width || rect.y + rect.h > height {
        return Err(OutputError::OutOfBounds { x: rect.x, y: rect.y, w: rect.w, h: rect.h, width, height });
    }
    Ok(imageops::crop_imm(image, rect.x, rect.y, rect.w, rect.h).to_image())
}

/// Scale with nearest-neighbour sampling, keeping pixel edges crisp.
///
/// Each dimension is rounded and kept at least one pixel.
pub fn scale_image(image: RgbaImage, factor: f32) -> RgbaImage {
    if factor == 1.0 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = ((w as f32 * factor).round() as u32).max(1);
    let new_h = ((h as f32 * factor).round() as u32).max(1);
    imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}
