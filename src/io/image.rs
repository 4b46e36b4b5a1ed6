//! Conversion between image files, 8-bit buffers and rasters

use crate::io::configuration::SAMPLE_MAX;
use crate::io::error::{ExtractionError, Result, computation_error};
use crate::spatial::grid::Raster;
use image::{Rgb, RgbImage};
use ndarray::Array3;
use std::path::Path;

/// Decode an image file into an RGB raster on the 0-255 scale
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_raster<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| ExtractionError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    Ok(raster_from_rgb(&img.to_rgb8()))
}

/// Convert an 8-bit RGB buffer to a raster
pub fn raster_from_rgb(img: &RgbImage) -> Raster {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let mut raster = Array3::zeros((height, width, 3));
    for (x, y, pixel) in img.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            if let Some(sample) = raster.get_mut((y as usize, x as usize, c)) {
                *sample = f32::from(value);
            }
        }
    }
    raster
}

/// Quantize a raster to an 8-bit RGB buffer
///
/// Single-channel rasters are replicated into all three channels.
///
/// # Errors
///
/// Returns an error if the raster is larger than an image buffer can address
pub fn raster_to_rgb(raster: &Raster) -> Result<RgbImage> {
    let (height, width, channels) = raster.dim();
    let width_u32 = u32::try_from(width)
        .map_err(|e| computation_error("raster_to_rgb", &format!("width {width}: {e}")))?;
    let height_u32 = u32::try_from(height)
        .map_err(|e| computation_error("raster_to_rgb", &format!("height {height}: {e}")))?;

    let mut img = RgbImage::new(width_u32, height_u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let mut rgb = [0u8; 3];
        for (c, slot) in rgb.iter_mut().enumerate() {
            let channel = if channels == 1 { 0 } else { c };
            let value = raster
                .get((y as usize, x as usize, channel))
                .copied()
                .unwrap_or(0.0);
            *slot = quantize(value);
        }
        *pixel = Rgb(rgb);
    }
    Ok(img)
}

/// Round and clamp a 0-255 sample to a byte
pub fn quantize(value: f32) -> u8 {
    value.round().clamp(0.0, SAMPLE_MAX) as u8
}

/// Write an RGB buffer, creating parent directories as needed
///
/// The format follows the file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_rgb<P: AsRef<Path>>(img: &RgbImage, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractionError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    img.save(output_path)
        .map_err(|e| ExtractionError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
