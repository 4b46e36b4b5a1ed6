//! Batched tensor adapter
//!
//! Host runtimes hand over `(batch, height, width, channels)` tensors of RGB
//! samples in `0.0..=1.0`. Rasters use the 0-255 scale, so every crossing of
//! this boundary rescales.

use crate::io::configuration::SAMPLE_MAX;
use crate::io::error::{Result, invalid_input};
use crate::spatial::grid::Raster;
use image::RgbImage;
use ndarray::{Array3, Array4, ArrayView4, Axis, ShapeError, stack};

/// Batched unit-range pixel tensor, `(batch, height, width, channels)`
pub type ImageBatch = Array4<f32>;

/// Extract one batch item as a 0-255 raster
///
/// # Errors
///
/// Returns an error if `index` is outside the batch
pub fn raster_from_batch_item(batch: &ArrayView4<'_, f32>, index: usize) -> Result<Raster> {
    let len = batch.len_of(Axis(0));
    if index >= len {
        return Err(invalid_input(&format!(
            "batch index {index} out of range for batch of {len}"
        )));
    }
    Ok(batch
        .index_axis(Axis(0), index)
        .mapv(|v| (v * SAMPLE_MAX).clamp(0.0, SAMPLE_MAX)))
}

/// Convert a 0-255 raster to a unit-range tensor item
pub fn raster_to_unit(raster: &Raster) -> Array3<f32> {
    raster.mapv(|v| (v / SAMPLE_MAX).clamp(0.0, 1.0))
}

/// Convert an 8-bit RGB buffer to a unit-range tensor item
pub fn rgb_to_unit(img: &RgbImage) -> Array3<f32> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let mut item = Array3::zeros((height, width, 3));
    for (x, y, pixel) in img.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            if let Some(sample) = item.get_mut((y as usize, x as usize, c)) {
                *sample = f32::from(value) / SAMPLE_MAX;
            }
        }
    }
    item
}

/// Stack equally shaped items into a batch
///
/// # Errors
///
/// Returns the shape error when items differ in size or the list is empty
pub fn stack_items(items: &[Array3<f32>]) -> std::result::Result<ImageBatch, ShapeError> {
    let views: Vec<_> = items.iter().map(|item| item.view()).collect();
    stack(Axis(0), &views)
}
