//! Raster containers and the elementary operations every stage shares
//!
//! Rasters are `(height, width, channels)` arrays on the 0-255 sample scale.
//! Planes are the single-channel intensity images the correlation and seam
//! searches work on.

use crate::io::configuration::{LUMA_BLUE, LUMA_GREEN, LUMA_RED};
use crate::io::error::{Result, computation_error, invalid_input};
use ndarray::{Array2, Array3, Axis, s};

/// Multi-channel image, `(height, width, channels)`
pub type Raster = Array3<f32>;

/// Single-channel intensity image, `(height, width)`
pub type Plane = Array2<f32>;

/// Constant-border padding amounts in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    /// Rows added above
    pub top: usize,
    /// Rows added below
    pub bottom: usize,
    /// Columns added on the left
    pub left: usize,
    /// Columns added on the right
    pub right: usize,
}

impl Padding {
    /// Same amount above and below, same amount left and right
    pub const fn symmetric(vertical: usize, horizontal: usize) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }
}

/// Check that a raster can enter the pipeline
///
/// # Errors
///
/// Returns an error if the raster has no pixels or a channel count other than 1 or 3
pub fn validate(raster: &Raster) -> Result<()> {
    let (height, width, channels) = raster.dim();
    if height == 0 || width == 0 {
        return Err(invalid_input(&format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    if channels != 1 && channels != 3 {
        return Err(invalid_input(&format!(
            "expected 1 or 3 channels, found {channels}"
        )));
    }
    Ok(())
}

/// Convert a raster to intensity
///
/// Single-channel rasters are copied; colour rasters are read as RGB.
pub fn to_plane(raster: &Raster) -> Plane {
    let (height, width, channels) = raster.dim();
    if channels < 3 {
        return raster.index_axis(Axis(2), 0).to_owned();
    }

    Array2::from_shape_fn((height, width), |(y, x)| {
        let r = raster.get((y, x, 0)).copied().unwrap_or(0.0);
        let g = raster.get((y, x, 1)).copied().unwrap_or(0.0);
        let b = raster.get((y, x, 2)).copied().unwrap_or(0.0);
        LUMA_BLUE.mul_add(b, LUMA_RED.mul_add(r, LUMA_GREEN * g))
    })
}

/// View a plane as a one-channel raster
pub fn plane_to_raster(plane: Plane) -> Raster {
    plane.insert_axis(Axis(2))
}

/// Drop the channel axis of a one-channel raster, converting colour to intensity
pub fn raster_to_plane(raster: Raster) -> Plane {
    if raster.dim().2 == 1 {
        raster.index_axis_move(Axis(2), 0)
    } else {
        to_plane(&raster)
    }
}

/// Mean intensity, used as the fill value of every padding operation
pub fn mean_intensity(plane: &Plane) -> f32 {
    if plane.is_empty() {
        return 0.0;
    }
    let total: f64 = plane.iter().map(|&v| f64::from(v)).sum();
    (total / plane.len() as f64) as f32
}

/// Surround a plane with a constant border
pub fn pad_constant(plane: &Plane, padding: Padding, fill: f32) -> Plane {
    let (height, width) = plane.dim();
    let mut padded = Array2::from_elem(
        (
            height + padding.top + padding.bottom,
            width + padding.left + padding.right,
        ),
        fill,
    );
    padded
        .slice_mut(s![
            padding.top..padding.top + height,
            padding.left..padding.left + width
        ])
        .assign(plane);
    padded
}

/// Copy a `height x width` window whose top-left corner is `(x, y)`
///
/// # Errors
///
/// Returns an error if the window leaves the raster
pub fn crop(raster: &Raster, x: usize, y: usize, width: usize, height: usize) -> Result<Raster> {
    let (raster_height, raster_width, _) = raster.dim();
    if x + width > raster_width || y + height > raster_height {
        return Err(computation_error(
            "crop",
            &format!(
                "window {width}x{height} at ({x}, {y}) exceeds {raster_width}x{raster_height}"
            ),
        ));
    }
    Ok(raster.slice(s![y..y + height, x..x + width, ..]).to_owned())
}

/// Centred vertical strip `2 * half_width` wide, clamped to the raster
///
/// Keeps the vertical search away from the left and right image edges.
pub fn center_strip(raster: &Raster, half_width: usize) -> Raster {
    let width = raster.dim().1;
    let center = width / 2;
    let start = center.saturating_sub(half_width);
    let end = (center + half_width).min(width);
    raster.slice(s![.., start..end, ..]).to_owned()
}
