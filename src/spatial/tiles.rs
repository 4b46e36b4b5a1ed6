//! Seam-cost search for the best tile origin
//!
//! A tile repeats without a visible seam when its top row continues its
//! bottom row and its left column continues its right column. Each candidate
//! origin is scored by the absolute difference between the tile's first
//! row/column and the row/column just past its opposite edge. The two axes are
//! scored independently with one-axis box sums, which keeps the search linear
//! per axis instead of comparing full tile borders at every origin.

use crate::io::error::Result;
use crate::math::correlation::first_minimum;
use crate::math::filters::{abs_difference, sliding_sum};
use crate::spatial::grid::{Raster, crop, to_plane};
use ndarray::{Array2, Axis, s};

/// Chosen tile and the cost landscape it was chosen from
#[derive(Clone, Debug)]
pub struct TileSelection {
    /// Extracted tile, same channel count as the input
    pub tile: Raster,
    /// Seam cost per candidate origin, `(valid_h, valid_w)` or `1 x 1` when no search ran
    pub cost_map: Array2<f32>,
    /// Top-left corner `(x, y)` of the tile in the input
    pub origin: (usize, usize),
    /// Seam cost of the chosen origin
    pub cost: f32,
}

/// Grid search over crop origins
#[derive(Clone, Copy, Debug, Default)]
pub struct TileSelector;

impl TileSelector {
    /// Create a selector
    pub const fn new() -> Self {
        Self
    }

    /// Pick the `tile_width x tile_height` crop with the smallest seam cost
    ///
    /// When the tile does not fit strictly inside the image the tile is
    /// clamped to the image and the top-left crop is returned with a single
    /// zero cost cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the final crop fails
    pub fn select_best_tile(
        &self,
        raster: &Raster,
        tile_width: usize,
        tile_height: usize,
    ) -> Result<TileSelection> {
        let (height, width, _) = raster.dim();
        let tile_width = tile_width.max(1);
        let tile_height = tile_height.max(1);

        if tile_height >= height || tile_width >= width {
            let clamped_width = tile_width.min(width);
            let clamped_height = tile_height.min(height);
            log::debug!(
                "tile {tile_width}x{tile_height} does not fit {width}x{height}, using top-left crop"
            );
            return Ok(TileSelection {
                tile: crop(raster, 0, 0, clamped_width, clamped_height)?,
                cost_map: Array2::zeros((1, 1)),
                origin: (0, 0),
                cost: 0.0,
            });
        }

        let cost_map = seam_cost_map(raster, tile_width, tile_height);
        let ((x, y), cost) = first_minimum(&cost_map);
        Ok(TileSelection {
            tile: crop(raster, x, y, tile_width, tile_height)?,
            cost_map,
            origin: (x, y),
            cost,
        })
    }
}

/// Combined seam cost for every origin where the tile fits strictly inside
///
/// The caller guarantees `tile_width < width` and `tile_height < height`.
pub fn seam_cost_map(raster: &Raster, tile_width: usize, tile_height: usize) -> Array2<f32> {
    let plane = to_plane(raster);
    let (height, width) = plane.dim();
    let valid_h = height - tile_height;
    let valid_w = width - tile_width;

    // Top edge against the row below the bottom edge, summed across the tile width
    let vertical_diff = abs_difference(
        &plane.slice(s![0..valid_h, ..]),
        &plane.slice(s![tile_height.., ..]),
    );
    let vertical_cost = sliding_sum(&vertical_diff.view(), Axis(1), tile_width);

    // Left edge against the column after the right edge, summed down the tile height
    let horizontal_diff = abs_difference(
        &plane.slice(s![.., 0..valid_w]),
        &plane.slice(s![.., tile_width..]),
    );
    let horizontal_cost = sliding_sum(&horizontal_diff.view(), Axis(0), tile_height);

    &vertical_cost.slice(s![.., 0..valid_w]) + &horizontal_cost.slice(s![0..valid_h, ..])
}
