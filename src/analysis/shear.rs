//! Drift removal through a horizontal shear

use crate::io::configuration::DRIFT_TOLERANCE_PX;
use crate::io::error::Result;
use crate::math::affine::{Affine2, warp_affine};
use crate::spatial::grid::Raster;

/// Removes horizontal drift accumulated over each vertical period
#[derive(Clone, Copy, Debug)]
pub struct ShearCorrector {
    tolerance_px: i64,
}

impl Default for ShearCorrector {
    fn default() -> Self {
        Self::new(DRIFT_TOLERANCE_PX)
    }
}

impl ShearCorrector {
    /// Create a corrector ignoring drift of at most `tolerance_px`
    pub const fn new(tolerance_px: i64) -> Self {
        Self { tolerance_px }
    }

    /// Whether `drift_x` is large enough to be corrected
    pub const fn needs_correction(&self, drift_x: i64) -> bool {
        drift_x.abs() > self.tolerance_px
    }

    /// Shear factor cancelling `drift_x` over `tile_height` rows
    pub fn shear_factor(drift_x: i64, tile_height: usize) -> f64 {
        -(drift_x as f64) / tile_height.max(1) as f64
    }

    /// Shear `raster` so that repeats line up vertically
    ///
    /// The canvas widens to keep every sheared source pixel visible; the
    /// height is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the warp fails
    pub fn shear(&self, raster: &Raster, drift_x: i64, tile_height: usize) -> Result<Raster> {
        let (height, width, _) = raster.dim();
        let factor = Self::shear_factor(drift_x, tile_height);
        let transform = Affine2::horizontal_shear(factor);
        let (min_x, max_x) = transform.horizontal_bounds(width as f64, height as f64);
        let new_width = ((max_x - min_x).ceil() as usize).max(1);

        log::debug!("shearing by {factor:.4} ({width} -> {new_width} px wide)");
        warp_affine(
            raster,
            &transform.with_translation(-min_x, 0.0),
            new_width,
            height,
        )
    }
}
