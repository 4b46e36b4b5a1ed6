//! Leveling: rotation about the image centre followed by a border trim

use crate::io::configuration::LEVELING_MARGIN_PX;
use crate::io::error::Result;
use crate::math::affine::{Affine2, warp_affine};
use crate::spatial::grid::{Raster, crop};

/// Rotates images by an estimated angle and trims the corner wedges
#[derive(Clone, Copy, Debug)]
pub struct Rectifier {
    margin_px: usize,
}

impl Default for Rectifier {
    fn default() -> Self {
        Self::new(LEVELING_MARGIN_PX)
    }
}

impl Rectifier {
    /// Create a rectifier trimming `margin_px` beyond the rotation wedges
    pub const fn new(margin_px: usize) -> Self {
        Self { margin_px }
    }

    /// Rotate `raster` by `angle_deg` and crop the rotation-induced borders
    ///
    /// The canvas keeps its size during rotation; samples falling outside the
    /// source are reflected back in. The trim is skipped when it would
    /// consume the whole image.
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation cannot be inverted or the crop fails
    pub fn rotate(&self, raster: &Raster, angle_deg: f64) -> Result<Raster> {
        let (height, width, _) = raster.dim();
        let center = ((width / 2) as f64, (height / 2) as f64);
        let rotated = warp_affine(raster, &Affine2::rotation(center, angle_deg), width, height)?;

        let (margin_x, margin_y) = self.margins(width, height, angle_deg);
        if 2 * margin_y < height && 2 * margin_x < width {
            crop(
                &rotated,
                margin_x,
                margin_y,
                width - 2 * margin_x,
                height - 2 * margin_y,
            )
        } else {
            Ok(rotated)
        }
    }

    /// Trim `(margin_x, margin_y)` for a rotation of `angle_deg`
    pub fn margins(&self, width: usize, height: usize, angle_deg: f64) -> (usize, usize) {
        let sin = angle_deg.abs().to_radians().sin();
        let margin_y = (width as f64 * sin).floor() as usize + self.margin_px;
        let margin_x = (height as f64 * sin).floor() as usize + self.margin_px;
        (margin_x, margin_y)
    }
}
