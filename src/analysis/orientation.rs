//! Rotation angle and horizontal period estimation
//!
//! The left half of the image is searched for in the image itself, padded so
//! that a slightly tilted repeat can still be found. The displacement of the
//! best non-trivial match gives the tilt (rough pass); re-running the search
//! on the leveled image gives the horizontal period (refined pass). Period
//! measurements are angle-sensitive, which is why the width only comes from
//! leveled passes.

use crate::analysis::rectify::Rectifier;
use crate::io::configuration::{
    DEFAULT_REFINEMENT_PASSES, ROUGH_VERTICAL_PAD_FRACTION, SELF_MATCH_SUPPRESSION_FRACTION,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::correlation::{Suppression, TemplateMatch, template_match};
use crate::spatial::grid::{Padding, Plane, mean_intensity, plane_to_raster, raster_to_plane};
use ndarray::s;

/// Estimated orientation of the dominant repeat axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    /// Rotation in degrees that levels the repeat axis
    pub angle_deg: f64,
    /// Horizontal repeat distance on the leveled image
    pub tile_width: usize,
}

/// Result of one refined pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Refinement {
    /// Horizontal displacement of the best match on the leveled image
    pub tile_width: usize,
    /// Tilt still visible after leveling, in degrees
    pub residual_deg: f64,
}

/// Two-stage angle and period estimator
#[derive(Clone, Copy, Debug)]
pub struct OrientationEstimator {
    rectifier: Rectifier,
    refinement_passes: usize,
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self {
            rectifier: Rectifier::default(),
            refinement_passes: DEFAULT_REFINEMENT_PASSES,
        }
    }
}

impl OrientationEstimator {
    /// Create an estimator running `refinement_passes` leveled passes
    ///
    /// # Errors
    ///
    /// Returns an error if `refinement_passes` is zero
    pub fn new(rectifier: Rectifier, refinement_passes: usize) -> Result<Self> {
        if refinement_passes == 0 {
            return Err(invalid_parameter(
                "refinement_passes",
                &refinement_passes,
                &"at least one refined pass is needed to measure the width",
            ));
        }
        Ok(Self {
            rectifier,
            refinement_passes,
        })
    }

    /// Number of refined passes after the rough pass
    pub const fn refinement_passes(&self) -> usize {
        self.refinement_passes
    }

    /// Run the rough pass followed by every refined pass
    ///
    /// Each refined pass except the last folds its residual tilt into the
    /// angle used by the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if a correlation or rotation step fails
    pub fn estimate(&self, plane: &Plane) -> Result<Orientation> {
        let width = plane.dim().1;
        if width < 2 {
            return Ok(Orientation {
                angle_deg: 0.0,
                tile_width: width,
            });
        }

        let mut angle_deg = self.estimate_rough(plane)?;
        let mut tile_width = 0;
        for pass in 0..self.refinement_passes {
            let refinement = self.estimate_refined(plane, angle_deg)?;
            tile_width = refinement.tile_width;
            if pass + 1 < self.refinement_passes {
                angle_deg += refinement.residual_deg;
            }
            log::debug!(
                "orientation pass {}: angle {angle_deg:.3} deg, width {tile_width} px",
                pass + 1
            );
        }

        Ok(Orientation {
            angle_deg,
            tile_width,
        })
    }

    /// Angle of the horizontal repeat vector measured on the unrotated plane
    ///
    /// # Errors
    ///
    /// Returns an error if the plane is too small to hold a template
    pub fn estimate_rough(&self, plane: &Plane) -> Result<f64> {
        let Some(found) = horizontal_repeat(plane, plane, mean_intensity(plane))? else {
            log::debug!("no horizontal repeat found, assuming a level image");
            return Ok(0.0);
        };
        let (dx, dy) = found.offset();
        Ok((dy as f64).atan2(dx as f64).to_degrees())
    }

    /// Horizontal period measured on the plane leveled by `angle_deg`
    ///
    /// Padding amounts and fill come from the unrotated plane so every pass
    /// searches the same neighbourhood.
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation or the correlation fails
    pub fn estimate_refined(&self, plane: &Plane, angle_deg: f64) -> Result<Refinement> {
        let leveled = raster_to_plane(
            self.rectifier
                .rotate(&plane_to_raster(plane.clone()), angle_deg)?,
        );
        // Leveling trims may leave nothing to split into template and search area
        if leveled.dim().1 < 2 {
            return Ok(Refinement {
                tile_width: leveled.dim().1,
                residual_deg: 0.0,
            });
        }
        let Some(found) = horizontal_repeat(&leveled, plane, mean_intensity(plane))? else {
            return Ok(Refinement {
                tile_width: leveled.dim().1,
                residual_deg: 0.0,
            });
        };
        let (dx, dy) = found.offset();
        Ok(Refinement {
            tile_width: dx.max(0) as usize,
            residual_deg: (dy as f64).atan2(dx as f64).to_degrees(),
        })
    }
}

// Searches the left half of `plane` with padding sized from `reference`.
// `None` when nothing outside the suppressed columns correlates positively.
fn horizontal_repeat(
    plane: &Plane,
    reference: &Plane,
    fill: f32,
) -> Result<Option<TemplateMatch>> {
    let (height, width) = plane.dim();
    let (reference_height, reference_width) = reference.dim();
    let pad_v = (reference_height as f64 * ROUGH_VERTICAL_PAD_FRACTION) as usize;
    let padding = Padding {
        top: pad_v,
        bottom: pad_v,
        left: 0,
        right: reference_width / 2,
    };
    let suppressed = (width as f64 * SELF_MATCH_SUPPRESSION_FRACTION) as usize;
    let template = plane.slice(s![0..height, 0..width / 2]);
    let found = template_match(
        plane,
        &template,
        padding,
        fill,
        &Suppression::leading_columns(suppressed),
    )?;
    Ok((found.score > 0.0 && found.location.0 >= suppressed).then_some(found))
}
