//! Vertical period and drift estimation on a centred strip
//!
//! The top half of the strip is searched for below itself. The vertical
//! displacement of the best match is the period; its horizontal displacement
//! is the drift accumulated over one period.

use crate::io::configuration::{DRIFT_SEARCH_PAD_FRACTION, SELF_MATCH_SUPPRESSION_FRACTION};
use crate::io::error::Result;
use crate::math::correlation::{Suppression, template_match};
use crate::spatial::grid::{Padding, Raster, mean_intensity, to_plane};
use ndarray::s;

/// Vertical repeat distance and the horizontal skew over one repeat
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerticalPeriod {
    /// Vertical repeat distance in pixels, at least 1
    pub tile_height: usize,
    /// Horizontal offset of the repeat, positive to the right
    pub drift_x: i64,
}

/// Finds the vertical period and drift of a leveled strip
#[derive(Clone, Copy, Debug, Default)]
pub struct VerticalPeriodEstimator;

impl VerticalPeriodEstimator {
    /// Create an estimator
    pub const fn new() -> Self {
        Self
    }

    /// Estimate the period of `strip`
    ///
    /// Strips shorter than two rows cannot hold a template and report their
    /// own height with no drift, as do strips where no unsuppressed position
    /// correlates positively. Detected heights are clamped to at least 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the correlation search fails
    pub fn estimate(&self, strip: &Raster) -> Result<VerticalPeriod> {
        let plane = to_plane(strip);
        let (height, width) = plane.dim();
        if height < 2 || width == 0 {
            return Ok(VerticalPeriod {
                tile_height: height.max(1),
                drift_x: 0,
            });
        }

        let fill = mean_intensity(&plane);
        let pad_v = height / 2;
        let pad_h = (height as f64 * DRIFT_SEARCH_PAD_FRACTION) as usize;
        let suppressed = (pad_v as f64 + height as f64 * SELF_MATCH_SUPPRESSION_FRACTION) as usize;

        let template = plane.slice(s![0..height / 2, ..]);
        let found = template_match(
            &plane,
            &template,
            Padding::symmetric(pad_v, pad_h),
            fill,
            &Suppression::leading_rows(suppressed),
        )?;

        // Without a positive match outside the suppressed band the strip has
        // no detectable repeat, so it is treated as one period with no drift
        if found.score <= 0.0 || found.location.1 < suppressed {
            log::debug!(
                "no vertical repeat found (score {:.3}), using strip height {height}",
                found.score
            );
            return Ok(VerticalPeriod {
                tile_height: height,
                drift_x: 0,
            });
        }

        let (drift_x, dy) = found.offset();
        let period = VerticalPeriod {
            tile_height: dy.max(1) as usize,
            drift_x,
        };
        log::debug!(
            "vertical period {} px, drift {} px (score {:.3})",
            period.tile_height,
            period.drift_x,
            found.score
        );
        Ok(period)
    }
}
