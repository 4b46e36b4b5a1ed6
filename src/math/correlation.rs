//! Normalized cross-correlation template search
//!
//! Every correlation-based stage goes through [`template_match`]: the source is
//! padded with a constant, the template is slid over every valid position,
//! a rectangle of the response is zeroed to reject the trivial self-match and
//! the first maximum in row-major order wins, up to a small score tolerance.

use crate::io::configuration::SCORE_TIE_TOLERANCE;
use crate::io::error::{Result, computation_error};
use crate::math::filters::SummedArea;
use crate::math::spectral::cross_correlate;
use crate::spatial::grid::{Padding, Plane, pad_constant};
use ndarray::{Array2, ArrayView2, Zip, s};
use std::ops::Range;

const FLAT_ENERGY_RATIO: f64 = 1e-12;

/// Rectangle of the response map forced to zero before the maximum search
///
/// Ranges are clamped to the map, so open-ended bounds can use `usize::MAX`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Suppression {
    /// Suppressed response rows
    pub rows: Range<usize>,
    /// Suppressed response columns
    pub cols: Range<usize>,
}

impl Suppression {
    /// Suppress the leading `count` columns over every row
    pub const fn leading_columns(count: usize) -> Self {
        Self {
            rows: 0..usize::MAX,
            cols: 0..count,
        }
    }

    /// Suppress the leading `count` rows over every column
    pub const fn leading_rows(count: usize) -> Self {
        Self {
            rows: 0..count,
            cols: 0..usize::MAX,
        }
    }

    /// Leave the response untouched
    pub const fn none() -> Self {
        Self { rows: 0..0, cols: 0..0 }
    }

    fn apply(&self, response: &mut Array2<f32>) {
        let (rows, cols) = response.dim();
        let row_start = self.rows.start.min(rows);
        let row_end = self.rows.end.min(rows).max(row_start);
        let col_start = self.cols.start.min(cols);
        let col_end = self.cols.end.min(cols).max(col_start);
        response
            .slice_mut(s![row_start..row_end, col_start..col_end])
            .fill(0.0);
    }
}

/// Outcome of a template search
#[derive(Clone, Debug)]
pub struct TemplateMatch {
    /// Correlation coefficient per template position, in `[-1, 1]`
    pub response: Array2<f32>,
    /// Best position `(x, y)` in padded source coordinates
    pub location: (usize, usize),
    /// Response value at `location`
    pub score: f32,
    /// Padding the source was searched with
    pub padding: Padding,
}

impl TemplateMatch {
    /// Displacement `(dx, dy)` of the best match from the un-padded template origin
    pub fn offset(&self) -> (i64, i64) {
        (
            self.location.0 as i64 - self.padding.left as i64,
            self.location.1 as i64 - self.padding.top as i64,
        )
    }
}

/// Search `template` inside `source` padded with `fill`
///
/// # Errors
///
/// Returns an error if the template is empty or larger than the padded source
pub fn template_match(
    source: &Plane,
    template: &ArrayView2<'_, f32>,
    padding: Padding,
    fill: f32,
    suppression: &Suppression,
) -> Result<TemplateMatch> {
    let (template_height, template_width) = template.dim();
    if template_height == 0 || template_width == 0 {
        return Err(computation_error("template_match", &"template is empty"));
    }

    let padded = pad_constant(source, padding, fill);
    let (padded_height, padded_width) = padded.dim();
    if template_height > padded_height || template_width > padded_width {
        return Err(computation_error(
            "template_match",
            &format!(
                "template {template_width}x{template_height} exceeds padded source {padded_width}x{padded_height}"
            ),
        ));
    }

    let mut response = correlation_coefficients(&padded.view(), template);
    suppression.apply(&mut response);
    let (location, score) = first_maximum(&response);

    Ok(TemplateMatch {
        response,
        location,
        score,
        padding,
    })
}

/// Correlation coefficient of `template` at every position inside `source`
///
/// The output has shape `(source_h - template_h + 1, source_w - template_w + 1)`.
/// Positions where the template or the window has no variance score zero.
/// The cross term comes from an FFT and the window statistics from summed-area
/// tables, so the cost grows with the source area rather than with the
/// template area.
pub fn correlation_coefficients(
    source: &ArrayView2<'_, f32>,
    template: &ArrayView2<'_, f32>,
) -> Array2<f32> {
    let (source_height, source_width) = source.dim();
    let (template_height, template_width) = template.dim();
    let rows = source_height.saturating_sub(template_height) + 1;
    let cols = source_width.saturating_sub(template_width) + 1;
    let mut response = Array2::zeros((rows, cols));
    if template_height == 0
        || template_width == 0
        || template_height > source_height
        || template_width > source_width
    {
        return response;
    }

    let count = (template_height * template_width) as f64;
    let template_mean = template.iter().map(|&v| f64::from(v)).sum::<f64>() / count;
    let centered = template.mapv(|v| f64::from(v) - template_mean);
    let template_energy: f64 = centered.iter().map(|v| v * v).sum();
    let template_scale: f64 = template.iter().map(|&v| f64::from(v).powi(2)).sum();
    if is_flat(template_energy, template_scale) {
        return response;
    }

    let cross = cross_correlate(source, &centered.view());
    let windows = SummedArea::new(source);

    Zip::indexed(&mut response)
        .and(&cross)
        .for_each(|(y, x), score, &cross_term| {
            let (sum, sum_sq) = windows.window(y, x, template_height, template_width);
            let window_energy = sum.mul_add(-sum / count, sum_sq);
            if is_flat(window_energy, sum_sq) {
                return;
            }
            let denominator = (template_energy * window_energy).sqrt();
            if denominator.is_finite() && denominator > f64::EPSILON {
                *score = (cross_term / denominator).clamp(-1.0, 1.0) as f32;
            }
        });
    response
}

// Energy lost to cancellation in `sum_sq - sum^2 / n` counts as no variance
const fn is_flat(energy: f64, sum_of_squares: f64) -> bool {
    energy <= FLAT_ENERGY_RATIO * sum_of_squares.max(1.0)
}

/// First maximum in row-major order as `((x, y), value)`
///
/// Values within [`SCORE_TIE_TOLERANCE`] of the global maximum count as ties,
/// so rounding noise in the spectral cross term cannot reorder equal matches.
pub fn first_maximum(map: &Array2<f32>) -> ((usize, usize), f32) {
    let peak = map.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    map.indexed_iter()
        .find(|&(_, &value)| value >= peak - SCORE_TIE_TOLERANCE)
        .map_or(((0, 0), f32::NEG_INFINITY), |((y, x), &value)| ((x, y), value))
}

/// First minimum in row-major order as `((x, y), value)`
pub fn first_minimum(map: &Array2<f32>) -> ((usize, usize), f32) {
    let mut best = ((0, 0), f32::INFINITY);
    for ((y, x), &value) in map.indexed_iter() {
        if value < best.1 {
            best = ((x, y), value);
        }
    }
    best
}
