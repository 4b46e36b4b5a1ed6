//! 2-D affine transforms and inverse-mapped warping

use crate::io::error::{Result, computation_error};
use crate::math::interpolation::BilinearTap;
use crate::spatial::grid::Raster;
use ndarray::{Array3, s};

/// Row-major 2x3 affine matrix mapping source to destination coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    /// `[[a, b, tx], [c, d, ty]]`
    pub m: [[f64; 3]; 2],
}

impl Affine2 {
    /// The identity transform
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Rotation by `angle_deg` about `center`, counter-clockwise in image coordinates
    pub fn rotation(center: (f64, f64), angle_deg: f64) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let (cx, cy) = center;
        Self {
            m: [
                [cos, sin, (1.0 - cos).mul_add(cx, -sin * cy)],
                [-sin, cos, sin.mul_add(cx, (1.0 - cos) * cy)],
            ],
        }
    }

    /// Horizontal shear `x' = x + factor * y`
    pub const fn horizontal_shear(factor: f64) -> Self {
        Self {
            m: [[1.0, factor, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Same linear part with the translation replaced
    pub const fn with_translation(mut self, tx: f64, ty: f64) -> Self {
        self.m[0][2] = tx;
        self.m[1][2] = ty;
        self
    }

    /// Map a point
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, b, tx], [c, d, ty]] = self.m;
        (a.mul_add(x, b.mul_add(y, tx)), c.mul_add(x, d.mul_add(y, ty)))
    }

    /// Inverse transform
    ///
    /// # Errors
    ///
    /// Returns an error if the linear part is singular
    pub fn inverse(&self) -> Result<Self> {
        let [[a, b, tx], [c, d, ty]] = self.m;
        let det = a.mul_add(d, -b * c);
        if det.abs() <= f64::EPSILON || !det.is_finite() {
            return Err(computation_error(
                "affine inverse",
                &format!("singular matrix (determinant {det})"),
            ));
        }
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        Ok(Self {
            m: [
                [ia, ib, -ia.mul_add(tx, ib * ty)],
                [ic, id, -ic.mul_add(tx, id * ty)],
            ],
        })
    }

    /// Horizontal extent `(min_x, max_x)` of a `width x height` rectangle after mapping
    pub fn horizontal_bounds(&self, width: f64, height: f64) -> (f64, f64) {
        [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)]
            .iter()
            .map(|&(x, y)| self.apply(x, y).0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            })
    }
}

/// Resample `source` onto a `width x height` canvas through `transform`
///
/// Each destination pixel reads the source at the inverse-mapped position
/// using bilinear interpolation with reflected borders.
///
/// # Errors
///
/// Returns an error if the transform is not invertible
pub fn warp_affine(
    source: &Raster,
    transform: &Affine2,
    width: usize,
    height: usize,
) -> Result<Raster> {
    let inverse = transform.inverse()?;
    let (source_height, source_width, channels) = source.dim();
    let mut warped = Array3::zeros((height, width, channels));

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = inverse.apply(x as f64, y as f64);
            let tap = BilinearTap::new(sx, sy, source_width, source_height);
            tap.sample_into(source, warped.slice_mut(s![y, x, ..]));
        }
    }

    Ok(warped)
}
