//! Bilinear sampling with reflected borders
//!
//! Out-of-range coordinates mirror back into the image including the edge
//! sample (`fedcba|abcdefgh|hgfedcb`), so warps never introduce flat borders
//! that would later correlate as false structure.

use crate::spatial::grid::Raster;
use ndarray::ArrayViewMut1;

/// Map any integer coordinate into `0..len` by mirroring at both edges
pub fn reflect_index(index: i64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * len as i64;
    let folded = index.rem_euclid(period);
    if folded < len as i64 {
        folded as usize
    } else {
        (period - 1 - folded) as usize
    }
}

/// Four reflected neighbours of a real-valued position and their weights
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BilinearTap {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    fx: f32,
    fy: f32,
}

impl BilinearTap {
    /// Locate `(x, y)` inside a `width x height` grid
    pub fn new(x: f64, y: f64, width: usize, height: usize) -> Self {
        let floor_x = x.floor();
        let floor_y = y.floor();
        let base_x = floor_x as i64;
        let base_y = floor_y as i64;
        Self {
            x0: reflect_index(base_x, width),
            x1: reflect_index(base_x + 1, width),
            y0: reflect_index(base_y, height),
            y1: reflect_index(base_y + 1, height),
            fx: (x - floor_x) as f32,
            fy: (y - floor_y) as f32,
        }
    }

    /// Interpolated value of one channel
    pub fn sample(&self, raster: &Raster, channel: usize) -> f32 {
        let at = |y: usize, x: usize| raster.get((y, x, channel)).copied().unwrap_or(0.0);
        let top = (at(self.y0, self.x1) - at(self.y0, self.x0)).mul_add(self.fx, at(self.y0, self.x0));
        let bottom =
            (at(self.y1, self.x1) - at(self.y1, self.x0)).mul_add(self.fx, at(self.y1, self.x0));
        (bottom - top).mul_add(self.fy, top)
    }

    /// Interpolate every channel into `pixel`
    pub fn sample_into(&self, raster: &Raster, mut pixel: ArrayViewMut1<'_, f32>) {
        for (channel, value) in pixel.iter_mut().enumerate() {
            *value = self.sample(raster, channel);
        }
    }
}
