//! Two-dimensional FFT and spectral cross-correlation
//!
//! Transforms run row by row and then column by column with `rustfft` plans.
//! Buffers are zero-padded to 2-3-5 smooth lengths, which are at least as
//! large as the source, so the correlation never wraps around.

use ndarray::{Array2, ArrayView2, Axis, Zip, s};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward and inverse plans for one 2-D transform size
pub struct Plan2d {
    rows: usize,
    cols: usize,
    forward_rows: Arc<dyn Fft<f64>>,
    forward_cols: Arc<dyn Fft<f64>>,
    inverse_rows: Arc<dyn Fft<f64>>,
    inverse_cols: Arc<dyn Fft<f64>>,
}

impl Plan2d {
    /// Plan transforms for `rows x cols` buffers
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            forward_rows: planner.plan_fft_forward(cols),
            forward_cols: planner.plan_fft_forward(rows),
            inverse_rows: planner.plan_fft_inverse(cols),
            inverse_cols: planner.plan_fft_inverse(rows),
        }
    }

    /// Buffer shape the plans expect
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Unnormalized forward transform in place
    pub fn forward(&self, data: &mut Array2<Complex<f64>>) {
        transform_lanes(data, Axis(1), self.forward_rows.as_ref());
        transform_lanes(data, Axis(0), self.forward_cols.as_ref());
    }

    /// Inverse transform in place, scaled so `inverse(forward(x)) == x`
    pub fn inverse(&self, data: &mut Array2<Complex<f64>>) {
        transform_lanes(data, Axis(1), self.inverse_rows.as_ref());
        transform_lanes(data, Axis(0), self.inverse_cols.as_ref());
        let scale = 1.0 / (self.rows * self.cols).max(1) as f64;
        data.mapv_inplace(|value| value * scale);
    }

    /// Zero-padded complex copy of `values` in the planned shape
    pub fn embed<T: Copy + Into<f64>>(&self, values: &ArrayView2<'_, T>) -> Array2<Complex<f64>> {
        let mut buffer = Array2::from_elem(self.shape(), Complex::new(0.0, 0.0));
        let rows = values.nrows().min(self.rows);
        let cols = values.ncols().min(self.cols);
        Zip::from(buffer.slice_mut(s![..rows, ..cols]))
            .and(values.slice(s![..rows, ..cols]))
            .for_each(|slot, &value| *slot = Complex::new(value.into(), 0.0));
        buffer
    }
}

fn transform_lanes(data: &mut Array2<Complex<f64>>, axis: Axis, fft: &dyn Fft<f64>) {
    let len = data.len_of(axis);
    if len == 0 {
        return;
    }
    let mut buffer = vec![Complex::new(0.0, 0.0); len];
    let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
    for mut lane in data.lanes_mut(axis) {
        for (slot, value) in buffer.iter_mut().zip(lane.iter()) {
            *slot = *value;
        }
        fft.process_with_scratch(&mut buffer, &mut scratch);
        for (value, slot) in lane.iter_mut().zip(&buffer) {
            *value = *slot;
        }
    }
}

/// Smallest length `>= minimum` whose only prime factors are 2, 3 and 5
pub fn fast_length(minimum: usize) -> usize {
    let is_smooth = |n: usize| {
        let mut rest = n;
        for factor in [2, 3, 5] {
            while rest % factor == 0 {
                rest /= factor;
            }
        }
        rest == 1
    };
    let start = minimum.max(1);
    (start..).find(|&n| is_smooth(n)).unwrap_or(start)
}

/// Valid-region cross-correlation `out[y, x] = sum source[y + i, x + j] * kernel[i, j]`
///
/// The output has shape `(source_h - kernel_h + 1, source_w - kernel_w + 1)`
/// and is empty when the kernel is empty or does not fit.
pub fn cross_correlate(source: &ArrayView2<'_, f32>, kernel: &ArrayView2<'_, f64>) -> Array2<f64> {
    let (source_height, source_width) = source.dim();
    let (kernel_height, kernel_width) = kernel.dim();
    if kernel_height == 0
        || kernel_width == 0
        || kernel_height > source_height
        || kernel_width > source_width
    {
        return Array2::zeros((0, 0));
    }
    let rows = source_height - kernel_height + 1;
    let cols = source_width - kernel_width + 1;

    let plan = Plan2d::new(fast_length(source_height), fast_length(source_width));
    let mut spectrum = plan.embed(source);
    plan.forward(&mut spectrum);
    let mut kernel_spectrum = plan.embed(kernel);
    plan.forward(&mut kernel_spectrum);

    Zip::from(&mut spectrum)
        .and(&kernel_spectrum)
        .for_each(|value, kernel_value| *value *= kernel_value.conj());
    drop(kernel_spectrum);
    plan.inverse(&mut spectrum);

    spectrum.slice(s![..rows, ..cols]).mapv(|value| value.re)
}
