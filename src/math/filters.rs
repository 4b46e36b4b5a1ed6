//! Difference images, one-axis box sums and summed-area tables

use ndarray::{Array2, ArrayView2, Axis, Zip};
use num_traits::{Float, NumCast};

/// Element-wise `|a - b|` of two equally shaped views
///
/// The result takes the shape of `a`; `b` must match it.
pub fn abs_difference<T: Float>(a: &ArrayView2<'_, T>, b: &ArrayView2<'_, T>) -> Array2<T> {
    Zip::from(a).and(b).map_collect(|&lhs, &rhs| (lhs - rhs).abs())
}

/// Sum of every `window` consecutive values along `axis`
///
/// The window starts at the output position, so the output is
/// `len - window + 1` long along `axis` (empty when the window does not fit).
/// Prefix sums are accumulated in `f64`.
pub fn sliding_sum<T: Float>(input: &ArrayView2<'_, T>, axis: Axis, window: usize) -> Array2<T> {
    let (rows, cols) = input.dim();
    let len = input.len_of(axis);
    let out_len = if window == 0 || window > len {
        0
    } else {
        len - window + 1
    };
    let shape = if axis == Axis(0) {
        (out_len, cols)
    } else {
        (rows, out_len)
    };
    let mut output = Array2::from_elem(shape, T::zero());
    if out_len == 0 {
        return output;
    }

    let mut prefix = vec![0.0_f64; len + 1];
    for (lane, mut out_lane) in input
        .lanes(axis)
        .into_iter()
        .zip(output.lanes_mut(axis))
    {
        let mut running = 0.0_f64;
        for (slot, value) in prefix.iter_mut().skip(1).zip(lane.iter()) {
            running += value.to_f64().unwrap_or(0.0);
            *slot = running;
        }
        for (start, out) in out_lane.iter_mut().enumerate() {
            let end = prefix.get(start + window).copied().unwrap_or(running);
            let begin = prefix.get(start).copied().unwrap_or(0.0);
            *out = <T as NumCast>::from(end - begin).unwrap_or_else(T::zero);
        }
    }
    output
}

/// Summed-area tables of values and squared values
///
/// Window sums cost four lookups each. Tables are `(rows + 1, cols + 1)` with a
/// zero first row and column, accumulated in `f64`.
#[derive(Clone, Debug)]
pub struct SummedArea {
    sums: Array2<f64>,
    squares: Array2<f64>,
}

impl SummedArea {
    /// Build both tables for `input`
    pub fn new<T: Float>(input: &ArrayView2<'_, T>) -> Self {
        let (rows, cols) = input.dim();
        let mut sums = Array2::zeros((rows + 1, cols + 1));
        let mut squares = Array2::zeros((rows + 1, cols + 1));

        for (y, row) in input.outer_iter().enumerate() {
            let mut run = 0.0_f64;
            let mut run_sq = 0.0_f64;
            for (x, value) in row.iter().enumerate() {
                let v = value.to_f64().unwrap_or(0.0);
                run += v;
                run_sq = v.mul_add(v, run_sq);
                let above = sums.get((y, x + 1)).copied().unwrap_or(0.0);
                let above_sq = squares.get((y, x + 1)).copied().unwrap_or(0.0);
                if let Some(slot) = sums.get_mut((y + 1, x + 1)) {
                    *slot = above + run;
                }
                if let Some(slot) = squares.get_mut((y + 1, x + 1)) {
                    *slot = above_sq + run_sq;
                }
            }
        }

        Self { sums, squares }
    }

    /// `(sum, sum of squares)` of the window at `(y, x)` sized `height x width`
    ///
    /// Windows reaching past the input are cut at its edge.
    pub fn window(&self, y: usize, x: usize, height: usize, width: usize) -> (f64, f64) {
        (
            rectangle(&self.sums, y, x, height, width),
            rectangle(&self.squares, y, x, height, width),
        )
    }
}

fn rectangle(table: &Array2<f64>, y: usize, x: usize, height: usize, width: usize) -> f64 {
    let (rows, cols) = table.dim();
    let top = y.min(rows.saturating_sub(1));
    let left = x.min(cols.saturating_sub(1));
    let bottom = (y + height).min(rows.saturating_sub(1));
    let right = (x + width).min(cols.saturating_sub(1));
    let at = |r: usize, c: usize| table.get((r, c)).copied().unwrap_or(0.0);
    at(bottom, right) - at(top, right) - at(bottom, left) + at(top, left)
}
