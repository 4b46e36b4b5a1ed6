//! Numeric primitives shared by the pipeline stages

/// 2-D affine transforms and inverse-mapped warping
pub mod affine;
/// Normalized cross-correlation template search
pub mod correlation;
/// Difference images, box sums and summed-area tables
pub mod filters;
/// Bilinear sampling with reflected borders
pub mod interpolation;
/// FFT plans and spectral cross-correlation
pub mod spectral;
