//! Seamless tile extraction from photographed or rendered repeating patterns
//!
//! The pipeline estimates the rotation and repeat period of a pattern by
//! normalized cross-correlation, levels and de-shears the image, and crops the
//! tile whose wrap-around seams are least visible.

#![deny(unsafe_code)]

/// Extraction pipeline orchestration and batch handling
pub mod algorithm;
/// Angle, period and drift measurement plus the geometric corrections
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Correlation, filtering, interpolation and affine primitives
pub mod math;
/// Raster containers and tile selection
pub mod spatial;

pub use algorithm::executor::{Extraction, ExtractorConfig, SeamlessExtractor};
pub use io::error::{ExtractionError, Result};
