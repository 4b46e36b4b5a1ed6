//! Raster containers and tile placement
//!
//! This module contains spatial-related functionality including:
//! - Raster and plane types with padding, cropping and strip helpers
//! - Seam-cost search and tile extraction

/// Raster types and elementary raster operations
pub mod grid;
/// Seam-cost search and tile extraction
pub mod tiles;

pub use grid::{Plane, Raster};
