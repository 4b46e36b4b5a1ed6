//! Geometric measurement and correction stages

/// Rotation angle and horizontal period estimation
pub mod orientation;
/// Rotation with border trimming
pub mod rectify;
/// Drift removal by horizontal shear
pub mod shear;
/// Vertical period and drift estimation
pub mod vertical;
