//! Tests for drift removal by horizontal shear

#[cfg(test)]
mod tests {
    use crate::common::{brick, noise_plane};
    use ndarray::Array3;
    use seamtile::analysis::shear::ShearCorrector;
    use seamtile::analysis::vertical::VerticalPeriodEstimator;

    // Tests the tolerance threshold
    // Verified by using >= in the comparison
    #[test]
    fn test_needs_correction() {
        let corrector = ShearCorrector::default();

        assert!(!corrector.needs_correction(0));
        assert!(!corrector.needs_correction(2));
        assert!(!corrector.needs_correction(-2));
        assert!(corrector.needs_correction(3));
        assert!(corrector.needs_correction(-3));
        assert!(!ShearCorrector::new(5).needs_correction(4));
    }

    // Tests the factor sign and the zero height guard
    // Verified by dropping the negation
    #[test]
    fn test_shear_factor() {
        assert_eq!(ShearCorrector::shear_factor(6, 32), -0.1875);
        assert_eq!(ShearCorrector::shear_factor(-4, 8), 0.5);
        assert_eq!(ShearCorrector::shear_factor(3, 0), -3.0);
    }

    // Tests that the canvas widens to hold the sheared image
    // Verified by keeping the source width
    #[test]
    fn test_canvas_widens() {
        let raster = Array3::from_shape_fn((4, 10, 3), |(y, x, _)| (x * y) as f32);

        let sheared = ShearCorrector::default().shear(&raster, 2, 4).unwrap();
        assert_eq!(sheared.dim(), (4, 12, 3));

        let unchanged = ShearCorrector::default().shear(&raster, 0, 4).unwrap();
        assert_eq!(unchanged, raster);
    }

    // Tests that shearing by the measured drift realigns the repeats
    // Verified by shearing in the drift direction
    #[test]
    fn test_shear_removes_drift() {
        let base = noise_plane(40, 32, 61);
        let drifting = brick(&base, 80, 128, 6);
        let estimator = VerticalPeriodEstimator::new();
        let before = estimator.estimate(&drifting).unwrap();

        let corrector = ShearCorrector::default();
        assert!(corrector.needs_correction(before.drift_x));
        let corrected = corrector
            .shear(&drifting, before.drift_x, before.tile_height)
            .unwrap();
        assert_eq!(corrected.dim(), (128, 104, 3));

        let after = estimator.estimate(&corrected).unwrap();
        assert_eq!(after.tile_height, 32);
        assert!(after.drift_x.abs() <= 2, "residual drift {}", after.drift_x);
    }
}
