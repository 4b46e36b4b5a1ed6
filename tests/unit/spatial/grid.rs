//! Tests for raster validation, intensity conversion, padding and cropping

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array3, array, s};
    use seamtile::ExtractionError;
    use seamtile::spatial::grid::{
        Padding, center_strip, crop, mean_intensity, pad_constant, plane_to_raster,
        raster_to_plane, to_plane, validate,
    };

    // Tests that empty and oddly shaped rasters are rejected
    // Verified by accepting any channel count
    #[test]
    fn test_validate() {
        assert!(validate(&Array3::zeros((4, 4, 3))).is_ok());
        assert!(validate(&Array3::zeros((4, 4, 1))).is_ok());
        assert!(matches!(
            validate(&Array3::zeros((0, 4, 3))),
            Err(ExtractionError::InvalidInput { .. })
        ));
        assert!(matches!(
            validate(&Array3::zeros((4, 4, 2))),
            Err(ExtractionError::InvalidInput { .. })
        ));
    }

    // Tests luma weighting in RGB order
    // Verified by reading the channels as BGR
    #[test]
    fn test_to_plane_luma() {
        let mut raster = Array3::zeros((1, 3, 3));
        raster[[0, 0, 0]] = 100.0;
        raster[[0, 1, 1]] = 100.0;
        raster[[0, 2, 2]] = 100.0;

        let plane = to_plane(&raster);
        assert!((plane[[0, 0]] - 29.9).abs() < 1e-4);
        assert!((plane[[0, 1]] - 58.7).abs() < 1e-4);
        assert!((plane[[0, 2]] - 11.4).abs() < 1e-4);
    }

    // Tests single-channel conversions keep values
    // Verified by applying luma weights to one channel
    #[test]
    fn test_single_channel_round_trip() {
        let plane = array![[1.0_f32, 2.0], [3.0, 4.0]];
        let raster = plane_to_raster(plane.clone());

        assert_eq!(raster.dim(), (2, 2, 1));
        assert_eq!(to_plane(&raster), plane);
        assert_eq!(raster_to_plane(raster), plane);
    }

    // Tests mean intensity including the empty case
    // Verified by dividing by the row count
    #[test]
    fn test_mean_intensity() {
        assert_eq!(mean_intensity(&array![[1.0_f32, 2.0], [3.0, 6.0]]), 3.0);
        assert_eq!(mean_intensity(&Array2::zeros((0, 3))), 0.0);
    }

    // Tests constant padding placement
    // Verified by swapping top and left amounts
    #[test]
    fn test_pad_constant() {
        let plane = array![[1.0_f32, 2.0]];
        let padding = Padding {
            top: 1,
            bottom: 2,
            left: 3,
            right: 0,
        };

        let padded = pad_constant(&plane, padding, 9.0);
        assert_eq!(padded.dim(), (4, 5));
        assert_eq!(padded.slice(s![1, 3..]), array![1.0_f32, 2.0]);
        assert_eq!(padded[[0, 0]], 9.0);
        assert_eq!(padded[[3, 4]], 9.0);
        assert_eq!(padded.iter().filter(|&&v| v == 9.0).count(), 18);
    }

    // Tests cropping inside and outside the raster
    // Verified by swapping x and y
    #[test]
    fn test_crop() {
        let raster = Array3::from_shape_fn((4, 6, 1), |(y, x, _)| (10 * y + x) as f32);

        let window = crop(&raster, 2, 1, 3, 2).unwrap();
        assert_eq!(window.dim(), (2, 3, 1));
        assert_eq!(window[[0, 0, 0]], 12.0);
        assert_eq!(window[[1, 2, 0]], 24.0);

        assert!(crop(&raster, 4, 0, 3, 1).is_err());
        assert!(crop(&raster, 0, 3, 1, 2).is_err());
    }

    // Tests strip centring and clamping
    // Verified by centring on the left edge
    #[test]
    fn test_center_strip() {
        let raster = Array3::from_shape_fn((2, 20, 1), |(_, x, _)| x as f32);

        let strip = center_strip(&raster, 4);
        assert_eq!(strip.dim(), (2, 8, 1));
        assert_eq!(strip[[0, 0, 0]], 6.0);

        let clamped = center_strip(&raster, 50);
        assert_eq!(clamped.dim(), (2, 20, 1));
    }
}
