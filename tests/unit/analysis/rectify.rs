//! Tests for rotation with border trimming

#[cfg(test)]
mod tests {
    use crate::common::noise_plane;
    use ndarray::{Array3, s};
    use seamtile::analysis::rectify::Rectifier;

    // Tests trim sizes for level and tilted rotations
    // Verified by swapping the width and height terms
    #[test]
    fn test_margins() {
        let rectifier = Rectifier::default();

        assert_eq!(rectifier.margins(100, 50, 0.0), (5, 5));
        assert_eq!(rectifier.margins(100, 50, 10.0), (13, 22));
        assert_eq!(rectifier.margins(100, 50, -10.0), (13, 22));
        assert_eq!(Rectifier::new(0).margins(100, 50, 0.0), (0, 0));
    }

    // Tests that a zero-angle leveling is a pure crop
    // Verified by skipping the crop at zero angle
    #[test]
    fn test_zero_angle_crops() {
        let plane = noise_plane(40, 30, 41);
        let raster = plane.clone().insert_axis(ndarray::Axis(2));

        let leveled = Rectifier::default().rotate(&raster, 0.0).unwrap();
        assert_eq!(leveled.dim(), (20, 30, 1));
        assert_eq!(leveled.slice(s![.., .., 0]), plane.slice(s![5..25, 5..35]));
    }

    // Tests that trims consuming the image are skipped
    // Verified by cropping regardless of size
    #[test]
    fn test_small_image_not_trimmed() {
        let raster = Array3::from_shape_fn((8, 8, 3), |(y, x, c)| (x + y + c) as f32);

        let leveled = Rectifier::default().rotate(&raster, 0.0).unwrap();
        assert_eq!(leveled, raster);
    }

    // Tests rotation direction on a marked pixel
    // Verified by inverting the rotation sign
    #[test]
    fn test_quarter_turn_direction() {
        let mut raster = Array3::zeros((5, 5, 1));
        raster[[0, 4, 0]] = 100.0;

        let rotated = Rectifier::new(0).rotate(&raster, 90.0).unwrap();
        assert_eq!(rotated.dim(), (5, 5, 1));
        assert!((rotated[[0, 0, 0]] - 100.0).abs() < 1e-3);
        assert!(rotated[[0, 4, 0]].abs() < 1e-3);
    }
}
