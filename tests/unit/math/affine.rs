//! Tests for affine matrices and inverse-mapped warping

#[cfg(test)]
mod tests {
    use ndarray::Array3;
    use seamtile::math::affine::{Affine2, warp_affine};

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    // Tests rotation direction and centre handling
    // Verified by negating the sine terms
    #[test]
    fn test_rotation_about_center() {
        let rotation = Affine2::rotation((2.0, 2.0), 90.0);

        assert!(close(rotation.apply(2.0, 2.0), (2.0, 2.0)));
        assert!(close(rotation.apply(4.0, 0.0), (0.0, 0.0)));
        assert!(close(rotation.apply(3.0, 2.0), (2.0, 1.0)));
    }

    // Tests that a rotation by the angle of a vector levels it
    // Verified by rotating with the opposite angle
    #[test]
    fn test_rotation_levels_vector() {
        let angle = 3.0_f64.atan2(40.0).to_degrees();
        let rotation = Affine2::rotation((0.0, 0.0), angle);

        let (x, y) = rotation.apply(40.0, 3.0);
        assert!(y.abs() < 1e-9);
        assert!((x - 1609.0_f64.sqrt()).abs() < 1e-9);
    }

    // Tests that the inverse undoes the transform
    // Verified by omitting the translation from the inverse
    #[test]
    fn test_inverse_round_trip() {
        let transform = Affine2::rotation((10.0, 7.0), 23.0).with_translation(4.0, -2.5);
        let inverse = transform.inverse().unwrap();

        let (x, y) = transform.apply(3.5, -8.0);
        assert!(close(inverse.apply(x, y), (3.5, -8.0)));
    }

    // Tests that singular matrices are rejected
    // Verified by dividing without the determinant check
    #[test]
    fn test_singular_inverse_rejected() {
        let singular = Affine2 {
            m: [[1.0, 2.0, 0.0], [2.0, 4.0, 0.0]],
        };

        assert!(singular.inverse().is_err());
        assert!(Affine2::identity().inverse().is_ok());
    }

    // Tests horizontal extent of a sheared rectangle
    // Verified by only mapping the top corners
    #[test]
    fn test_shear_bounds() {
        let shear = Affine2::horizontal_shear(-0.5);

        assert_eq!(shear.horizontal_bounds(10.0, 4.0), (-2.0, 10.0));
        assert_eq!(
            Affine2::horizontal_shear(0.25).horizontal_bounds(10.0, 4.0),
            (0.0, 11.0)
        );
    }

    // Tests identity and translated warps
    // Verified by sampling the forward instead of the inverse mapping
    #[test]
    fn test_warp_translation() {
        let source = Array3::from_shape_fn((3, 4, 1), |(y, x, _)| (x + 4 * y) as f32);

        let same = warp_affine(&source, &Affine2::identity(), 4, 3).unwrap();
        assert_eq!(same, source);

        let shifted = warp_affine(
            &source,
            &Affine2::identity().with_translation(1.0, 0.0),
            5,
            3,
        )
        .unwrap();
        assert_eq!(shifted.dim(), (3, 5, 1));
        assert_eq!(shifted[[1, 0, 0]], 4.0);
        assert_eq!(shifted[[1, 1, 0]], 4.0);
        assert_eq!(shifted[[1, 4, 0]], 7.0);
    }
}
