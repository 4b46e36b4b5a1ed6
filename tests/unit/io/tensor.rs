//! Tests for unit-range tensor conversion and stacking

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use ndarray::{Array3, Array4};
    use seamtile::io::tensor::{raster_from_batch_item, raster_to_unit, rgb_to_unit, stack_items};

    // Tests item extraction rescales to the raster range
    // Verified by skipping the rescale
    #[test]
    fn test_batch_item_rescaled() {
        let batch = Array4::from_shape_fn((2, 3, 4, 3), |(b, _, _, _)| 0.5 * b as f32);

        let raster = raster_from_batch_item(&batch.view(), 1).unwrap();
        assert_eq!(raster.dim(), (3, 4, 3));
        assert!(raster.iter().all(|&v| (v - 127.5).abs() < 1e-4));

        assert!(raster_from_batch_item(&batch.view(), 2).is_err());
    }

    // Tests out-of-range samples are clamped
    // Verified by removing the clamp
    #[test]
    fn test_unit_conversion_clamped() {
        let raster = Array3::from_shape_vec((1, 3, 1), vec![-10.0, 51.0, 300.0]).unwrap();

        let unit = raster_to_unit(&raster);
        assert_eq!(unit[[0, 0, 0]], 0.0);
        assert!((unit[[0, 1, 0]] - 0.2).abs() < 1e-6);
        assert_eq!(unit[[0, 2, 0]], 1.0);
    }

    // Tests byte images map to unit range
    // Verified by dividing by 256
    #[test]
    fn test_rgb_to_unit() {
        let img = RgbImage::from_pixel(2, 1, Rgb([0, 255, 51]));

        let unit = rgb_to_unit(&img);
        assert_eq!(unit.dim(), (1, 2, 3));
        assert_eq!(unit[[0, 1, 1]], 1.0);
        assert!((unit[[0, 1, 2]] - 0.2).abs() < 1e-6);
    }

    // Tests stacking equal and unequal shapes
    // Verified by padding smaller items
    #[test]
    fn test_stack_items() {
        let equal = vec![Array3::zeros((2, 2, 3)), Array3::ones((2, 2, 3))];
        let stacked = stack_items(&equal).unwrap();
        assert_eq!(stacked.dim(), (2, 2, 2, 3));
        assert_eq!(stacked[[1, 0, 0, 0]], 1.0);

        let unequal = vec![Array3::zeros((2, 2, 3)), Array3::zeros((3, 2, 3))];
        assert!(stack_items(&unequal).is_err());
        assert!(stack_items(&[]).is_err());
    }
}
