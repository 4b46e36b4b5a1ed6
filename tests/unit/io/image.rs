//! Tests for image file loading, quantization and saving

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use ndarray::Array3;
    use seamtile::ExtractionError;
    use seamtile::io::image::{load_raster, quantize, raster_from_rgb, raster_to_rgb, save_rgb};
    use tempfile::TempDir;

    // Tests rounding and clamping to bytes
    // Verified by truncating instead of rounding
    #[test]
    fn test_quantize() {
        assert_eq!(quantize(12.4), 12);
        assert_eq!(quantize(12.6), 13);
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(300.0), 255);
    }

    // Tests buffer to raster channel order
    // Verified by transposing x and y
    #[test]
    fn test_raster_from_rgb() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([10, 20, 30]));

        let raster = raster_from_rgb(&img);
        assert_eq!(raster.dim(), (2, 3, 3));
        assert_eq!(raster[[1, 2, 0]], 10.0);
        assert_eq!(raster[[1, 2, 2]], 30.0);
    }

    // Tests that single-channel rasters are replicated to grey
    // Verified by writing only the red channel
    #[test]
    fn test_grey_replicated() {
        let raster = Array3::from_elem((2, 2, 1), 77.0_f32);

        let img = raster_to_rgb(&raster).unwrap();
        assert_eq!(img.get_pixel(1, 1), &Rgb([77, 77, 77]));
    }

    // Tests saving into a missing directory and loading back
    // Verified by skipping parent directory creation
    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pattern.png");
        let img = RgbImage::from_fn(5, 4, |x, y| Rgb([(x * 40) as u8, (y * 50) as u8, 9]));

        save_rgb(&img, &path).unwrap();
        let raster = load_raster(&path).unwrap();

        assert_eq!(raster.dim(), (4, 5, 3));
        assert_eq!(raster[[3, 4, 0]], 160.0);
        assert_eq!(raster[[3, 4, 1]], 150.0);
        assert_eq!(raster[[3, 4, 2]], 9.0);
    }

    // Tests that missing files report their path
    // Verified by using the placeholder path
    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.png");

        match load_raster(&path) {
            Err(ExtractionError::ImageLoad { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
