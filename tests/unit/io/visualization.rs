//! Tests for the diagnostic preview, heat map colouring and tile repetition

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use ndarray::{Array2, Array3, array};
    use seamtile::io::visualization::{heatmap, jet, render_diagnostic, repeat_tile};

    // Tests the colour map end points
    // Verified by reversing the colour map
    #[test]
    fn test_jet_endpoints() {
        let low = jet(0.0);
        let high = jet(1.0);

        assert!(low[2] > low[0]);
        assert!(high[0] > high[2]);
        assert_eq!(jet(-4.0), low);
        assert_eq!(jet(7.0), high);
        assert_eq!(jet(0.5)[1], 255);
    }

    // Tests heat map size and normalization
    // Verified by skipping the min-max normalization
    #[test]
    fn test_heatmap() {
        let costs = array![[0.0_f32, 10.0, 20.0], [5.0, 15.0, 20.0]];

        let heat = heatmap(&costs);
        assert_eq!(heat.dimensions(), (3, 2));
        assert_eq!(heat.get_pixel(0, 0).0, jet(0.0));
        assert_eq!(heat.get_pixel(2, 1).0, jet(1.0));

        let flat = heatmap(&Array2::from_elem((2, 2), 3.0_f32));
        assert!(flat.pixels().all(|p| p.0 == jet(0.0)));
    }

    // Tests tile repetition layout
    // Verified by swapping row and column offsets
    #[test]
    fn test_repeat_tile() {
        let mut tile = RgbImage::new(2, 3);
        tile.put_pixel(1, 2, Rgb([9, 9, 9]));

        let grid = repeat_tile(&tile, 3);
        assert_eq!(grid.dimensions(), (6, 9));
        assert_eq!(grid.get_pixel(5, 8), &Rgb([9, 9, 9]));
        assert_eq!(grid.get_pixel(3, 5), &Rgb([9, 9, 9]));
        assert_eq!(grid.get_pixel(2, 2), &Rgb([0, 0, 0]));
    }

    // Tests the placeholder panel when no search took place
    // Verified by scaling the single cost cell instead
    #[test]
    fn test_preview_placeholder() {
        let tile = Array3::from_elem((4, 4, 3), 200.0_f32);

        let preview = render_diagnostic(&Array2::zeros((1, 1)), &tile).unwrap();
        assert_eq!(preview.dimensions(), (12 + 8 + 4 + 8 + 12, 12));
        assert_eq!(preview.get_pixel(0, 0), &Rgb([128, 128, 128]));
        assert_eq!(preview.get_pixel(14, 0), &Rgb([255, 255, 255]));
        assert_eq!(preview.get_pixel(20, 0), &Rgb([200, 200, 200]));
        assert_eq!(preview.get_pixel(20, 11), &Rgb([255, 255, 255]));
    }

    // Tests heat map scaling to the panel height
    // Verified by leaving the heat map unscaled
    #[test]
    fn test_preview_heatmap_scaled() {
        let tile = Array3::from_elem((4, 4, 1), 50.0_f32);
        let costs = Array2::from_shape_fn((6, 10), |(y, x)| (x + y) as f32);

        let preview = render_diagnostic(&costs, &tile).unwrap();
        assert_eq!(preview.dimensions(), (20 + 8 + 4 + 8 + 12, 12));
        assert_eq!(preview.get_pixel(0, 0).0, jet(0.0));
        assert_eq!(preview.get_pixel(19, 11).0, jet(1.0));
        assert_eq!(preview.get_pixel(40, 0), &Rgb([50, 50, 50]));
    }
}
