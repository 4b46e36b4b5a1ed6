//! Diagnostic preview composition
//!
//! The preview shows, left to right, the seam cost heat map (blue = good,
//! red = bad), the selected tile, and the tile repeated on a 3x3 grid so
//! remaining seams are easy to spot.

use crate::io::configuration::{
    HEATMAP_PLACEHOLDER, PANEL_GAP_PX, PREVIEW_BACKGROUND, PREVIEW_REPEAT,
};
use crate::io::error::Result;
use crate::io::image::raster_to_rgb;
use crate::spatial::grid::Raster;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array2;

/// Render the diagnostic preview for one extraction
///
/// # Errors
///
/// Returns an error if the tile cannot be converted to an image buffer
pub fn render_diagnostic(cost_map: &Array2<f32>, tile: &Raster) -> Result<RgbImage> {
    let tile_img = raster_to_rgb(tile)?;
    let repeated = repeat_tile(&tile_img, PREVIEW_REPEAT as u32);
    let panel_height = repeated.height().max(1);

    let heat = if cost_map.len() > 1 {
        let raw = heatmap(cost_map);
        let scaled_width = (u64::from(raw.width()) * u64::from(panel_height)
            / u64::from(raw.height().max(1)))
        .clamp(1, u64::from(u32::MAX)) as u32;
        imageops::resize(&raw, scaled_width, panel_height, FilterType::Nearest)
    } else {
        RgbImage::from_pixel(
            repeated.width().max(1),
            panel_height,
            Rgb(HEATMAP_PLACEHOLDER),
        )
    };

    let canvas_width = heat.width() + PANEL_GAP_PX + tile_img.width() + PANEL_GAP_PX + repeated.width();
    let mut canvas = RgbImage::from_pixel(canvas_width, panel_height, Rgb(PREVIEW_BACKGROUND));

    let mut x = 0_i64;
    for panel in [&heat, &tile_img, &repeated] {
        imageops::replace(&mut canvas, panel, x, 0);
        x += i64::from(panel.width()) + i64::from(PANEL_GAP_PX);
    }

    Ok(canvas)
}

/// Min-max normalized cost map in the jet colour map
pub fn heatmap(cost_map: &Array2<f32>) -> RgbImage {
    let (rows, cols) = cost_map.dim();
    let (lo, hi) = cost_map
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;

    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let value = cost_map
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(lo);
        let t = if range > 0.0 { (value - lo) / range } else { 0.0 };
        Rgb(jet(t))
    })
}

/// Jet colour for `t` in `[0, 1]`, blue at 0 and red at 1
pub fn jet(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let channel = |center: f32| {
        let v = (1.5 - 4.0_f32.mul_add(t, -center).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    [channel(3.0), channel(2.0), channel(1.0)]
}

/// Tile the image `times x times`
pub fn repeat_tile(tile: &RgbImage, times: u32) -> RgbImage {
    let (width, height) = tile.dimensions();
    let mut grid = RgbImage::new(width * times, height * times);
    for row in 0..times {
        for col in 0..times {
            imageops::replace(
                &mut grid,
                tile,
                i64::from(col * width),
                i64::from(row * height),
            );
        }
    }
    grid
}
