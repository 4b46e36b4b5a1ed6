//! Batch processing with the fail-soft stacking policy
//!
//! Tile sizes are estimated per image, so a batch can produce tiles that do
//! not stack. In that case only the first item is returned together with a
//! [`ShapeMismatch`] describing the conflict; callers that need every item
//! should check `mismatch`.

use crate::algorithm::executor::{Extraction, SeamlessExtractor};
use crate::io::error::{Result, WithContext};
use crate::io::tensor::{ImageBatch, raster_from_batch_item, raster_to_unit, rgb_to_unit, stack_items};
use ndarray::{Array3, Array4, ArrayView4, Axis};
use std::fmt;

/// Scalar measurements of one extraction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMetrics {
    /// Width of the extracted tile
    pub tile_width: usize,
    /// Height of the extracted tile
    pub tile_height: usize,
    /// Source width divided by tile width
    pub width_ratio: f64,
    /// Source height divided by tile height
    pub height_ratio: f64,
}

impl From<&Extraction> for TileMetrics {
    fn from(extraction: &Extraction) -> Self {
        Self {
            tile_width: extraction.tile_width,
            tile_height: extraction.tile_height,
            width_ratio: extraction.width_ratio,
            height_ratio: extraction.height_ratio,
        }
    }
}

/// Output images of a batch could not be stacked
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Which output failed to stack
    pub output: &'static str,
    /// Shapes `(height, width, channels)` of every item, in batch order
    pub shapes: Vec<(usize, usize, usize)>,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch {} sizes differ ({}); returning only the first result",
            self.output,
            self.shapes
                .iter()
                .map(|(h, w, _)| format!("{w}x{h}"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Stacked results of a batch
#[derive(Clone, Debug)]
pub struct BatchOutput {
    /// Tiles as a unit-range tensor
    pub tiles: ImageBatch,
    /// Diagnostic previews as a unit-range tensor, when rendered
    pub diagnostics: Option<ImageBatch>,
    /// Measurements per returned item, in batch order
    pub metrics: Vec<TileMetrics>,
    /// Set when items could not be stacked and the output was truncated
    pub mismatch: Option<ShapeMismatch>,
}

impl BatchOutput {
    fn empty() -> Self {
        Self {
            tiles: Array4::zeros((0, 0, 0, 3)),
            diagnostics: None,
            metrics: Vec::new(),
            mismatch: None,
        }
    }

    /// Measurements of the first item, the scalar outputs of the batch
    pub fn primary(&self) -> Option<&TileMetrics> {
        self.metrics.first()
    }

    /// Number of returned items
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no item was returned
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Run the extractor over every batch item in order
///
/// # Errors
///
/// Returns [`crate::ExtractionError::BatchItem`] for the first failing image;
/// the remaining items are not processed
pub fn process_batch(
    extractor: &SeamlessExtractor,
    batch: &ArrayView4<'_, f32>,
) -> Result<BatchOutput> {
    let count = batch.len_of(Axis(0));
    if count == 0 {
        return Ok(BatchOutput::empty());
    }

    let mut extractions = Vec::with_capacity(count);
    for index in 0..count {
        let raster = raster_from_batch_item(batch, index)?;
        let extraction = extractor.extract(&raster).with_batch_index(index)?;
        extractions.push(extraction);
    }

    Ok(assemble(&extractions))
}

/// Stack extractions, falling back to the first item when shapes differ
pub fn assemble(extractions: &[Extraction]) -> BatchOutput {
    let Some(first) = extractions.first() else {
        return BatchOutput::empty();
    };

    let tiles: Vec<Array3<f32>> = extractions
        .iter()
        .map(|extraction| raster_to_unit(&extraction.tile))
        .collect();
    let previews: Option<Vec<Array3<f32>>> = extractions
        .iter()
        .map(|extraction| extraction.diagnostic.as_ref().map(rgb_to_unit))
        .collect();

    let stacked_tiles = stack_items(&tiles);
    let stacked_previews = previews.as_deref().map(stack_items);

    match (stacked_tiles, stacked_previews) {
        (Ok(tiles), None) => BatchOutput {
            tiles,
            diagnostics: None,
            metrics: extractions.iter().map(TileMetrics::from).collect(),
            mismatch: None,
        },
        (Ok(tiles), Some(Ok(diagnostics))) => BatchOutput {
            tiles,
            diagnostics: Some(diagnostics),
            metrics: extractions.iter().map(TileMetrics::from).collect(),
            mismatch: None,
        },
        (tiles_result, _) => {
            let (output, items) = if tiles_result.is_err() {
                ("tile", &tiles)
            } else {
                ("preview", previews.as_ref().unwrap_or(&tiles))
            };
            let mismatch = ShapeMismatch {
                output,
                shapes: items.iter().map(|item| item.dim()).collect(),
            };
            log::warn!("{mismatch}");
            first_only(first, mismatch)
        }
    }
}

fn first_only(first: &Extraction, mismatch: ShapeMismatch) -> BatchOutput {
    let tiles = raster_to_unit(&first.tile).insert_axis(Axis(0));
    let diagnostics = first
        .diagnostic
        .as_ref()
        .map(|preview| rgb_to_unit(preview).insert_axis(Axis(0)));
    BatchOutput {
        tiles,
        diagnostics,
        metrics: vec![TileMetrics::from(first)],
        mismatch: Some(mismatch),
    }
}
