use crate::{
    analysis::orientation::OrientationEstimator,
    analysis::rectify::Rectifier,
    analysis::shear::ShearCorrector,
    analysis::vertical::VerticalPeriodEstimator,
    io::configuration::{DEFAULT_REFINEMENT_PASSES, DRIFT_TOLERANCE_PX, LEVELING_MARGIN_PX},
    io::error::Result,
    io::visualization::render_diagnostic,
    spatial::grid::{Raster, center_strip, to_plane, validate},
    spatial::tiles::TileSelector,
};
use image::RgbImage;
use ndarray::Array2;
use std::fmt;

/// Extractor parameters controlling the measurement stages
#[derive(Clone, Copy, Debug)]
pub struct ExtractorConfig {
    /// Leveled orientation passes after the rough pass
    pub refinement_passes: usize,
    /// Drift (pixels) tolerated without shearing
    pub drift_tolerance_px: i64,
    /// Extra border trimmed after rotation
    pub leveling_margin_px: usize,
    /// Whether to render the diagnostic preview
    pub render_diagnostic: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            refinement_passes: DEFAULT_REFINEMENT_PASSES,
            drift_tolerance_px: DRIFT_TOLERANCE_PX,
            leveling_margin_px: LEVELING_MARGIN_PX,
            render_diagnostic: false,
        }
    }
}

/// Pipeline stage about to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Angle and horizontal period estimation
    Orientation,
    /// Rotation and border trim
    Rectification,
    /// Vertical period and drift estimation
    VerticalPeriod,
    /// Shear removal
    ShearCorrection,
    /// Seam-cost search and crop
    TileSelection,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Self; 5] = [
        Self::Orientation,
        Self::Rectification,
        Self::VerticalPeriod,
        Self::ShearCorrection,
        Self::TileSelection,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Orientation => "orientation",
            Self::Rectification => "rectification",
            Self::VerticalPeriod => "vertical period",
            Self::ShearCorrection => "shear correction",
            Self::TileSelection => "tile selection",
        };
        f.write_str(name)
    }
}

/// Everything measured and produced for one image
#[derive(Clone, Debug)]
pub struct Extraction {
    /// Selected seamless tile
    pub tile: Raster,
    /// Seam cost per candidate origin
    pub cost_map: Array2<f32>,
    /// Width of the extracted tile
    pub tile_width: usize,
    /// Height of the extracted tile
    pub tile_height: usize,
    /// Source width divided by tile width
    pub width_ratio: f64,
    /// Source height divided by tile height
    pub height_ratio: f64,
    /// Leveling angle in degrees
    pub angle_deg: f64,
    /// Horizontal drift over one vertical period before correction
    pub drift_x: i64,
    /// Whether a shear was applied
    pub sheared: bool,
    /// Tile origin `(x, y)` in the leveled image
    pub origin: (usize, usize),
    /// Diagnostic preview when enabled
    pub diagnostic: Option<RgbImage>,
}

/// Seamless tile extraction pipeline
pub struct SeamlessExtractor {
    config: ExtractorConfig,
    orientation: OrientationEstimator,
    rectifier: Rectifier,
    vertical: VerticalPeriodEstimator,
    shear: ShearCorrector,
    selector: TileSelector,
}

impl SeamlessExtractor {
    /// Create an extractor from the given parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let rectifier = Rectifier::new(config.leveling_margin_px);
        Ok(Self {
            config,
            orientation: OrientationEstimator::new(rectifier, config.refinement_passes)?,
            rectifier,
            vertical: VerticalPeriodEstimator::new(),
            shear: ShearCorrector::new(config.drift_tolerance_px),
            selector: TileSelector::new(),
        })
    }

    /// Parameters in use
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the best seamless tile from `raster`
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or a stage fails
    pub fn extract(&self, raster: &Raster) -> Result<Extraction> {
        self.extract_with(raster, |_| {})
    }

    /// Extract the best seamless tile, reporting each stage before it runs
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or a stage fails
    pub fn extract_with<F>(&self, raster: &Raster, mut on_stage: F) -> Result<Extraction>
    where
        F: FnMut(Stage),
    {
        validate(raster)?;
        let (source_height, source_width, _) = raster.dim();

        on_stage(Stage::Orientation);
        let orientation = self.orientation.estimate(&to_plane(raster))?;
        let tile_width = orientation.tile_width.max(1);

        on_stage(Stage::Rectification);
        let mut leveled = self.rectifier.rotate(raster, orientation.angle_deg)?;

        on_stage(Stage::VerticalPeriod);
        let period = self
            .vertical
            .estimate(&center_strip(&leveled, tile_width))?;

        on_stage(Stage::ShearCorrection);
        let sheared = self.shear.needs_correction(period.drift_x);
        if sheared {
            leveled = self
                .shear
                .shear(&leveled, period.drift_x, period.tile_height)?;
        }

        on_stage(Stage::TileSelection);
        let selection = self
            .selector
            .select_best_tile(&leveled, tile_width, period.tile_height)?;

        let (final_height, final_width, _) = selection.tile.dim();
        let width_ratio = ratio(source_width, final_width);
        let height_ratio = ratio(source_height, final_height);

        log::debug!(
            "angle {:.3} deg, drift {} px, tile {final_width}x{final_height} at {:?}",
            orientation.angle_deg,
            period.drift_x,
            selection.origin
        );

        let diagnostic = if self.config.render_diagnostic {
            Some(render_diagnostic(&selection.cost_map, &selection.tile)?)
        } else {
            None
        };

        Ok(Extraction {
            tile: selection.tile,
            cost_map: selection.cost_map,
            tile_width: final_width,
            tile_height: final_height,
            width_ratio,
            height_ratio,
            angle_deg: orientation.angle_deg,
            drift_x: period.drift_x,
            sheared,
            origin: selection.origin,
            diagnostic,
        })
    }
}

// Zero-sized tiles report a neutral ratio
fn ratio(source: usize, tile: usize) -> f64 {
    if tile > 0 {
        source as f64 / tile as f64
    } else {
        1.0
    }
}
