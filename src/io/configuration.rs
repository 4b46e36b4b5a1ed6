//! Pipeline constants and runtime configuration defaults

// Correlation search geometry
/// Vertical padding of the horizontal search, as a fraction of image height
pub const ROUGH_VERTICAL_PAD_FRACTION: f64 = 0.07;
/// Horizontal padding of the drift search, as a fraction of strip height
pub const DRIFT_SEARCH_PAD_FRACTION: f64 = 0.07;
/// Width of the suppressed self-match band, as a fraction of the searched extent
pub const SELF_MATCH_SUPPRESSION_FRACTION: f64 = 0.1;
/// Correlation scores closer than this to the best one are ties
pub const SCORE_TIE_TOLERANCE: f32 = 1e-5;

/// Number of refined orientation passes after the rough pass
pub const DEFAULT_REFINEMENT_PASSES: usize = 1;

// Leveling
/// Extra margin trimmed from every side after rotation
pub const LEVELING_MARGIN_PX: usize = 5;

// Drift below this magnitude is treated as noise
/// Drift magnitude (pixels) that must be exceeded before shearing
pub const DRIFT_TOLERANCE_PX: i64 = 2;

// Luma weights (ITU-R BT.601)
/// Red contribution to intensity
pub const LUMA_RED: f32 = 0.299;
/// Green contribution to intensity
pub const LUMA_GREEN: f32 = 0.587;
/// Blue contribution to intensity
pub const LUMA_BLUE: f32 = 0.114;

/// Largest sample value of the internal raster scale
pub const SAMPLE_MAX: f32 = 255.0;

// Diagnostic preview layout
/// Number of tile repetitions per axis in the preview panel
pub const PREVIEW_REPEAT: usize = 3;
/// Gap between preview panels in pixels
pub const PANEL_GAP_PX: u32 = 8;
/// Canvas background of the preview
pub const PREVIEW_BACKGROUND: [u8; 3] = [255, 255, 255];
/// Fill used for the heat map panel when no search took place
pub const HEATMAP_PLACEHOLDER: [u8; 3] = [128, 128, 128];

// Output settings
/// Suffix added to extracted tile filenames
pub const TILE_OUTPUT_SUFFIX: &str = "_tile";
/// Suffix added to diagnostic preview filenames
pub const DEBUG_OUTPUT_SUFFIX: &str = "_debug";
/// File extension of every written image
pub const OUTPUT_EXTENSION: &str = "png";
/// Input file extensions picked up from directories
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
