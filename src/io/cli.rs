//! Command-line interface for extracting seamless tiles from image files

use crate::algorithm::executor::{ExtractorConfig, SeamlessExtractor};
use crate::io::configuration::{
    DEBUG_OUTPUT_SUFFIX, DEFAULT_REFINEMENT_PASSES, DRIFT_TOLERANCE_PX, LEVELING_MARGIN_PX,
    OUTPUT_EXTENSION, SUPPORTED_EXTENSIONS, TILE_OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_target};
use crate::io::image::{load_raster, raster_to_rgb, save_rgb};
use crate::io::progress::ProgressManager;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "seamtile")]
#[command(
    author,
    version,
    about = "Extract seamless tiles from photographed repeating patterns"
)]
/// Command-line arguments for the tile extraction tool
pub struct Cli {
    /// Input image or directory of images to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory for outputs (defaults to next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write the diagnostic preview (heat map, tile, 3x3 repetition)
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress progress output and informational logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Leveled orientation passes after the rough angle estimate
    #[arg(short, long, default_value_t = DEFAULT_REFINEMENT_PASSES)]
    pub passes: usize,

    /// Drift in pixels tolerated without shear correction
    #[arg(short = 't', long, default_value_t = DRIFT_TOLERANCE_PX)]
    pub drift_tolerance: i64,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Logging level implied by `--quiet` and `--verbose`
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Extractor parameters selected on the command line
    pub const fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            refinement_passes: self.passes,
            drift_tolerance_px: self.drift_tolerance,
            leveling_margin_px: LEVELING_MARGIN_PX,
            render_diagnostic: self.debug,
        }
    }
}

/// Install the global logger; `RUST_LOG` overrides the CLI level
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Orchestrates batch processing of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, extraction or export fails
    pub fn process(&mut self) -> Result<()> {
        let extractor = SeamlessExtractor::new(self.cli.extractor_config())?;
        let files = self.collect_files()?;

        if files.is_empty() {
            log::info!("Nothing to process");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(&extractor, file, index)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Image files selected by the target argument, sorted by path
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a supported image nor a
    /// readable directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_supported(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_target(
                    &self.cli.target,
                    "expected a PNG or JPEG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut images = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_supported(&path) {
                    images.push(path);
                }
            }
            let source_stems: HashSet<String> =
                images.iter().filter_map(|path| file_stem(path)).collect();

            let mut files: Vec<PathBuf> = images
                .into_iter()
                .filter(|path| !is_output(path, &source_stems) && self.should_process_file(path))
                .collect();
            files.sort();
            Ok(files)
        } else {
            Err(invalid_target(
                &self.cli.target,
                "expected an image file or a directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path, TILE_OUTPUT_SUFFIX);
        if output_path.exists() {
            log::info!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        extractor: &SeamlessExtractor,
        input_path: &Path,
        index: usize,
    ) -> Result<()> {
        let start_time = Instant::now();

        if let Some(ref pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let raster = load_raster(input_path)?;
        let progress = self.progress_manager.as_ref();
        let extraction = extractor.extract_with(&raster, |stage| {
            if let Some(pm) = progress {
                pm.stage(stage);
            }
        })?;

        let tile_path = self.output_path(input_path, TILE_OUTPUT_SUFFIX);
        save_rgb(&raster_to_rgb(&extraction.tile)?, &tile_path)?;

        if let Some(ref preview) = extraction.diagnostic {
            save_rgb(preview, self.output_path(input_path, DEBUG_OUTPUT_SUFFIX))?;
        }

        log::info!(
            "{}: tile {}x{}, ratios {:.3}x{:.3}, angle {:.2} deg, drift {} px ({:.2?})",
            input_path.display(),
            extraction.tile_width,
            extraction.tile_height,
            extraction.width_ratio,
            extraction.height_ratio,
            extraction.angle_deg,
            extraction.drift_x,
            start_time.elapsed()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file();
        }

        Ok(())
    }

    /// Output location for `input_path` with the given filename suffix
    pub fn output_path(&self, input_path: &Path, suffix: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{suffix}.{OUTPUT_EXTENSION}", stem.to_string_lossy());

        match (&self.cli.output_dir, input_path.parent()) {
            (Some(dir), _) => dir.join(output_name),
            (None, Some(parent)) => parent.join(output_name),
            (None, None) => PathBuf::from(output_name),
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
}

// A PNG named like an output of another image in the same directory was
// written by an earlier run. Suffixed names without a source are inputs.
fn is_output(path: &Path, source_stems: &HashSet<String>) -> bool {
    let is_png = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION));
    is_png
        && file_stem(path).is_some_and(|stem| {
            [TILE_OUTPUT_SUFFIX, DEBUG_OUTPUT_SUFFIX]
                .iter()
                .filter_map(|suffix| stem.strip_suffix(*suffix))
                .any(|source| source_stems.contains(source))
        })
}
