/// Command-line interface and file processing
pub mod cli;
/// Algorithm constants and output naming
pub mod configuration;
/// Error types and context propagation
pub mod error;
/// Image file loading and saving
pub mod image;
/// Progress display for multi-file runs
pub mod progress;
/// Conversion between unit-range batch tensors and rasters
pub mod tensor;
/// Diagnostic preview rendering
pub mod visualization;
