/// Batch processing and output stacking
pub mod batch;
/// Main extraction pipeline and orchestration
pub mod executor;
