//! Error type shared by the pipeline, the batch adapter and the CLI

use std::fmt;
use std::path::PathBuf;

/// Everything that can stop an extraction
#[derive(Debug)]
pub enum ExtractionError {
    /// An input image could not be opened or decoded
    ImageLoad {
        /// File that was being read
        path: PathBuf,
        /// Decoder error
        source: image::ImageError,
    },

    /// Source image is empty or has an unsupported layout
    ///
    /// Raised before any pipeline stage runs.
    InvalidInput {
        /// What is wrong with the image
        reason: String,
    },

    /// A configuration value is out of range
    InvalidParameter {
        /// Parameter name as exposed to callers
        parameter: &'static str,
        /// Rejected value, rendered as text
        value: String,
        /// Accepted range or rule
        reason: String,
    },

    /// A tile or preview could not be encoded or written
    ImageExport {
        /// Destination file
        path: PathBuf,
        /// Encoder error
        source: image::ImageError,
    },

    /// Directory scanning or creation failed
    FileSystem {
        /// Path being accessed
        path: PathBuf,
        /// What was being done, e.g. `"create directory"`
        operation: &'static str,
        /// OS error
        source: std::io::Error,
    },

    /// Numerical primitive was called with arguments it cannot handle
    Computation {
        /// Primitive that rejected its inputs
        operation: &'static str,
        /// Offending sizes or values
        reason: String,
    },

    /// A single image of a batch failed, aborting the batch
    BatchItem {
        /// Position of the failing image in the batch
        index: usize,
        /// Error raised while processing that image
        source: Box<ExtractionError>,
    },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "cannot read image {}: {source}", path.display())
            }
            Self::InvalidInput { reason } => write!(f, "unusable input image: {reason}"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => write!(f, "{parameter} = '{value}' rejected: {reason}"),
            Self::ImageExport { path, source } => {
                write!(f, "cannot write image {}: {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => write!(f, "{operation} failed for {}: {source}", path.display()),
            Self::Computation { operation, reason } => write!(f, "{operation}: {reason}"),
            Self::BatchItem { index, source } => write!(f, "Batch item {index} failed: {source}"),
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::BatchItem { source, .. } => Some(source.as_ref()),
            Self::InvalidInput { .. }
            | Self::InvalidParameter { .. }
            | Self::Computation { .. } => None,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Where in a larger job an error happened
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Position of the image inside a batch
    pub batch_index: Option<usize>,
}

/// Attaches [`ErrorContext`] to fallible results
pub trait WithContext<T> {
    /// Convert the error and attach `context`
    ///
    /// # Errors
    ///
    /// Returns the converted error, wrapped when the context names a batch item
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Attribute the error to one image of a batch
    ///
    /// # Errors
    ///
    /// Returns the error wrapped as [`ExtractionError::BatchItem`]
    fn with_batch_index(self, index: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<ExtractionError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|inner| match (context.batch_index, inner.into()) {
            // Already attributed errors keep their original index
            (_, nested @ ExtractionError::BatchItem { .. }) | (None, nested) => nested,
            (Some(index), other) => ExtractionError::BatchItem {
                index,
                source: Box::new(other),
            },
        })
    }

    fn with_batch_index(self, index: usize) -> Result<T> {
        self.with_context(ErrorContext {
            batch_index: Some(index),
        })
    }
}

impl From<image::ImageError> for ExtractionError {
    fn from(source: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::new(),
            source,
        }
    }
}

impl From<std::io::Error> for ExtractionError {
    fn from(source: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::new(),
            operation: "read directory",
            source,
        }
    }
}

/// Build an [`ExtractionError::InvalidInput`]
pub fn invalid_input(reason: &impl ToString) -> ExtractionError {
    ExtractionError::InvalidInput {
        reason: reason.to_string(),
    }
}

/// Build an [`ExtractionError::InvalidParameter`]
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ExtractionError {
    ExtractionError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Build an [`ExtractionError::Computation`]
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> ExtractionError {
    ExtractionError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Reject a CLI target that is neither a supported image nor a directory
pub fn invalid_target(target: &std::path::Path, reason: &str) -> ExtractionError {
    ExtractionError::InvalidParameter {
        parameter: "target",
        value: target.display().to_string(),
        reason: reason.to_string(),
    }
}
