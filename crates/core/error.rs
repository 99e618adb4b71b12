//! Error types for quadtree lineage construction.

use quadlineage_types::metadata::MetadataError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LineageError>;

/// Everything that can abort a build. Nothing here is retried; the caller
/// has to fix the input or parameters and run again.
#[derive(Error, Debug)]
pub enum LineageError {
    #[error("Must have a {column} column in the sample metadata")]
    MissingColumn { column: String },

    #[error("x coordinates and/or y coordinates have no numeric values, please check your data")]
    NoNumericData,

    #[error(
        "The threshold for subdivision ({threshold}) is too small for {points} points, \
         please choose a larger threshold for division"
    )]
    ThresholdTooSmall { threshold: usize, points: usize },

    #[error(
        "The threshold for subdivision ({threshold}) is greater than the amount of \
         samples ({samples}), please choose a smaller threshold for division"
    )]
    NoSubdivision { threshold: usize, samples: usize },

    #[error("Quadrant {path} cannot be subdivided: its {points} points all share one location")]
    DegenerateSubdivision { path: String, points: usize },

    #[error("Subdivision of quadrant {path} exceeded the maximum depth of {max_depth}")]
    DepthLimitExceeded { path: String, max_depth: usize },

    #[error(
        "One or more samples are missing metadata ({}). Check inputs or use the ignore \
         missing-data policy to drop these samples", .samples.join(", ")
    )]
    MissingData { samples: Vec<String> },

    #[error("Invalid metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LineageError {
    /// Errors caused by the input data rather than the parameters.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::NoNumericData
                | Self::MissingData { .. }
                | Self::Metadata(_)
                | Self::Parse { .. }
                | Self::InvalidInput(_)
        )
    }

    /// Errors caused by the subdivision parameters or a degenerate point set.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::ThresholdTooSmall { .. }
                | Self::NoSubdivision { .. }
                | Self::DegenerateSubdivision { .. }
                | Self::DepthLimitExceeded { .. }
                | Self::InvalidConfig(_)
        )
    }
}
