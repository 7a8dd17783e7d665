//! Validation errors raised before any statistic is computed.

use thiserror::Error;

/// Input rejected by one of the public entry points.
///
/// Entry points return `anyhow::Result`; recover the variant with
/// `err.downcast_ref::<ValidationError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("p-value input must be 2D (n_rows, n_tests), got {ndim} dimension(s)")]
    NotTwoDimensional { ndim: usize },

    #[error("p-value at ({row}, {col}) is not numeric")]
    NonNumeric { row: usize, col: usize },

    #[error("p-value at ({row}, {col}) is outside [0, 1]: {value}")]
    OutOfRange { row: usize, col: usize, value: f64 },

    #[error("background size must be numeric and non-negative, got {value}")]
    InvalidBackground { value: f64 },

    #[error("continuity correction must be numeric and non-negative, got {value}")]
    InvalidContinuityCorrection { value: f64 },

    #[error(
        "background size {background} is smaller than the {observed} features observed for source '{source_name}'"
    )]
    BackgroundTooSmall {
        source_name: String,
        background: u64,
        observed: u64,
    },
}
