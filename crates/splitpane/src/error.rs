//! Configuration errors raised by split construction and mutation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors surfaced by [`SplitInstance`](crate::SplitInstance) and the solver.
///
/// Every variant is a configuration error: it is raised before any state is
/// changed, so a failed call leaves the instance exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("expected {expected} sizes (one per region), got {actual}")]
    SizeCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} minimum sizes (one per region), got {actual}")]
    MinSizeCountMismatch { expected: usize, actual: usize },

    #[error("size at index {index} must be finite and non-negative (got {value})")]
    InvalidSize { index: usize, value: f64 },

    #[error("sizes must have a positive total")]
    ZeroTotalSize,

    #[error("sizes must sum to 100 (got {total})")]
    NotNormalized { total: f64 },

    #[error("minimum sizes need {required_percent:.3}% of the track, more than 100%")]
    MinimumsExceedTrack { required_percent: f64 },

    #[error("invalid {field} value {value}")]
    InvalidOption { field: &'static str, value: f64 },

    #[error("a split needs at least one region")]
    NoRegions,

    #[error("cannot {operation} a destroyed split")]
    Destroyed { operation: &'static str },
}
