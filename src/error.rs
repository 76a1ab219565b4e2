//! Error types.
use thiserror::Error;

/// Reasons why an integration request is rejected before any integrand evaluation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The number of integration variables is zero.
    #[error("the dimension must be positive")]
    ZeroDimension,

    /// No lower bounds were given.
    #[error("the lower bounds are empty")]
    EmptyLowerBounds,

    /// No upper bounds were given.
    #[error("the upper bounds are empty")]
    EmptyUpperBounds,

    /// The bound sequences do not have one entry per dimension.
    #[error("expected {dim} bounds per side, got {lower} lower and {upper} upper bounds")]
    BoundsLengthMismatch {
        /// The requested dimension.
        dim: usize,
        /// Number of lower bounds.
        lower: usize,
        /// Number of upper bounds.
        upper: usize,
    },

    /// A bound is infinite or NaN.
    #[error("the bounds of axis {axis} are not finite")]
    NonFiniteBound {
        /// The offending axis.
        axis: usize,
    },

    /// The lower bound of an axis is larger than its upper bound.
    #[error("the lower bound of axis {axis} exceeds its upper bound")]
    InvertedBounds {
        /// The offending axis.
        axis: usize,
    },

    /// The step count is not finite or does not give at least one subdivision.
    #[error("the step count must be at least one subdivision per axis")]
    InvalidStepCount,

    /// The coordinate seed cannot hold a full sample point.
    #[error("the coordinate seed has {len} entries, but the dimension is {dim}")]
    SeedTooShort {
        /// The requested dimension.
        dim: usize,
        /// Length of the seed.
        len: usize,
    },

    /// The partition axis does not exist.
    #[error("cannot partition along axis {axis} of a {dim}-dimensional domain")]
    PartitionAxisOutOfRange {
        /// The requested axis.
        axis: usize,
        /// The dimension of the domain.
        dim: usize,
    },
}

/// Everything that can go wrong in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The request failed validation on this worker.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The root worker rejected the request, so this worker did not compute.
    #[error("the root worker rejected the integration request")]
    RejectedByRoot,

    /// The root worker was not given a request to distribute.
    #[error("the root worker has no integration request")]
    MissingRequest,

    /// Exchanging data between workers failed.
    #[error("communication failed: {0}")]
    Communication(String),

    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization to JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;
