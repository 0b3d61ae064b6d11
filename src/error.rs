//! error.rs
//! Fast-path and verbose acquire errors, plus construction-time configuration errors.

use crate::types::Uint;
use thiserror::Error;

/// Error type for fast-path acquisition. No extra diagnostic information.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimpleAcquireError {
    /// Not enough credit right now; the request was denied.
    #[error("Insufficient capacity (fast path).")]
    InsufficientCapacity,
    /// `quantity * rate` does not fit in a [`Uint`].
    #[error("Requested quantity overflows the cost computation (fast path).")]
    QuantityOverflow,
    /// A shared limiter was locked by another caller.
    #[error("Contention failure (fast path).")]
    ContentionFailure,
}

/// Result type for fast-path acquisition.
pub type SimpleAcquireResult = Result<(), SimpleAcquireError>;

/// Error type for verbose acquisition. Contains diagnostic information.
///
/// All credit values are in ticks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerboseAcquireError {
    /// Not enough credit available yet.
    #[error(
        "Insufficient capacity: tried to acquire {quantity} (cost {cost}), available {available}, retry after {retry_after_ticks} tick(s)."
    )]
    InsufficientCapacity {
        quantity: Uint,
        cost: Uint,
        available: Uint,
        retry_after_ticks: Uint,
    },
    /// The cost is larger than the bucket can ever hold.
    #[error(
        "Request exceeds maximum capacity: tried to acquire {quantity} (cost {cost}), capacity {capacity}. This request cannot succeed."
    )]
    BeyondCapacity {
        quantity: Uint,
        cost: Uint,
        capacity: Uint,
    },
    /// `quantity * rate` does not fit in a [`Uint`].
    #[error("Quantity {quantity} at rate {rate} overflows the cost computation.")]
    QuantityOverflow { quantity: Uint, rate: Uint },
}

/// Result type for verbose acquisition.
pub type VerboseAcquireResult = Result<(), VerboseAcquireError>;

impl From<VerboseAcquireError> for SimpleAcquireError {
    fn from(err: VerboseAcquireError) -> Self {
        match err {
            VerboseAcquireError::InsufficientCapacity { .. }
            | VerboseAcquireError::BeyondCapacity { .. } => SimpleAcquireError::InsufficientCapacity,
            VerboseAcquireError::QuantityOverflow { .. } => SimpleAcquireError::QuantityOverflow,
        }
    }
}

/// Errors raised while building a limiter from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_permits must be greater than 0")]
    ZeroPermits,

    #[error("window of {window_ticks} tick(s) split into {max_permits} permit(s) gives a zero rate")]
    ZeroRate { window_ticks: Uint, max_permits: Uint },

    #[error("duration of {nanos} ns does not fit in a tick counter")]
    DurationOverflow { nanos: u128 },

    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}
