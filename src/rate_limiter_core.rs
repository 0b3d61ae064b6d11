//! Core trait for admission controllers.
//!
//! This module defines the single-unit admission seam shared by the cooldown
//! gate and the token bucket, so callers (and [`SharedLimiter`](crate::sync::SharedLimiter))
//! can treat either one as "something that says yes or no".

pub use crate::types::Uint;

/// The core trait implemented by every admission controller in this crate.
///
/// Both methods mutate the limiter on admission. Neither is internally
/// synchronized; wrap the limiter in a [`SharedLimiter`](crate::sync::SharedLimiter)
/// or confine it to one task to share it.
pub trait RateLimiterCore {
    /// Attempts to admit one unit of work at the limiter's own clock time.
    ///
    /// # Returns
    /// `true` if admitted, `false` if rejected.
    fn try_admit(&mut self) -> bool;

    /// Attempts to admit one unit of work at the given tick.
    ///
    /// # Arguments
    /// * `tick` - Current time tick, from the same clock the limiter uses
    fn try_admit_at(&mut self, tick: Uint) -> bool;
}
