//! Serialized sharing of one limiter between threads.
//!
//! The gate and the bucket are plain single-owner state machines. Callers that
//! need several threads to admit against one limit must serialize access
//! themselves; [`SharedLimiter`] is the ready-made way to do that.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::error::SimpleAcquireError;
use crate::rate_limiter_core::RateLimiterCore;
use crate::Uint;

/// A limiter behind an `Arc<Mutex<_>>`.
///
/// Clones share the same limiter. A poisoned lock is recovered, since the
/// limiter's state is valid between any two operations.
///
/// # Example
///
/// ```rust
/// use rate_gate_core::ManualClock;
/// use rate_gate_core::cores::TokenBucket;
/// use rate_gate_core::sync::SharedLimiter;
///
/// let bucket = TokenBucket::from_ticks(2, 10, ManualClock::new(0)).unwrap();
/// let shared = SharedLimiter::new(bucket);
/// let other = shared.clone();
///
/// assert!(shared.admit());
/// assert!(other.admit());
/// assert!(!shared.admit());
/// ```
#[derive(Debug)]
pub struct SharedLimiter<L> {
    inner: Arc<Mutex<L>>,
}

impl<L> Clone for SharedLimiter<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L> SharedLimiter<L> {
    /// Wraps a limiter for shared use.
    pub fn new(limiter: L) -> Self {
        Self {
            inner: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Locks the limiter, blocking until it is free.
    pub fn lock(&self) -> MutexGuard<'_, L> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` with exclusive access to the limiter.
    pub fn with<R>(&self, f: impl FnOnce(&mut L) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<L: RateLimiterCore> SharedLimiter<L> {
    /// Admits one unit, blocking on the lock if another caller holds it.
    pub fn admit(&self) -> bool {
        self.lock().try_admit()
    }

    /// Admits one unit at `tick`, blocking on the lock if another caller holds it.
    pub fn admit_at(&self, tick: Uint) -> bool {
        self.lock().try_admit_at(tick)
    }

    /// Admits one unit without waiting for the lock.
    ///
    /// # Returns
    /// * `Ok(true)` / `Ok(false)` - the limiter's decision
    /// * `Err(SimpleAcquireError::ContentionFailure)` - the lock was held by another caller
    pub fn try_admit(&self) -> Result<bool, SimpleAcquireError> {
        let mut guard = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(SimpleAcquireError::ContentionFailure),
        };
        Ok(guard.try_admit())
    }
}
