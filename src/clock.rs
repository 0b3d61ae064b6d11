//! Time sources and tick conversion.
//!
//! Limiters never read the wall clock. They ask a [`Clock`] for the current
//! tick (nanoseconds since the clock's origin) so that time can only move
//! forward under [`MonotonicClock`], and so tests can drive time by hand with
//! [`ManualClock`].

use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::types::Uint;

/// A source of monotonic ticks.
///
/// Ticks from one clock are only meaningful relative to other ticks from the
/// same clock. Callers using the `_at` operations must pass ticks from the
/// clock the limiter was built with.
pub trait Clock {
    /// Returns the current tick.
    fn now(&self) -> Uint;
}

/// Steady clock backed by [`Instant`].
///
/// All instances share one process-wide origin, so ticks from different
/// `MonotonicClock` values are comparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

fn origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Uint {
        Uint::try_from(origin().elapsed().as_nanos()).unwrap_or(Uint::MAX)
    }
}

/// Clock whose time only changes when told to.
///
/// Clones share the same underlying tick, so a test can hand one clone to a
/// limiter and keep another to advance time.
///
/// ```rust
/// use rate_gate_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(0);
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    tick: Arc<Mutex<Uint>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: Uint) -> Self {
        Self {
            tick: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves time forward by `ticks`, saturating at `Uint::MAX`.
    pub fn advance(&self, ticks: Uint) {
        let mut tick = self.tick.lock().unwrap_or_else(|e| e.into_inner());
        *tick = tick.saturating_add(ticks);
    }

    /// Moves time forward by a [`Duration`].
    pub fn advance_by(&self, duration: Duration) {
        self.advance(saturating_ticks(duration));
    }

    /// Sets the current tick. Setting an earlier tick simulates a clock
    /// that went backwards.
    pub fn set(&self, tick: Uint) {
        *self.tick.lock().unwrap_or_else(|e| e.into_inner()) = tick;
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Uint {
        *self.tick.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Converts a [`Duration`] to ticks, failing if it does not fit.
pub fn duration_to_ticks(duration: Duration) -> Result<Uint, ConfigError> {
    let nanos = duration.as_nanos();
    Uint::try_from(nanos).map_err(|_| ConfigError::DurationOverflow { nanos })
}

/// Converts ticks back to a [`Duration`], saturating at [`Duration::MAX`].
pub fn ticks_to_duration(ticks: Uint) -> Duration {
    u64::try_from(ticks)
        .map(Duration::from_nanos)
        .unwrap_or(Duration::MAX)
}

fn saturating_ticks(duration: Duration) -> Uint {
    Uint::try_from(duration.as_nanos()).unwrap_or(Uint::MAX)
}
