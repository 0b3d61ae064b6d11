use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::clock::{duration_to_ticks, ticks_to_duration, Clock, MonotonicClock};
use crate::error::ConfigError;
use crate::rate_limiter_core::RateLimiterCore;
use crate::Uint;

/// Default interval between admissions, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

const DEFAULT_INTERVAL_TICKS: Uint = 3_000_000_000;

/// A gate that admits at most once per fixed interval.
///
/// The gate is ready when strictly more than `interval` ticks have passed
/// since it last became ready. A successful [`check_and_advance`](Self::check_and_advance)
/// marks it as used at that instant, so the next admission needs another full
/// interval.
///
/// Construction counts as a use: the first admission needs strictly more than
/// one interval to pass after the gate is created.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rate_gate_core::ManualClock;
/// use rate_gate_core::cores::CooldownGate;
///
/// let clock = ManualClock::new(0);
/// let mut gate = CooldownGate::with_clock(Duration::from_nanos(100), clock.clone()).unwrap();
///
/// // Exactly one interval after construction is not enough
/// clock.advance(100);
/// assert!(!gate.check_and_advance());
///
/// clock.advance(1);
/// assert!(gate.check_and_advance());
/// assert!(!gate.check_and_advance());
/// ```
#[derive(Debug, Clone)]
pub struct CooldownGate<C: Clock = MonotonicClock> {
    /// Ticks that must strictly elapse between admissions
    interval: Uint,
    /// `last_ready_at + interval`; the gate admits at any tick past this one
    ready_after: Uint,
    clock: C,
}

impl CooldownGate<MonotonicClock> {
    /// Creates a gate on the monotonic clock.
    ///
    /// # Errors
    /// [`ConfigError::DurationOverflow`] if `interval` does not fit in ticks.
    pub fn new(interval: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(interval, MonotonicClock)
    }
}

impl Default for CooldownGate<MonotonicClock> {
    /// A 3000 ms gate on the monotonic clock.
    fn default() -> Self {
        Self::from_ticks(DEFAULT_INTERVAL_TICKS, MonotonicClock)
    }
}

impl<C: Clock> CooldownGate<C> {
    /// Creates a gate reading time from `clock`.
    pub fn with_clock(interval: Duration, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::from_ticks(duration_to_ticks(interval)?, clock))
    }

    /// Creates a gate whose interval is given directly in ticks.
    ///
    /// The gate counts as having just been admitted at the clock's current tick.
    pub fn from_ticks(interval_ticks: Uint, clock: C) -> Self {
        let now = clock.now();
        CooldownGate {
            interval: interval_ticks,
            ready_after: now.saturating_add(interval_ticks),
            clock,
        }
    }

    /// Admits and restarts the interval if the gate is ready now.
    #[inline]
    pub fn check_and_advance(&mut self) -> bool {
        let now = self.clock.now();
        self.check_and_advance_at(now)
    }

    /// Admits and restarts the interval if the gate is ready at `tick`.
    ///
    /// Rejection leaves the gate untouched.
    pub fn check_and_advance_at(&mut self, tick: Uint) -> bool {
        if !self.is_ready_at(tick) {
            trace!(tick, remaining = self.remaining_at(tick), "cooldown gate not ready");
            return false;
        }
        self.ready_after = tick.saturating_add(self.interval);
        true
    }

    /// Puts the gate at the edge of its cooldown: `last_ready_at = now - interval`.
    ///
    /// A check at the same instant fails because elapsed time equals the
    /// interval exactly; any later tick admits.
    #[inline]
    pub fn stop(&mut self) {
        let now = self.clock.now();
        self.stop_at(now);
    }

    /// [`stop`](Self::stop) at an explicit tick.
    pub fn stop_at(&mut self, tick: Uint) {
        self.ready_after = tick;
    }

    /// Marks the gate as admitted now, so the next admission needs a full interval.
    #[inline]
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.reset_at(now);
    }

    /// [`reset`](Self::reset) at an explicit tick.
    pub fn reset_at(&mut self, tick: Uint) {
        self.ready_after = tick.saturating_add(self.interval);
    }

    /// Whether a check right now would admit. Does not change state.
    pub fn is_ready(&self) -> bool {
        self.is_ready_at(self.clock.now())
    }

    /// Whether a check at `tick` would admit. Does not change state.
    #[inline]
    pub fn is_ready_at(&self, tick: Uint) -> bool {
        tick > self.ready_after
    }

    /// Ticks from `tick` until the gate admits; 0 when already ready.
    pub fn remaining_at(&self, tick: Uint) -> Uint {
        if self.is_ready_at(tick) {
            0
        } else {
            (self.ready_after - tick).saturating_add(1)
        }
    }

    /// Time until the gate admits; zero when already ready.
    pub fn time_until_ready(&self) -> Duration {
        ticks_to_duration(self.remaining_at(self.clock.now()))
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        ticks_to_duration(self.interval)
    }

    /// The configured interval in ticks.
    pub fn interval_ticks(&self) -> Uint {
        self.interval
    }
}

impl<C: Clock> RateLimiterCore for CooldownGate<C> {
    #[inline(always)]
    fn try_admit(&mut self) -> bool {
        self.check_and_advance()
    }

    #[inline(always)]
    fn try_admit_at(&mut self, tick: Uint) -> bool {
        self.check_and_advance_at(tick)
    }
}

/// Configuration for a [`CooldownGate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownGateConfig {
    /// Minimum time between admissions in milliseconds (default: 3000)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for CooldownGateConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl CooldownGateConfig {
    /// Creates a configuration with the given interval in milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }

    /// The interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Checks that the interval fits in a tick counter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        duration_to_ticks(self.interval()).map(|_| ())
    }

    /// Builds a gate on the monotonic clock.
    pub fn build(&self) -> Result<CooldownGate, ConfigError> {
        CooldownGate::new(self.interval())
    }

    /// Builds a gate on a caller-supplied clock.
    pub fn build_with_clock<C: Clock>(&self, clock: C) -> Result<CooldownGate<C>, ConfigError> {
        CooldownGate::with_clock(self.interval(), clock)
    }
}

impl TryFrom<CooldownGateConfig> for CooldownGate {
    type Error = ConfigError;

    /// Converts a `CooldownGateConfig` into a gate on the monotonic clock.
    ///
    /// ```
    /// use rate_gate_core::cores::{CooldownGate, CooldownGateConfig};
    ///
    /// let gate: CooldownGate = CooldownGateConfig::new(500).try_into().unwrap();
    /// assert_eq!(gate.interval().as_millis(), 500);
    /// ```
    fn try_from(config: CooldownGateConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}
