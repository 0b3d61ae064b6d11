use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::clock::{duration_to_ticks, ticks_to_duration, Clock, MonotonicClock};
use crate::error::{ConfigError, SimpleAcquireError, SimpleAcquireResult, VerboseAcquireError, VerboseAcquireResult};
use crate::rate_limiter_core::RateLimiterCore;
use crate::Uint;

/// Default number of permits per window.
pub const DEFAULT_MAX_PERMITS: Uint = 4;

/// Default window length, in milliseconds.
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

const DEFAULT_WINDOW_TICKS: Uint = 60_000_000_000;

/// Self-refilling token bucket whose credit is measured in time.
///
/// The bucket holds up to `capacity` ticks of credit (the configured window)
/// and gains one tick of credit per tick of elapsed time. One permit costs
/// `rate = capacity / max_permits` ticks, so a full bucket grants
/// `max_permits` units at once and then one unit every `rate` ticks.
///
/// # Algorithm Behavior
///
/// - The bucket starts full
/// - Every acquire first refills with the time elapsed since the last refill,
///   capped at capacity, whether or not the request is granted
/// - A request for `quantity` units costs `quantity * rate`; it is granted
///   only if the whole cost is available
/// - A denied request leaves the credit untouched
///
/// `rate` is computed with integer division. When `max_permits` does not
/// divide the window evenly, the remainder is dropped from the per-unit cost
/// and never recovered.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rate_gate_core::ManualClock;
/// use rate_gate_core::cores::TokenBucket;
///
/// let clock = ManualClock::new(0);
/// let mut bucket = TokenBucket::with_clock(4, Duration::from_secs(60), clock.clone()).unwrap();
///
/// // Four permits are available straight away
/// for _ in 0..4 {
///     assert_eq!(bucket.try_acquire(1), Ok(()));
/// }
/// assert!(bucket.try_acquire(1).is_err());
///
/// // One permit comes back every 15 seconds
/// clock.advance_by(Duration::from_secs(15));
/// assert_eq!(bucket.try_acquire(1), Ok(()));
/// ```
#[derive(Debug, Clone)]
pub struct TokenBucket<C: Clock = MonotonicClock> {
    /// Number of permits a full bucket holds
    max_permits: Uint,
    /// Maximum credit, in ticks
    capacity: Uint,
    /// Cost of one permit, in ticks
    rate: Uint,
    /// Current credit, always within `0..=capacity`
    available: Uint,
    /// Tick of the last refill
    last_refill_at: Uint,
    clock: C,
}

impl TokenBucket<MonotonicClock> {
    /// Creates a bucket on the monotonic clock.
    ///
    /// # Errors
    /// * [`ConfigError::ZeroPermits`] if `max_permits` is 0
    /// * [`ConfigError::ZeroRate`] if the window is shorter than `max_permits` ticks
    /// * [`ConfigError::DurationOverflow`] if `window` does not fit in ticks
    pub fn new(max_permits: Uint, window: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(max_permits, window, MonotonicClock)
    }
}

impl Default for TokenBucket<MonotonicClock> {
    /// Four permits per 60 seconds on the monotonic clock.
    fn default() -> Self {
        Self::assemble(
            DEFAULT_MAX_PERMITS,
            DEFAULT_WINDOW_TICKS,
            DEFAULT_WINDOW_TICKS / DEFAULT_MAX_PERMITS,
            MonotonicClock,
        )
    }
}

impl<C: Clock> TokenBucket<C> {
    /// Creates a bucket reading time from `clock`.
    pub fn with_clock(max_permits: Uint, window: Duration, clock: C) -> Result<Self, ConfigError> {
        Self::from_ticks(max_permits, duration_to_ticks(window)?, clock)
    }

    /// Creates a bucket whose window is given directly in ticks.
    pub fn from_ticks(max_permits: Uint, window_ticks: Uint, clock: C) -> Result<Self, ConfigError> {
        let rate = derive_rate(max_permits, window_ticks)?;
        Ok(Self::assemble(max_permits, window_ticks, rate, clock))
    }

    fn assemble(max_permits: Uint, capacity: Uint, rate: Uint, clock: C) -> Self {
        let now = clock.now();
        TokenBucket {
            max_permits,
            capacity,
            rate,
            available: capacity, // Bucket starts full
            last_refill_at: now,
            clock,
        }
    }

    /// Attempts to acquire `quantity` units now.
    ///
    /// # Returns
    /// * `Ok(())` - The units were granted
    /// * `Err(SimpleAcquireError::InsufficientCapacity)` - Denied, credit unchanged
    /// * `Err(SimpleAcquireError::QuantityOverflow)` - `quantity * rate` overflows
    #[inline]
    pub fn try_acquire(&mut self, quantity: Uint) -> SimpleAcquireResult {
        let now = self.clock.now();
        self.try_acquire_at(now, quantity)
    }

    /// Attempts to acquire `quantity` units at the given tick.
    ///
    /// The refill step runs before the decision regardless of the outcome.
    pub fn try_acquire_at(&mut self, tick: Uint, quantity: Uint) -> SimpleAcquireResult {
        self.refill(tick);

        let cost = quantity
            .checked_mul(self.rate)
            .ok_or(SimpleAcquireError::QuantityOverflow)?;

        if cost <= self.available {
            self.available -= cost;
            trace!(quantity, cost, available = self.available, "token bucket granted");
            Ok(())
        } else {
            debug!(quantity, cost, available = self.available, "token bucket denied");
            Err(SimpleAcquireError::InsufficientCapacity)
        }
    }

    /// Attempts to acquire `quantity` units now, with diagnostics on failure.
    #[inline]
    pub fn try_acquire_verbose(&mut self, quantity: Uint) -> VerboseAcquireResult {
        let now = self.clock.now();
        self.try_acquire_verbose_at(now, quantity)
    }

    /// Attempts to acquire `quantity` units at the given tick, returning
    /// detailed diagnostics on failure.
    ///
    /// # Returns
    /// * `Ok(())` – The units were granted
    /// * `Err(VerboseAcquireError::BeyondCapacity)` – The cost exceeds what a full bucket holds
    /// * `Err(VerboseAcquireError::InsufficientCapacity)` – Not enough credit yet;
    ///   `retry_after_ticks` is how long until the cost is covered if nothing else is spent
    /// * `Err(VerboseAcquireError::QuantityOverflow)` – `quantity * rate` overflows
    ///
    /// # Example
    /// ```
    /// use rate_gate_core::ManualClock;
    /// use rate_gate_core::cores::TokenBucket;
    /// use rate_gate_core::VerboseAcquireError;
    ///
    /// let mut bucket = TokenBucket::from_ticks(4, 100, ManualClock::new(0)).unwrap();
    /// assert_eq!(bucket.try_acquire_verbose_at(0, 3), Ok(()));
    ///
    /// match bucket.try_acquire_verbose_at(0, 2) {
    ///     Err(VerboseAcquireError::InsufficientCapacity { available, retry_after_ticks, .. }) => {
    ///         assert_eq!(available, 25);
    ///         assert_eq!(retry_after_ticks, 25);
    ///     }
    ///     other => panic!("unexpected {:?}", other),
    /// }
    /// ```
    pub fn try_acquire_verbose_at(&mut self, tick: Uint, quantity: Uint) -> VerboseAcquireResult {
        self.refill(tick);

        let cost = quantity
            .checked_mul(self.rate)
            .ok_or(VerboseAcquireError::QuantityOverflow {
                quantity,
                rate: self.rate,
            })?;

        if cost <= self.available {
            self.available -= cost;
            trace!(quantity, cost, available = self.available, "token bucket granted");
            return Ok(());
        }

        debug!(quantity, cost, available = self.available, "token bucket denied");
        if cost > self.capacity {
            Err(VerboseAcquireError::BeyondCapacity {
                quantity,
                cost,
                capacity: self.capacity,
            })
        } else {
            Err(VerboseAcquireError::InsufficientCapacity {
                quantity,
                cost,
                available: self.available,
                retry_after_ticks: cost - self.available,
            })
        }
    }

    /// Whether one permit's worth of credit is available, without refilling.
    ///
    /// This reads the credit as of the last acquire. If time has passed since
    /// then it may report `false` even though a refill would cover a permit.
    #[inline]
    pub fn has_capacity_for_one(&self) -> bool {
        self.available >= self.rate
    }

    /// Refills at `tick`, then returns how many whole permits are available.
    pub fn permits_remaining_at(&mut self, tick: Uint) -> Uint {
        self.refill(tick);
        self.available / self.rate
    }

    /// Refills now, then returns how many whole permits are available.
    pub fn permits_remaining(&mut self) -> Uint {
        let now = self.clock.now();
        self.permits_remaining_at(now)
    }

    /// Adds elapsed time to the credit. A tick earlier than the last refill
    /// counts as zero elapsed time and does not move `last_refill_at` back.
    fn refill(&mut self, tick: Uint) {
        if tick < self.last_refill_at {
            warn!(
                tick,
                last_refill_at = self.last_refill_at,
                "clock went backwards, skipping refill"
            );
            return;
        }
        let elapsed = tick - self.last_refill_at;
        self.available = self.available.saturating_add(elapsed).min(self.capacity);
        self.last_refill_at = tick;
    }

    /// Number of permits a full bucket holds.
    pub fn max_permits(&self) -> Uint {
        self.max_permits
    }

    /// Maximum credit (the configured window).
    pub fn capacity(&self) -> Duration {
        ticks_to_duration(self.capacity)
    }

    /// Maximum credit in ticks.
    pub fn capacity_ticks(&self) -> Uint {
        self.capacity
    }

    /// Cost of one permit.
    pub fn rate(&self) -> Duration {
        ticks_to_duration(self.rate)
    }

    /// Cost of one permit in ticks.
    pub fn rate_ticks(&self) -> Uint {
        self.rate
    }

    /// Credit as of the last refill, without refilling.
    pub fn available(&self) -> Duration {
        ticks_to_duration(self.available)
    }

    /// Credit in ticks as of the last refill, without refilling.
    pub fn available_ticks(&self) -> Uint {
        self.available
    }
}

/// Cost of one permit: `window_ticks / max_permits`, rounded down.
fn derive_rate(max_permits: Uint, window_ticks: Uint) -> Result<Uint, ConfigError> {
    if max_permits == 0 {
        return Err(ConfigError::ZeroPermits);
    }
    let rate = window_ticks / max_permits;
    if rate == 0 {
        return Err(ConfigError::ZeroRate {
            window_ticks,
            max_permits,
        });
    }
    Ok(rate)
}

impl<C: Clock> RateLimiterCore for TokenBucket<C> {
    #[inline(always)]
    fn try_admit(&mut self) -> bool {
        self.try_acquire(1).is_ok()
    }

    #[inline(always)]
    fn try_admit_at(&mut self, tick: Uint) -> bool {
        self.try_acquire_at(tick, 1).is_ok()
    }
}

/// Configuration for a [`TokenBucket`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBucketConfig {
    /// Permits granted by a full bucket (default: 4)
    #[serde(default = "default_max_permits")]
    pub max_permits: Uint,

    /// Window over which `max_permits` refill, in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_max_permits() -> Uint {
    DEFAULT_MAX_PERMITS
}

fn default_window_ms() -> u64 {
    DEFAULT_WINDOW_MS
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self {
            max_permits: default_max_permits(),
            window_ms: default_window_ms(),
        }
    }
}

impl TokenBucketConfig {
    /// Creates a new configuration instance.
    pub fn new(max_permits: Uint, window_ms: u64) -> Self {
        Self {
            max_permits,
            window_ms,
        }
    }

    /// The window as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Checks the configuration without building a bucket.
    pub fn validate(&self) -> Result<(), ConfigError> {
        derive_rate(self.max_permits, duration_to_ticks(self.window())?).map(|_| ())
    }

    /// Builds a bucket on the monotonic clock.
    pub fn build(&self) -> Result<TokenBucket, ConfigError> {
        TokenBucket::new(self.max_permits, self.window())
    }

    /// Builds a bucket on a caller-supplied clock.
    pub fn build_with_clock<C: Clock>(&self, clock: C) -> Result<TokenBucket<C>, ConfigError> {
        TokenBucket::with_clock(self.max_permits, self.window(), clock)
    }
}

impl TryFrom<TokenBucketConfig> for TokenBucket {
    type Error = ConfigError;

    /// Converts a `TokenBucketConfig` into a bucket on the monotonic clock.
    ///
    /// ```
    /// use rate_gate_core::cores::{TokenBucket, TokenBucketConfig};
    ///
    /// let bucket: TokenBucket = TokenBucketConfig::new(5, 1000).try_into().unwrap();
    /// assert_eq!(bucket.rate().as_millis(), 200);
    /// ```
    fn try_from(config: TokenBucketConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}
