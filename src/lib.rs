//! In-process admission control: a cooldown gate and a self-refilling token bucket.
//!
//! Both components are small single-owner state machines that answer
//! "may this unit of work proceed now?" without I/O, threads or blocking.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use rate_gate_core::cores::{CooldownGate, TokenBucket};
//!
//! // Four permits per minute, starting full
//! let mut bucket = TokenBucket::new(4, Duration::from_secs(60)).unwrap();
//! match bucket.try_acquire(1) {
//!     Ok(()) => println!("Request allowed"),
//!     Err(e) => println!("Request denied: {}", e),
//! }
//!
//! // At most once every three seconds
//! let mut gate = CooldownGate::new(Duration::from_millis(3000)).unwrap();
//! if gate.check_and_advance() {
//!     println!("Ran the periodic task");
//! }
//! ```
//!
//! # Components
//!
//! ## [Cooldown Gate](cores::CooldownGate)
//! Ready only after strictly more than `interval` has passed since it was last used:
//! ```rust
//! # use rate_gate_core::cores::CooldownGate;
//! let gate: CooldownGate = CooldownGate::default(); // 3000 ms
//! ```
//!
//! ## [Token Bucket](cores::TokenBucket)
//! Credit measured in time, refilling one tick per tick up to the window;
//! each permit costs `window / max_permits`:
//! ```rust
//! # use rate_gate_core::cores::TokenBucket;
//! let bucket: TokenBucket = TokenBucket::default(); // 4 permits per 60 s
//! ```
//!
//! # Core Concepts
//!
//! ## Time Representation
//! All arithmetic is done on integer nanosecond ticks ([`Uint`]), never
//! floating point. Time comes from a [`Clock`]: [`MonotonicClock`] in
//! production, [`ManualClock`] in tests. Every operation also has an `_at`
//! form that takes the tick explicitly.
//!
//! ## Error Handling
//! Acquisition returns [`SimpleAcquireResult`], or [`VerboseAcquireResult`]
//! with retry hints. Construction returns [`ConfigError`] for unusable
//! settings such as zero permits.
//!
//! ## Thread Safety
//! Nothing is internally synchronized. Use [`sync::SharedLimiter`] to share
//! one limiter between threads.

pub mod clock;
pub mod config;
pub mod cores;
pub mod error;
pub mod rate_limiter_core;
pub mod sync;
pub mod types;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::LimiterConfig;
pub use error::{
    ConfigError, SimpleAcquireError, SimpleAcquireResult, VerboseAcquireError,
    VerboseAcquireResult,
};
pub use rate_limiter_core::RateLimiterCore;
pub use types::Uint;
