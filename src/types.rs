//! Unsigned integer type alias for ticks, permits and credit.
//!
//! Every time value handled by the gate and the bucket is an integer number
//! of one-nanosecond ticks. The width of that integer is chosen at compile
//! time via feature flags.
//!
//! # Features
//! - `tick_u64` (default): uses [`u64`] as `Uint` (~584 years of nanoseconds)
//! - `tick_u128`: uses [`u128`] as `Uint`
//!   (Both features cannot be enabled at the same time.)
//! - If neither feature is enabled, `u64` is used as the default type.

#[cfg(all(feature = "tick_u64", feature = "tick_u128"))]
compile_error!("You cannot enable both `tick_u64` and `tick_u128` features at the same time");

/// Alias for the unsigned integer type used for ticks and permit counts.
#[cfg(all(feature = "tick_u64", not(feature = "tick_u128")))]
pub type Uint = u64;

/// Alias for the unsigned integer type used for ticks and permit counts.
#[cfg(all(feature = "tick_u128", not(feature = "tick_u64")))]
pub type Uint = u128;

/// Alias for the unsigned integer type used for ticks and permit counts.
#[cfg(not(any(feature = "tick_u64", feature = "tick_u128")))]
pub type Uint = u64;
