//! Admission controller implementations.
//!
//! Each core is a single-owner state machine working in integer ticks. Both
//! read time from an injectable [`Clock`](crate::Clock) and also expose `_at`
//! variants that take the tick explicitly.
//!
//! # Available Cores
//!
//! - **[`CooldownGate`]** - Admits at most once per fixed interval
//! - **[`TokenBucket`]** - Grants units against credit that refills continuously up to a window
//!
//! # Comparison
//!
//! | Core | State | Burst Handling | Use Case |
//! |------|-------|----------------|----------|
//! | Cooldown Gate | One tick | No bursts | "Do X at most once every N ms" |
//! | Token Bucket | Credit + tick | Up to `max_permits` | "N actions per window" |
//!
//! # Thread Safety
//!
//! Cores are not internally synchronized. Mutating operations take `&mut self`;
//! to share a core across threads wrap it in a
//! [`SharedLimiter`](crate::sync::SharedLimiter).

pub mod cooldown_gate;
pub use cooldown_gate::CooldownGate;
pub use cooldown_gate::CooldownGateConfig;

pub mod token_bucket;
pub use token_bucket::TokenBucket;
pub use token_bucket::TokenBucketConfig;
