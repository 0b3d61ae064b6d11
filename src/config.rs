//! Aggregate configuration for a gate and a bucket.
//!
//! Defaults match the limits the components were originally tuned with:
//! a 3000 ms cooldown and 4 permits per 60 s window.

use serde::{Deserialize, Serialize};

use crate::cores::{CooldownGateConfig, TokenBucketConfig};
use crate::error::ConfigError;
use crate::Uint;

/// Environment variable for [`CooldownGateConfig::interval_ms`].
pub const ENV_GATE_INTERVAL_MS: &str = "GATE_INTERVAL_MS";
/// Environment variable for [`TokenBucketConfig::max_permits`].
pub const ENV_BUCKET_MAX_PERMITS: &str = "BUCKET_MAX_PERMITS";
/// Environment variable for [`TokenBucketConfig::window_ms`].
pub const ENV_BUCKET_WINDOW_MS: &str = "BUCKET_WINDOW_MS";

/// Configuration for both limiter components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Cooldown gate configuration
    #[serde(default)]
    pub gate: CooldownGateConfig,

    /// Token bucket configuration
    #[serde(default)]
    pub bucket: TokenBucketConfig,
}

impl LimiterConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for unset variables.
    ///
    /// - `GATE_INTERVAL_MS`: cooldown interval in milliseconds (default: 3000)
    /// - `BUCKET_MAX_PERMITS`: permits per window (default: 4)
    /// - `BUCKET_WINDOW_MS`: bucket window in milliseconds (default: 60000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// A variable that is present but does not parse is an error rather than
    /// a silent fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            gate: CooldownGateConfig {
                interval_ms: parse_var(&lookup, ENV_GATE_INTERVAL_MS)?
                    .unwrap_or(defaults.gate.interval_ms),
            },
            bucket: TokenBucketConfig {
                max_permits: parse_var::<Uint, _>(&lookup, ENV_BUCKET_MAX_PERMITS)?
                    .unwrap_or(defaults.bucket.max_permits),
                window_ms: parse_var(&lookup, ENV_BUCKET_WINDOW_MS)?
                    .unwrap_or(defaults.bucket.window_ms),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from JSON. Missing fields take their defaults.
    ///
    /// ```
    /// use rate_gate_core::LimiterConfig;
    ///
    /// let config = LimiterConfig::from_json_str(r#"{ "bucket": { "max_permits": 10 } }"#).unwrap();
    /// assert_eq!(config.bucket.max_permits, 10);
    /// assert_eq!(config.bucket.window_ms, 60_000);
    /// assert_eq!(config.gate.interval_ms, 3000);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both components can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gate.validate()?;
        self.bucket.validate()
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LimiterConfig::default();
        assert_eq!(config.gate.interval_ms, 3000);
        assert_eq!(config.bucket.max_permits, 4);
        assert_eq!(config.bucket.window_ms, 60_000);
    }

    #[test]
    fn test_lookup_overrides_and_defaults() {
        let config = LimiterConfig::from_lookup(lookup_from(&[
            (ENV_GATE_INTERVAL_MS, "250"),
            (ENV_BUCKET_MAX_PERMITS, " 8 "),
        ]))
        .unwrap();
        assert_eq!(config.gate.interval_ms, 250);
        assert_eq!(config.bucket.max_permits, 8);
        assert_eq!(config.bucket.window_ms, 60_000);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = LimiterConfig::from_lookup(lookup_from(&[(ENV_BUCKET_WINDOW_MS, "soon")])).unwrap_err();
        match err {
            ConfigError::InvalidEnv { name, value } => {
                assert_eq!(name, ENV_BUCKET_WINDOW_MS);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookup_rejects_zero_permits() {
        let err = LimiterConfig::from_lookup(lookup_from(&[(ENV_BUCKET_MAX_PERMITS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPermits));
    }

    #[cfg(not(feature = "tick_u128"))]
    #[test]
    fn test_lookup_rejects_gate_interval_overflow() {
        let err = LimiterConfig::from_lookup(lookup_from(&[(ENV_GATE_INTERVAL_MS, "20000000000000")])).unwrap_err();
        assert!(matches!(err, ConfigError::DurationOverflow { .. }));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&LimiterConfig::default()).unwrap();
        assert_eq!(LimiterConfig::from_json_str(&json).unwrap(), LimiterConfig::default());
    }

    #[test]
    fn test_json_rejects_malformed() {
        assert!(matches!(
            LimiterConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
