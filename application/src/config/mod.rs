//! Application-level configuration.
//!
//! Controls how protocol use cases behave: per-call timeouts and the oracle
//! retry budget.

use std::time::Duration;

/// Default number of oracle attempts before a decision step is skipped
pub const DEFAULT_MAX_ORACLE_RETRIES: u32 = 3;

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorConfig {
    /// Maximum time to wait for any single store or oracle call.
    pub timeout: Option<Duration>,
    /// Attempts made by the decision retry wrapper (at least one is always made).
    pub max_oracle_retries: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            max_oracle_retries: DEFAULT_MAX_ORACLE_RETRIES,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(seconds)),
            ..Self::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }

    pub fn with_max_oracle_retries(mut self, retries: u32) -> Self {
        self.max_oracle_retries = retries;
        self
    }

    /// Retry budget clamped to at least one attempt
    pub fn oracle_attempts(&self) -> u32 {
        self.max_oracle_retries.max(1)
    }
}
