//! Behavior configuration from TOML (`[behavior]` section)

use crate::config::validation::{ConfigIssue, require_non_zero};
use deliberation_application::BehaviorConfig;
use deliberation_application::config::DEFAULT_MAX_ORACLE_RETRIES;
use serde::{Deserialize, Serialize};

/// Raw behavior configuration from TOML
///
/// # Example
///
/// ```toml
/// [behavior]
/// timeout_seconds = 30      # per store/oracle call; omit for no limit
/// max_oracle_retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    pub timeout_seconds: Option<u64>,
    pub max_oracle_retries: u32,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Some(30),
            max_oracle_retries: DEFAULT_MAX_ORACLE_RETRIES,
        }
    }
}

impl FileBehaviorConfig {
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(self.timeout_seconds)
            .with_max_oracle_retries(self.max_oracle_retries)
    }

    pub(crate) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if let Some(seconds) = self.timeout_seconds {
            require_non_zero("behavior.timeout_seconds", seconds, issues);
        }
        require_non_zero(
            "behavior.max_oracle_retries",
            u64::from(self.max_oracle_retries),
            issues,
        );
    }
}
