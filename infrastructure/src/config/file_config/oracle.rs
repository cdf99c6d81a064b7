//! Oracle configuration from TOML (`[oracle]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode, require_non_empty};
use serde::{Deserialize, Serialize};

/// Which decision oracle the simulation talks to
pub const ORACLE_PROVIDERS: [&str; 2] = ["scripted", "http"];

/// Raw oracle configuration from TOML
///
/// # Example
///
/// ```toml
/// [oracle]
/// provider = "http"                          # "scripted" or "http"
/// base_url = "https://api.openai.com/v1"
/// model = "gpt-4o-mini"
/// api_key_env = "OPENAI_API_KEY"
/// max_tokens = 512
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    pub provider: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub max_tokens: u32,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            provider: "scripted".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 512,
        }
    }
}

impl FileOracleConfig {
    pub fn is_http(&self) -> bool {
        self.provider.eq_ignore_ascii_case("http")
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub(crate) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        let provider = self.provider.to_lowercase();
        if !ORACLE_PROVIDERS.contains(&provider.as_str()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "oracle.provider".to_string(),
                    value: self.provider.clone(),
                    valid_values: ORACLE_PROVIDERS.iter().map(|p| p.to_string()).collect(),
                },
                format!(
                    "oracle.provider: unknown value '{}', expected one of {:?}",
                    self.provider, ORACLE_PROVIDERS
                ),
            ));
        }
        if self.is_http() {
            require_non_empty("oracle.base_url", &self.base_url, issues);
            require_non_empty("oracle.model", &self.model, issues);
        }
    }
}
