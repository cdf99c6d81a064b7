//! Event log configuration from TOML (`[log]` section)

use serde::{Deserialize, Serialize};

/// Raw event log configuration from TOML
///
/// ```toml
/// [log]
/// events_path = "deliberation-events.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Write a JSONL transcript of protocol events here
    pub events_path: Option<String>,
}
