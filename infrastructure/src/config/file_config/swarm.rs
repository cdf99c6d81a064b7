//! Swarm configuration from TOML (`[swarm]` section)

use crate::config::validation::{ConfigIssue, require_non_empty, require_non_zero};
use deliberation_domain::{Swarm, SwarmConfiguration};
use serde::{Deserialize, Serialize};

/// Raw swarm configuration from TOML
///
/// # Example
///
/// ```toml
/// [swarm]
/// id = "swarm-1"
/// name = "Local swarm"
/// max_agents = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSwarmConfig {
    pub id: String,
    pub name: String,
    /// Capacity; the initial-teams deliberation waits for this many agents
    pub max_agents: usize,
}

impl Default for FileSwarmConfig {
    fn default() -> Self {
        Self {
            id: "swarm-1".to_string(),
            name: "Local swarm".to_string(),
            max_agents: 3,
        }
    }
}

impl FileSwarmConfig {
    pub fn to_swarm(&self) -> Swarm {
        Swarm {
            id: self.id.as_str().into(),
            name: self.name.clone(),
            configuration: SwarmConfiguration {
                max_agents: self.max_agents,
            },
        }
    }

    pub(crate) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        require_non_empty("swarm.id", &self.id, issues);
        require_non_zero("swarm.max_agents", self.max_agents as u64, issues);
    }
}
