//! Simulation configuration from TOML (`[simulation]` section)
//!
//! Describes the local multi-agent run: who takes part and, when the oracle
//! is scripted, what each agent answers.

use crate::config::validation::{ConfigIssue, ConfigIssueCode, require_non_empty, require_non_zero};
use deliberation_domain::AgentIdentity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One simulated agent
///
/// ```toml
/// [[simulation.agents]]
/// id = "a"
/// name = "Ada"
/// replies = ['{"action": "propose", "proposal": "Frontend"}']
/// fallback = '{"action": "wait"}'
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSimulatedAgent {
    pub id: String,
    pub name: String,
    /// Scripted oracle replies, consumed in order
    #[serde(default)]
    pub replies: Vec<String>,
    /// Reply used once `replies` runs out
    #[serde(default)]
    pub fallback: Option<String>,
}

impl FileSimulatedAgent {
    pub fn new(id: &str, name: &str, replies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            replies: replies.iter().map(|r| r.to_string()).collect(),
            fallback: None,
        }
    }

    pub fn identity(&self) -> AgentIdentity {
        AgentIdentity::new(self.id.as_str(), self.name.as_str())
    }
}

/// Raw simulation configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulationConfig {
    /// Requirements handed to the oracle with every prompt
    pub requirements: String,
    /// Maximum rounds before giving up on convergence
    pub rounds: usize,
    /// Delay between agents starting within a round, in milliseconds
    pub stagger_ms: u64,
    /// Run one placement turn per agent once the teams exist
    pub placement: bool,
    pub agents: Vec<FileSimulatedAgent>,
}

impl Default for FileSimulationConfig {
    /// Three agents: A opens with "Frontend", B proposes "Backend", C votes
    /// for "Backend". The swarm settles on a single "Backend" team.
    fn default() -> Self {
        Self {
            requirements: "Build a small web product.".to_string(),
            rounds: 5,
            stagger_ms: 25,
            placement: false,
            agents: vec![
                FileSimulatedAgent::new(
                    "a",
                    "A",
                    &[r#"{"action": "propose", "proposal": "Frontend"}"#],
                ),
                FileSimulatedAgent::new(
                    "b",
                    "B",
                    &[r#"{"action": "propose", "proposal": "Backend"}"#],
                ),
                FileSimulatedAgent::new(
                    "c",
                    "C",
                    &[r#"{"action": "vote", "proposal": "Backend"}"#],
                ),
            ],
        }
    }
}

impl FileSimulationConfig {
    pub(crate) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        require_non_zero("simulation.rounds", self.rounds as u64, issues);

        if self.agents.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyField {
                    field: "simulation.agents".to_string(),
                },
                "simulation.agents: no agents configured, nothing will happen",
            ));
        }

        let mut seen = HashSet::new();
        for (index, agent) in self.agents.iter().enumerate() {
            require_non_empty(&format!("simulation.agents[{}].id", index), &agent.id, issues);
            if !seen.insert(agent.id.trim()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateAgent {
                        id: agent.id.clone(),
                    },
                    format!("simulation.agents: duplicate agent id '{}'", agent.id),
                ));
            }
        }
    }
}
