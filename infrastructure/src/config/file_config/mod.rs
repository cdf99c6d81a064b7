//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod behavior;
mod log;
mod oracle;
mod output;
mod simulation;
mod swarm;

pub use behavior::FileBehaviorConfig;
pub use log::FileLogConfig;
pub use oracle::FileOracleConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use simulation::{FileSimulatedAgent, FileSimulationConfig};
pub use swarm::FileSwarmConfig;

use super::validation::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// The swarm the simulated agents belong to
    pub swarm: FileSwarmConfig,
    /// Timeouts and the oracle retry budget
    pub behavior: FileBehaviorConfig,
    /// Decision oracle selection
    pub oracle: FileOracleConfig,
    /// Simulated agents and rounds
    pub simulation: FileSimulationConfig,
    /// JSONL event log
    pub log: FileLogConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        self.swarm.validate(&mut issues);
        self.behavior.validate(&mut issues);
        self.oracle.validate(&mut issues);
        self.simulation.validate(&mut issues);
        issues
    }
}
