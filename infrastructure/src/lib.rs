//! Infrastructure layer for swarm-deliberation
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod memory;
pub mod oracle;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileOracleConfig, FileOutputConfig, FileOutputFormat,
    FileSimulatedAgent, FileSimulationConfig, FileSwarmConfig, Severity,
};
pub use logging::JsonlEventLog;
pub use memory::{InMemoryArtifactStore, InMemoryDeliberationStore, InMemoryRoster};
#[cfg(feature = "http-oracle")]
pub use oracle::HttpDecisionOracle;
pub use oracle::ScriptedOracle;
