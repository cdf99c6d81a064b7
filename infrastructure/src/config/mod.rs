//! Configuration file loading for swarm-deliberation
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DELIBERATION_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./deliberation.toml` or `./.deliberation.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/swarm-deliberation/config.toml`
//! 5. Default values

mod file_config;
mod loader;
pub mod validation;

pub use file_config::{
    FileBehaviorConfig, FileConfig, FileLogConfig, FileOracleConfig, FileOutputConfig,
    FileOutputFormat, FileSimulatedAgent, FileSimulationConfig, FileSwarmConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
