//! Presentation layer for swarm-deliberation
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, SimulateArgs};
pub use output::console::ConsoleFormatter;
pub use output::report::{PlacementRecord, SimulationReport, TurnRecord};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
