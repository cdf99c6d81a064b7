//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the simulation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for deliberation_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => deliberation_domain::OutputFormat::Text,
            OutputFormat::Json => deliberation_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for swarm-deliberation
#[derive(Parser, Debug)]
#[command(name = "swarm-deliberation")]
#[command(author, version, about = "Coordinator-free consensus for agent swarms")]
#[command(long_about = r#"
swarm-deliberation lets a swarm of autonomous agents agree on which teams to
form, with no coordinator. Every agent runs the same protocol against a shared
store: find or create the topic's deliberation, propose or vote, and once
enough distinct agents have taken part, materialize the winning proposals.

Configuration files are loaded from (in priority order):
1. DELIBERATION_* environment variables
2. --config <path>             Explicit config file
3. ./deliberation.toml         Project-level config
4. ~/.config/swarm-deliberation/config.toml   Global config

Example:
  swarm-deliberation simulate
  swarm-deliberation simulate --rounds 3 --events run.jsonl -o json
  swarm-deliberation check-config --config swarm.toml
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the configured agents against in-memory stores (the default)
    Simulate(SimulateArgs),
    /// Validate the merged configuration and report every issue
    CheckConfig,
}

/// Overrides for a simulation run
#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    /// Maximum rounds before giving up (overrides `simulation.rounds`)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Run a placement turn for every agent once the teams exist
    #[arg(long)]
    pub placement: bool,

    /// Write a JSONL transcript of protocol events (overrides `log.events_path`)
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Report format (overrides `output.format`)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl Cli {
    /// The subcommand to run; plain `swarm-deliberation` simulates
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Simulate(SimulateArgs::default()))
    }
}
