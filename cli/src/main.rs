//! CLI entrypoint for swarm-deliberation
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod simulation;

use anyhow::{Context, Result, bail};
use clap::Parser;
use deliberation_application::{CompositeNotifier, DeliberationNotifier, NoProgress};
use deliberation_domain::OutputFormat;
use deliberation_infrastructure::{ConfigLoader, FileConfig, JsonlEventLog};
use deliberation_presentation::{
    Cli, Command, ConsoleFormatter, ProgressReporter, SimulateArgs, SimpleProgress,
};
use simulation::{Simulation, SimulationSettings};
use std::io::IsTerminal;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Keep the guard alive so the log file is flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting swarm-deliberation");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    match cli.command() {
        Command::CheckConfig => check_config(&config),
        Command::Simulate(args) => {
            report_issues(&config)?;
            simulate(&cli, config, args).await
        }
    }
}

/// Initialize logging based on verbosity level, optionally teeing into a file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Could not create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    if issues.is_empty() {
        println!("Configuration OK");
        return Ok(());
    }
    for issue in &issues {
        let label = if issue.is_error() { "error" } else { "warning" };
        println!("{}: {}", label, issue.message);
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("configuration has errors");
    }
    Ok(())
}

/// Log warnings, refuse to run on errors
fn report_issues(config: &FileConfig) -> Result<()> {
    let mut errors = Vec::new();
    for issue in config.validate() {
        if issue.is_error() {
            error!("{}", issue.message);
            errors.push(issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    if !errors.is_empty() {
        bail!("Invalid configuration: {}", errors.join("; "));
    }
    Ok(())
}

async fn simulate(cli: &Cli, config: FileConfig, args: SimulateArgs) -> Result<()> {
    let mut settings = SimulationSettings::from_config(&config);
    if let Some(rounds) = args.rounds {
        settings.rounds = rounds;
    }
    settings.placement |= args.placement;

    let format: OutputFormat = args
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let simulation = Simulation::from_config(&config, settings).await?;

    let events_path = args
        .events
        .or_else(|| config.log.events_path.as_ref().map(Into::into));
    let event_log = events_path.and_then(JsonlEventLog::new);
    if let Some(log) = &event_log {
        info!("Writing protocol events to {}", log.path().display());
    }

    // Progress goes to the terminal only for text reports
    let interactive = std::io::stdout().is_terminal();
    let console: Box<dyn DeliberationNotifier> = match (cli.quiet, format) {
        (true, _) | (_, OutputFormat::Json) => Box::new(NoProgress),
        (false, OutputFormat::Text) if interactive => Box::new(ProgressReporter::new()),
        (false, OutputFormat::Text) => Box::new(SimpleProgress),
    };
    let mut delegates: Vec<&dyn DeliberationNotifier> = vec![console.as_ref()];
    if let Some(log) = &event_log {
        delegates.push(log);
    }
    let progress = CompositeNotifier::new(delegates);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let report = simulation.run(&progress, cancel).await;

    let output = match format {
        OutputFormat::Text => ConsoleFormatter::format(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    if !report.settled && !report.cancelled {
        warn!(
            rounds = report.rounds_run,
            "Simulation ended without the swarm settling"
        );
    }

    Ok(())
}
