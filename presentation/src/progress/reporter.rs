//! Progress reporting for protocol turns

use colored::Colorize;
use deliberation_application::DeliberationNotifier;
use deliberation_domain::{AgentIdentity, ArtifactId, Deliberation, DeliberationId};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports protocol progress with one participation bar per deliberation
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<DeliberationId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn participation_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Print above the bars without tearing them
    fn line(&self, text: String) {
        let _ = self.multi.println(text);
    }

    fn with_bar(&self, id: &DeliberationId, update: impl FnOnce(&ProgressBar)) {
        if let Ok(bars) = self.bars.lock()
            && let Some(bar) = bars.get(id)
        {
            update(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationNotifier for ProgressReporter {
    fn on_deliberation_created(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        self.line(format!(
            "{} {} opened {}",
            "+".green(),
            agent.name.bold(),
            deliberation.title
        ));
    }

    fn on_joined_after_recheck(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        self.line(format!(
            "{} {} joined {} just before creating it",
            "~".yellow(),
            agent.name.bold(),
            deliberation.id
        ));
    }

    fn on_proposal(&self, agent: &AgentIdentity, _deliberation_id: &DeliberationId, body: &str) {
        self.line(format!("  {} proposes {}", agent.name.bold(), body.cyan()));
    }

    fn on_vote(&self, agent: &AgentIdentity, _deliberation_id: &DeliberationId, body: &str) {
        self.line(format!("  {} votes for {}", agent.name.bold(), body.cyan()));
    }

    fn on_participation(&self, deliberation_id: &DeliberationId, participants: usize, expected: usize) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        let bar = bars.entry(deliberation_id.clone()).or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new(expected as u64));
            bar.set_style(Self::participation_style());
            bar.set_prefix(deliberation_id.to_string());
            bar
        });
        bar.set_length(expected as u64);
        bar.set_position(participants.min(expected) as u64);
        bar.set_message("collecting");
    }

    fn on_converged(&self, deliberation_id: &DeliberationId, selected: &[String]) {
        self.with_bar(deliberation_id, |bar| {
            bar.set_message(format!("converged on {}", selected.join(", ")));
        });
    }

    fn on_completed(&self, deliberation_id: &DeliberationId) {
        let removed = self
            .bars
            .lock()
            .ok()
            .and_then(|mut bars| bars.remove(deliberation_id));
        if let Some(bar) = removed {
            bar.finish_with_message(format!("{}", "complete!".green()));
        }
    }

    fn on_oracle_retry(&self, agent: &AgentIdentity, attempt: u32, max_attempts: u32, error: &str) {
        self.line(format!(
            "  {} {} oracle attempt {}/{}: {}",
            "!".yellow(),
            agent.name,
            attempt,
            max_attempts,
            error
        ));
    }

    fn on_placement(&self, agent: &AgentIdentity, _action: &str, detail: &str) {
        self.line(format!("{} {} {}", "->".cyan(), agent.name.bold(), detail));
    }

    fn on_stalled(&self, agent: &AgentIdentity, reason: &str) {
        self.line(format!("{} {} stalled: {}", "x".red(), agent.name, reason));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DeliberationNotifier for SimpleProgress {
    fn on_deliberation_found(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        println!("{} {} found {}", "->".cyan(), agent.name, deliberation.id);
    }

    fn on_deliberation_created(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        println!(
            "{} {} created {} ({})",
            "+".green(),
            agent.name.bold(),
            deliberation.id,
            deliberation.title
        );
    }

    fn on_joined_after_recheck(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        println!("{} {} joined {}", "~".yellow(), agent.name, deliberation.id);
    }

    fn on_proposal(&self, agent: &AgentIdentity, deliberation_id: &DeliberationId, body: &str) {
        println!("  {} proposed {} in {}", agent.name, body, deliberation_id);
    }

    fn on_vote(&self, agent: &AgentIdentity, deliberation_id: &DeliberationId, body: &str) {
        println!("  {} voted for {} in {}", agent.name, body, deliberation_id);
    }

    fn on_contribution_skipped(
        &self,
        agent: &AgentIdentity,
        deliberation_id: &DeliberationId,
        reason: &str,
    ) {
        println!(
            "  {} {} skipped {}: {}",
            "-".dimmed(),
            agent.name,
            deliberation_id,
            reason
        );
    }

    fn on_participation(&self, deliberation_id: &DeliberationId, participants: usize, expected: usize) {
        println!("  {} {}/{} participants", deliberation_id, participants, expected);
    }

    fn on_converged(&self, deliberation_id: &DeliberationId, selected: &[String]) {
        println!(
            "{} {} converged on {}",
            "v".green(),
            deliberation_id,
            selected.join(", ").bold()
        );
    }

    fn on_artifacts_created(&self, _deliberation_id: &DeliberationId, created: &[ArtifactId]) {
        for artifact in created {
            println!("  {} {}", "+".green(), artifact);
        }
    }

    fn on_completed(&self, deliberation_id: &DeliberationId) {
        println!("{} {} completed", "v".green(), deliberation_id);
        println!();
    }

    fn on_oracle_retry(&self, agent: &AgentIdentity, attempt: u32, max_attempts: u32, error: &str) {
        println!(
            "  {} {} attempt {}/{} failed: {}",
            "!".yellow(),
            agent.name,
            attempt,
            max_attempts,
            error
        );
    }

    fn on_placement(&self, agent: &AgentIdentity, action: &str, detail: &str) {
        println!("{} {} [{}] {}", "->".cyan(), agent.name, action, detail);
    }

    fn on_stalled(&self, agent: &AgentIdentity, reason: &str) {
        println!("  {} {} (stalled: {})", "x".red(), agent.name, reason);
    }
}
