//! Console output formatter for simulation reports

use crate::output::report::{SimulationReport, TurnRecord};
use colored::Colorize;
use deliberation_application::TurnOutcome;

/// Formats simulation reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &SimulationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Swarm Deliberation"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Swarm:".cyan().bold(),
            report.swarm_id
        ));
        let agents: Vec<String> = report.agents.iter().map(|a| a.to_string()).collect();
        output.push_str(&format!(
            "{} {}\n",
            "Agents:".cyan().bold(),
            agents.join(", ")
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Rounds:".cyan().bold(),
            report.rounds_run
        ));

        output.push_str(&Self::section_header("Turns"));
        for turn in &report.turns {
            output.push_str(&Self::turn_line(turn));
            output.push('\n');
        }

        if !report.placements.is_empty() {
            output.push_str(&Self::section_header("Placement"));
            for placement in &report.placements {
                output.push_str(&format!(
                    "  {} {}\n",
                    format!("{}:", placement.agent.name).yellow(),
                    placement.outcome.summary()
                ));
            }
        }

        output.push_str(&Self::section_header("Deliberations"));
        if report.deliberations.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for deliberation in &report.deliberations {
            output.push_str(&format!(
                "  {} {} [{}, {}]\n",
                deliberation.id.to_string().dimmed(),
                deliberation.title,
                deliberation.topology,
                deliberation.status
            ));
        }

        output.push_str(&Self::section_header("Teams"));
        if report.teams.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for team in &report.teams {
            output.push_str(&format!("  * {}\n", team.name.green().bold()));
            for role in report.roles.iter().filter(|r| r.team_id == team.id) {
                let holder = role
                    .assignee
                    .as_ref()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "vacant".to_string());
                output.push_str(&format!("      - {} ({})\n", role.name, holder));
            }
        }

        output.push('\n');
        output.push_str(&Self::verdict(report));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &SimulationReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn turn_line(turn: &TurnRecord) -> String {
        let label = format!("[round {}] {}:", turn.round, turn.agent.name);
        let detail = match &turn.outcome {
            TurnOutcome::Pending {
                deliberation_id,
                participants,
                expected,
            } => format!(
                "{} {} ({}/{})",
                "pending".yellow(),
                deliberation_id,
                participants,
                expected
            ),
            TurnOutcome::Finalized {
                deliberation_id,
                selected,
                created,
                ..
            } => format!(
                "{} {} -> {} ({} new)",
                "finalized".green().bold(),
                deliberation_id,
                selected.join(", "),
                created.len()
            ),
            TurnOutcome::Closed {
                deliberation_id,
                status,
            } => format!("{} {} ({})", "closed".green(), deliberation_id, status),
            TurnOutcome::Skipped { reason } => format!("{} {}", "skipped".dimmed(), reason),
            TurnOutcome::Stalled { reason } => format!("{} {}", "stalled".red(), reason),
        };
        format!("  {} {}", label.yellow(), detail)
    }

    fn verdict(report: &SimulationReport) -> String {
        if report.settled {
            format!("{}\n", "Deliberation settled.".green().bold())
        } else if report.cancelled {
            format!("{}\n", "Interrupted before settling.".yellow().bold())
        } else {
            format!(
                "{} ({} stalled turns)\n",
                "Did not settle within the round limit.".red().bold(),
                report.stalled_turns()
            )
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation_domain::{AgentIdentity, ArtifactId, DeliberationId, TeamId};

    fn report() -> SimulationReport {
        let mut report = SimulationReport::new(
            "s1",
            vec![AgentIdentity::new("a", "Ada"), AgentIdentity::new("b", "Bo")],
        );
        report.rounds_run = 1;
        report.record_turn(
            1,
            AgentIdentity::new("a", "Ada"),
            TurnOutcome::Pending {
                deliberation_id: DeliberationId::new("d-1"),
                participants: 1,
                expected: 2,
            },
        );
        report.record_turn(
            1,
            AgentIdentity::new("b", "Bo"),
            TurnOutcome::Finalized {
                deliberation_id: DeliberationId::new("d-1"),
                selected: vec!["Backend".to_string()],
                created: vec![ArtifactId::Team(TeamId::new("team-1"))],
                completed: true,
            },
        );
        report
    }

    #[test]
    fn test_format_mentions_every_turn() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&report());

        assert!(text.contains("[round 1] Ada: pending d-1 (1/2)"));
        assert!(text.contains("[round 1] Bo: finalized d-1 -> Backend (1 new)"));
        assert!(text.contains("Deliberation settled."));
    }

    #[test]
    fn test_format_json_is_tagged() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report())).unwrap();

        assert_eq!(json["swarm_id"], "s1");
        assert_eq!(json["settled"], true);
        assert_eq!(json["turns"][0]["outcome"]["outcome"], "pending");
        assert_eq!(json["turns"][1]["outcome"]["selected"][0], "Backend");
    }
}
