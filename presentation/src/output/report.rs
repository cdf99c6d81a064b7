//! Simulation report model
//!
//! Filled in by the binary as the run progresses, then rendered by
//! [`ConsoleFormatter`](super::console::ConsoleFormatter).

use deliberation_application::{PlacementOutcome, TurnOutcome};
use deliberation_domain::{AgentIdentity, Deliberation, Role, Team};
use serde::Serialize;

/// One agent's deliberation turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub round: usize,
    pub agent: AgentIdentity,
    pub outcome: TurnOutcome,
}

/// One agent's placement turn
#[derive(Debug, Clone, Serialize)]
pub struct PlacementRecord {
    pub agent: AgentIdentity,
    pub outcome: PlacementOutcome,
}

/// Everything a simulation run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    pub swarm_id: String,
    pub agents: Vec<AgentIdentity>,
    pub rounds_run: usize,
    /// The initial-teams deliberation reached a terminal state
    pub settled: bool,
    /// The run was interrupted before it could settle
    pub cancelled: bool,
    pub turns: Vec<TurnRecord>,
    pub placements: Vec<PlacementRecord>,
    /// Final state of every deliberation in the store
    pub deliberations: Vec<Deliberation>,
    pub teams: Vec<Team>,
    pub roles: Vec<Role>,
}

impl SimulationReport {
    pub fn new(swarm_id: impl Into<String>, agents: Vec<AgentIdentity>) -> Self {
        Self {
            swarm_id: swarm_id.into(),
            agents,
            ..Self::default()
        }
    }

    pub fn record_turn(&mut self, round: usize, agent: AgentIdentity, outcome: TurnOutcome) {
        self.settled |= outcome.is_settled();
        self.turns.push(TurnRecord {
            round,
            agent,
            outcome,
        });
    }

    pub fn stalled_turns(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| matches!(t.outcome, TurnOutcome::Stalled { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation_domain::{DeliberationId, DeliberationStatus};

    #[test]
    fn test_record_turn_tracks_settlement() {
        let mut report = SimulationReport::new("s1", vec![AgentIdentity::new("a", "A")]);
        report.record_turn(
            1,
            AgentIdentity::new("a", "A"),
            TurnOutcome::Stalled {
                reason: "Timeout".to_string(),
            },
        );
        assert!(!report.settled);

        report.record_turn(
            2,
            AgentIdentity::new("a", "A"),
            TurnOutcome::Closed {
                deliberation_id: DeliberationId::new("d-1"),
                status: DeliberationStatus::Completed,
            },
        );
        assert!(report.settled);
        assert_eq!(report.stalled_turns(), 1);
    }
}
