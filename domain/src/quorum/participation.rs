//! Participation tracking.
//!
//! The participant set is never stored: it is derived from a deliberation view
//! each time convergence is checked. Growth is monotone because the store only
//! ever gains responses and votes, so a converged deliberation stays converged
//! and any agent can re-check at any later turn.

use crate::core::ids::AgentId;
use crate::deliberation::DeliberationView;
use std::collections::BTreeSet;

/// Distinct agents that contributed a response or a vote to a deliberation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSet {
    agents: BTreeSet<AgentId>,
}

impl ParticipantSet {
    /// Build the set from a view: credited response authors plus every voter
    pub fn from_view(view: &DeliberationView) -> Self {
        let mut agents = BTreeSet::new();
        for response in &view.responses {
            agents.extend(response.credited_agents().cloned());
        }
        agents.extend(view.votes.iter().map(|v| v.voter_id.clone()));
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, agent: &AgentId) -> bool {
        self.agents.contains(agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.iter()
    }

    /// Converged iff `|participants| >= expected`.
    ///
    /// An expected count of zero is treated as one: an empty deliberation
    /// never counts as converged.
    pub fn is_converged(&self, expected: usize) -> bool {
        self.len() >= expected.max(1)
    }
}

/// Convenience wrapper over [`ParticipantSet::from_view`] + [`ParticipantSet::is_converged`]
pub fn is_converged(view: &DeliberationView, expected: usize) -> bool {
    ParticipantSet::from_view(view).is_converged(expected)
}
