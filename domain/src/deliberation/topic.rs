//! Deliberation topics.
//!
//! A topic is the logical question agents deliberate on. It determines how the
//! shared record is titled (so other agents can discover it), which topology
//! decides the outcome, and where the expected participant count comes from.

use super::entities::{Deliberation, DeliberationFilter, NewDeliberation, Topology};
use crate::core::ids::{AgentIdentity, SwarmId};
use serde::{Deserialize, Serialize};

const INITIAL_TEAMS_MARKER: &str = "[Initial Teams]";
const TEAM_PROPOSAL_MARKER: &str = "[Team Proposal]";

/// Where a deliberation's expected participant count comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedCountSource {
    /// `configuration.max_agents` of the swarm
    SwarmCapacity,
    /// Size of the live roster returned by the roster query
    ActiveRoster,
}

/// The logical question a deliberation answers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topic {
    /// Swarm-wide formation of the initial set of teams
    InitialTeams { swarm_id: SwarmId },
    /// Whether (and how) to create one specific team
    TeamProposal { swarm_id: SwarmId, team_name: String },
}

impl Topic {
    pub fn initial_teams(swarm_id: impl Into<SwarmId>) -> Self {
        Topic::InitialTeams {
            swarm_id: swarm_id.into(),
        }
    }

    pub fn team_proposal(swarm_id: impl Into<SwarmId>, team_name: impl Into<String>) -> Self {
        Topic::TeamProposal {
            swarm_id: swarm_id.into(),
            team_name: team_name.into().trim().to_string(),
        }
    }

    pub fn swarm_id(&self) -> &SwarmId {
        match self {
            Topic::InitialTeams { swarm_id } | Topic::TeamProposal { swarm_id, .. } => swarm_id,
        }
    }

    pub fn topology(&self) -> Topology {
        match self {
            Topic::InitialTeams { .. } => Topology::SharedList,
            Topic::TeamProposal { .. } => Topology::Voting,
        }
    }

    pub fn expected_count_source(&self) -> ExpectedCountSource {
        match self {
            Topic::InitialTeams { .. } => ExpectedCountSource::SwarmCapacity,
            Topic::TeamProposal { .. } => ExpectedCountSource::ActiveRoster,
        }
    }

    /// Title marker shared by every deliberation on this kind of topic
    pub fn marker(&self) -> &'static str {
        match self {
            Topic::InitialTeams { .. } => INITIAL_TEAMS_MARKER,
            Topic::TeamProposal { .. } => TEAM_PROPOSAL_MARKER,
        }
    }

    /// The most specific substring identifying this topic (used as the search term)
    pub fn key(&self) -> &str {
        match self {
            Topic::InitialTeams { swarm_id } => swarm_id.as_str(),
            Topic::TeamProposal { team_name, .. } => team_name,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Topic::InitialTeams { swarm_id } => {
                format!("{} swarm {}", INITIAL_TEAMS_MARKER, swarm_id)
            }
            Topic::TeamProposal {
                swarm_id,
                team_name,
            } => format!("{} {} (swarm {})", TEAM_PROPOSAL_MARKER, team_name, swarm_id),
        }
    }

    pub fn request_message(&self) -> String {
        match self {
            Topic::InitialTeams { swarm_id } => format!(
                "Propose one team the swarm {} should form, or vote for an existing proposal. \
                 Every proposal with support becomes a team.",
                swarm_id
            ),
            Topic::TeamProposal { team_name, .. } => format!(
                "Propose a structure for the team '{}', or vote for the best existing proposal. \
                 Only the top proposal is adopted.",
                team_name
            ),
        }
    }

    /// Store query used for the first, narrow discovery pass
    pub fn filter(&self) -> DeliberationFilter {
        DeliberationFilter {
            search: Some(self.key().to_string()),
            title_contains: Some(self.marker().to_string()),
        }
    }

    /// Whether a stored deliberation belongs to this topic (regardless of status).
    /// The whole title must match, not just the identifiers in it.
    pub fn matches(&self, deliberation: &Deliberation) -> bool {
        deliberation.title.trim() == self.title()
    }

    pub fn new_deliberation(&self, creator: &AgentIdentity) -> NewDeliberation {
        NewDeliberation {
            title: self.title(),
            topology: self.topology(),
            creator_id: creator.id.clone(),
            creator_name: creator.name.clone(),
            request_message: self.request_message(),
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title())
    }
}
