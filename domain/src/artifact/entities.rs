//! Swarm roster and output artifacts (teams, roles, vacancies).

use crate::core::ids::{AgentId, RoleId, SwarmId, TeamId, VacancyId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmConfiguration {
    /// Expected number of agents in the swarm
    pub max_agents: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swarm {
    pub id: SwarmId,
    pub name: String,
    #[serde(default)]
    pub configuration: SwarmConfiguration,
}

/// A live member of a swarm's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmAgent {
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub swarm_id: SwarmId,
    pub name: String,
    pub description: String,
    pub created_by: AgentId,
    #[serde(default)]
    pub members: Vec<AgentId>,
}

impl Team {
    /// Names match case-insensitively after trimming
    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub team_id: TeamId,
    pub name: String,
    pub description: String,
    pub created_by: AgentId,
    #[serde(default)]
    pub assignee: Option<AgentId>,
}

impl Role {
    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    pub fn is_vacant(&self) -> bool {
        self.assignee.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: VacancyId,
    pub team_id: TeamId,
    pub role_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub applicants: Vec<AgentId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
    pub created_by: AgentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub team_id: TeamId,
    pub name: String,
    pub description: String,
    pub created_by: AgentId,
}

/// Identifier of a materialized artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ArtifactId {
    Team(TeamId),
    Role(RoleId),
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactId::Team(id) => write!(f, "team:{}", id),
            ArtifactId::Role(id) => write!(f, "role:{}", id),
        }
    }
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_name_match_ignores_case_and_padding() {
        let team = Team {
            id: TeamId::new("t-1"),
            swarm_id: SwarmId::new("s-1"),
            name: "Backend".to_string(),
            description: String::new(),
            created_by: AgentId::new("a"),
            members: vec![],
        };
        assert!(team.has_name(" backend "));
        assert!(!team.has_name("Backend Ops"));
    }

    #[test]
    fn test_artifact_id_display() {
        assert_eq!(ArtifactId::Team(TeamId::new("t-1")).to_string(), "team:t-1");
        assert_eq!(ArtifactId::Role(RoleId::new("r-1")).to_string(), "role:r-1");
    }
}
