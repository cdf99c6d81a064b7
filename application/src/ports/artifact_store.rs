//! Artifact store port
//!
//! Teams, roles and vacancies: the concrete outputs of deliberations and
//! placement decisions.

use super::deliberation_store::StoreError;
use async_trait::async_trait;
use deliberation_domain::{
    AgentId, NewRole, NewTeam, Role, RoleId, SwarmId, Team, TeamId, Vacancy, VacancyId,
};

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn list_teams(&self, swarm_id: &SwarmId) -> Result<Vec<Team>, StoreError>;

    async fn create_team(&self, swarm_id: &SwarmId, team: &NewTeam) -> Result<Team, StoreError>;

    /// All roles across every team of the swarm
    async fn list_roles(&self, swarm_id: &SwarmId) -> Result<Vec<Role>, StoreError>;

    async fn create_role(&self, swarm_id: &SwarmId, role: &NewRole) -> Result<Role, StoreError>;

    async fn assign_role(&self, role_id: &RoleId, agent_id: &AgentId) -> Result<Role, StoreError>;

    async fn list_vacancies(&self, swarm_id: &SwarmId) -> Result<Vec<Vacancy>, StoreError>;

    async fn apply_for_vacancy(
        &self,
        vacancy_id: &VacancyId,
        agent_id: &AgentId,
    ) -> Result<Vacancy, StoreError>;

    async fn join_team(&self, team_id: &TeamId, agent_id: &AgentId) -> Result<Team, StoreError>;
}
