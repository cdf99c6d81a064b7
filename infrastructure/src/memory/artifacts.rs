use async_trait::async_trait;
use deliberation_application::{ArtifactStore, StoreError};
use deliberation_domain::{
    AgentId, NewRole, NewTeam, Role, RoleId, SwarmId, Team, TeamId, Vacancy, VacancyId,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    teams: Vec<Team>,
    roles: Vec<Role>,
    vacancies: Vec<Vacancy>,
    next_id: usize,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn team_in_swarm(&self, swarm_id: &SwarmId, team_id: &TeamId) -> bool {
        self.teams
            .iter()
            .any(|t| &t.id == team_id && &t.swarm_id == swarm_id)
    }

    fn team_ids(&self, swarm_id: &SwarmId) -> Vec<TeamId> {
        self.teams
            .iter()
            .filter(|t| &t.swarm_id == swarm_id)
            .map(|t| t.id.clone())
            .collect()
    }
}

/// Artifact store held in process memory
///
/// Like the remote service it stands in for, it does not deduplicate names:
/// two `create_team` calls with the same name make two teams. Duplicate
/// prevention is the caller's job.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    state: Mutex<State>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a vacancy on an existing team (vacancies are seeded, never created by agents)
    pub async fn add_vacancy(
        &self,
        team_id: &TeamId,
        role_name: &str,
        description: &str,
    ) -> Result<Vacancy, StoreError> {
        let mut state = self.state.lock().await;
        if !state.teams.iter().any(|t| &t.id == team_id) {
            return Err(StoreError::NotFound(format!("team {}", team_id)));
        }
        let vacancy = Vacancy {
            id: VacancyId::new(state.next_id("vacancy")),
            team_id: team_id.clone(),
            role_name: role_name.to_string(),
            description: description.to_string(),
            applicants: Vec::new(),
        };
        state.vacancies.push(vacancy.clone());
        Ok(vacancy)
    }

    pub async fn teams(&self) -> Vec<Team> {
        self.state.lock().await.teams.clone()
    }

    pub async fn roles(&self) -> Vec<Role> {
        self.state.lock().await.roles.clone()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn list_teams(&self, swarm_id: &SwarmId) -> Result<Vec<Team>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .teams
            .iter()
            .filter(|t| &t.swarm_id == swarm_id)
            .cloned()
            .collect())
    }

    async fn create_team(&self, swarm_id: &SwarmId, team: &NewTeam) -> Result<Team, StoreError> {
        let mut state = self.state.lock().await;
        let created = Team {
            id: TeamId::new(state.next_id("team")),
            swarm_id: swarm_id.clone(),
            name: team.name.clone(),
            description: team.description.clone(),
            created_by: team.created_by.clone(),
            members: Vec::new(),
        };
        state.teams.push(created.clone());
        Ok(created)
    }

    async fn list_roles(&self, swarm_id: &SwarmId) -> Result<Vec<Role>, StoreError> {
        let state = self.state.lock().await;
        let teams = state.team_ids(swarm_id);
        Ok(state
            .roles
            .iter()
            .filter(|r| teams.contains(&r.team_id))
            .cloned()
            .collect())
    }

    async fn create_role(&self, swarm_id: &SwarmId, role: &NewRole) -> Result<Role, StoreError> {
        let mut state = self.state.lock().await;
        if !state.team_in_swarm(swarm_id, &role.team_id) {
            return Err(StoreError::NotFound(format!("team {}", role.team_id)));
        }
        let created = Role {
            id: RoleId::new(state.next_id("role")),
            team_id: role.team_id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            created_by: role.created_by.clone(),
            assignee: None,
        };
        state.roles.push(created.clone());
        Ok(created)
    }

    async fn assign_role(&self, role_id: &RoleId, agent_id: &AgentId) -> Result<Role, StoreError> {
        let mut state = self.state.lock().await;
        let role = state
            .roles
            .iter_mut()
            .find(|r| &r.id == role_id)
            .ok_or_else(|| StoreError::NotFound(format!("role {}", role_id)))?;

        match &role.assignee {
            Some(holder) if holder != agent_id => Err(StoreError::Rejected(format!(
                "role {} is held by {}",
                role_id, holder
            ))),
            _ => {
                role.assignee = Some(agent_id.clone());
                Ok(role.clone())
            }
        }
    }

    async fn list_vacancies(&self, swarm_id: &SwarmId) -> Result<Vec<Vacancy>, StoreError> {
        let state = self.state.lock().await;
        let teams = state.team_ids(swarm_id);
        Ok(state
            .vacancies
            .iter()
            .filter(|v| teams.contains(&v.team_id))
            .cloned()
            .collect())
    }

    async fn apply_for_vacancy(
        &self,
        vacancy_id: &VacancyId,
        agent_id: &AgentId,
    ) -> Result<Vacancy, StoreError> {
        let mut state = self.state.lock().await;
        let vacancy = state
            .vacancies
            .iter_mut()
            .find(|v| &v.id == vacancy_id)
            .ok_or_else(|| StoreError::NotFound(format!("vacancy {}", vacancy_id)))?;
        if !vacancy.applicants.contains(agent_id) {
            vacancy.applicants.push(agent_id.clone());
        }
        Ok(vacancy.clone())
    }

    async fn join_team(&self, team_id: &TeamId, agent_id: &AgentId) -> Result<Team, StoreError> {
        let mut state = self.state.lock().await;
        let team = state
            .teams
            .iter_mut()
            .find(|t| &t.id == team_id)
            .ok_or_else(|| StoreError::NotFound(format!("team {}", team_id)))?;
        if !team.members.contains(agent_id) {
            team.members.push(agent_id.clone());
        }
        Ok(team.clone())
    }
}
