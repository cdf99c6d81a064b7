//! In-process port doubles shared by the use case tests.

use crate::ports::ProtocolPorts;
use crate::ports::artifact_store::ArtifactStore;
use crate::ports::decision_oracle::{DecisionOracle, OracleError};
use crate::ports::deliberation_store::{DeliberationStore, StoreError};
use crate::ports::roster::RosterPort;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use deliberation_domain::{
    AgentId, AgentIdentity, Deliberation, DeliberationFilter, DeliberationId, DeliberationStatus,
    DeliberationView, NewDeliberation, NewRole, NewTeam, Response, ResponseId, Role, RoleId,
    Swarm, SwarmAgent, SwarmConfiguration, SwarmId, Team, TeamId, Vacancy, VacancyId, Vote,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

fn at(tick: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(tick)
}

// ==================== Deliberation store ====================

#[derive(Default)]
pub(crate) struct StoreState {
    pub deliberations: Vec<Deliberation>,
    pub responses: Vec<Response>,
    pub votes: Vec<Vote>,
    ticks: i64,
}

#[derive(Default)]
pub(crate) struct MockStore {
    pub state: Mutex<StoreState>,
    pub fail_get: bool,
    /// Filtered listings come back empty, as a best-effort search may
    pub lossy_search: bool,
}

impl MockStore {
    pub fn failing_get() -> Self {
        Self {
            fail_get: true,
            ..Default::default()
        }
    }

    pub fn lossy() -> Self {
        Self {
            lossy_search: true,
            ..Default::default()
        }
    }

    pub fn with_deliberation(self, deliberation: Deliberation) -> Self {
        self.state.lock().unwrap().deliberations.push(deliberation);
        self
    }

    pub fn view(&self, id: &DeliberationId) -> Option<DeliberationView> {
        let state = self.state.lock().unwrap();
        let deliberation = state.deliberations.iter().find(|d| &d.id == id)?.clone();
        let votes: Vec<Vote> = state
            .votes
            .iter()
            .filter(|v| &v.deliberation_id == id)
            .cloned()
            .collect();
        let responses = state
            .responses
            .iter()
            .filter(|r| &r.deliberation_id == id)
            .map(|r| {
                let mut r = r.clone();
                r.vote_count = votes.iter().filter(|v| v.response_id == r.id).count();
                r
            })
            .collect();
        Some(DeliberationView {
            deliberation,
            responses,
            votes,
        })
    }
}

#[async_trait]
impl DeliberationStore for MockStore {
    async fn list(&self, filter: &DeliberationFilter) -> Result<Vec<Deliberation>, StoreError> {
        if self.lossy_search && !filter.is_unfiltered() {
            return Ok(Vec::new());
        }
        Ok(self.state.lock().unwrap().deliberations.clone())
    }

    async fn get(&self, id: &DeliberationId) -> Result<DeliberationView, StoreError> {
        if self.fail_get {
            return Err(StoreError::Connection("refused".to_string()));
        }
        self.view(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, spec: &NewDeliberation) -> Result<Deliberation, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.ticks += 1;
        let deliberation = Deliberation {
            id: DeliberationId::new(format!("d-{}", state.deliberations.len() + 1)),
            title: spec.title.clone(),
            topology: spec.topology,
            status: DeliberationStatus::CollectingResponses,
            creator_id: spec.creator_id.clone(),
            creator_name: spec.creator_name.clone(),
            request_message: spec.request_message.clone(),
            created_at: at(state.ticks),
        };
        state.deliberations.push(deliberation.clone());
        Ok(deliberation)
    }

    async fn respond(
        &self,
        id: &DeliberationId,
        responder: &AgentIdentity,
        body: &str,
    ) -> Result<Response, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.ticks += 1;
        let response = Response {
            id: ResponseId::new(format!("r-{}", state.responses.len() + 1)),
            deliberation_id: id.clone(),
            responder_id: responder.id.clone(),
            responder_name: responder.name.clone(),
            body: body.to_string(),
            vote_count: 0,
            contributors: Vec::new(),
            created_at: at(state.ticks),
        };
        state.responses.push(response.clone());
        Ok(response)
    }

    async fn vote(
        &self,
        id: &DeliberationId,
        response_id: &ResponseId,
        voter: &AgentIdentity,
    ) -> Result<Vote, StoreError> {
        let vote = Vote {
            deliberation_id: id.clone(),
            response_id: response_id.clone(),
            voter_id: voter.id.clone(),
            voter_name: voter.name.clone(),
        };
        self.state.lock().unwrap().votes.push(vote.clone());
        Ok(vote)
    }

    async fn update_status(
        &self,
        id: &DeliberationId,
        status: DeliberationStatus,
    ) -> Result<Deliberation, StoreError> {
        let mut state = self.state.lock().unwrap();
        let deliberation = state
            .deliberations
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        deliberation.status = status;
        Ok(deliberation.clone())
    }
}

// ==================== Artifact store ====================

#[derive(Default)]
pub(crate) struct MockArtifacts {
    pub teams: Mutex<Vec<Team>>,
    pub roles: Mutex<Vec<Role>>,
    pub vacancies: Mutex<Vec<Vacancy>>,
    /// Team names whose creation is rejected
    pub fail_team_names: HashSet<String>,
    pub fail_listing: bool,
}

impl MockArtifacts {
    pub fn with_team(self, id: &str, name: &str) -> Self {
        self.teams.lock().unwrap().push(Team {
            id: TeamId::new(id),
            swarm_id: SwarmId::new("s1"),
            name: name.to_string(),
            description: String::new(),
            created_by: AgentId::new("founder"),
            members: Vec::new(),
        });
        self
    }

    pub fn with_role(self, id: &str, team_id: &str, name: &str, assignee: Option<&str>) -> Self {
        self.roles.lock().unwrap().push(Role {
            id: RoleId::new(id),
            team_id: TeamId::new(team_id),
            name: name.to_string(),
            description: String::new(),
            created_by: AgentId::new("founder"),
            assignee: assignee.map(AgentId::new),
        });
        self
    }

    pub fn with_vacancy(self, id: &str, team_id: &str, role_name: &str) -> Self {
        self.vacancies.lock().unwrap().push(Vacancy {
            id: VacancyId::new(id),
            team_id: TeamId::new(team_id),
            role_name: role_name.to_string(),
            description: String::new(),
            applicants: Vec::new(),
        });
        self
    }
}

#[async_trait]
impl ArtifactStore for MockArtifacts {
    async fn list_teams(&self, _swarm_id: &SwarmId) -> Result<Vec<Team>, StoreError> {
        if self.fail_listing {
            return Err(StoreError::Connection("down".to_string()));
        }
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn create_team(&self, swarm_id: &SwarmId, team: &NewTeam) -> Result<Team, StoreError> {
        if self.fail_team_names.contains(&team.name) {
            return Err(StoreError::Rejected(team.name.clone()));
        }
        let mut teams = self.teams.lock().unwrap();
        let created = Team {
            id: TeamId::new(format!("t-{}", teams.len() + 1)),
            swarm_id: swarm_id.clone(),
            name: team.name.clone(),
            description: team.description.clone(),
            created_by: team.created_by.clone(),
            members: Vec::new(),
        };
        teams.push(created.clone());
        Ok(created)
    }

    async fn list_roles(&self, _swarm_id: &SwarmId) -> Result<Vec<Role>, StoreError> {
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn create_role(&self, _swarm_id: &SwarmId, role: &NewRole) -> Result<Role, StoreError> {
        let mut roles = self.roles.lock().unwrap();
        let created = Role {
            id: RoleId::new(format!("role-{}", roles.len() + 1)),
            team_id: role.team_id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            created_by: role.created_by.clone(),
            assignee: None,
        };
        roles.push(created.clone());
        Ok(created)
    }

    async fn assign_role(&self, role_id: &RoleId, agent_id: &AgentId) -> Result<Role, StoreError> {
        let mut roles = self.roles.lock().unwrap();
        let role = roles
            .iter_mut()
            .find(|r| &r.id == role_id)
            .ok_or_else(|| StoreError::NotFound(role_id.to_string()))?;
        role.assignee = Some(agent_id.clone());
        Ok(role.clone())
    }

    async fn list_vacancies(&self, _swarm_id: &SwarmId) -> Result<Vec<Vacancy>, StoreError> {
        Ok(self.vacancies.lock().unwrap().clone())
    }

    async fn apply_for_vacancy(
        &self,
        vacancy_id: &VacancyId,
        agent_id: &AgentId,
    ) -> Result<Vacancy, StoreError> {
        let mut vacancies = self.vacancies.lock().unwrap();
        let vacancy = vacancies
            .iter_mut()
            .find(|v| &v.id == vacancy_id)
            .ok_or_else(|| StoreError::NotFound(vacancy_id.to_string()))?;
        vacancy.applicants.push(agent_id.clone());
        Ok(vacancy.clone())
    }

    async fn join_team(&self, team_id: &TeamId, agent_id: &AgentId) -> Result<Team, StoreError> {
        let mut teams = self.teams.lock().unwrap();
        let team = teams
            .iter_mut()
            .find(|t| &t.id == team_id)
            .ok_or_else(|| StoreError::NotFound(team_id.to_string()))?;
        team.members.push(agent_id.clone());
        Ok(team.clone())
    }
}

// ==================== Roster ====================

pub(crate) struct MockRoster {
    pub max_agents: usize,
    pub active: usize,
}

#[async_trait]
impl RosterPort for MockRoster {
    async fn get_swarm(&self, swarm_id: &SwarmId) -> Result<Swarm, StoreError> {
        Ok(Swarm {
            id: swarm_id.clone(),
            name: "Test swarm".to_string(),
            configuration: SwarmConfiguration {
                max_agents: self.max_agents,
            },
        })
    }

    async fn get_swarm_agents(&self, _swarm_id: &SwarmId) -> Result<Vec<SwarmAgent>, StoreError> {
        Ok((0..self.active)
            .map(|i| SwarmAgent {
                id: AgentId::new(format!("agent-{}", i)),
                name: format!("Agent {}", i),
                team_id: None,
                role_id: None,
            })
            .collect())
    }
}

// ==================== Oracle ====================

/// Oracle with one reply queue per agent, keyed by the name in the prompt
#[derive(Default)]
pub(crate) struct MockOracle {
    replies: Mutex<HashMap<String, VecDeque<String>>>,
    calls: Mutex<usize>,
}

impl MockOracle {
    pub fn reply(self, agent: &str, raw: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(agent.to_string())
            .or_default()
            .push_back(raw.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DecisionOracle for MockOracle {
    async fn infer(&self, _system: &str, user: &str) -> Result<String, OracleError> {
        *self.calls.lock().unwrap() += 1;
        let mut replies = self.replies.lock().unwrap();
        for (agent, queue) in replies.iter_mut() {
            if user.contains(&format!("You are {}", agent)) {
                return queue
                    .pop_front()
                    .ok_or_else(|| OracleError::Unavailable("exhausted".to_string()));
            }
        }
        Err(OracleError::Unavailable("unknown agent".to_string()))
    }
}

// ==================== Wiring ====================

pub(crate) struct Harness {
    pub store: Arc<MockStore>,
    pub artifacts: Arc<MockArtifacts>,
    pub oracle: Arc<MockOracle>,
    pub ports: ProtocolPorts,
}

pub(crate) fn harness(
    store: MockStore,
    artifacts: MockArtifacts,
    oracle: MockOracle,
    roster: MockRoster,
) -> Harness {
    let store = Arc::new(store);
    let artifacts = Arc::new(artifacts);
    let oracle = Arc::new(oracle);
    let ports = ProtocolPorts {
        deliberations: store.clone(),
        artifacts: artifacts.clone(),
        roster: Arc::new(roster),
        oracle: oracle.clone(),
    };
    Harness {
        store,
        artifacts,
        oracle,
        ports,
    }
}

pub(crate) fn propose(body: &str) -> String {
    format!(r#"{{"action": "propose", "proposal": "{}"}}"#, body)
}

pub(crate) fn vote(body: &str) -> String {
    format!(r#"{{"action": "vote", "proposal": "{}"}}"#, body)
}
