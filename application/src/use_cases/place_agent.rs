//! Place Agent use case
//!
//! One agent decides where it belongs in the swarm and acts on it. Placement
//! needs no convergence, except for proposing a new team, which goes through
//! a voting deliberation.

use crate::config::BehaviorConfig;
use crate::ports::ProtocolPorts;
use crate::ports::artifact_store::ArtifactStore;
use crate::ports::progress::{DeliberationNotifier, NoProgress};
use crate::ports::roster::RosterPort;
use crate::use_cases::ask_oracle::AskOracleUseCase;
use crate::use_cases::run_deliberation::{
    RunDeliberationInput, RunDeliberationUseCase, TurnOutcome,
};
use crate::use_cases::shared::{DeliberationError, bounded};
use deliberation_domain::{
    AgentIdentity, NewRole, PlacementDecision, PromptTemplate, Role, RoleId, SwarmId, Team,
    TeamId, Topic, Vacancy,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the PlaceAgent use case
#[derive(Debug, Clone)]
pub struct PlaceAgentInput {
    pub swarm_id: SwarmId,
    pub agent: AgentIdentity,
    pub requirements: String,
}

impl PlaceAgentInput {
    pub fn new(swarm_id: impl Into<SwarmId>, agent: AgentIdentity) -> Self {
        Self {
            swarm_id: swarm_id.into(),
            agent,
            requirements: String::new(),
        }
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = requirements.into();
        self
    }
}

/// What the agent ended up doing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "placement", content = "detail", rename_all = "snake_case")]
pub enum PlacementOutcome {
    RoleAssigned(Role),
    /// A new role was created and taken
    RoleCreated(Role),
    AppliedToVacancy(Vacancy),
    JoinedTeam(Team),
    /// A team proposal deliberation was advanced by one turn
    TeamProposed(TurnOutcome),
    Waited { reason: Option<String> },
    /// The oracle gave nothing usable, or the decision referenced something
    /// that does not exist or is no longer available
    Skipped { reason: String },
    Stalled { reason: String },
}

impl PlacementOutcome {
    pub fn summary(&self) -> String {
        match self {
            PlacementOutcome::RoleAssigned(role) => format!("took role '{}'", role.name),
            PlacementOutcome::RoleCreated(role) => {
                format!("created and took role '{}'", role.name)
            }
            PlacementOutcome::AppliedToVacancy(vacancy) => {
                format!("applied for '{}'", vacancy.role_name)
            }
            PlacementOutcome::JoinedTeam(team) => format!("joined team '{}'", team.name),
            PlacementOutcome::TeamProposed(turn) => match turn {
                TurnOutcome::Pending {
                    participants,
                    expected,
                    ..
                } => format!("team proposal pending ({}/{})", participants, expected),
                TurnOutcome::Finalized { selected, .. } => {
                    format!("team proposal settled on {:?}", selected)
                }
                other => format!("team proposal: {:?}", other),
            },
            PlacementOutcome::Waited { reason } => match reason {
                Some(reason) => format!("waiting: {}", reason),
                None => "waiting".to_string(),
            },
            PlacementOutcome::Skipped { reason } => format!("skipped: {}", reason),
            PlacementOutcome::Stalled { reason } => format!("stalled: {}", reason),
        }
    }
}

/// Use case for placing one agent
pub struct PlaceAgentUseCase {
    artifacts: Arc<dyn ArtifactStore>,
    roster: Arc<dyn RosterPort>,
    oracle: AskOracleUseCase,
    deliberation: RunDeliberationUseCase,
    behavior: BehaviorConfig,
}

impl PlaceAgentUseCase {
    pub fn new(ports: ProtocolPorts, behavior: BehaviorConfig) -> Self {
        Self {
            artifacts: ports.artifacts.clone(),
            roster: ports.roster.clone(),
            oracle: AskOracleUseCase::new(ports.oracle.clone(), behavior.clone()),
            deliberation: RunDeliberationUseCase::new(ports, behavior.clone()),
            behavior,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: PlaceAgentInput) -> PlacementOutcome {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: PlaceAgentInput,
        progress: &dyn DeliberationNotifier,
    ) -> PlacementOutcome {
        match self.place(&input, progress).await {
            Ok((action, outcome)) => {
                progress.on_placement(&input.agent, action, &outcome.summary());
                outcome
            }
            Err(e) => {
                warn!(agent = %input.agent.id, "Placement stalled: {}", e);
                progress.on_stalled(&input.agent, &e.to_string());
                PlacementOutcome::Stalled {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn place(
        &self,
        input: &PlaceAgentInput,
        progress: &dyn DeliberationNotifier,
    ) -> Result<(&'static str, PlacementOutcome), DeliberationError> {
        let agent = &input.agent;
        let swarm_id = &input.swarm_id;
        let timeout = self.behavior.timeout;

        let roster = bounded(timeout, self.roster.get_swarm_agents(swarm_id)).await?;
        let teams = bounded(timeout, self.artifacts.list_teams(swarm_id)).await?;
        let roles = bounded(timeout, self.artifacts.list_roles(swarm_id)).await?;
        let vacancies = bounded(timeout, self.artifacts.list_vacancies(swarm_id)).await?;

        let prompt = PromptTemplate::placement_prompt(
            agent,
            &input.requirements,
            &roster,
            &teams,
            &roles,
            &vacancies,
        );
        let Some(decision) = self
            .oracle
            .ask(agent, PromptTemplate::placement_system(), &prompt, progress)
            .await
        else {
            return Ok((
                "none",
                PlacementOutcome::Skipped {
                    reason: "oracle gave no placement decision".to_string(),
                },
            ));
        };

        let placement = match PlacementDecision::try_from(&decision) {
            Ok(placement) => placement,
            Err(e) => {
                warn!(agent = %agent.id, "Unusable placement decision: {}", e);
                return Ok((
                    "none",
                    PlacementOutcome::Skipped {
                        reason: format!("invalid placement decision: {}", e),
                    },
                ));
            }
        };
        let action = placement.action_name();
        debug!(agent = %agent.id, action, "Placement decision");

        let outcome = match placement {
            PlacementDecision::AssignRole { role_id } => {
                self.assign_role(agent, &role_id, &roles).await?
            }
            PlacementDecision::CreateRole {
                team_id,
                name,
                description,
            } => {
                self.create_role(input, &team_id, &name, &description, &teams, &roles)
                    .await?
            }
            PlacementDecision::ApplyVacancy { vacancy_id } => {
                if vacancies.iter().any(|v| v.id == vacancy_id) {
                    let vacancy = bounded(
                        timeout,
                        self.artifacts.apply_for_vacancy(&vacancy_id, &agent.id),
                    )
                    .await?;
                    PlacementOutcome::AppliedToVacancy(vacancy)
                } else {
                    skipped(format!("unknown vacancy {}", vacancy_id))
                }
            }
            PlacementDecision::JoinTeam { team_id } => {
                if teams.iter().any(|t| t.id == team_id) {
                    self.join_team(agent, &team_id).await?
                } else {
                    skipped(format!("unknown team {}", team_id))
                }
            }
            PlacementDecision::ProposeTeam { team_name } => {
                match teams.iter().find(|t| t.has_name(&team_name)) {
                    Some(existing) => {
                        debug!(team = %existing.id, "Proposed team already exists, joining");
                        self.join_team(agent, &existing.id).await?
                    }
                    None => {
                        let turn = RunDeliberationInput::new(
                            Topic::team_proposal(swarm_id.clone(), team_name),
                            agent.clone(),
                        )
                        .with_requirements(input.requirements.clone());
                        PlacementOutcome::TeamProposed(
                            self.deliberation.execute_with_progress(turn, progress).await,
                        )
                    }
                }
            }
            PlacementDecision::Wait { reason } => PlacementOutcome::Waited { reason },
        };

        info!(agent = %agent.id, action, "{}", outcome.summary());
        Ok((action, outcome))
    }

    async fn assign_role(
        &self,
        agent: &AgentIdentity,
        role_id: &RoleId,
        roles: &[Role],
    ) -> Result<PlacementOutcome, DeliberationError> {
        let Some(role) = roles.iter().find(|r| &r.id == role_id) else {
            return Ok(skipped(format!("unknown role {}", role_id)));
        };
        if role.assignee.as_ref().is_some_and(|holder| holder != &agent.id) {
            return Ok(skipped(format!("role '{}' is already taken", role.name)));
        }

        let role = bounded(
            self.behavior.timeout,
            self.artifacts.assign_role(role_id, &agent.id),
        )
        .await?;
        Ok(PlacementOutcome::RoleAssigned(role))
    }

    /// Create a role, reusing a vacant role of the same name on that team.
    async fn create_role(
        &self,
        input: &PlaceAgentInput,
        team_id: &TeamId,
        name: &str,
        description: &str,
        teams: &[Team],
        roles: &[Role],
    ) -> Result<PlacementOutcome, DeliberationError> {
        if !teams.iter().any(|t| &t.id == team_id) {
            return Ok(skipped(format!("unknown team {}", team_id)));
        }
        if let Some(vacant) = roles
            .iter()
            .find(|r| &r.team_id == team_id && r.has_name(name) && r.is_vacant())
        {
            debug!(role = %vacant.id, "Vacant role with that name exists, taking it");
            return self.assign_role(&input.agent, &vacant.id, roles).await;
        }

        let spec = NewRole {
            team_id: team_id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            created_by: input.agent.id.clone(),
        };
        let role = bounded(
            self.behavior.timeout,
            self.artifacts.create_role(&input.swarm_id, &spec),
        )
        .await?;
        let role = bounded(
            self.behavior.timeout,
            self.artifacts.assign_role(&role.id, &input.agent.id),
        )
        .await?;
        Ok(PlacementOutcome::RoleCreated(role))
    }

    async fn join_team(
        &self,
        agent: &AgentIdentity,
        team_id: &TeamId,
    ) -> Result<PlacementOutcome, DeliberationError> {
        let team = bounded(
            self.behavior.timeout,
            self.artifacts.join_team(team_id, &agent.id),
        )
        .await?;
        Ok(PlacementOutcome::JoinedTeam(team))
    }
}

fn skipped(reason: String) -> PlacementOutcome {
    warn!("Placement skipped: {}", reason);
    PlacementOutcome::Skipped { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        MockArtifacts, MockOracle, MockRoster, MockStore, harness, propose,
    };
    use deliberation_domain::AgentId;

    fn placer(artifacts: MockArtifacts, oracle: MockOracle) -> (Arc<MockArtifacts>, PlaceAgentUseCase) {
        let h = harness(
            MockStore::default(),
            artifacts,
            oracle,
            MockRoster {
                max_agents: 4,
                active: 2,
            },
        );
        (
            h.artifacts,
            PlaceAgentUseCase::new(h.ports, BehaviorConfig::default()),
        )
    }

    fn alice() -> PlaceAgentInput {
        PlaceAgentInput::new("s1", AgentIdentity::new("a", "Alice"))
    }

    #[tokio::test]
    async fn test_assign_vacant_role() {
        let (artifacts, use_case) = placer(
            MockArtifacts::default()
                .with_team("t-1", "Backend")
                .with_role("role-1", "t-1", "API", None),
            MockOracle::default().reply("Alice", r#"{"action": "assign_role", "role_id": "role-1"}"#),
        );

        let outcome = use_case.execute(alice()).await;

        assert!(matches!(outcome, PlacementOutcome::RoleAssigned(_)));
        assert_eq!(
            artifacts.roles.lock().unwrap()[0].assignee,
            Some(AgentId::new("a"))
        );
    }

    #[tokio::test]
    async fn test_taken_role_is_skipped() {
        let (artifacts, use_case) = placer(
            MockArtifacts::default()
                .with_team("t-1", "Backend")
                .with_role("role-1", "t-1", "API", Some("b")),
            MockOracle::default().reply("Alice", r#"{"action": "assign_role", "role_id": "role-1"}"#),
        );

        let outcome = use_case.execute(alice()).await;

        assert!(matches!(outcome, PlacementOutcome::Skipped { .. }));
        assert_eq!(
            artifacts.roles.lock().unwrap()[0].assignee,
            Some(AgentId::new("b"))
        );
    }

    #[tokio::test]
    async fn test_create_role_then_take_it() {
        let (artifacts, use_case) = placer(
            MockArtifacts::default().with_team("t-1", "Backend"),
            MockOracle::default().reply(
                "Alice",
                r#"{"action": "create_role", "team_id": "t-1", "name": "DBA", "description": "Owns the schema"}"#,
            ),
        );

        let outcome = use_case.execute(alice()).await;

        match outcome {
            PlacementOutcome::RoleCreated(role) => {
                assert_eq!(role.name, "DBA");
                assert_eq!(role.assignee, Some(AgentId::new("a")));
            }
            other => panic!("Expected RoleCreated, got {:?}", other),
        }
        assert_eq!(artifacts.roles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_role_reuses_vacant_namesake() {
        let (artifacts, use_case) = placer(
            MockArtifacts::default()
                .with_team("t-1", "Backend")
                .with_role("role-1", "t-1", "dba", None),
            MockOracle::default().reply(
                "Alice",
                r#"{"action": "create_role", "team_id": "t-1", "name": "DBA"}"#,
            ),
        );

        let outcome = use_case.execute(alice()).await;

        assert!(matches!(outcome, PlacementOutcome::RoleAssigned(_)));
        assert_eq!(artifacts.roles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_and_join() {
        let (artifacts, use_case) = placer(
            MockArtifacts::default()
                .with_team("t-1", "Backend")
                .with_vacancy("v-1", "t-1", "SRE"),
            MockOracle::default()
                .reply("Alice", r#"{"action": "apply", "vacancy_id": "v-1"}"#)
                .reply("Alice", r#"{"action": "join_team", "team_id": "t-1"}"#),
        );

        let applied = use_case.execute(alice()).await;
        let joined = use_case.execute(alice()).await;

        assert!(matches!(applied, PlacementOutcome::AppliedToVacancy(_)));
        assert!(matches!(joined, PlacementOutcome::JoinedTeam(_)));
        assert_eq!(
            artifacts.vacancies.lock().unwrap()[0].applicants,
            vec![AgentId::new("a")]
        );
        assert_eq!(
            artifacts.teams.lock().unwrap()[0].members,
            vec![AgentId::new("a")]
        );
    }

    #[tokio::test]
    async fn test_propose_team_opens_voting_deliberation() {
        let (_, use_case) = placer(
            MockArtifacts::default(),
            MockOracle::default()
                .reply("Alice", r#"{"action": "propose_team", "team_name": "Platform"}"#)
                .reply("Alice", &propose("Platform")),
        );

        let outcome = use_case.execute(alice()).await;

        match outcome {
            PlacementOutcome::TeamProposed(TurnOutcome::Pending {
                participants,
                expected,
                ..
            }) => {
                assert_eq!(participants, 1);
                // Team proposals count the active roster, not capacity
                assert_eq!(expected, 2);
            }
            other => panic!("Expected a pending team proposal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_propose_existing_team_joins_it() {
        let (artifacts, use_case) = placer(
            MockArtifacts::default().with_team("t-1", "Platform"),
            MockOracle::default()
                .reply("Alice", r#"{"action": "propose_team", "team_name": "platform"}"#),
        );

        let outcome = use_case.execute(alice()).await;

        assert!(matches!(outcome, PlacementOutcome::JoinedTeam(_)));
        assert_eq!(artifacts.teams.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wait_and_unknown_action() {
        let (_, use_case) = placer(
            MockArtifacts::default(),
            MockOracle::default()
                .reply("Alice", r#"{"action": "wait", "reason": "no fit yet"}"#)
                .reply("Alice", r#"{"action": "dance"}"#),
        );

        let waited = use_case.execute(alice()).await;
        let skipped = use_case.execute(alice()).await;

        assert_eq!(
            waited,
            PlacementOutcome::Waited {
                reason: Some("no fit yet".to_string())
            }
        );
        assert!(matches!(skipped, PlacementOutcome::Skipped { .. }));
    }
}
