//! Finalizer
//!
//! Turns a converged deliberation's surviving proposals into teams (and their
//! starting roles), then marks the deliberation completed. Several agents may
//! observe convergence at once, so every artifact is re-checked by name right
//! before creation. Individual failures are logged and skipped.

use crate::config::BehaviorConfig;
use crate::ports::artifact_store::ArtifactStore;
use crate::ports::deliberation_store::{DeliberationStore, StoreError};
use crate::ports::progress::DeliberationNotifier;
use crate::use_cases::shared::bounded;
use deliberation_domain::{
    AgentIdentity, ArtifactId, Deliberation, DeliberationStatus, NewRole, NewTeam, Role,
    SwarmId, Team, TeamBlueprint,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a finalization pass achieved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalizeOutput {
    /// Artifacts this agent created (not those found already present)
    pub created: Vec<ArtifactId>,
    /// Whether the deliberation was marked completed
    pub completed: bool,
}

/// Use case for materializing a converged outcome
pub struct Finalizer {
    deliberations: Arc<dyn DeliberationStore>,
    artifacts: Arc<dyn ArtifactStore>,
    behavior: BehaviorConfig,
}

impl Finalizer {
    pub fn new(
        deliberations: Arc<dyn DeliberationStore>,
        artifacts: Arc<dyn ArtifactStore>,
        behavior: BehaviorConfig,
    ) -> Self {
        Self {
            deliberations,
            artifacts,
            behavior,
        }
    }

    /// Create one team per selected body, skipping names that already exist,
    /// then close the deliberation.
    ///
    /// If the existing teams cannot be listed nothing is created and the
    /// deliberation stays open, so a later turn retries.
    pub async fn finalize(
        &self,
        deliberation: &Deliberation,
        swarm_id: &SwarmId,
        selected: &[String],
        agent: &AgentIdentity,
        progress: &dyn DeliberationNotifier,
    ) -> FinalizeOutput {
        let mut teams = match bounded(self.behavior.timeout, self.artifacts.list_teams(swarm_id))
            .await
        {
            Ok(teams) => teams,
            Err(e) => {
                warn!(
                    deliberation = %deliberation.id,
                    "Could not list teams before finalizing: {}", e
                );
                return FinalizeOutput::default();
            }
        };
        let mut roles = match bounded(self.behavior.timeout, self.artifacts.list_roles(swarm_id))
            .await
        {
            Ok(roles) => Some(roles),
            Err(e) => {
                warn!(
                    deliberation = %deliberation.id,
                    "Could not list roles, skipping role creation: {}", e
                );
                None
            }
        };

        let mut created = Vec::new();
        for body in selected {
            let Some(blueprint) = TeamBlueprint::from_body(body) else {
                debug!("Selected body names nothing, skipping");
                continue;
            };

            let team = match teams.iter().find(|t| t.has_name(&blueprint.name)) {
                Some(existing) => {
                    debug!(team = %existing.id, "Team '{}' already exists", existing.name);
                    existing.clone()
                }
                None => match self
                    .create_team(deliberation, swarm_id, &blueprint, agent)
                    .await
                {
                    Ok(team) => {
                        created.push(ArtifactId::Team(team.id.clone()));
                        teams.push(team.clone());
                        team
                    }
                    Err(e) => {
                        warn!("Failed to create team '{}': {}", blueprint.name, e);
                        continue;
                    }
                },
            };

            if let Some(roles) = roles.as_mut() {
                self.create_roles(swarm_id, &team, &blueprint, roles, agent, &mut created)
                    .await;
            }
        }

        if !created.is_empty() {
            progress.on_artifacts_created(&deliberation.id, &created);
        }

        let completed = match bounded(
            self.behavior.timeout,
            self.deliberations
                .update_status(&deliberation.id, DeliberationStatus::Completed),
        )
        .await
        {
            Ok(_) => {
                info!(
                    deliberation = %deliberation.id,
                    created = created.len(),
                    "Deliberation completed"
                );
                progress.on_completed(&deliberation.id);
                true
            }
            Err(e) => {
                warn!(
                    deliberation = %deliberation.id,
                    "Failed to mark deliberation completed: {}", e
                );
                false
            }
        };

        FinalizeOutput { created, completed }
    }

    async fn create_team(
        &self,
        deliberation: &Deliberation,
        swarm_id: &SwarmId,
        blueprint: &TeamBlueprint,
        agent: &AgentIdentity,
    ) -> Result<Team, StoreError> {
        let description = if blueprint.description.is_empty() {
            format!("Formed by deliberation '{}'", deliberation.title)
        } else {
            blueprint.description.clone()
        };
        let spec = NewTeam {
            name: blueprint.name.clone(),
            description,
            created_by: agent.id.clone(),
        };

        let team = bounded(
            self.behavior.timeout,
            self.artifacts.create_team(swarm_id, &spec),
        )
        .await?;
        info!(team = %team.id, "Created team '{}'", team.name);
        Ok(team)
    }

    async fn create_roles(
        &self,
        swarm_id: &SwarmId,
        team: &Team,
        blueprint: &TeamBlueprint,
        roles: &mut Vec<Role>,
        agent: &AgentIdentity,
        created: &mut Vec<ArtifactId>,
    ) {
        for role in &blueprint.roles {
            if roles
                .iter()
                .any(|r| r.team_id == team.id && r.has_name(&role.name))
            {
                continue;
            }

            let spec = NewRole {
                team_id: team.id.clone(),
                name: role.name.clone(),
                description: role.description.clone(),
                created_by: agent.id.clone(),
            };
            match bounded(
                self.behavior.timeout,
                self.artifacts.create_role(swarm_id, &spec),
            )
            .await
            {
                Ok(new_role) => {
                    info!(role = %new_role.id, team = %team.id, "Created role '{}'", new_role.name);
                    created.push(ArtifactId::Role(new_role.id.clone()));
                    roles.push(new_role);
                }
                Err(e) => warn!("Failed to create role '{}' on '{}': {}", role.name, team.name, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::test_support::{MockArtifacts, MockStore};
    use chrono::Utc;
    use deliberation_domain::{AgentId, DeliberationId, TeamId, Topology};
    use std::collections::HashSet;

    fn deliberation() -> Deliberation {
        Deliberation {
            id: DeliberationId::new("d-1"),
            title: "[Initial Teams] swarm s1".to_string(),
            topology: Topology::SharedList,
            status: DeliberationStatus::CollectingResponses,
            creator_id: AgentId::new("a"),
            creator_name: "Alice".to_string(),
            request_message: String::new(),
            created_at: Utc::now(),
        }
    }

    fn existing_team(id: &str, name: &str) -> Team {
        Team {
            id: TeamId::new(id),
            swarm_id: SwarmId::new("s1"),
            name: name.to_string(),
            description: String::new(),
            created_by: AgentId::new("z"),
            members: Vec::new(),
        }
    }

    fn store() -> Arc<MockStore> {
        Arc::new(MockStore::default().with_deliberation(deliberation()))
    }

    fn status(store: &MockStore) -> DeliberationStatus {
        store.state.lock().unwrap().deliberations[0].status
    }

    fn finalizer(artifacts: Arc<MockArtifacts>, store: Arc<MockStore>) -> Finalizer {
        Finalizer::new(store, artifacts, BehaviorConfig::default())
    }

    fn bodies(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_creates_teams_and_completes() {
        let artifacts = Arc::new(MockArtifacts::default());
        let store = store();
        let me = AgentIdentity::new("a", "Alice");

        let output = finalizer(artifacts.clone(), store.clone())
            .finalize(
                &deliberation(),
                &SwarmId::new("s1"),
                &bodies(&["Backend", "Frontend"]),
                &me,
                &NoProgress,
            )
            .await;

        assert_eq!(output.created.len(), 2);
        assert!(output.completed);
        let names: Vec<String> = artifacts.teams.lock().unwrap().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["Backend", "Frontend"]);
        assert_eq!(status(&store), DeliberationStatus::Completed);
    }

    #[tokio::test]
    async fn test_skips_existing_names_case_insensitively() {
        let artifacts = Arc::new(MockArtifacts::default());
        artifacts.teams.lock().unwrap().push(existing_team("t-9", "backend"));
        let store = store();
        let me = AgentIdentity::new("a", "Alice");

        let output = finalizer(artifacts.clone(), store)
            .finalize(
                &deliberation(),
                &SwarmId::new("s1"),
                &bodies(&["Backend", "Frontend"]),
                &me,
                &NoProgress,
            )
            .await;

        assert_eq!(output.created.len(), 1);
        assert_eq!(artifacts.teams.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_second_finalization_is_idempotent() {
        let artifacts = Arc::new(MockArtifacts::default());
        let store = store();
        let me = AgentIdentity::new("a", "Alice");
        let other = AgentIdentity::new("b", "Bob");
        let selected = bodies(&["Backend", "Frontend"]);
        let finalizer = finalizer(artifacts.clone(), store.clone());

        finalizer
            .finalize(&deliberation(), &SwarmId::new("s1"), &selected, &me, &NoProgress)
            .await;
        let second = finalizer
            .finalize(&deliberation(), &SwarmId::new("s1"), &selected, &other, &NoProgress)
            .await;

        assert!(second.created.is_empty());
        assert!(second.completed);
        assert_eq!(artifacts.teams.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_on_one_artifact_does_not_stop_others() {
        let artifacts = Arc::new(MockArtifacts {
            fail_team_names: HashSet::from(["Backend".to_string()]),
            ..Default::default()
        });
        let store = store();
        let me = AgentIdentity::new("a", "Alice");

        let output = finalizer(artifacts.clone(), store)
            .finalize(
                &deliberation(),
                &SwarmId::new("s1"),
                &bodies(&["Backend", "Frontend"]),
                &me,
                &NoProgress,
            )
            .await;

        assert_eq!(output.created, vec![ArtifactId::Team(TeamId::new("t-1"))]);
        assert!(output.completed);
        assert_eq!(artifacts.teams.lock().unwrap()[0].name, "Frontend");
    }

    #[tokio::test]
    async fn test_blueprint_roles_created_once() {
        let artifacts = Arc::new(MockArtifacts::default());
        let store = store();
        let me = AgentIdentity::new("a", "Alice");
        let selected = bodies(&[r#"{"name": "Platform", "roles": ["SRE", "DBA"]}"#]);
        let finalizer = finalizer(artifacts.clone(), store);

        let first = finalizer
            .finalize(&deliberation(), &SwarmId::new("s1"), &selected, &me, &NoProgress)
            .await;
        let second = finalizer
            .finalize(&deliberation(), &SwarmId::new("s1"), &selected, &me, &NoProgress)
            .await;

        assert_eq!(first.created.len(), 3);
        assert!(second.created.is_empty());
        let roles = artifacts.roles.lock().unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().all(|r| r.team_id == TeamId::new("t-1")));
    }

    #[tokio::test]
    async fn test_unlistable_teams_leave_deliberation_open() {
        let artifacts = Arc::new(MockArtifacts {
            fail_listing: true,
            ..Default::default()
        });
        let store = store();
        let me = AgentIdentity::new("a", "Alice");

        let output = finalizer(artifacts, store.clone())
            .finalize(
                &deliberation(),
                &SwarmId::new("s1"),
                &bodies(&["Backend"]),
                &me,
                &NoProgress,
            )
            .await;

        assert_eq!(output, FinalizeOutput::default());
        assert_eq!(status(&store), DeliberationStatus::CollectingResponses);
    }
}
