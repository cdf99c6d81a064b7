//! Run Deliberation use case
//!
//! Drives one agent's turn through a topic's deliberation. Both topologies
//! share one state machine; the topic supplies the topology and where the
//! expected participant count comes from.
//!
//! ```text
//! Discover ──found──▶ Contribute ──▶ CheckConvergence ──converged──▶ Finalize
//!    │                    ▲               │
//!    └─absent─▶ Create ───┤(joined)       └─not yet─▶ Pending
//!                  └─created (seed is the contribution)─▶ CheckConvergence
//! ```
//!
//! A turn never fails. Store or oracle trouble ends it as `Stalled`; the
//! agent simply tries again on its next turn.

use crate::config::BehaviorConfig;
use crate::ports::ProtocolPorts;
use crate::ports::deliberation_store::DeliberationStore;
use crate::ports::progress::{DeliberationNotifier, NoProgress};
use crate::ports::roster::RosterPort;
use crate::use_cases::ask_oracle::AskOracleUseCase;
use crate::use_cases::discovery::{DeliberationDiscovery, Discovery};
use crate::use_cases::finalize::Finalizer;
use crate::use_cases::shared::{DeliberationError, bounded};
use deliberation_domain::{
    AgentIdentity, ArtifactId, ContributionDecision, Deliberation, DeliberationId,
    DeliberationStatus, DeliberationView, ExpectedCountSource, ParticipantSet, PromptTemplate,
    Topic, select_outcome,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    pub topic: Topic,
    pub agent: AgentIdentity,
    /// Free-form requirements handed to the oracle with every prompt
    pub requirements: String,
}

impl RunDeliberationInput {
    pub fn new(topic: Topic, agent: AgentIdentity) -> Self {
        Self {
            topic,
            agent,
            requirements: String::new(),
        }
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = requirements.into();
        self
    }
}

/// How one turn ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Participation is still below the expected count
    Pending {
        deliberation_id: DeliberationId,
        participants: usize,
        expected: usize,
    },
    /// Converged; this agent ran finalization
    Finalized {
        deliberation_id: DeliberationId,
        selected: Vec<String>,
        created: Vec<ArtifactId>,
        completed: bool,
    },
    /// The deliberation was already completed or closed
    Closed {
        deliberation_id: DeliberationId,
        status: DeliberationStatus,
    },
    /// No deliberation exists yet and the oracle gave nothing to seed one with
    Skipped { reason: String },
    /// A store or oracle call failed; nothing more happened this turn
    Stalled { reason: String },
}

impl TurnOutcome {
    /// True once the deliberation needs no further turns
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            TurnOutcome::Finalized {
                completed: true,
                ..
            } | TurnOutcome::Closed { .. }
        )
    }

    pub fn deliberation_id(&self) -> Option<&DeliberationId> {
        match self {
            TurnOutcome::Pending {
                deliberation_id, ..
            }
            | TurnOutcome::Finalized {
                deliberation_id, ..
            }
            | TurnOutcome::Closed {
                deliberation_id, ..
            } => Some(deliberation_id),
            TurnOutcome::Skipped { .. } | TurnOutcome::Stalled { .. } => None,
        }
    }
}

/// Driver states
enum Step {
    Discover,
    Create,
    Contribute(Deliberation),
    CheckConvergence(DeliberationView),
    Finalize {
        view: DeliberationView,
        selected: Vec<String>,
    },
    Done(TurnOutcome),
}

/// Use case for running one agent's deliberation turn
pub struct RunDeliberationUseCase {
    store: Arc<dyn DeliberationStore>,
    roster: Arc<dyn RosterPort>,
    oracle: AskOracleUseCase,
    discovery: DeliberationDiscovery,
    finalizer: Finalizer,
    behavior: BehaviorConfig,
}

impl RunDeliberationUseCase {
    pub fn new(ports: ProtocolPorts, behavior: BehaviorConfig) -> Self {
        Self {
            oracle: AskOracleUseCase::new(ports.oracle, behavior.clone()),
            discovery: DeliberationDiscovery::new(ports.deliberations.clone(), behavior.clone()),
            finalizer: Finalizer::new(
                ports.deliberations.clone(),
                ports.artifacts,
                behavior.clone(),
            ),
            store: ports.deliberations,
            roster: ports.roster,
            behavior,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDeliberationInput) -> TurnOutcome {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDeliberationInput,
        progress: &dyn DeliberationNotifier,
    ) -> TurnOutcome {
        debug!(agent = %input.agent.id, topic = %input.topic, "Starting deliberation turn");

        match self.drive(&input, progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(agent = %input.agent.id, topic = %input.topic, "Turn stalled: {}", e);
                progress.on_stalled(&input.agent, &e.to_string());
                TurnOutcome::Stalled {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn drive(
        &self,
        input: &RunDeliberationInput,
        progress: &dyn DeliberationNotifier,
    ) -> Result<TurnOutcome, DeliberationError> {
        let mut step = Step::Discover;
        loop {
            step = match step {
                Step::Discover => self.discover(input, progress).await?,
                Step::Create => self.create(input, progress).await?,
                Step::Contribute(deliberation) => {
                    self.contribute(input, deliberation, progress).await?
                }
                Step::CheckConvergence(view) => {
                    self.check_convergence(input, view, progress).await?
                }
                Step::Finalize { view, selected } => {
                    self.finalize(input, view, selected, progress).await
                }
                Step::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn discover(
        &self,
        input: &RunDeliberationInput,
        progress: &dyn DeliberationNotifier,
    ) -> Result<Step, DeliberationError> {
        match self.discovery.find_open(&input.topic).await? {
            Some(deliberation) => {
                debug!(deliberation = %deliberation.id, "Found open deliberation");
                progress.on_deliberation_found(&input.agent, &deliberation);
                Ok(Step::Contribute(deliberation))
            }
            None => Ok(Step::Create),
        }
    }

    async fn create(
        &self,
        input: &RunDeliberationInput,
        progress: &dyn DeliberationNotifier,
    ) -> Result<Step, DeliberationError> {
        let agent = &input.agent;
        let prompt = PromptTemplate::seed_prompt(&input.topic, agent, &input.requirements);
        let Some(decision) = self
            .oracle
            .ask(agent, PromptTemplate::deliberation_system(), &prompt, progress)
            .await
        else {
            return Ok(Step::Done(TurnOutcome::Skipped {
                reason: "oracle gave no seed proposal".to_string(),
            }));
        };

        let seed = match ContributionDecision::proposal_only(&decision) {
            Ok(seed) => seed,
            Err(e) => {
                warn!(agent = %agent.id, "Unusable seed decision: {}", e);
                return Ok(Step::Done(TurnOutcome::Skipped {
                    reason: format!("invalid seed decision: {}", e),
                }));
            }
        };

        match self
            .discovery
            .create_if_absent(&input.topic, agent, &seed)
            .await?
        {
            Discovery::Created(deliberation) => {
                progress.on_deliberation_created(agent, &deliberation);
                progress.on_proposal(agent, &deliberation.id, &seed);
                let view = self.fetch(&deliberation.id).await?;
                Ok(Step::CheckConvergence(view))
            }
            Discovery::Joined(deliberation) => {
                progress.on_joined_after_recheck(agent, &deliberation);
                Ok(Step::Contribute(deliberation))
            }
        }
    }

    async fn contribute(
        &self,
        input: &RunDeliberationInput,
        deliberation: Deliberation,
        progress: &dyn DeliberationNotifier,
    ) -> Result<Step, DeliberationError> {
        let agent = &input.agent;
        let view = self.fetch(&deliberation.id).await?;
        if !view.deliberation.is_open() {
            return Ok(Step::CheckConvergence(view));
        }
        if ParticipantSet::from_view(&view).contains(&agent.id) {
            debug!(agent = %agent.id, deliberation = %view.id(), "Already contributed");
            return Ok(Step::CheckConvergence(view));
        }

        let prompt = PromptTemplate::contribution_prompt(&view, agent, &input.requirements);
        let Some(decision) = self
            .oracle
            .ask(agent, PromptTemplate::deliberation_system(), &prompt, progress)
            .await
        else {
            progress.on_contribution_skipped(agent, view.id(), "oracle gave no decision");
            return Ok(Step::CheckConvergence(view));
        };

        let contribution = match ContributionDecision::try_from(&decision) {
            Ok(contribution) => contribution,
            Err(e) => {
                warn!(agent = %agent.id, "Unusable contribution decision: {}", e);
                progress.on_contribution_skipped(agent, view.id(), &e.to_string());
                return Ok(Step::CheckConvergence(view));
            }
        };

        let id = view.id().clone();
        match contribution {
            ContributionDecision::Propose { body } => {
                bounded(self.behavior.timeout, self.store.respond(&id, agent, &body)).await?;
                info!(agent = %agent.id, deliberation = %id, "Proposed '{}'", body);
                progress.on_proposal(agent, &id, &body);
            }
            ContributionDecision::Vote { target } => {
                let resolved = target
                    .resolve(&view)
                    .map(|r| (r.id.clone(), r.body.clone()));
                let Some((response_id, body)) = resolved else {
                    progress.on_contribution_skipped(agent, &id, "vote target not found");
                    return Ok(Step::CheckConvergence(view));
                };
                bounded(
                    self.behavior.timeout,
                    self.store.vote(&id, &response_id, agent),
                )
                .await?;
                info!(agent = %agent.id, deliberation = %id, "Voted for '{}'", body);
                progress.on_vote(agent, &id, &body);
            }
        }

        let view = self.fetch(&id).await?;
        Ok(Step::CheckConvergence(view))
    }

    async fn check_convergence(
        &self,
        input: &RunDeliberationInput,
        view: DeliberationView,
        progress: &dyn DeliberationNotifier,
    ) -> Result<Step, DeliberationError> {
        if !view.deliberation.is_open() {
            return Ok(Step::Done(TurnOutcome::Closed {
                deliberation_id: view.id().clone(),
                status: view.deliberation.status,
            }));
        }

        let expected = self.expected_count(&input.topic).await?;
        let participants = ParticipantSet::from_view(&view);
        progress.on_participation(view.id(), participants.len(), expected);

        if !participants.is_converged(expected) {
            debug!(
                deliberation = %view.id(),
                participants = participants.len(),
                expected,
                "Not converged yet"
            );
            return Ok(Step::Done(TurnOutcome::Pending {
                deliberation_id: view.id().clone(),
                participants: participants.len(),
                expected,
            }));
        }

        let selected = select_outcome(&view, view.deliberation.topology);
        info!(
            deliberation = %view.id(),
            participants = participants.len(),
            "Converged on {:?}",
            selected
        );
        if selected.is_empty() {
            warn!(deliberation = %view.id(), "Converged without any usable proposal");
        }
        progress.on_converged(view.id(), &selected);
        Ok(Step::Finalize { view, selected })
    }

    async fn finalize(
        &self,
        input: &RunDeliberationInput,
        view: DeliberationView,
        selected: Vec<String>,
        progress: &dyn DeliberationNotifier,
    ) -> Step {
        let output = self
            .finalizer
            .finalize(
                &view.deliberation,
                input.topic.swarm_id(),
                &selected,
                &input.agent,
                progress,
            )
            .await;

        Step::Done(TurnOutcome::Finalized {
            deliberation_id: view.deliberation.id,
            selected,
            created: output.created,
            completed: output.completed,
        })
    }

    async fn fetch(&self, id: &DeliberationId) -> Result<DeliberationView, DeliberationError> {
        Ok(bounded(self.behavior.timeout, self.store.get(id)).await?)
    }

    async fn expected_count(&self, topic: &Topic) -> Result<usize, DeliberationError> {
        let swarm_id = topic.swarm_id();
        let expected = match topic.expected_count_source() {
            ExpectedCountSource::SwarmCapacity => {
                bounded(self.behavior.timeout, self.roster.get_swarm(swarm_id))
                    .await?
                    .configuration
                    .max_agents
            }
            ExpectedCountSource::ActiveRoster => {
                bounded(self.behavior.timeout, self.roster.get_swarm_agents(swarm_id))
                    .await?
                    .len()
            }
        };
        Ok(expected)
    }
}
