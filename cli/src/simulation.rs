//! Local multi-agent simulation
//!
//! Every configured agent gets its own oracle but shares the in-memory
//! stores, exactly as independent processes would share the remote services.
//! Each round runs one turn per agent concurrently, staggered so the scripted
//! scenario plays out in a readable order.

use anyhow::Result;
use deliberation_application::{
    ArtifactStore, BehaviorConfig, DecisionOracle, DeliberationNotifier, DeliberationStore,
    PlaceAgentInput, PlaceAgentUseCase, ProtocolPorts, RunDeliberationInput,
    RunDeliberationUseCase, TurnOutcome,
};
use deliberation_domain::{AgentIdentity, DeliberationFilter, Swarm, Topic};
use deliberation_infrastructure::{
    FileConfig, FileOracleConfig, FileSimulatedAgent, InMemoryArtifactStore,
    InMemoryDeliberationStore, InMemoryRoster, ScriptedOracle,
};
use deliberation_presentation::{PlacementRecord, SimulationReport};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run parameters after CLI overrides
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub rounds: usize,
    pub stagger: Duration,
    pub placement: bool,
    pub requirements: String,
}

impl SimulationSettings {
    pub fn from_config(config: &FileConfig) -> Self {
        Self {
            rounds: config.simulation.rounds,
            stagger: Duration::from_millis(config.simulation.stagger_ms),
            placement: config.simulation.placement,
            requirements: config.simulation.requirements.clone(),
        }
    }
}

struct SimulatedAgent {
    identity: AgentIdentity,
    ports: ProtocolPorts,
}

pub struct Simulation {
    swarm: Swarm,
    behavior: BehaviorConfig,
    settings: SimulationSettings,
    deliberations: Arc<InMemoryDeliberationStore>,
    artifacts: Arc<InMemoryArtifactStore>,
    agents: Vec<SimulatedAgent>,
}

impl Simulation {
    /// Build the in-memory world described by the configuration
    pub async fn from_config(config: &FileConfig, settings: SimulationSettings) -> Result<Self> {
        let swarm = config.swarm.to_swarm();
        let deliberations = Arc::new(InMemoryDeliberationStore::new());
        let artifacts = Arc::new(InMemoryArtifactStore::new());
        let roster = Arc::new(InMemoryRoster::new(swarm.clone()));

        let shared_oracle = if config.oracle.is_http() {
            Some(http_oracle(&config.oracle)?)
        } else {
            None
        };

        let mut agents = Vec::with_capacity(config.simulation.agents.len());
        for agent in &config.simulation.agents {
            let identity = agent.identity();
            roster.enroll(&identity).await;

            let oracle = match &shared_oracle {
                Some(oracle) => oracle.clone(),
                None => scripted_oracle(agent),
            };
            agents.push(SimulatedAgent {
                identity,
                ports: ProtocolPorts {
                    deliberations: deliberations.clone(),
                    artifacts: artifacts.clone(),
                    roster: roster.clone(),
                    oracle,
                },
            });
        }

        Ok(Self {
            swarm,
            behavior: config.behavior.to_behavior_config(),
            settings,
            deliberations,
            artifacts,
            agents,
        })
    }

    pub fn agents(&self) -> Vec<AgentIdentity> {
        self.agents.iter().map(|a| a.identity.clone()).collect()
    }

    /// Run rounds until the initial-teams deliberation settles, the round
    /// limit is reached, or `cancel` fires.
    pub async fn run(
        &self,
        progress: &dyn DeliberationNotifier,
        cancel: CancellationToken,
    ) -> SimulationReport {
        let mut report = SimulationReport::new(self.swarm.id.as_str(), self.agents());
        let topic = Topic::initial_teams(self.swarm.id.clone());

        info!(
            swarm = %self.swarm.id,
            agents = self.agents.len(),
            rounds = self.settings.rounds,
            "Starting simulation"
        );

        for round in 1..=self.settings.rounds {
            // Cancelled by the first settled turn so later agents in the
            // same round do not open a fresh deliberation
            let settled = cancel.child_token();
            let turns = self
                .agents
                .iter()
                .enumerate()
                .map(|(index, agent)| self.turn(agent, index, &topic, progress, &settled));

            let outcomes = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(round, "Simulation interrupted");
                    report.cancelled = true;
                    break;
                }
                outcomes = join_all(turns) => outcomes,
            };

            report.rounds_run = round;
            for (agent, outcome) in self.agents.iter().zip(outcomes) {
                if let Some(outcome) = outcome {
                    report.record_turn(round, agent.identity.clone(), outcome);
                }
            }

            if report.settled {
                info!(round, "Initial teams settled");
                break;
            }
            debug!(round, "Round finished without settling");
        }

        if report.settled && self.settings.placement && !cancel.is_cancelled() {
            report.placements = self.place_all(progress).await;
        }

        self.collect_state(&mut report).await;
        report
    }

    async fn turn(
        &self,
        agent: &SimulatedAgent,
        index: usize,
        topic: &Topic,
        progress: &dyn DeliberationNotifier,
        settled: &CancellationToken,
    ) -> Option<TurnOutcome> {
        let delay = stagger_delay(self.settings.stagger, index);
        tokio::select! {
            _ = settled.cancelled() => return None,
            _ = tokio::time::sleep(delay) => {}
        }

        let use_case = RunDeliberationUseCase::new(agent.ports.clone(), self.behavior.clone());
        let input = RunDeliberationInput::new(topic.clone(), agent.identity.clone())
            .with_requirements(self.settings.requirements.clone());
        let outcome = use_case.execute_with_progress(input, progress).await;

        if outcome.is_settled() {
            settled.cancel();
        }
        Some(outcome)
    }

    async fn place_all(&self, progress: &dyn DeliberationNotifier) -> Vec<PlacementRecord> {
        let mut placements = Vec::with_capacity(self.agents.len());
        // Sequential: each placement should see the previous agent's changes
        for agent in &self.agents {
            let use_case = PlaceAgentUseCase::new(agent.ports.clone(), self.behavior.clone());
            let input = PlaceAgentInput::new(self.swarm.id.clone(), agent.identity.clone())
                .with_requirements(self.settings.requirements.clone());
            let outcome = use_case.execute_with_progress(input, progress).await;
            placements.push(PlacementRecord {
                agent: agent.identity.clone(),
                outcome,
            });
        }
        placements
    }

    async fn collect_state(&self, report: &mut SimulationReport) {
        report.deliberations = self
            .deliberations
            .list(&DeliberationFilter::all())
            .await
            .unwrap_or_default();
        report.teams = self
            .artifacts
            .list_teams(&self.swarm.id)
            .await
            .unwrap_or_default();
        report.roles = self
            .artifacts
            .list_roles(&self.swarm.id)
            .await
            .unwrap_or_default();
    }
}

/// Start offset of the agent at `index` within a round, saturating on overflow
fn stagger_delay(stagger: Duration, index: usize) -> Duration {
    u32::try_from(index)
        .ok()
        .and_then(|index| stagger.checked_mul(index))
        .unwrap_or(Duration::MAX)
}

fn scripted_oracle(agent: &FileSimulatedAgent) -> Arc<dyn DecisionOracle> {
    let oracle = ScriptedOracle::new(agent.replies.iter().cloned());
    match &agent.fallback {
        Some(fallback) => Arc::new(oracle.with_fallback(fallback.clone())),
        None => Arc::new(oracle),
    }
}

#[cfg(feature = "http-oracle")]
fn http_oracle(config: &FileOracleConfig) -> Result<Arc<dyn DecisionOracle>> {
    use deliberation_infrastructure::HttpDecisionOracle;

    let api_key = config.api_key();
    if api_key.is_none() {
        warn!(env = %config.api_key_env, "No API key found, sending unauthenticated requests");
    }
    let oracle = HttpDecisionOracle::new(config.base_url.clone(), config.model.clone(), api_key)
        .with_max_tokens(config.max_tokens);
    Ok(Arc::new(oracle))
}

#[cfg(not(feature = "http-oracle"))]
fn http_oracle(_config: &FileOracleConfig) -> Result<Arc<dyn DecisionOracle>> {
    anyhow::bail!("oracle.provider = \"http\" requires building with the `http-oracle` feature")
}
