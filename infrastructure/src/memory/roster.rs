use async_trait::async_trait;
use deliberation_application::{RosterPort, StoreError};
use deliberation_domain::{AgentIdentity, Swarm, SwarmAgent, SwarmId};
use tokio::sync::Mutex;

/// Single-swarm roster held in process memory
pub struct InMemoryRoster {
    swarm: Swarm,
    agents: Mutex<Vec<SwarmAgent>>,
}

impl InMemoryRoster {
    pub fn new(swarm: Swarm) -> Self {
        Self {
            swarm,
            agents: Mutex::new(Vec::new()),
        }
    }

    /// Register an agent as an active member (no-op if already present)
    pub async fn enroll(&self, agent: &AgentIdentity) {
        let mut agents = self.agents.lock().await;
        if agents.iter().any(|a| a.id == agent.id) {
            return;
        }
        agents.push(SwarmAgent {
            id: agent.id.clone(),
            name: agent.name.clone(),
            team_id: None,
            role_id: None,
        });
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    fn check(&self, swarm_id: &SwarmId) -> Result<(), StoreError> {
        if swarm_id != &self.swarm.id {
            return Err(StoreError::NotFound(format!("swarm {}", swarm_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl RosterPort for InMemoryRoster {
    async fn get_swarm(&self, swarm_id: &SwarmId) -> Result<Swarm, StoreError> {
        self.check(swarm_id)?;
        Ok(self.swarm.clone())
    }

    async fn get_swarm_agents(&self, swarm_id: &SwarmId) -> Result<Vec<SwarmAgent>, StoreError> {
        self.check(swarm_id)?;
        Ok(self.agents.lock().await.clone())
    }
}
