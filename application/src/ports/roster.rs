//! Roster port: swarm configuration and live membership

use super::deliberation_store::StoreError;
use async_trait::async_trait;
use deliberation_domain::{Swarm, SwarmAgent, SwarmId};

#[async_trait]
pub trait RosterPort: Send + Sync {
    async fn get_swarm(&self, swarm_id: &SwarmId) -> Result<Swarm, StoreError>;

    async fn get_swarm_agents(&self, swarm_id: &SwarmId) -> Result<Vec<SwarmAgent>, StoreError>;
}
