//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod artifact_store;
pub mod composite_progress;
pub mod decision_oracle;
pub mod deliberation_store;
pub mod progress;
pub mod roster;

use std::sync::Arc;

/// Everything a single agent's protocol turn talks to.
///
/// The stores are shared by every agent; the oracle is usually per agent.
#[derive(Clone)]
pub struct ProtocolPorts {
    pub deliberations: Arc<dyn deliberation_store::DeliberationStore>,
    pub artifacts: Arc<dyn artifact_store::ArtifactStore>,
    pub roster: Arc<dyn roster::RosterPort>,
    pub oracle: Arc<dyn decision_oracle::DecisionOracle>,
}
