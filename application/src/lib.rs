//! Application layer for swarm-deliberation
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    ProtocolPorts,
    artifact_store::ArtifactStore,
    composite_progress::CompositeNotifier,
    decision_oracle::{DecisionOracle, OracleError},
    deliberation_store::{DeliberationStore, StoreError},
    progress::{DeliberationNotifier, NoProgress},
    roster::RosterPort,
};
pub use use_cases::ask_oracle::AskOracleUseCase;
pub use use_cases::discovery::{DeliberationDiscovery, Discovery};
pub use use_cases::finalize::{FinalizeOutput, Finalizer};
pub use use_cases::place_agent::{PlaceAgentInput, PlaceAgentUseCase, PlacementOutcome};
pub use use_cases::run_deliberation::{RunDeliberationInput, RunDeliberationUseCase, TurnOutcome};
pub use use_cases::shared::DeliberationError;
