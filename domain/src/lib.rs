//! Domain layer for swarm-deliberation
//!
//! This crate contains the core entities and rules of the deliberation protocol.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A shared record in which agents collect proposals ([`Response`]) and
//! endorsements ([`Vote`]) for one [`Topic`]. There is no coordinator: every
//! agent runs the same protocol against the same weakly-consistent store.
//!
//! ## Convergence
//!
//! A deliberation converges once the distinct [`ParticipantSet`] reaches the
//! expected agent count. The set only ever grows, so convergence is re-checkable
//! by any agent at any later turn.
//!
//! ## Topology
//!
//! - **Shared-list**: every endorsed proposal wins (swarm-wide team formation)
//! - **Voting**: only the top-ranked proposal wins (a single team proposal)

pub mod artifact;
pub mod core;
pub mod decision;
pub mod deliberation;
pub mod prompt;
pub mod quorum;

// Re-export commonly used types
pub use artifact::{
    ArtifactId, NewRole, NewTeam, Role, RoleBlueprint, Swarm, SwarmAgent, SwarmConfiguration,
    Team, TeamBlueprint, Vacancy,
};
pub use core::{
    error::DomainError,
    ids::{AgentId, AgentIdentity, DeliberationId, ResponseId, RoleId, SwarmId, TeamId, VacancyId},
    output_format::OutputFormat,
};
pub use decision::{
    ContributionDecision, Decision, DecisionParseError, PlacementDecision, VoteTarget,
    parse_decision,
};
pub use deliberation::{
    Deliberation, DeliberationFilter, DeliberationStatus, DeliberationView, ExpectedCountSource,
    NewDeliberation, Response, Topic, Topology, Vote,
};
pub use prompt::PromptTemplate;
pub use quorum::{ParticipantSet, is_converged, select_outcome};
