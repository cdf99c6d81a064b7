//! Swarm roster and the artifacts deliberations materialize into.

pub mod blueprint;
pub mod entities;

pub use blueprint::{RoleBlueprint, TeamBlueprint};
pub use entities::{
    ArtifactId, NewRole, NewTeam, Role, Swarm, SwarmAgent, SwarmConfiguration, Team, Vacancy,
};
