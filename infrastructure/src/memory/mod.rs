//! In-process shared stores
//!
//! Stand-ins for the remote deliberation, artifact and roster services, used
//! by the local simulation and the integration tests. They keep the remote
//! contract honest: ids are opaque, vote counts are derived on read, and
//! search can be made lossy to exercise the discovery fallback.

mod artifacts;
mod deliberations;
mod roster;

pub use artifacts::InMemoryArtifactStore;
pub use deliberations::InMemoryDeliberationStore;
pub use roster::InMemoryRoster;
