//! Deliberation store port
//!
//! The shared, multi-reader/multi-writer record agents coordinate through.
//! Every call is a network round-trip that may fail or time out. The store
//! offers no locking and no ordering across agents; its search is best-effort.

use async_trait::async_trait;
use deliberation_domain::{
    AgentIdentity, Deliberation, DeliberationFilter, DeliberationId, DeliberationStatus,
    DeliberationView, NewDeliberation, Response, ResponseId, Vote,
};
use thiserror::Error;

/// Errors returned by any shared store (deliberations, artifacts, roster)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected by store: {0}")]
    Rejected(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

#[async_trait]
pub trait DeliberationStore: Send + Sync {
    /// List deliberations matching a (possibly approximate) filter
    async fn list(&self, filter: &DeliberationFilter) -> Result<Vec<Deliberation>, StoreError>;

    /// Fetch a deliberation with its responses (vote counts derived) and votes
    async fn get(&self, id: &DeliberationId) -> Result<DeliberationView, StoreError>;

    async fn create(&self, spec: &NewDeliberation) -> Result<Deliberation, StoreError>;

    /// Submit a response on behalf of `responder`
    async fn respond(
        &self,
        id: &DeliberationId,
        responder: &AgentIdentity,
        body: &str,
    ) -> Result<Response, StoreError>;

    /// Cast `voter`'s vote for a response
    async fn vote(
        &self,
        id: &DeliberationId,
        response_id: &ResponseId,
        voter: &AgentIdentity,
    ) -> Result<Vote, StoreError>;

    async fn update_status(
        &self,
        id: &DeliberationId,
        status: DeliberationStatus,
    ) -> Result<Deliberation, StoreError>;
}
