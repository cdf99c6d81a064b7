//! Shared utilities for use cases.
//!
//! Every store and oracle call goes through [`bounded`] so a hung remote call
//! becomes an ordinary, fail-soft timeout error.

use crate::ports::decision_oracle::OracleError;
use crate::ports::deliberation_store::StoreError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced inside a protocol turn.
///
/// These never leave the public use case entry points: they are logged and
/// turned into a "no progress" outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliberationError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Port errors that have a timeout variant
pub(crate) trait TimedOut {
    fn timed_out() -> Self;
}

impl TimedOut for StoreError {
    fn timed_out() -> Self {
        StoreError::Timeout
    }
}

impl TimedOut for OracleError {
    fn timed_out() -> Self {
        OracleError::Timeout
    }
}

/// Run a port call, failing with the port's timeout error once `limit` elapses.
pub(crate) async fn bounded<T, E, F>(limit: Option<Duration>, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: TimedOut,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(E::timed_out())),
        None => call.await,
    }
}
