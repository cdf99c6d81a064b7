//! Decision oracle port
//!
//! The external generator of structured decisions. No schema is enforced on
//! the far side: it returns raw text, and all validation happens in
//! [`AskOracleUseCase`](crate::use_cases::ask_oracle::AskOracleUseCase).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,
}

#[async_trait]
pub trait DecisionOracle: Send + Sync {
    /// Send a system prompt and a user prompt, get the raw reply text
    async fn infer(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError>;
}
