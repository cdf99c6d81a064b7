//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Decision has no action")]
    MissingAction,

    #[error("Unknown decision action: {0}")]
    UnknownAction(String),

    #[error("Decision action '{action}' is missing required field '{field}'")]
    MissingField {
        action: String,
        field: &'static str,
    },

    #[error("Decision action '{0}' is not allowed here")]
    ActionNotAllowed(String),

    #[error("Proposal body is empty")]
    EmptyBody,

    #[error("Proposal body spans multiple lines")]
    MultiLineBody,

    #[error("Unknown topology: {0}")]
    UnknownTopology(String),

    #[error("Unknown deliberation status: {0}")]
    UnknownStatus(String),
}

impl DomainError {
    /// Whether this error describes a decision that parsed but has the wrong shape
    pub fn is_invalid_decision(&self) -> bool {
        matches!(
            self,
            DomainError::MissingAction
                | DomainError::UnknownAction(_)
                | DomainError::MissingField { .. }
                | DomainError::ActionNotAllowed(_)
        )
    }
}
