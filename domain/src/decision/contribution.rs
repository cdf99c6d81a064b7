//! Contribution decisions: what an agent adds to an open deliberation.

use super::Decision;
use crate::core::error::DomainError;
use crate::core::ids::ResponseId;
use crate::deliberation::{DeliberationView, Response};
use crate::quorum::is_atomic_body;
use serde_json::Value;

/// Which response a vote endorses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTarget {
    /// By store id
    Response(ResponseId),
    /// By (trimmed) proposal text, as oracles tend to quote the proposal
    Body(String),
}

impl VoteTarget {
    /// Resolve against a view
    pub fn resolve<'a>(&self, view: &'a DeliberationView) -> Option<&'a Response> {
        match self {
            VoteTarget::Response(id) => view.response(id),
            VoteTarget::Body(text) => view.response_by_body(text),
        }
    }
}

/// A typed contribution to a deliberation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributionDecision {
    /// Submit a new proposal
    Propose { body: String },
    /// Endorse an existing proposal
    Vote { target: VoteTarget },
}

impl ContributionDecision {
    /// Like `try_from`, but only accepts proposals (seeding a new deliberation).
    pub fn proposal_only(decision: &Decision) -> Result<String, DomainError> {
        match Self::try_from(decision)? {
            ContributionDecision::Propose { body } => Ok(body),
            ContributionDecision::Vote { .. } => {
                Err(DomainError::ActionNotAllowed("vote".to_string()))
            }
        }
    }
}

impl TryFrom<&Decision> for ContributionDecision {
    type Error = DomainError;

    fn try_from(decision: &Decision) -> Result<Self, Self::Error> {
        let action = decision.action().ok_or(DomainError::MissingAction)?;

        match action.as_str() {
            "propose" => {
                let body = decision
                    .text_field("proposal")
                    .ok_or_else(|| DomainError::MissingField {
                        action: action.clone(),
                        field: "proposal",
                    })?;
                let nested_break = decision.get("proposal").is_some_and(has_line_break);
                if !is_atomic_body(&body) || nested_break {
                    return Err(DomainError::MultiLineBody);
                }
                Ok(ContributionDecision::Propose { body })
            }
            "vote" => {
                let target = if let Some(id) = decision.str_field("response_id") {
                    VoteTarget::Response(ResponseId::new(id))
                } else if let Some(text) = decision.text_field("proposal") {
                    VoteTarget::Body(text)
                } else {
                    return Err(DomainError::MissingField {
                        action: action.clone(),
                        field: "response_id",
                    });
                };
                Ok(ContributionDecision::Vote { target })
            }
            _ => Err(DomainError::UnknownAction(action.clone())),
        }
    }
}

/// Whether any string inside a structured proposal spans lines
fn has_line_break(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains(['\n', '\r']),
        Value::Array(items) => items.iter().any(has_line_break),
        Value::Object(fields) => fields.values().any(has_line_break),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::parse_decision;

    fn convert(json: &str) -> Result<ContributionDecision, DomainError> {
        ContributionDecision::try_from(&parse_decision(json).unwrap())
    }

    #[test]
    fn test_propose() {
        assert_eq!(
            convert(r#"{"action": "propose", "proposal": " Backend "}"#),
            Ok(ContributionDecision::Propose {
                body: "Backend".to_string()
            })
        );
    }

    #[test]
    fn test_propose_structured_body_is_single_line() {
        let result = convert(
            r#"{"action": "propose", "proposal": {"name": "Ops", "description": "Runs things"}}"#,
        )
        .unwrap();
        match result {
            ContributionDecision::Propose { body } => {
                assert!(!body.contains('\n'));
                assert!(body.starts_with('{'));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_structured_proposal_with_line_breaks_is_rejected() {
        assert_eq!(
            convert(
                r#"{"action": "propose", "proposal": {"name": "Front\nBack", "roles": ["Dev\nOps"]}}"#
            ),
            Err(DomainError::MultiLineBody)
        );
        assert_eq!(
            convert(r#"{"action": "propose", "proposal": {"name": "Ops", "roles": ["Dev\nOps"]}}"#),
            Err(DomainError::MultiLineBody)
        );
    }

    #[test]
    fn test_vote_by_id_or_body() {
        assert_eq!(
            convert(r#"{"action": "vote", "response_id": "r-2"}"#),
            Ok(ContributionDecision::Vote {
                target: VoteTarget::Response(ResponseId::new("r-2"))
            })
        );
        assert_eq!(
            convert(r#"{"action": "vote", "proposal": "Backend"}"#),
            Ok(ContributionDecision::Vote {
                target: VoteTarget::Body("Backend".to_string())
            })
        );
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(convert(r#"{"proposal": "x"}"#), Err(DomainError::MissingAction));
        assert_eq!(
            convert(r#"{"action": "abstain"}"#),
            Err(DomainError::UnknownAction("abstain".to_string()))
        );
        assert!(matches!(
            convert(r#"{"action": "propose"}"#),
            Err(DomainError::MissingField { field: "proposal", .. })
        ));
        assert!(matches!(
            convert(r#"{"action": "vote"}"#),
            Err(DomainError::MissingField { .. })
        ));
        assert_eq!(
            convert(r#"{"action": "propose", "proposal": "Front\nBack"}"#),
            Err(DomainError::MultiLineBody)
        );
    }

    #[test]
    fn test_proposal_only_rejects_votes() {
        let vote = parse_decision(r#"{"action": "vote", "proposal": "Backend"}"#).unwrap();
        assert_eq!(
            ContributionDecision::proposal_only(&vote),
            Err(DomainError::ActionNotAllowed("vote".to_string()))
        );
    }
}
