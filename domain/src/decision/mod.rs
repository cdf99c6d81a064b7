//! Structured decisions produced by the decision oracle.
//!
//! The oracle's output is validated in two stages:
//!
//! 1. [`parse_decision`]: raw text to a [`Decision`] (a JSON object). Failure
//!    here is retried with corrective feedback.
//! 2. `TryFrom<&Decision>` into a typed view ([`ContributionDecision`],
//!    [`PlacementDecision`]). Failure here means the decision parsed but has
//!    the wrong shape; the caller treats it as a no-op for the turn.

pub mod contribution;
pub mod parsing;
pub mod placement;

pub use contribution::{ContributionDecision, VoteTarget};
pub use parsing::{DecisionParseError, extract_json_object, parse_decision, strip_code_fences};
pub use placement::PlacementDecision;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed, untyped decision (the JSON object the oracle produced)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decision {
    fields: Map<String, Value>,
}

impl Decision {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The requested action, lowercased with `-`/space normalized to `_`
    pub fn action(&self) -> Option<String> {
        self.str_field("action")
            .map(|a| a.to_lowercase().replace(['-', ' '], "_"))
    }

    /// A non-empty, trimmed string field
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// A field rendered as text: strings as-is, objects/arrays as compact JSON
    pub fn text_field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            v @ (Value::Object(_) | Value::Array(_)) => serde_json::to_string(v).ok(),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(&self.fields).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}
