//! Identifier value objects.
//!
//! Every record in the shared stores is addressed by an opaque string id.
//! Wrapping them in distinct types keeps a vote's `response_id` from being
//! passed where a `deliberation_id` is expected.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of an agent taking part in a swarm.
    AgentId
);
string_id!(
    /// Identifier of a swarm (the group of agents partitioning work).
    SwarmId
);
string_id!(
    /// Identifier of a deliberation record in the shared store.
    DeliberationId
);
string_id!(
    /// Identifier of a response (proposal) within a deliberation.
    ResponseId
);
string_id!(TeamId);
string_id!(RoleId);
string_id!(VacancyId);

/// The acting agent: id for bookkeeping, name for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub id: AgentId,
    pub name: String,
}

impl AgentIdentity {
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
