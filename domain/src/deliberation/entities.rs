//! Deliberation entities as stored in the shared deliberation store.

use crate::core::error::DomainError;
use crate::core::ids::{AgentId, DeliberationId, ResponseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome policy of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    /// Many non-exclusive winners (swarm-wide team formation)
    SharedList,
    /// A single winner (one team proposal)
    Voting,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::SharedList => "shared-list",
            Topology::Voting => "voting",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topology {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "shared-list" => Ok(Topology::SharedList),
            "voting" => Ok(Topology::Voting),
            _ => Err(DomainError::UnknownTopology(s.to_string())),
        }
    }
}

/// Lifecycle status of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliberationStatus {
    CollectingResponses,
    Completed,
    Closed,
}

impl DeliberationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationStatus::CollectingResponses => "collecting-responses",
            DeliberationStatus::Completed => "completed",
            DeliberationStatus::Closed => "closed",
        }
    }

    /// `completed` and `closed` accept no further contributions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliberationStatus::Completed | DeliberationStatus::Closed
        )
    }
}

impl std::fmt::Display for DeliberationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeliberationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "collecting-responses" => Ok(DeliberationStatus::CollectingResponses),
            "completed" => Ok(DeliberationStatus::Completed),
            "closed" => Ok(DeliberationStatus::Closed),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

/// A shared record representing an open question and its collected proposals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliberation {
    pub id: DeliberationId,
    pub title: String,
    pub topology: Topology,
    pub status: DeliberationStatus,
    pub creator_id: AgentId,
    pub creator_name: String,
    pub request_message: String,
    pub created_at: DateTime<Utc>,
}

impl Deliberation {
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// A proposal submitted to a deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub deliberation_id: DeliberationId,
    pub responder_id: AgentId,
    pub responder_name: String,
    /// Opaque payload: a team name or a single-line serialized proposal
    pub body: String,
    /// Number of votes referencing this response (derived by the store)
    #[serde(default)]
    pub vote_count: usize,
    /// Agents credited with authoring this response.
    ///
    /// Absent or empty means the responder is the sole contributor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<AgentId>,
    pub created_at: DateTime<Utc>,
}

impl Response {
    /// Agents counted as participants through this response
    pub fn credited_agents(&self) -> impl Iterator<Item = &AgentId> {
        let credited: &[AgentId] = if self.contributors.is_empty() {
            std::slice::from_ref(&self.responder_id)
        } else {
            &self.contributors
        };
        credited.iter()
    }

    /// Trimmed body text used for deduplication and vote-by-text matching
    pub fn normalized_body(&self) -> &str {
        self.body.trim()
    }
}

/// An agent's endorsement of a specific response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub deliberation_id: DeliberationId,
    pub response_id: ResponseId,
    pub voter_id: AgentId,
    pub voter_name: String,
}

/// A deliberation together with everything contributed to it so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationView {
    pub deliberation: Deliberation,
    pub responses: Vec<Response>,
    pub votes: Vec<Vote>,
}

impl DeliberationView {
    pub fn id(&self) -> &DeliberationId {
        &self.deliberation.id
    }

    pub fn has_responded(&self, agent: &AgentId) -> bool {
        self.responses.iter().any(|r| &r.responder_id == agent)
    }

    pub fn has_voted(&self, agent: &AgentId) -> bool {
        self.votes.iter().any(|v| &v.voter_id == agent)
    }

    /// Find a response whose trimmed body matches `text` exactly
    pub fn response_by_body(&self, text: &str) -> Option<&Response> {
        let needle = text.trim();
        self.responses
            .iter()
            .find(|r| r.normalized_body() == needle)
    }

    pub fn response(&self, id: &ResponseId) -> Option<&Response> {
        self.responses.iter().find(|r| &r.id == id)
    }
}

/// Parameters for creating a deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeliberation {
    pub title: String,
    pub topology: Topology,
    pub creator_id: AgentId,
    pub creator_name: String,
    pub request_message: String,
}

/// Query sent to the store's (approximate) search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliberationFilter {
    /// Free-text search over title and request message
    pub search: Option<String>,
    /// Substring that must appear in the title
    pub title_contains: Option<String>,
}

impl DeliberationFilter {
    /// The broad, unfiltered listing
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none() && self.title_contains.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(responder: &str, contributors: &[&str]) -> Response {
        Response {
            id: ResponseId::new("r-1"),
            deliberation_id: DeliberationId::new("d-1"),
            responder_id: AgentId::new(responder),
            responder_name: responder.to_string(),
            body: "  Backend ".to_string(),
            vote_count: 0,
            contributors: contributors.iter().map(|c| AgentId::new(*c)).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(!DeliberationStatus::CollectingResponses.is_terminal());
        assert!(DeliberationStatus::Completed.is_terminal());
        assert!(DeliberationStatus::Closed.is_terminal());
    }

    #[test]
    fn test_parse_topology_and_status() {
        assert_eq!("shared-list".parse::<Topology>(), Ok(Topology::SharedList));
        assert_eq!("shared_list".parse::<Topology>(), Ok(Topology::SharedList));
        assert_eq!("VOTING".parse::<Topology>(), Ok(Topology::Voting));
        assert!("ranked".parse::<Topology>().is_err());

        assert_eq!(
            "collecting_responses".parse::<DeliberationStatus>(),
            Ok(DeliberationStatus::CollectingResponses)
        );
        assert!("archived".parse::<DeliberationStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&DeliberationStatus::CollectingResponses).unwrap();
        assert_eq!(json, "\"collecting-responses\"");
        let json = serde_json::to_string(&Topology::SharedList).unwrap();
        assert_eq!(json, "\"shared-list\"");
    }

    #[test]
    fn test_credited_agents_falls_back_to_responder() {
        let solo = response("a", &[]);
        let credited: Vec<_> = solo.credited_agents().map(|a| a.as_str()).collect();
        assert_eq!(credited, vec!["a"]);

        let merged = response("a", &["b", "c"]);
        let credited: Vec<_> = merged.credited_agents().map(|a| a.as_str()).collect();
        assert_eq!(credited, vec!["b", "c"]);
    }

    #[test]
    fn test_missing_contributors_deserializes_as_empty() {
        let json = r#"{
            "id": "r-9",
            "deliberation_id": "d-1",
            "responder_id": "a",
            "responder_name": "A",
            "body": "Frontend",
            "created_at": "2026-01-01T00:00:00Z"
        }"#;
        let parsed: Response = serde_json::from_str(json).unwrap();
        assert!(parsed.contributors.is_empty());
        assert_eq!(parsed.vote_count, 0);
    }

    #[test]
    fn test_normalized_body_trims() {
        assert_eq!(response("a", &[]).normalized_body(), "Backend");
    }
}
