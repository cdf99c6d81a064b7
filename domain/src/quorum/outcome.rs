//! Outcome selection for converged deliberations.
//!
//! Ranking is by vote count, highest first. Ties are broken by the earliest
//! `created_at`, then by response id, so every agent that selects over the same
//! view picks the same winners regardless of the order the store returned.

use crate::deliberation::{DeliberationView, Response, Topology};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Whether a body may become an artifact name
pub fn is_atomic_body(body: &str) -> bool {
    let trimmed = body.trim();
    !trimmed.is_empty() && !trimmed.contains(['\n', '\r'])
}

fn rank(a: &Response, b: &Response) -> Ordering {
    b.vote_count
        .cmp(&a.vote_count)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Responses in ranking order
pub fn ranked(view: &DeliberationView) -> Vec<&Response> {
    let mut responses: Vec<&Response> = view.responses.iter().collect();
    responses.sort_by(|a, b| rank(a, b));
    responses
}

/// Select surviving proposal bodies.
///
/// - If any response has votes, only endorsed responses survive.
/// - Otherwise every response survives (unopposed first round).
/// - Bodies are trimmed and deduplicated; multi-line or empty bodies are dropped.
/// - For [`Topology::Voting`] only the top-ranked survivor is returned.
pub fn select_outcome(view: &DeliberationView, topology: Topology) -> Vec<String> {
    let ranked = ranked(view);
    let any_votes = ranked.iter().any(|r| r.vote_count > 0);

    let mut seen = HashSet::new();
    let mut bodies: Vec<String> = ranked
        .into_iter()
        .filter(|r| !any_votes || r.vote_count > 0)
        .map(|r| r.normalized_body())
        .filter(|body| is_atomic_body(body))
        .filter(|body| seen.insert(body.to_string()))
        .map(str::to_string)
        .collect();

    if topology == Topology::Voting {
        bodies.truncate(1);
    }
    bodies
}
