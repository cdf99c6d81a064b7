//! Progress notification port
//!
//! Fire-and-forget sink for the protocol's major transitions. Notifications
//! are never part of protocol correctness: implementations must not fail and
//! must not block.

use deliberation_domain::{AgentIdentity, ArtifactId, Deliberation, DeliberationId};

/// Callback for progress updates during a protocol turn
///
/// Every method has a no-op default so implementations only override what
/// they display.
pub trait DeliberationNotifier: Send + Sync {
    /// An open deliberation for the topic was discovered
    fn on_deliberation_found(&self, _agent: &AgentIdentity, _deliberation: &Deliberation) {}

    /// This agent created the deliberation
    fn on_deliberation_created(&self, _agent: &AgentIdentity, _deliberation: &Deliberation) {}

    /// The pre-creation re-check found another agent's deliberation
    fn on_joined_after_recheck(&self, _agent: &AgentIdentity, _deliberation: &Deliberation) {}

    fn on_proposal(&self, _agent: &AgentIdentity, _deliberation_id: &DeliberationId, _body: &str) {}

    fn on_vote(&self, _agent: &AgentIdentity, _deliberation_id: &DeliberationId, _body: &str) {}

    /// The agent contributed nothing this turn (already contributed, or no usable decision)
    fn on_contribution_skipped(
        &self,
        _agent: &AgentIdentity,
        _deliberation_id: &DeliberationId,
        _reason: &str,
    ) {
    }

    fn on_participation(&self, _deliberation_id: &DeliberationId, _participants: usize, _expected: usize) {}

    fn on_converged(&self, _deliberation_id: &DeliberationId, _selected: &[String]) {}

    fn on_artifacts_created(&self, _deliberation_id: &DeliberationId, _created: &[ArtifactId]) {}

    fn on_completed(&self, _deliberation_id: &DeliberationId) {}

    /// One oracle attempt failed to yield a decision
    fn on_oracle_retry(&self, _agent: &AgentIdentity, _attempt: u32, _max_attempts: u32, _error: &str) {}

    fn on_placement(&self, _agent: &AgentIdentity, _action: &str, _detail: &str) {}

    /// The turn ended without progress because of an external failure
    fn on_stalled(&self, _agent: &AgentIdentity, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationNotifier for NoProgress {}
