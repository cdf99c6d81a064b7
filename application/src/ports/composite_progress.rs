//! Composite notifier: delegates to multiple notifiers.
//!
//! Used to fan protocol events out to the console reporter and the JSONL
//! event log at the same time.

use super::progress::DeliberationNotifier;
use deliberation_domain::{AgentIdentity, ArtifactId, Deliberation, DeliberationId};

/// A notifier that delegates to multiple inner notifiers.
///
/// Holds borrowed references so owned and borrowed notifiers compose without
/// wrapper types.
pub struct CompositeNotifier<'a> {
    delegates: Vec<&'a dyn DeliberationNotifier>,
}

impl<'a> CompositeNotifier<'a> {
    pub fn new(delegates: Vec<&'a dyn DeliberationNotifier>) -> Self {
        Self { delegates }
    }
}

/// Macro to delegate a method call to all inner notifiers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl DeliberationNotifier for CompositeNotifier<'_> {
    fn on_deliberation_found(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        delegate!(self, on_deliberation_found, agent, deliberation);
    }

    fn on_deliberation_created(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        delegate!(self, on_deliberation_created, agent, deliberation);
    }

    fn on_joined_after_recheck(&self, agent: &AgentIdentity, deliberation: &Deliberation) {
        delegate!(self, on_joined_after_recheck, agent, deliberation);
    }

    fn on_proposal(&self, agent: &AgentIdentity, deliberation_id: &DeliberationId, body: &str) {
        delegate!(self, on_proposal, agent, deliberation_id, body);
    }

    fn on_vote(&self, agent: &AgentIdentity, deliberation_id: &DeliberationId, body: &str) {
        delegate!(self, on_vote, agent, deliberation_id, body);
    }

    fn on_contribution_skipped(
        &self,
        agent: &AgentIdentity,
        deliberation_id: &DeliberationId,
        reason: &str,
    ) {
        delegate!(self, on_contribution_skipped, agent, deliberation_id, reason);
    }

    fn on_participation(&self, deliberation_id: &DeliberationId, participants: usize, expected: usize) {
        delegate!(self, on_participation, deliberation_id, participants, expected);
    }

    fn on_converged(&self, deliberation_id: &DeliberationId, selected: &[String]) {
        delegate!(self, on_converged, deliberation_id, selected);
    }

    fn on_artifacts_created(&self, deliberation_id: &DeliberationId, created: &[ArtifactId]) {
        delegate!(self, on_artifacts_created, deliberation_id, created);
    }

    fn on_completed(&self, deliberation_id: &DeliberationId) {
        delegate!(self, on_completed, deliberation_id);
    }

    fn on_oracle_retry(&self, agent: &AgentIdentity, attempt: u32, max_attempts: u32, error: &str) {
        delegate!(self, on_oracle_retry, agent, attempt, max_attempts, error);
    }

    fn on_placement(&self, agent: &AgentIdentity, action: &str, detail: &str) {
        delegate!(self, on_placement, agent, action, detail);
    }

    fn on_stalled(&self, agent: &AgentIdentity, reason: &str) {
        delegate!(self, on_stalled, agent, reason);
    }
}
