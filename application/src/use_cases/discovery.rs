//! Deliberation discovery
//!
//! Finds the open deliberation for a topic, or creates it. The store offers no
//! lock, so creation re-checks immediately before creating. This narrows the
//! race between agents but does not close it; duplicates are tolerated and
//! every caller settles on the earliest open record.

use crate::config::BehaviorConfig;
use crate::ports::deliberation_store::{DeliberationStore, StoreError};
use crate::use_cases::shared::bounded;
use deliberation_domain::{AgentIdentity, Deliberation, DeliberationFilter, Topic};
use std::sync::Arc;
use tracing::{debug, info};

/// How an agent ended up in a deliberation
#[derive(Debug, Clone, PartialEq)]
pub enum Discovery {
    /// This agent created it and submitted the seed proposal
    Created(Deliberation),
    /// Another agent created it between the first look and the re-check
    Joined(Deliberation),
}

impl Discovery {
    pub fn deliberation(&self) -> &Deliberation {
        match self {
            Discovery::Created(d) | Discovery::Joined(d) => d,
        }
    }
}

/// Use case for locating or creating a topic's deliberation
pub struct DeliberationDiscovery {
    store: Arc<dyn DeliberationStore>,
    behavior: BehaviorConfig,
}

impl DeliberationDiscovery {
    pub fn new(store: Arc<dyn DeliberationStore>, behavior: BehaviorConfig) -> Self {
        Self { store, behavior }
    }

    /// Find the open deliberation for `topic`.
    ///
    /// Tries the narrow search first. Search is best-effort on the store side,
    /// so an empty narrow result falls back to the full listing, filtered
    /// locally.
    pub async fn find_open(&self, topic: &Topic) -> Result<Option<Deliberation>, StoreError> {
        let narrow = bounded(self.behavior.timeout, self.store.list(&topic.filter())).await?;
        if let Some(found) = Self::pick_open(topic, narrow) {
            return Ok(Some(found));
        }

        debug!(topic = %topic, "Narrow search found nothing, scanning full listing");
        let all = bounded(
            self.behavior.timeout,
            self.store.list(&DeliberationFilter::all()),
        )
        .await?;
        Ok(Self::pick_open(topic, all))
    }

    /// Re-check, then create and seed if still absent.
    pub async fn create_if_absent(
        &self,
        topic: &Topic,
        creator: &AgentIdentity,
        seed_proposal: &str,
    ) -> Result<Discovery, StoreError> {
        if let Some(existing) = self.find_open(topic).await? {
            info!(
                agent = %creator.id,
                deliberation = %existing.id,
                "Deliberation appeared before creation, joining it"
            );
            return Ok(Discovery::Joined(existing));
        }

        let created = bounded(
            self.behavior.timeout,
            self.store.create(&topic.new_deliberation(creator)),
        )
        .await?;
        info!(
            agent = %creator.id,
            deliberation = %created.id,
            "Created deliberation '{}'",
            created.title
        );

        bounded(
            self.behavior.timeout,
            self.store.respond(&created.id, creator, seed_proposal),
        )
        .await?;

        Ok(Discovery::Created(created))
    }

    /// Earliest open deliberation on the topic, so racing duplicates resolve
    /// to the same record for everyone.
    fn pick_open(topic: &Topic, candidates: Vec<Deliberation>) -> Option<Deliberation> {
        candidates
            .into_iter()
            .filter(|d| d.is_open() && topic.matches(d))
            .min_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.as_str().cmp(b.id.as_str()))
            })
    }
}
