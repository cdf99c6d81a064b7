use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use deliberation_application::{DeliberationStore, StoreError};
use deliberation_domain::{
    AgentIdentity, Deliberation, DeliberationFilter, DeliberationId, DeliberationStatus,
    DeliberationView, NewDeliberation, Response, ResponseId, Vote,
};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct State {
    deliberations: Vec<Deliberation>,
    responses: Vec<Response>,
    votes: Vec<Vote>,
    last_timestamp: Option<DateTime<Utc>>,
    /// Number of upcoming calls that fail with a connection error
    failures_pending: usize,
}

impl State {
    /// Strictly increasing timestamps so creation order is never ambiguous
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(stamp);
        stamp
    }

    fn take_failure(&mut self) -> Result<(), StoreError> {
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(StoreError::Connection("injected failure".to_string()));
        }
        Ok(())
    }

    fn deliberation(&self, id: &DeliberationId) -> Result<&Deliberation, StoreError> {
        self.deliberations
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("deliberation {}", id)))
    }

    fn open_deliberation(&self, id: &DeliberationId) -> Result<&Deliberation, StoreError> {
        let deliberation = self.deliberation(id)?;
        if !deliberation.is_open() {
            return Err(StoreError::Rejected(format!(
                "deliberation {} is {}",
                id, deliberation.status
            )));
        }
        Ok(deliberation)
    }

    fn view(&self, id: &DeliberationId) -> Result<DeliberationView, StoreError> {
        let deliberation = self.deliberation(id)?.clone();
        let votes: Vec<Vote> = self
            .votes
            .iter()
            .filter(|v| &v.deliberation_id == id)
            .cloned()
            .collect();
        let responses = self
            .responses
            .iter()
            .filter(|r| &r.deliberation_id == id)
            .map(|r| Response {
                vote_count: votes.iter().filter(|v| v.response_id == r.id).count(),
                ..r.clone()
            })
            .collect();
        Ok(DeliberationView {
            deliberation,
            responses,
            votes,
        })
    }
}

/// Deliberation store held in process memory
///
/// Cheap to share behind an `Arc`; every agent in a simulation talks to the
/// same instance.
#[derive(Default)]
pub struct InMemoryDeliberationStore {
    state: Mutex<State>,
    lossy_search: bool,
}

impl InMemoryDeliberationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose filtered search always comes back empty, like a remote
    /// index that has not caught up yet. Unfiltered listings still work.
    pub fn with_lossy_search() -> Self {
        Self {
            lossy_search: true,
            ..Self::default()
        }
    }

    /// Make the next `count` calls fail with a connection error
    pub async fn fail_next(&self, count: usize) {
        self.state.lock().await.failures_pending = count;
    }

    /// Every deliberation ever created, in creation order
    pub async fn snapshot(&self) -> Vec<Deliberation> {
        self.state.lock().await.deliberations.clone()
    }

    /// Full view without consuming an injected failure
    pub async fn peek(&self, id: &DeliberationId) -> Option<DeliberationView> {
        self.state.lock().await.view(id).ok()
    }
}

fn matches_filter(deliberation: &Deliberation, filter: &DeliberationFilter) -> bool {
    if let Some(fragment) = &filter.title_contains
        && !deliberation.title.contains(fragment.as_str())
    {
        return false;
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let haystack = format!("{} {}", deliberation.title, deliberation.request_message);
        return haystack.to_lowercase().contains(&needle);
    }
    true
}

#[async_trait]
impl DeliberationStore for InMemoryDeliberationStore {
    async fn list(&self, filter: &DeliberationFilter) -> Result<Vec<Deliberation>, StoreError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        if self.lossy_search && !filter.is_unfiltered() {
            debug!("Lossy search returning no results");
            return Ok(Vec::new());
        }
        Ok(state
            .deliberations
            .iter()
            .filter(|d| matches_filter(d, filter))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &DeliberationId) -> Result<DeliberationView, StoreError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;
        state.view(id)
    }

    async fn create(&self, spec: &NewDeliberation) -> Result<Deliberation, StoreError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let deliberation = Deliberation {
            id: DeliberationId::new(format!("d-{}", state.deliberations.len() + 1)),
            title: spec.title.clone(),
            topology: spec.topology,
            status: DeliberationStatus::CollectingResponses,
            creator_id: spec.creator_id.clone(),
            creator_name: spec.creator_name.clone(),
            request_message: spec.request_message.clone(),
            created_at: state.next_timestamp(),
        };
        debug!(deliberation = %deliberation.id, "Stored deliberation '{}'", deliberation.title);
        state.deliberations.push(deliberation.clone());
        Ok(deliberation)
    }

    async fn respond(
        &self,
        id: &DeliberationId,
        responder: &AgentIdentity,
        body: &str,
    ) -> Result<Response, StoreError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;
        state.open_deliberation(id)?;

        let response = Response {
            id: ResponseId::new(format!("r-{}", state.responses.len() + 1)),
            deliberation_id: id.clone(),
            responder_id: responder.id.clone(),
            responder_name: responder.name.clone(),
            body: body.to_string(),
            vote_count: 0,
            contributors: Vec::new(),
            created_at: state.next_timestamp(),
        };
        state.responses.push(response.clone());
        Ok(response)
    }

    async fn vote(
        &self,
        id: &DeliberationId,
        response_id: &ResponseId,
        voter: &AgentIdentity,
    ) -> Result<Vote, StoreError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;
        state.open_deliberation(id)?;

        if !state
            .responses
            .iter()
            .any(|r| &r.id == response_id && &r.deliberation_id == id)
        {
            return Err(StoreError::NotFound(format!("response {}", response_id)));
        }
        if state
            .votes
            .iter()
            .any(|v| &v.response_id == response_id && v.voter_id == voter.id)
        {
            return Err(StoreError::Rejected(format!(
                "{} already voted for {}",
                voter.id, response_id
            )));
        }

        let vote = Vote {
            deliberation_id: id.clone(),
            response_id: response_id.clone(),
            voter_id: voter.id.clone(),
            voter_name: voter.name.clone(),
        };
        state.votes.push(vote.clone());
        Ok(vote)
    }

    async fn update_status(
        &self,
        id: &DeliberationId,
        status: DeliberationStatus,
    ) -> Result<Deliberation, StoreError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let deliberation = state
            .deliberations
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("deliberation {}", id)))?;
        deliberation.status = status;
        Ok(deliberation.clone())
    }
}
