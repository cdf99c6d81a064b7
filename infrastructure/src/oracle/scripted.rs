use async_trait::async_trait;
use deliberation_application::{DecisionOracle, OracleError};
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::trace;

/// Oracle that answers from a fixed script
///
/// Replies are consumed in order; once the script runs out the fallback (if
/// any) is returned forever. Every user prompt is recorded so tests can see
/// what the agent was asked.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// User prompts received so far
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.replies.lock().await.len()
    }
}

#[async_trait]
impl DecisionOracle for ScriptedOracle {
    async fn infer(&self, _system_prompt: &str, user_prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().await.push(user_prompt.to_string());

        let next = self.replies.lock().await.pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(reply) => {
                trace!(reply = %reply, "Scripted oracle reply");
                Ok(reply)
            }
            None => Err(OracleError::Unavailable("script exhausted".to_string())),
        }
    }
}
