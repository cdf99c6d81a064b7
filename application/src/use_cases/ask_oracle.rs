//! Decision retry wrapper
//!
//! Asks the decision oracle for a structured decision, retrying with
//! corrective feedback when the reply cannot be parsed.

use crate::config::BehaviorConfig;
use crate::ports::decision_oracle::DecisionOracle;
use crate::ports::progress::DeliberationNotifier;
use crate::use_cases::shared::bounded;
use deliberation_domain::{AgentIdentity, Decision, PromptTemplate, parse_decision};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case wrapping the oracle with bounded, feedback-threaded retries
pub struct AskOracleUseCase {
    oracle: Arc<dyn DecisionOracle>,
    behavior: BehaviorConfig,
}

impl AskOracleUseCase {
    pub fn new(oracle: Arc<dyn DecisionOracle>, behavior: BehaviorConfig) -> Self {
        Self { oracle, behavior }
    }

    /// Ask for a decision.
    ///
    /// Makes up to `max_oracle_retries` attempts. After a malformed reply the
    /// next attempt carries the reply and the parse error. A failed oracle call
    /// uses up an attempt but leaves the feedback of the last malformed reply
    /// in place. Returns `None` once the budget is exhausted; callers treat that
    /// as "skip this step".
    pub async fn ask(
        &self,
        agent: &AgentIdentity,
        system_prompt: &str,
        instruction: &str,
        progress: &dyn DeliberationNotifier,
    ) -> Option<Decision> {
        let attempts = self.behavior.oracle_attempts();
        let mut feedback: Option<(String, String)> = None;

        for attempt in 1..=attempts {
            let prompt = match &feedback {
                Some((previous, error)) => {
                    PromptTemplate::retry_prompt(instruction, previous, error)
                }
                None => instruction.to_string(),
            };

            let raw = match bounded(
                self.behavior.timeout,
                self.oracle.infer(system_prompt, &prompt),
            )
            .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(agent = %agent.id, attempt, attempts, "Oracle call failed: {}", e);
                    progress.on_oracle_retry(agent, attempt, attempts, &e.to_string());
                    continue;
                }
            };

            match parse_decision(&raw) {
                Ok(decision) => {
                    debug!(agent = %agent.id, attempt, "Oracle decision: {}", decision);
                    return Some(decision);
                }
                Err(e) => {
                    warn!(agent = %agent.id, attempt, attempts, "Malformed oracle reply: {}", e);
                    progress.on_oracle_retry(agent, attempt, attempts, &e.to_string());
                    feedback = Some((raw, e.to_string()));
                }
            }
        }

        warn!(
            agent = %agent.id,
            attempts,
            "Oracle produced no usable decision, skipping step"
        );
        None
    }
}
