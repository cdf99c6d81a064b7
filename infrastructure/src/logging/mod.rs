//! Logging infrastructure: structured protocol event logging.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements
//! the [`DeliberationNotifier`](deliberation_application::DeliberationNotifier) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
