//! Decision oracle adapters
//!
//! - [`ScriptedOracle`]: replays configured replies, for offline simulation and tests
//! - `HttpDecisionOracle` (feature `http-oracle`): an OpenAI-compatible chat endpoint

#[cfg(feature = "http-oracle")]
mod http;
mod scripted;

#[cfg(feature = "http-oracle")]
pub use http::HttpDecisionOracle;
pub use scripted::ScriptedOracle;
