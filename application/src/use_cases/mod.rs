//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_oracle;
pub mod discovery;
pub mod finalize;
pub mod place_agent;
pub mod run_deliberation;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
