//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: typed identifiers and the acting [`ids::AgentIdentity`]
//! - [`error::DomainError`]: domain-level errors
//! - [`output_format::OutputFormat`]: report rendering choice

pub mod error;
pub mod ids;
pub mod output_format;
