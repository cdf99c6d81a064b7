//! Deliberation records and topics.
//!
//! A deliberation is the shared, weakly-consistent record agents coordinate
//! through. It is owned by the external deliberation store; agents only ever
//! hold a transient [`DeliberationView`] fetched during a turn.

pub mod entities;
pub mod topic;

pub use entities::{
    Deliberation, DeliberationFilter, DeliberationStatus, DeliberationView, NewDeliberation,
    Response, Topology, Vote,
};
pub use topic::{ExpectedCountSource, Topic};
