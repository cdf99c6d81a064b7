//! Quorum rules for deliberations
//!
//! Pure decision logic over a [`DeliberationView`](crate::deliberation::DeliberationView):
//!
//! - [`participation`]: who has taken part, and whether enough agents have
//! - [`outcome`]: which proposals survive once the deliberation has converged
//!
//! # Convergence
//!
//! ```text
//! responses ──► contributors (or responder) ──┐
//!                                             ├──► ParticipantSet ──► |set| >= expected ?
//! votes ──────► voter ids ────────────────────┘
//! ```
//!
//! # Selection
//!
//! ```text
//! rank by votes desc ──► endorsed only (if any votes) ──► trim + dedupe ──► drop multi-line
//!                                                                            │
//!                                            shared-list: all survivors ◄────┤
//!                                            voting:      top survivor  ◄────┘
//! ```

pub mod outcome;
pub mod participation;

pub use outcome::{is_atomic_body, ranked, select_outcome};
pub use participation::{ParticipantSet, is_converged};
