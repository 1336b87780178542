//! Error types for the `bistro-customers` crate.
//!
//! Catalog construction and binding audits can fail. Runtime lifecycle problems (stale
//! references, impossible transitions) are absorbed by the state machine
//! and reported as [`FaultKind`](bistro_types::FaultKind) values instead.

use bistro_types::{CustomerId, SeatIndex};

/// Errors raised while building catalogs or auditing bindings.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// A profile has a non-positive or non-finite tunable.
    #[error("profile {profile}: {reason}")]
    InvalidProfile {
        /// Catalog key of the offending profile.
        profile: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The menu has no dishes, so no order could ever be placed.
    #[error("menu has no dishes")]
    EmptyMenu,

    /// Two dishes share the same catalog key.
    #[error("duplicate dish id: {0}")]
    DuplicateDish(String),

    /// A customer's seat binding disagrees with the seat allocator.
    #[error("{customer} records seat {seat:?} but the allocator disagrees")]
    SeatMismatch {
        /// The customer whose binding is inconsistent.
        customer: CustomerId,
        /// The seat the customer record holds.
        seat: Option<SeatIndex>,
    },
}
