//! Error types for the `bistro-floor` crate.
//!
//! Runtime allocation never fails with an error: a full restaurant is a
//! [`Rejected`](crate::AssignOutcome::Rejected) outcome, and stale releases
//! are reported as `None`. [`FloorError`] covers layout problems found at
//! construction time and invariant violations found by
//! [`SeatAllocator::audit`](crate::SeatAllocator::audit).

use bistro_types::{CustomerId, SeatIndex};

/// Errors raised while building or auditing the floor.
#[derive(Debug, thiserror::Error)]
pub enum FloorError {
    /// The layout defines no seats at all.
    #[error("floor layout has no seats")]
    NoSeats,

    /// A seat's occupant is not mapped back to that seat.
    #[error("{seat} holds {customer} but the customer is not bound to it")]
    BrokenBackReference {
        /// The inconsistent seat.
        seat: SeatIndex,
        /// The occupant recorded on the seat.
        customer: CustomerId,
    },

    /// A customer is bound to a seat that does not record them.
    #[error("{customer} is bound to {seat} which does not hold them")]
    DanglingBinding {
        /// The customer with the dangling binding.
        customer: CustomerId,
        /// The seat the binding points at.
        seat: SeatIndex,
    },

    /// A customer is both seated and waiting in line.
    #[error("{customer} is both seated and queued")]
    SeatedAndQueued {
        /// The doubly-bound customer.
        customer: CustomerId,
    },

    /// The waiting line grew past its configured maximum.
    #[error("queue length {len} exceeds maximum {max}")]
    QueueOverflow {
        /// Current length.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}
