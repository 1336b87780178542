//! Floor capacity management for the Bistro simulation.
//!
//! This crate owns the finite seat bank and the bounded FIFO waiting line
//! in front of it. The [`SeatAllocator`] is the only component that binds
//! customers to seats; everything else asks it.
//!
//! # Architecture
//!
//! - [`seat`]: one seat with its floor points and occupant.
//! - [`queue`]: line geometry and the FIFO of waiting customers.
//! - [`allocator`]: assignment, release with promotion, and auditing.
//! - [`error`]: layout and invariant errors.

pub mod allocator;
pub mod error;
pub mod queue;
pub mod seat;

pub use allocator::{AssignOutcome, Promotion, ReleaseOutcome, SeatAllocator};
pub use error::FloorError;
pub use queue::{QueueLayout, QueueSlot, WaitingLine};
pub use seat::{Seat, SeatDefinition};
