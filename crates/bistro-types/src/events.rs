//! Lifecycle events emitted by the simulation core.
//!
//! Presentation, audio, quest, and UI collaborators subscribe to these.
//! The core never waits on a consumer: events are appended to the tick's
//! outbox and handed out with the tick summary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CustomerStateName, DepartureKind};
use crate::ids::{CustomerId, DishId, OrderId, SeatIndex};
use crate::structs::{Order, Point};

/// Something observable that happened on the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LifecycleEvent {
    /// A new customer entered the simulation.
    CustomerAdmitted {
        /// The new customer.
        customer: CustomerId,
        /// Catalog key of the customer's profile.
        profile: String,
        /// Whether this was a scripted (timer-bypassing) arrival.
        scripted: bool,
        /// Spawn point the customer appeared at.
        entry_point: Point,
    },
    /// The customer took a place in the waiting line.
    CustomerQueued {
        /// The queued customer.
        customer: CustomerId,
        /// Zero-based queue position.
        position: usize,
        /// Waypoint assigned to that position.
        waypoint: Point,
    },
    /// The customer was given a seat directly on arrival.
    CustomerSeated {
        /// The seated customer.
        customer: CustomerId,
        /// The assigned seat.
        seat: SeatIndex,
    },
    /// The head of the queue was moved into a freed seat.
    CustomerPromoted {
        /// The promoted customer.
        customer: CustomerId,
        /// The seat that was freed for them.
        seat: SeatIndex,
    },
    /// The customer found no seat and no room in line.
    CustomerRejected {
        /// The rejected customer.
        customer: CustomerId,
    },
    /// The customer's lifecycle state changed.
    StateChanged {
        /// The customer.
        customer: CustomerId,
        /// Previous state.
        from: CustomerStateName,
        /// New state.
        to: CustomerStateName,
    },
    /// A seated customer placed an order.
    OrderPlaced {
        /// The ordering customer.
        customer: CustomerId,
        /// The seat they occupy.
        seat: SeatIndex,
        /// The order itself.
        order: Order,
    },
    /// An order was abandoned before it was served.
    OrderWithdrawn {
        /// The customer who walked away.
        customer: CustomerId,
        /// The abandoned order.
        order: OrderId,
    },
    /// The matching dish was delivered.
    OrderServed {
        /// The served customer.
        customer: CustomerId,
        /// The fulfilled order.
        order: Order,
    },
    /// The customer started eating; the dish is no longer available for pickup.
    EatingStarted {
        /// The eating customer.
        customer: CustomerId,
        /// The seat holding the dish.
        seat: SeatIndex,
        /// The dish being eaten.
        dish: DishId,
    },
    /// The customer paid for the meal.
    PaymentCompleted {
        /// The paying customer.
        customer: CustomerId,
        /// Amount credited to the round's earnings.
        amount: u32,
    },
    /// The customer reached the exit and left the simulation.
    CustomerDeparted {
        /// The departed customer.
        customer: CustomerId,
        /// Whether the visit ended well.
        kind: DepartureKind,
    },
    /// The round timer is ready to be displayed.
    RoundTimerShown {
        /// Length of the round in seconds.
        limit_secs: f64,
    },
    /// The round clock reached its limit.
    RoundTimerExpired {
        /// Elapsed time, clamped to the limit.
        elapsed_secs: f64,
    },
    /// The floor drained after closing.
    AllCustomersDeparted {
        /// Customers who paid this round.
        served: u32,
        /// Customers who sat down this round.
        visited: u32,
    },
}

impl LifecycleEvent {
    /// The customer this event is about, if any.
    pub const fn customer(&self) -> Option<CustomerId> {
        match self {
            Self::CustomerAdmitted { customer, .. }
            | Self::CustomerQueued { customer, .. }
            | Self::CustomerSeated { customer, .. }
            | Self::CustomerPromoted { customer, .. }
            | Self::CustomerRejected { customer }
            | Self::StateChanged { customer, .. }
            | Self::OrderPlaced { customer, .. }
            | Self::OrderWithdrawn { customer, .. }
            | Self::OrderServed { customer, .. }
            | Self::EatingStarted { customer, .. }
            | Self::PaymentCompleted { customer, .. }
            | Self::CustomerDeparted { customer, .. } => Some(*customer),
            Self::RoundTimerShown { .. }
            | Self::RoundTimerExpired { .. }
            | Self::AllCustomersDeparted { .. } => None,
        }
    }
}
