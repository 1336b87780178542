//! Enumeration types for the Bistro simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Customer lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state tag of a customer.
///
/// A customer starts in [`MovingToEntrance`](Self::MovingToEntrance) and
/// ends in one of the two leaving states. [`AngryLeaving`](Self::AngryLeaving)
/// shares the terminal effect of [`Leaving`](Self::Leaving) but is reached by
/// different edges (rejection, exhausted patience, forced eviction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CustomerStateName {
    /// Walking from the spawn point toward the entrance.
    MovingToEntrance,
    /// Walking toward an assigned queue waypoint.
    MovingToLine,
    /// Standing in line, patience draining.
    WaitingInLine,
    /// Walking toward the stop point of an assigned seat.
    MovingToSeat,
    /// Seated with an order placed, patience draining.
    Ordering,
    /// Eating the delivered dish.
    Eating,
    /// Paying for the meal.
    Paying,
    /// Walking to the exit after a completed meal.
    Leaving,
    /// Walking to the exit after a failed visit.
    AngryLeaving,
}

impl CustomerStateName {
    /// Whether patience drains while in this state.
    pub const fn drains_patience(self) -> bool {
        matches!(self, Self::Ordering | Self::WaitingInLine)
    }

    /// Whether this is one of the two terminal leaving states.
    pub const fn is_leaving(self) -> bool {
        matches!(self, Self::Leaving | Self::AngryLeaving)
    }
}

impl core::fmt::Display for CustomerStateName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// How a customer left the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DepartureKind {
    /// Ate, paid, and left.
    Satisfied,
    /// Rejected at the door, ran out of patience, or was evicted.
    Angry,
}

/// Rarity tier of a customer profile.
///
/// The arrival loop draws [`Normal`](Self::Normal) as its common tier and
/// [`Rare`](Self::Rare) as its rare tier. [`Special`](Self::Special)
/// profiles are only spawned by scripted arrivals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CustomerRarity {
    /// Everyday regulars.
    Normal,
    /// Occasional visitors.
    Rare,
    /// Story or event guests.
    Special,
}

// ---------------------------------------------------------------------------
// Service window
// ---------------------------------------------------------------------------

/// Service sub-phase consumed from the outer phase controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServicePhase {
    /// Doors about to open; counters reset.
    Opening,
    /// Serving customers; arrivals and the round timer run.
    Operating,
    /// No new arrivals; waiting for the floor to drain.
    Closing,
}

// ---------------------------------------------------------------------------
// Absorbed faults
// ---------------------------------------------------------------------------

/// Category of a locally absorbed fault.
///
/// None of these stop the simulation. They are logged and counted so an
/// operator can see how often each happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FaultKind {
    /// No free seat and the queue is full; the arrival leaves angry.
    ResourceExhausted,
    /// A transition to the current state, or out of a leaving state.
    InvalidTransition,
    /// An operation targeted a customer no longer bound to a seat or queue.
    StaleReference,
    /// Arrival points, profiles, or dishes are missing.
    ConfigurationMissing,
}

impl core::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::ResourceExhausted => "resource_exhausted",
            Self::InvalidTransition => "invalid_transition",
            Self::StaleReference => "stale_reference",
            Self::ConfigurationMissing => "configuration_missing",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ordering_and_waiting_drain_patience() {
        let draining: Vec<CustomerStateName> = [
            CustomerStateName::MovingToEntrance,
            CustomerStateName::MovingToLine,
            CustomerStateName::WaitingInLine,
            CustomerStateName::MovingToSeat,
            CustomerStateName::Ordering,
            CustomerStateName::Eating,
            CustomerStateName::Paying,
            CustomerStateName::Leaving,
            CustomerStateName::AngryLeaving,
        ]
        .into_iter()
        .filter(|s| s.drains_patience())
        .collect();
        assert_eq!(
            draining,
            vec![CustomerStateName::WaitingInLine, CustomerStateName::Ordering]
        );
    }

    #[test]
    fn leaving_states() {
        assert!(CustomerStateName::Leaving.is_leaving());
        assert!(CustomerStateName::AngryLeaving.is_leaving());
        assert!(!CustomerStateName::Paying.is_leaving());
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&ServicePhase::Operating).ok();
        assert_eq!(json.as_deref(), Some("\"operating\""));
        let back: Result<ServicePhase, _> = serde_json::from_str("\"closing\"");
        assert_eq!(back.ok(), Some(ServicePhase::Closing));
    }

    #[test]
    fn departure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&DepartureKind::Satisfied).ok();
        assert_eq!(json.as_deref(), Some("\"satisfied\""));
        let back: Result<DepartureKind, _> = serde_json::from_str("\"angry\"");
        assert_eq!(back.ok(), Some(DepartureKind::Angry));
    }

    #[test]
    fn fault_display_is_snake_case() {
        assert_eq!(FaultKind::StaleReference.to_string(), "stale_reference");
    }
}
