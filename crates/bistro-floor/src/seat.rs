//! A single seat in the seat bank.
//!
//! Occupancy is derived from the occupant reference; there is no separate
//! flag that could drift out of sync with it.

use bistro_types::{CustomerId, Point, SeatIndex};
use serde::{Deserialize, Serialize};

/// Where a seat is on the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatDefinition {
    /// Point a walking customer stops at before sitting down.
    pub stop_point: Point,
    /// Point a seated customer is snapped to.
    pub seat_point: Point,
}

/// Runtime state of one seat.
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    index: SeatIndex,
    definition: SeatDefinition,
    occupant: Option<CustomerId>,
}

impl Seat {
    /// Create an empty seat at `index`.
    pub const fn new(index: SeatIndex, definition: SeatDefinition) -> Self {
        Self {
            index,
            definition,
            occupant: None,
        }
    }

    /// Position of this seat in the bank.
    pub const fn index(&self) -> SeatIndex {
        self.index
    }

    /// Where a customer stops before sitting.
    pub const fn stop_point(&self) -> Point {
        self.definition.stop_point
    }

    /// Where a seated customer sits.
    pub const fn seat_point(&self) -> Point {
        self.definition.seat_point
    }

    /// The customer sitting here, if any.
    pub const fn occupant(&self) -> Option<CustomerId> {
        self.occupant
    }

    /// Whether someone sits here.
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub(crate) const fn bind(&mut self, customer: CustomerId) {
        self.occupant = Some(customer);
    }

    pub(crate) const fn vacate(&mut self) -> Option<CustomerId> {
        self.occupant.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> SeatDefinition {
        SeatDefinition {
            stop_point: Point::new(1.0, 0.0),
            seat_point: Point::new(1.0, 1.0),
        }
    }

    #[test]
    fn occupancy_follows_occupant() {
        let mut seat = Seat::new(SeatIndex(0), definition());
        assert!(!seat.is_occupied());

        let customer = CustomerId::new();
        seat.bind(customer);
        assert!(seat.is_occupied());
        assert_eq!(seat.occupant(), Some(customer));

        assert_eq!(seat.vacate(), Some(customer));
        assert!(!seat.is_occupied());
        assert_eq!(seat.vacate(), None);
    }
}
