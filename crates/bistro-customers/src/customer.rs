//! The per-customer record.
//!
//! A [`Customer`] holds everything the lifecycle needs about one person in
//! the restaurant: identity, profile tunables, position and walking target,
//! patience, the current order, the seat binding, and the state tag. The
//! seat binding is an index; the [`SeatAllocator`](bistro_floor::SeatAllocator)
//! holds the other side of the relation.

use bistro_types::{
    CustomerId, CustomerProfile, CustomerRarity, CustomerStateName, Order, Point, SeatIndex,
};

use crate::error::CustomerError;
use crate::movement::Movement;
use crate::patience::Patience;

/// One customer in the restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub(crate) id: CustomerId,
    pub(crate) profile: CustomerProfile,
    pub(crate) state: CustomerStateName,
    pub(crate) position: Point,
    pub(crate) movement: Movement,
    pub(crate) patience: Patience,
    pub(crate) order: Option<Order>,
    pub(crate) order_served: bool,
    pub(crate) seat: Option<SeatIndex>,
    pub(crate) state_elapsed: f64,
    pub(crate) patience_visible: bool,
    pub(crate) scripted: bool,
    pub(crate) departed: bool,
}

impl Customer {
    /// A fresh customer standing at `spawn_point`.
    ///
    /// Scripted customers get a frozen patience meter.
    pub fn new(profile: CustomerProfile, spawn_point: Point, scripted: bool) -> Self {
        let patience = if scripted {
            Patience::frozen(profile.patience_secs)
        } else {
            Patience::full(profile.patience_secs)
        };
        Self {
            id: CustomerId::new(),
            profile,
            state: CustomerStateName::MovingToEntrance,
            position: spawn_point,
            movement: Movement::default(),
            patience,
            order: None,
            order_served: false,
            seat: None,
            state_elapsed: 0.0,
            patience_visible: false,
            scripted,
            departed: false,
        }
    }

    /// A blank record held by the pool until its first spawn.
    pub(crate) fn spare() -> Self {
        let profile = CustomerProfile {
            id: String::new(),
            display_name: String::new(),
            rarity: CustomerRarity::Normal,
            speed: 0.0,
            patience_secs: 0.0,
            eat_secs: 0.0,
        };
        Self::new(profile, Point::default(), false)
    }

    /// Reinitialize a pooled record for a new arrival, with a new identity.
    pub(crate) fn reinit(&mut self, profile: CustomerProfile, spawn_point: Point, scripted: bool) {
        *self = Self::new(profile, spawn_point, scripted);
    }

    /// Unique identity of this arrival.
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// The profile this customer was drawn from.
    pub const fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> CustomerStateName {
        self.state
    }

    /// Current floor position.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Walking target, if any.
    pub const fn destination(&self) -> Option<Point> {
        self.movement.destination()
    }

    /// Patience meter.
    pub const fn patience(&self) -> &Patience {
        &self.patience
    }

    /// Current order, if one has been placed.
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Whether the current order has been delivered.
    pub const fn is_order_served(&self) -> bool {
        self.order_served
    }

    /// Seat bound to this customer, if any.
    pub const fn seat(&self) -> Option<SeatIndex> {
        self.seat
    }

    /// Seconds spent in the current state.
    pub const fn state_elapsed(&self) -> f64 {
        self.state_elapsed
    }

    /// Whether the patience indicator is shown.
    pub const fn is_patience_visible(&self) -> bool {
        self.patience_visible
    }

    /// Whether this is a scripted (tutorial) arrival.
    pub const fn is_scripted(&self) -> bool {
        self.scripted
    }

    /// Whether the customer has walked out of the exit.
    pub const fn has_departed(&self) -> bool {
        self.departed
    }
}

/// Check a profile's tunables before it enters the catalog.
///
/// # Errors
///
/// Returns [`CustomerError::InvalidProfile`] when speed, patience, or
/// eating time is not a positive finite number.
pub fn validate_profile(profile: &CustomerProfile) -> Result<(), CustomerError> {
    let checks = [
        ("speed", profile.speed),
        ("patience_secs", profile.patience_secs),
        ("eat_secs", profile.eat_secs),
    ];
    for (field, value) in checks {
        if !value.is_finite() || value <= 0.0 {
            return Err(CustomerError::InvalidProfile {
                profile: profile.id.clone(),
                reason: format!("{field} must be positive, got {value}"),
            });
        }
    }
    Ok(())
}
