//! Core data structs shared across the workspace.
//!
//! Profiles and dishes are static catalog data loaded from configuration.
//! [`Order`] is created when a seated customer orders and lives on the
//! customer record until payment or departure.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::CustomerRarity;
use crate::ids::{DishId, OrderId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point on the restaurant floor plan, in floor units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Build a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Translate by `direction` scaled by `amount`.
    pub fn offset(self, direction: Self, amount: f64) -> Self {
        Self {
            x: direction.x.mul_add(amount, self.x),
            y: direction.y.mul_add(amount, self.y),
        }
    }

    /// Move toward `target` by at most `max_step`, never overshooting.
    pub fn step_toward(self, target: Self, max_step: f64) -> Self {
        let distance = self.distance_to(target);
        if distance <= max_step || distance <= f64::EPSILON {
            return target;
        }
        let ratio = max_step / distance;
        Self {
            x: (target.x - self.x).mul_add(ratio, self.x),
            y: (target.y - self.y).mul_add(ratio, self.y),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog data
// ---------------------------------------------------------------------------

/// Static description of a kind of customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomerProfile {
    /// Stable catalog key.
    pub id: String,
    /// Name shown in logs and UI.
    pub display_name: String,
    /// Rarity tier used by the arrival draw.
    pub rarity: CustomerRarity,
    /// Walking speed in floor units per second.
    pub speed: f64,
    /// Maximum patience in seconds.
    pub patience_secs: f64,
    /// Time spent eating in seconds.
    pub eat_secs: f64,
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Dish {
    /// Catalog key.
    pub id: DishId,
    /// Human-readable name.
    pub name: String,
    /// Price credited when the customer pays.
    pub cost: u32,
}

/// An order placed by a seated customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Order {
    /// Identifier of this particular order.
    pub id: OrderId,
    /// The dish that was ordered.
    pub dish: DishId,
    /// Price of the dish at the time of ordering.
    pub cost: u32,
}

impl Order {
    /// Create an order for `dish` with a fresh identifier.
    pub fn for_dish(dish: &Dish) -> Self {
        Self {
            id: OrderId::new(),
            dish: dish.id.clone(),
            cost: dish.cost,
        }
    }
}
