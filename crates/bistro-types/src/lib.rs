//! Shared type definitions for the Bistro simulation.
//!
//! Every crate in the workspace speaks in these types. Public data types
//! also derive `ts-rs` bindings for the presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes (customers, orders, seats, dishes)
//! - [`enums`] -- Lifecycle states, rarity tiers, service phases, fault kinds
//! - [`structs`] -- Floor geometry, customer profiles, dishes, orders
//! - [`events`] -- Lifecycle events emitted toward outer collaborators

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

pub use enums::{CustomerRarity, CustomerStateName, DepartureKind, FaultKind, ServicePhase};
pub use events::LifecycleEvent;
pub use ids::{CustomerId, DishId, OrderId, SeatIndex};
pub use structs::{CustomerProfile, Dish, Order, Point};

#[cfg(test)]
mod tests {
    //! TypeScript binding generation.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::ids::CustomerId::export_all();
        let _ = crate::ids::OrderId::export_all();
        let _ = crate::ids::SeatIndex::export_all();
        let _ = crate::ids::DishId::export_all();

        let _ = crate::enums::CustomerStateName::export_all();
        let _ = crate::enums::DepartureKind::export_all();
        let _ = crate::enums::CustomerRarity::export_all();
        let _ = crate::enums::ServicePhase::export_all();
        let _ = crate::enums::FaultKind::export_all();

        let _ = crate::structs::Point::export_all();
        let _ = crate::structs::CustomerProfile::export_all();
        let _ = crate::structs::Dish::export_all();
        let _ = crate::structs::Order::export_all();

        let _ = crate::events::LifecycleEvent::export_all();
    }
}
