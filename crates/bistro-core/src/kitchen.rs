//! Kitchen trait and stub implementation.
//!
//! The kitchen is an outer collaborator: it sees the orders awaiting
//! service and decides when each one is ready. The runner asks it once per
//! tick and hands its deliveries to
//! [`Restaurant::serve`](crate::restaurant::Restaurant::serve).
//!
//! [`StubKitchen`] cooks every order in a fixed time, which is enough to
//! drive full service days without a player.

use std::collections::BTreeMap;

use bistro_types::{CustomerId, Order, OrderId};

/// An order waiting at a seated customer's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    /// Who ordered.
    pub customer: CustomerId,
    /// What they ordered.
    pub order: Order,
}

/// A finished dish headed to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient.
    pub customer: CustomerId,
    /// The order being delivered.
    pub order: OrderId,
}

/// A source of order deliveries.
pub trait Kitchen {
    /// Advance cooking by `dt` seconds and return the orders now ready.
    ///
    /// `pending` lists every order still waiting to be served. Orders that
    /// disappear from the list (the customer left) should be forgotten.
    fn prepare(&mut self, dt: f64, pending: &[PendingOrder]) -> Vec<Delivery>;
}

/// A kitchen that finishes every order after a fixed cook time.
#[derive(Debug, Clone, Default)]
pub struct StubKitchen {
    cook_secs: f64,
    cooking: BTreeMap<OrderId, f64>,
}

impl StubKitchen {
    /// Create a kitchen with the given cook time.
    pub const fn new(cook_secs: f64) -> Self {
        Self {
            cook_secs,
            cooking: BTreeMap::new(),
        }
    }

    /// Number of orders on the stove.
    pub fn in_progress(&self) -> usize {
        self.cooking.len()
    }
}

impl Kitchen for StubKitchen {
    fn prepare(&mut self, dt: f64, pending: &[PendingOrder]) -> Vec<Delivery> {
        self.cooking
            .retain(|id, _| pending.iter().any(|p| p.order.id == *id));

        let mut ready = Vec::new();
        for item in pending {
            let cooked = self.cooking.entry(item.order.id).or_insert(0.0);
            *cooked += dt;
            if *cooked >= self.cook_secs {
                ready.push(Delivery {
                    customer: item.customer,
                    order: item.order.id,
                });
            }
        }
        for delivery in &ready {
            self.cooking.remove(&delivery.order);
        }
        ready
    }
}
