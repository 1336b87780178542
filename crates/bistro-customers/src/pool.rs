//! Arena of customer records with spare reuse.
//!
//! Active customers are kept in admission order, so the oldest customer is
//! always first. Despawned records go to a bounded spare list and are
//! reinitialized on the next spawn.

use bistro_types::{CustomerId, CustomerProfile, CustomerStateName, Point};
use tracing::trace;

use crate::customer::Customer;

/// Owner of every customer record.
#[derive(Debug, Clone)]
pub struct CustomerPool {
    active: Vec<Customer>,
    spares: Vec<Customer>,
    max_retained: usize,
}

impl CustomerPool {
    /// Create a pool sized for `capacity` active customers that keeps at
    /// most `max_retained` spare records.
    ///
    /// The spare list starts warm with `capacity` blank records, capped at
    /// `max_retained`.
    pub fn new(capacity: usize, max_retained: usize) -> Self {
        let warm = capacity.min(max_retained);
        let spares: Vec<Customer> = std::iter::repeat_with(Customer::spare).take(warm).collect();
        trace!(warm, max_retained, "Customer pool warmed");
        Self {
            active: Vec::with_capacity(capacity),
            spares,
            max_retained,
        }
    }

    /// Activate a customer record and return its identity.
    pub fn spawn(&mut self, profile: CustomerProfile, spawn_point: Point, scripted: bool) -> CustomerId {
        let customer = match self.spares.pop() {
            Some(mut spare) => {
                spare.reinit(profile, spawn_point, scripted);
                spare
            }
            None => Customer::new(profile, spawn_point, scripted),
        };
        let id = customer.id();
        self.active.push(customer);
        id
    }

    /// Return a customer record to the spare list.
    ///
    /// Returns `false` for an unknown id.
    pub fn despawn(&mut self, id: CustomerId) -> bool {
        let Some(index) = self.active.iter().position(|c| c.id() == id) else {
            return false;
        };
        let customer = self.active.remove(index);
        if self.spares.len() < self.max_retained {
            self.spares.push(customer);
        } else {
            trace!(customer = %id, "Spare list full, dropping record");
        }
        true
    }

    /// Despawn every active customer, returning their ids oldest first.
    pub fn despawn_all(&mut self) -> Vec<CustomerId> {
        let ids = self.ids();
        for id in &ids {
            self.despawn(*id);
        }
        ids
    }

    /// Drop every active customer's patience to zero.
    pub fn empty_all_patience(&mut self) {
        for customer in &mut self.active {
            customer.patience.empty();
        }
    }

    /// Whether the oldest active customer is currently eating.
    pub fn is_first_customer_eating(&self) -> bool {
        self.oldest()
            .is_some_and(|customer| customer.state() == CustomerStateName::Eating)
    }

    /// Look up an active customer.
    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.active.iter().find(|c| c.id() == id)
    }

    /// Look up an active customer mutably.
    pub fn get_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.active.iter_mut().find(|c| c.id() == id)
    }

    /// Active customers, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.active.iter()
    }

    /// Active customers mutably, oldest first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Customer> {
        self.active.iter_mut()
    }

    /// Snapshot of active ids, oldest first.
    pub fn ids(&self) -> Vec<CustomerId> {
        self.active.iter().map(Customer::id).collect()
    }

    /// The longest-present active customer.
    pub fn oldest(&self) -> Option<&Customer> {
        self.active.first()
    }

    /// Number of active customers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no customer is active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of spare records held for reuse.
    pub fn spare_count(&self) -> usize {
        self.spares.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bistro_types::CustomerRarity;

    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            id: String::from("regular"),
            display_name: String::from("Regular"),
            rarity: CustomerRarity::Normal,
            speed: 1.0,
            patience_secs: 5.0,
            eat_secs: 2.0,
        }
    }

    #[test]
    fn spawn_and_despawn_track_active_count() {
        let mut pool = CustomerPool::new(4, 4);
        let a = pool.spawn(profile(), Point::default(), false);
        let b = pool.spawn(profile(), Point::default(), false);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.oldest().unwrap().id(), a);

        assert!(pool.despawn(a));
        assert!(!pool.despawn(a));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.oldest().unwrap().id(), b);
        assert_eq!(pool.spare_count(), 3);
    }

    #[test]
    fn spares_are_reused_with_fresh_identity() {
        let mut pool = CustomerPool::new(2, 2);
        let first = pool.spawn(profile(), Point::default(), false);
        pool.despawn(first);
        let second = pool.spawn(profile(), Point::new(1.0, 0.0), true);
        assert_ne!(first, second);
        assert_eq!(pool.spare_count(), 1);
        assert!(pool.get(second).unwrap().is_scripted());
    }

    #[test]
    fn empty_all_patience_reaches_frozen_customers() {
        let mut pool = CustomerPool::new(2, 2);
        pool.spawn(profile(), Point::default(), false);
        pool.spawn(profile(), Point::default(), true);
        pool.empty_all_patience();
        assert!(pool.iter().all(|c| c.patience().is_exhausted()));
    }

    #[test]
    fn first_customer_eating_checks_oldest_only() {
        let mut pool = CustomerPool::new(2, 2);
        let first = pool.spawn(profile(), Point::default(), false);
        let second = pool.spawn(profile(), Point::default(), false);
        pool.get_mut(second).unwrap().state = CustomerStateName::Eating;
        assert!(!pool.is_first_customer_eating());
        pool.get_mut(first).unwrap().state = CustomerStateName::Eating;
        assert!(pool.is_first_customer_eating());
    }

    #[test]
    fn new_pool_is_warmed_up_to_the_retention_cap() {
        assert_eq!(CustomerPool::new(10, 30).spare_count(), 10);
        assert_eq!(CustomerPool::new(10, 4).spare_count(), 4);
        assert_eq!(CustomerPool::new(0, 4).spare_count(), 0);

        let mut pool = CustomerPool::new(2, 2);
        let id = pool.spawn(profile(), Point::new(3.0, 1.0), false);
        assert_eq!(pool.spare_count(), 1);
        let customer = pool.get(id).unwrap();
        assert_eq!(customer.profile().id, "regular");
        assert_eq!(customer.position(), Point::new(3.0, 1.0));
        assert_eq!(customer.state(), CustomerStateName::MovingToEntrance);
    }

    #[test]
    fn spare_list_is_bounded() {
        let mut pool = CustomerPool::new(4, 1);
        for _ in 0..3 {
            pool.spawn(profile(), Point::default(), false);
        }
        let despawned = pool.despawn_all();
        assert_eq!(despawned.len(), 3);
        assert!(pool.is_empty());
        assert_eq!(pool.spare_count(), 1);
    }
}
