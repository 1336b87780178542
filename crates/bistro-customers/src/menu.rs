//! The dish catalog customers order from.

use std::collections::BTreeSet;

use bistro_types::{Dish, DishId};
use rand::Rng;

use crate::error::CustomerError;

/// A non-empty list of dishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    dishes: Vec<Dish>,
}

impl Menu {
    /// Build a menu.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::EmptyMenu`] for an empty list and
    /// [`CustomerError::DuplicateDish`] if two dishes share an id.
    pub fn new(dishes: Vec<Dish>) -> Result<Self, CustomerError> {
        if dishes.is_empty() {
            return Err(CustomerError::EmptyMenu);
        }
        let mut seen = BTreeSet::new();
        for dish in &dishes {
            if !seen.insert(dish.id.as_str()) {
                return Err(CustomerError::DuplicateDish(dish.id.to_string()));
            }
        }
        Ok(Self { dishes })
    }

    /// All dishes in catalog order.
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    /// Look up a dish by id.
    pub fn get(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|dish| &dish.id == id)
    }

    /// Pick a dish uniformly at random.
    pub fn random_dish<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Dish> {
        let index = rng.random_range(0..self.dishes.len());
        self.dishes.get(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn dish(id: &str, cost: u32) -> Dish {
        Dish {
            id: DishId::new(id),
            name: id.to_owned(),
            cost,
        }
    }

    #[test]
    fn empty_menu_is_rejected() {
        assert!(matches!(Menu::new(Vec::new()), Err(CustomerError::EmptyMenu)));
    }

    #[test]
    fn duplicate_dish_is_rejected() {
        let result = Menu::new(vec![dish("soup", 5), dish("soup", 6)]);
        assert!(matches!(result, Err(CustomerError::DuplicateDish(id)) if id == "soup"));
    }

    #[test]
    fn random_dish_comes_from_catalog() {
        let menu = Menu::new(vec![dish("soup", 5), dish("tea", 2), dish("pie", 9)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = menu.random_dish(&mut rng).unwrap();
            assert!(menu.get(&picked.id).is_some());
        }
    }
}
