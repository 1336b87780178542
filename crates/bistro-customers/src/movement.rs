//! Kinematic movement toward a single destination.
//!
//! Each tick a walking customer moves `speed * dt` floor units straight at
//! its destination and arrives once within the arrival tolerance. Arrival
//! snaps the position onto the destination and clears it.

use bistro_types::Point;

/// Outcome of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No destination is set.
    Idle,
    /// Still on the way.
    Walking,
    /// Reached the destination this step.
    Arrived,
}

/// A customer's current walking target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Movement {
    destination: Option<Point>,
}

impl Movement {
    /// Start walking toward `destination`, replacing any previous target.
    pub const fn walk_to(&mut self, destination: Point) {
        self.destination = Some(destination);
    }

    /// Stop walking.
    pub const fn stop(&mut self) {
        self.destination = None;
    }

    /// Current target, if walking.
    pub const fn destination(&self) -> Option<Point> {
        self.destination
    }

    /// Advance `position` toward the destination.
    pub fn step(&mut self, position: &mut Point, speed: f64, dt: f64, tolerance: f64) -> Step {
        let Some(target) = self.destination else {
            return Step::Idle;
        };
        if position.distance_to(target) > tolerance {
            *position = position.step_toward(target, (speed * dt).max(0.0));
        }
        if position.distance_to(target) <= tolerance {
            *position = target;
            self.destination = None;
            return Step::Arrived;
        }
        Step::Walking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_then_arrives_and_clears() {
        let mut movement = Movement::default();
        let mut position = Point::new(0.0, 0.0);
        movement.walk_to(Point::new(2.0, 0.0));

        assert_eq!(movement.step(&mut position, 1.0, 1.0, 0.1), Step::Walking);
        assert_eq!(position, Point::new(1.0, 0.0));
        assert_eq!(movement.step(&mut position, 1.0, 1.0, 0.1), Step::Arrived);
        assert_eq!(position, Point::new(2.0, 0.0));
        assert_eq!(movement.destination(), None);
        assert_eq!(movement.step(&mut position, 1.0, 1.0, 0.1), Step::Idle);
    }

    #[test]
    fn already_within_tolerance_arrives_immediately() {
        let mut movement = Movement::default();
        let mut position = Point::new(0.0, 0.0);
        movement.walk_to(Point::new(0.05, 0.0));
        assert_eq!(movement.step(&mut position, 0.0, 0.0, 0.1), Step::Arrived);
    }
}
