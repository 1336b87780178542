//! The bounded FIFO waiting line and its waypoint geometry.
//!
//! Position `i` in line always stands at
//! `start + direction * (i * spacing)`. Every mutation that can shift
//! positions returns the full set of recomputed slots, so there are never
//! gaps between consecutive customers.

use std::collections::VecDeque;

use bistro_types::{CustomerId, Point};
use serde::{Deserialize, Serialize};

/// Geometry and capacity of the waiting line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueLayout {
    /// Waypoint of the head of the line.
    #[serde(default)]
    pub start: Point,

    /// Unit direction the line grows in.
    #[serde(default = "default_direction")]
    pub direction: Point,

    /// Distance between consecutive positions (negative grows backwards).
    #[serde(default = "default_spacing")]
    pub spacing: f64,

    /// Maximum number of customers allowed to wait.
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

impl Default for QueueLayout {
    fn default() -> Self {
        Self {
            start: Point::default(),
            direction: default_direction(),
            spacing: default_spacing(),
            max_len: default_max_len(),
        }
    }
}

impl QueueLayout {
    /// Waypoint for a zero-based queue position.
    pub fn waypoint(&self, position: usize) -> Point {
        let steps = f64::from(u32::try_from(position).unwrap_or(u32::MAX));
        self.start.offset(self.direction, steps * self.spacing)
    }
}

const fn default_direction() -> Point {
    Point::new(1.0, 0.0)
}

const fn default_spacing() -> f64 {
    -1.0
}

const fn default_max_len() -> usize {
    6
}

/// One customer's place in line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueSlot {
    /// The waiting customer.
    pub customer: CustomerId,
    /// Zero-based position (0 is next to be seated).
    pub position: usize,
    /// Where the customer should stand.
    pub waypoint: Point,
}

/// Ordered list of waiting customers.
#[derive(Debug, Clone)]
pub struct WaitingLine {
    layout: QueueLayout,
    entries: VecDeque<CustomerId>,
}

impl WaitingLine {
    /// Create an empty line with the given geometry.
    pub fn new(layout: QueueLayout) -> Self {
        Self {
            layout,
            entries: VecDeque::with_capacity(layout.max_len),
        }
    }

    /// The configured geometry.
    pub const fn layout(&self) -> &QueueLayout {
        &self.layout
    }

    /// Number of waiting customers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured maximum length.
    pub const fn max_len(&self) -> usize {
        self.layout.max_len
    }

    /// Whether the line is at its maximum.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.layout.max_len
    }

    /// Zero-based position of `customer`, if waiting.
    pub fn position_of(&self, customer: CustomerId) -> Option<usize> {
        self.entries.iter().position(|id| *id == customer)
    }

    /// Current slot of `customer`, if waiting.
    pub fn slot_of(&self, customer: CustomerId) -> Option<QueueSlot> {
        self.position_of(customer).map(|position| QueueSlot {
            customer,
            position,
            waypoint: self.layout.waypoint(position),
        })
    }

    /// Append `customer` at the back. Returns `None` when the line is full.
    pub fn push(&mut self, customer: CustomerId) -> Option<QueueSlot> {
        if self.is_full() {
            return None;
        }
        self.entries.push_back(customer);
        let position = self.entries.len().saturating_sub(1);
        Some(QueueSlot {
            customer,
            position,
            waypoint: self.layout.waypoint(position),
        })
    }

    /// Take the head of the line.
    pub fn pop_front(&mut self) -> Option<CustomerId> {
        self.entries.pop_front()
    }

    /// Remove `customer` from anywhere in line. Returns whether they were there.
    pub fn remove(&mut self, customer: CustomerId) -> bool {
        match self.position_of(customer) {
            Some(position) => self.entries.remove(position).is_some(),
            None => false,
        }
    }

    /// Empty the line, returning everyone in FIFO order.
    pub fn drain_all(&mut self) -> Vec<CustomerId> {
        self.entries.drain(..).collect()
    }

    /// Recompute every slot from the current order.
    pub fn slots(&self) -> Vec<QueueSlot> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, customer)| QueueSlot {
                customer: *customer,
                position,
                waypoint: self.layout.waypoint(position),
            })
            .collect()
    }

    /// Iterate the waiting customers in FIFO order.
    pub fn iter(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.entries.iter().copied()
    }
}
