//! Seat allocation: the single source of truth for floor capacity.
//!
//! The [`SeatAllocator`] owns the seat bank and the waiting line. Every
//! operation is a whole call: callers never observe a half-applied
//! mutation. Operations that move *other* customers (promotion out of the
//! line, waypoint shifts) report those moves in their return value so the
//! caller can route them to the affected state machines within the same
//! tick.
//!
//! # Policies
//!
//! - Lowest-index free seat wins.
//! - The line is pure FIFO in arrival order.
//! - Releasing a seat promotes exactly the head of the line into it.
//! - Releases and removals of customers that are not bound are no-ops.

use std::collections::BTreeMap;

use bistro_types::{CustomerId, Point, SeatIndex};
use tracing::{debug, info, warn};

use crate::error::FloorError;
use crate::queue::{QueueLayout, QueueSlot, WaitingLine};
use crate::seat::{Seat, SeatDefinition};

/// Result of [`SeatAllocator::try_assign`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignOutcome {
    /// A free seat was bound to the customer.
    SeatedDirectly {
        /// The assigned seat.
        seat: SeatIndex,
    },
    /// No seat was free; the customer joined the line.
    Queued {
        /// The customer's place in line.
        slot: QueueSlot,
    },
    /// No seat and no room in line.
    Rejected,
}

/// The head of the line moved into a freed seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    /// The promoted customer.
    pub customer: CustomerId,
    /// The seat they now hold.
    pub seat: SeatIndex,
}

/// Result of a successful [`SeatAllocator::release`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// The seat that was freed.
    pub freed: SeatIndex,
    /// Who was promoted into it, if anyone was waiting.
    pub promotion: Option<Promotion>,
    /// Recomputed slots of everyone still in line.
    pub moved: Vec<QueueSlot>,
}

/// Owner of the seat bank and the waiting line.
#[derive(Debug, Clone)]
pub struct SeatAllocator {
    seats: Vec<Seat>,
    line: WaitingLine,
    bindings: BTreeMap<CustomerId, SeatIndex>,
}

impl SeatAllocator {
    /// Build an allocator from seat definitions and line geometry.
    ///
    /// Seat indices follow the order of `definitions`.
    ///
    /// # Errors
    ///
    /// Returns [`FloorError::NoSeats`] if `definitions` is empty.
    pub fn new(definitions: &[SeatDefinition], layout: QueueLayout) -> Result<Self, FloorError> {
        if definitions.is_empty() {
            return Err(FloorError::NoSeats);
        }
        let seats = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| Seat::new(SeatIndex(i), *def))
            .collect();
        info!(
            seat_count = definitions.len(),
            max_queue_len = layout.max_len,
            "Seat allocator initialized"
        );
        Ok(Self {
            seats,
            line: WaitingLine::new(layout),
            bindings: BTreeMap::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Seat `customer` directly, queue them, or reject them.
    ///
    /// A customer who is already seated or queued keeps their binding and
    /// gets it reported back unchanged.
    pub fn try_assign(&mut self, customer: CustomerId) -> AssignOutcome {
        if let Some(seat) = self.bindings.get(&customer).copied() {
            debug!(%customer, %seat, "Customer already seated, keeping binding");
            return AssignOutcome::SeatedDirectly { seat };
        }
        if let Some(slot) = self.line.slot_of(customer) {
            debug!(%customer, position = slot.position, "Customer already queued");
            return AssignOutcome::Queued { slot };
        }

        if let Some(seat) = self.bind_free_seat(customer) {
            debug!(%customer, %seat, "Seat assigned");
            return AssignOutcome::SeatedDirectly { seat };
        }

        match self.line.push(customer) {
            Some(slot) => {
                debug!(%customer, position = slot.position, "Customer joined the line");
                AssignOutcome::Queued { slot }
            }
            None => {
                debug!(%customer, "Floor full, arrival rejected");
                AssignOutcome::Rejected
            }
        }
    }

    /// Free the seat held by `customer` and promote the head of the line.
    ///
    /// Returns `None` when the customer holds no seat (for example a second
    /// release of the same customer).
    pub fn release(&mut self, customer: CustomerId) -> Option<ReleaseOutcome> {
        let freed = self.bindings.remove(&customer)?;
        if let Some(seat) = self.seat_mut(freed) {
            seat.vacate();
        }
        debug!(%customer, seat = %freed, "Seat released");

        let promotion = self.line.pop_front().map(|next| {
            if let Some(seat) = self.seat_mut(freed) {
                seat.bind(next);
            }
            self.bindings.insert(next, freed);
            debug!(customer = %next, seat = %freed, "Promoted head of line");
            Promotion {
                customer: next,
                seat: freed,
            }
        });

        let moved = if promotion.is_some() {
            self.line.slots()
        } else {
            Vec::new()
        };

        Some(ReleaseOutcome {
            freed,
            promotion,
            moved,
        })
    }

    /// Remove `customer` from anywhere in line.
    ///
    /// Returns the recomputed slots of everyone still waiting, or `None`
    /// when the customer was not in line.
    pub fn remove_from_queue(&mut self, customer: CustomerId) -> Option<Vec<QueueSlot>> {
        if !self.line.remove(customer) {
            return None;
        }
        debug!(%customer, remaining = self.line.len(), "Removed from line");
        Some(self.line.slots())
    }

    /// Evict everyone waiting in line, in FIFO order. Seats are untouched.
    pub fn release_all_queued(&mut self) -> Vec<CustomerId> {
        let evicted = self.line.drain_all();
        if !evicted.is_empty() {
            info!(count = evicted.len(), "Evicted everyone waiting in line");
        }
        evicted
    }

    fn bind_free_seat(&mut self, customer: CustomerId) -> Option<SeatIndex> {
        let seat = self.seats.iter_mut().find(|seat| !seat.is_occupied())?;
        seat.bind(customer);
        let index = seat.index();
        self.bindings.insert(customer, index);
        Some(index)
    }

    fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut Seat> {
        self.seats.get_mut(index.0)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether one more arrival could be seated or queued.
    pub fn has_capacity(&self) -> bool {
        self.free_seat_count() > 0 || !self.line.is_full()
    }

    /// Seat held by `customer`, if any.
    pub fn seat_of(&self, customer: CustomerId) -> Option<SeatIndex> {
        self.bindings.get(&customer).copied()
    }

    /// Seat at `index`.
    pub fn seat(&self, index: SeatIndex) -> Option<&Seat> {
        self.seats.get(index.0)
    }

    /// Customer sitting at `index`, if any.
    pub fn occupant_of(&self, index: SeatIndex) -> Option<CustomerId> {
        self.seat(index).and_then(Seat::occupant)
    }

    /// All seats in index order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Zero-based line position of `customer`, if waiting.
    pub fn queue_position(&self, customer: CustomerId) -> Option<usize> {
        self.line.position_of(customer)
    }

    /// Current slot of `customer`, if waiting.
    pub fn queue_slot(&self, customer: CustomerId) -> Option<QueueSlot> {
        self.line.slot_of(customer)
    }

    /// Waypoint `customer` should stand at, if waiting.
    pub fn waypoint_of(&self, customer: CustomerId) -> Option<Point> {
        self.line.slot_of(customer).map(|slot| slot.waypoint)
    }

    /// Number of customers waiting.
    pub fn queue_len(&self) -> usize {
        self.line.len()
    }

    /// Configured line maximum.
    pub const fn max_queue_len(&self) -> usize {
        self.line.max_len()
    }

    /// Customers waiting, in FIFO order.
    pub fn queued(&self) -> Vec<CustomerId> {
        self.line.iter().collect()
    }

    /// Total number of seats.
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Number of unoccupied seats.
    pub fn free_seat_count(&self) -> usize {
        self.seats.iter().filter(|seat| !seat.is_occupied()).count()
    }

    /// Check every structural invariant of the floor.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn audit(&self) -> Result<(), FloorError> {
        for seat in &self.seats {
            if let Some(customer) = seat.occupant()
                && self.bindings.get(&customer) != Some(&seat.index())
            {
                return Err(FloorError::BrokenBackReference {
                    seat: seat.index(),
                    customer,
                });
            }
        }
        for (customer, index) in &self.bindings {
            if self.occupant_of(*index) != Some(*customer) {
                return Err(FloorError::DanglingBinding {
                    customer: *customer,
                    seat: *index,
                });
            }
            if self.line.position_of(*customer).is_some() {
                return Err(FloorError::SeatedAndQueued {
                    customer: *customer,
                });
            }
        }
        if self.line.len() > self.line.max_len() {
            warn!(len = self.line.len(), "Queue overflow detected during audit");
            return Err(FloorError::QueueOverflow {
                len: self.line.len(),
                max: self.line.max_len(),
            });
        }
        Ok(())
    }
}
