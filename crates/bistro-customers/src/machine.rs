//! The customer lifecycle state machine.
//!
//! Behavior per state is dispatched by matching on the state tag stored in
//! the [`Customer`] record. Each state has an entry hook, a per-tick update,
//! and an exit hook. A transition always runs the old state's exit hook
//! before the new state's entry hook.
//!
//! ```text
//! MovingToEntrance --seated--> MovingToSeat --arrived--> Ordering --served--> Eating
//!        |  \--queued--> MovingToLine --arrived--> WaitingInLine --promoted--^    |
//!        |                     |                        |                         v
//!        \--rejected--> AngryLeaving <--patience==0-----+--(Ordering too)      Paying
//!                            |                                                    |
//!                            v                                                    v
//!                          exit <-------------------------------------------- Leaving
//! ```
//!
//! Seat and queue mutations go through the [`SeatAllocator`]. When one
//! customer's transition moves *another* customer (a release promotes the
//! head of the line, a removal shifts waypoints), the move is queued as a
//! directive and applied to the affected record before the next customer
//! is updated, all within the same tick.

use std::collections::VecDeque;
use std::mem;

use bistro_floor::{AssignOutcome, Promotion, QueueSlot, ReleaseOutcome, SeatAllocator};
use bistro_types::{
    CustomerId, CustomerProfile, CustomerStateName, DepartureKind, FaultKind, LifecycleEvent,
    Order, OrderId, Point,
};
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::CustomerConfig;
use crate::customer::Customer;
use crate::error::CustomerError;
use crate::menu::Menu;
use crate::movement::Step;
use crate::pool::CustomerPool;

/// Fixed points every customer walks through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    /// Where arrivals head first.
    pub entrance: Point,
    /// Where departing customers walk to before despawning.
    pub exit: Point,
}

/// A move imposed on a customer by someone else's transition.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Directive {
    Promote(Promotion),
    Reposition(QueueSlot),
}

/// Everything the lifecycle produced during one tick or command.
#[derive(Debug, Default)]
pub struct Outbox {
    /// Lifecycle events in emission order.
    pub events: Vec<LifecycleEvent>,
    /// Absorbed faults in detection order.
    pub faults: Vec<FaultKind>,
    directives: VecDeque<Directive>,
}

impl Outbox {
    /// Take the accumulated events, leaving the outbox empty of them.
    pub fn take_events(&mut self) -> Vec<LifecycleEvent> {
        mem::take(&mut self.events)
    }

    /// Take the accumulated faults.
    pub fn take_faults(&mut self) -> Vec<FaultKind> {
        mem::take(&mut self.faults)
    }

    fn emit(&mut self, event: LifecycleEvent) {
        self.events.push(event);
    }

    fn fault(&mut self, kind: FaultKind) {
        self.faults.push(kind);
    }

    fn push_release(&mut self, outcome: ReleaseOutcome) {
        if let Some(promotion) = outcome.promotion {
            self.directives.push_back(Directive::Promote(promotion));
        }
        self.push_moves(outcome.moved);
    }

    fn push_moves(&mut self, moved: Vec<QueueSlot>) {
        self.directives
            .extend(moved.into_iter().map(Directive::Reposition));
    }
}

/// Shared collaborators borrowed for the duration of one lifecycle step.
pub struct LifecycleContext<'a> {
    /// Seat and queue owner.
    pub allocator: &'a mut SeatAllocator,
    /// Dish catalog for order generation.
    pub menu: &'a Menu,
    /// Random source for order generation.
    pub rng: &'a mut StdRng,
    /// Sink for events, faults, and directives.
    pub outbox: &'a mut Outbox,
}

/// Result of delivering an order to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The order matched and the customer started eating.
    Accepted,
    /// The delivered order is not the one the customer placed.
    Mismatched,
    /// The customer is not waiting for food.
    NotOrdering,
    /// The customer's patience ran out; they leave on their next update.
    PatienceExhausted,
    /// No active customer has this id.
    UnknownCustomer,
}

/// Drives every customer through the lifecycle.
#[derive(Debug, Clone)]
pub struct CustomerStateMachine {
    config: CustomerConfig,
    route: Route,
}

impl CustomerStateMachine {
    /// Create a state machine over the given route.
    pub const fn new(config: CustomerConfig, route: Route) -> Self {
        Self { config, route }
    }

    /// Shared tunables.
    pub const fn config(&self) -> &CustomerConfig {
        &self.config
    }

    /// Entrance and exit points.
    pub const fn route(&self) -> Route {
        self.route
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Spawn a customer at `spawn_point` and start them toward the entrance.
    pub fn admit(
        &self,
        pool: &mut CustomerPool,
        profile: CustomerProfile,
        spawn_point: Point,
        scripted: bool,
        outbox: &mut Outbox,
    ) -> CustomerId {
        let profile_id = profile.id.clone();
        let id = pool.spawn(profile, spawn_point, scripted);
        if let Some(customer) = pool.get_mut(id) {
            customer.movement.walk_to(self.route.entrance);
        }
        info!(customer = %id, profile = %profile_id, scripted, "Customer admitted");
        outbox.emit(LifecycleEvent::CustomerAdmitted {
            customer: id,
            profile: profile_id,
            scripted,
            entry_point: spawn_point,
        });
        id
    }

    /// Advance every active customer by `dt` seconds.
    ///
    /// Customers who walked out of the exit are despawned; their ids are
    /// returned oldest first.
    pub fn update_all(
        &self,
        pool: &mut CustomerPool,
        dt: f64,
        ctx: &mut LifecycleContext<'_>,
    ) -> Vec<CustomerId> {
        for id in pool.ids() {
            if let Some(customer) = pool.get_mut(id)
                && !customer.departed
            {
                self.update(customer, dt, ctx);
            }
            self.apply_directives(pool, ctx);
        }

        let departed: Vec<CustomerId> = pool
            .iter()
            .filter(|customer| customer.departed)
            .map(Customer::id)
            .collect();
        for id in &departed {
            pool.despawn(*id);
        }
        departed
    }

    /// Deliver `order` to `customer`.
    ///
    /// Spurious deliveries (wrong order, wrong state) change nothing. A
    /// customer whose patience is already empty refuses the food.
    pub fn serve(
        &self,
        pool: &mut CustomerPool,
        customer: CustomerId,
        order: OrderId,
        ctx: &mut LifecycleContext<'_>,
    ) -> ServeOutcome {
        let Some(record) = pool.get_mut(customer) else {
            debug!(%customer, "Delivery to unknown customer ignored");
            ctx.outbox.fault(FaultKind::StaleReference);
            return ServeOutcome::UnknownCustomer;
        };
        if record.state != CustomerStateName::Ordering {
            debug!(%customer, state = %record.state, "Delivery to non-ordering customer ignored");
            return ServeOutcome::NotOrdering;
        }
        let Some(placed) = record.order.clone() else {
            return ServeOutcome::NotOrdering;
        };
        if placed.id != order {
            debug!(%customer, expected = %placed.id, delivered = %order, "Mismatched delivery ignored");
            return ServeOutcome::Mismatched;
        }
        if record.patience.is_exhausted() {
            debug!(%customer, "Delivery arrived after patience ran out");
            return ServeOutcome::PatienceExhausted;
        }

        record.order_served = true;
        ctx.outbox.emit(LifecycleEvent::OrderServed {
            customer,
            order: placed,
        });
        self.transition(record, CustomerStateName::Eating, ctx);
        self.apply_directives(pool, ctx);
        ServeOutcome::Accepted
    }

    /// Evict everyone waiting in line and send them off angry.
    ///
    /// Seats are untouched. Returns the evicted ids in line order.
    pub fn release_all_queued(
        &self,
        pool: &mut CustomerPool,
        ctx: &mut LifecycleContext<'_>,
    ) -> Vec<CustomerId> {
        let evicted = ctx.allocator.release_all_queued();
        for id in &evicted {
            match pool.get_mut(*id) {
                Some(customer) => {
                    self.transition(customer, CustomerStateName::AngryLeaving, ctx);
                }
                None => {
                    warn!(customer = %id, "Evicted a queued customer with no record");
                    ctx.outbox.fault(FaultKind::StaleReference);
                }
            }
        }
        self.apply_directives(pool, ctx);
        evicted
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    fn update(&self, customer: &mut Customer, dt: f64, ctx: &mut LifecycleContext<'_>) {
        customer.state_elapsed += dt;
        let exhausted = if customer.state.drains_patience() {
            customer.patience.decay(dt)
        } else {
            customer.patience.is_exhausted()
        };
        match customer.state {
            CustomerStateName::MovingToEntrance => self.resolve_arrival(customer, ctx),
            CustomerStateName::MovingToLine => {
                if exhausted {
                    self.transition(customer, CustomerStateName::AngryLeaving, ctx);
                } else if self.walk(customer, dt) == Step::Arrived {
                    self.transition(customer, CustomerStateName::WaitingInLine, ctx);
                }
            }
            CustomerStateName::WaitingInLine => {
                if exhausted {
                    self.transition(customer, CustomerStateName::AngryLeaving, ctx);
                } else {
                    self.walk(customer, dt);
                }
            }
            CustomerStateName::MovingToSeat => {
                if self.walk(customer, dt) == Step::Arrived {
                    self.transition(customer, CustomerStateName::Ordering, ctx);
                }
            }
            CustomerStateName::Ordering => {
                if exhausted {
                    self.transition(customer, CustomerStateName::AngryLeaving, ctx);
                }
            }
            CustomerStateName::Eating => {
                if customer.state_elapsed >= customer.profile.eat_secs {
                    self.transition(customer, CustomerStateName::Paying, ctx);
                }
            }
            CustomerStateName::Paying => {
                if customer.state_elapsed >= self.config.payment_secs {
                    self.transition(customer, CustomerStateName::Leaving, ctx);
                }
            }
            CustomerStateName::Leaving | CustomerStateName::AngryLeaving => {
                if self.walk(customer, dt) != Step::Walking {
                    self.depart(customer, ctx);
                }
            }
        }
    }

    /// Move from the current state to `to`. Returns whether it happened.
    fn transition(
        &self,
        customer: &mut Customer,
        to: CustomerStateName,
        ctx: &mut LifecycleContext<'_>,
    ) -> bool {
        let from = customer.state;
        if from == to || from.is_leaving() {
            debug!(customer = %customer.id, %from, %to, "Transition ignored");
            ctx.outbox.fault(FaultKind::InvalidTransition);
            return false;
        }

        Self::exit(customer, from, ctx);
        customer.state = to;
        customer.state_elapsed = 0.0;
        debug!(customer = %customer.id, %from, %to, "State changed");
        ctx.outbox.emit(LifecycleEvent::StateChanged {
            customer: customer.id,
            from,
            to,
        });
        self.enter(customer, to, ctx);
        true
    }

    fn enter(&self, customer: &mut Customer, state: CustomerStateName, ctx: &mut LifecycleContext<'_>) {
        match state {
            CustomerStateName::MovingToEntrance => customer.movement.walk_to(self.route.entrance),
            CustomerStateName::MovingToLine => match ctx.allocator.waypoint_of(customer.id) {
                Some(waypoint) => customer.movement.walk_to(waypoint),
                None => {
                    warn!(customer = %customer.id, "Walking to the line without a slot");
                    ctx.outbox.fault(FaultKind::StaleReference);
                }
            },
            CustomerStateName::WaitingInLine => customer.patience_visible = true,
            CustomerStateName::MovingToSeat => {
                match customer.seat.and_then(|seat| ctx.allocator.seat(seat)) {
                    Some(seat) => customer.movement.walk_to(seat.stop_point()),
                    None => {
                        warn!(customer = %customer.id, "Walking to a seat that is not bound");
                        ctx.outbox.fault(FaultKind::StaleReference);
                    }
                }
            }
            CustomerStateName::Ordering => Self::enter_ordering(customer, ctx),
            CustomerStateName::Eating => {
                if let (Some(seat), Some(order)) = (customer.seat, customer.order.as_ref()) {
                    ctx.outbox.emit(LifecycleEvent::EatingStarted {
                        customer: customer.id,
                        seat,
                        dish: order.dish.clone(),
                    });
                }
            }
            CustomerStateName::Paying => {
                let amount = customer.order.as_ref().map_or(0, |order| order.cost);
                info!(customer = %customer.id, amount, "Payment completed");
                ctx.outbox.emit(LifecycleEvent::PaymentCompleted {
                    customer: customer.id,
                    amount,
                });
            }
            CustomerStateName::Leaving | CustomerStateName::AngryLeaving => {
                customer.patience_visible = false;
                Self::release_bindings(customer, ctx);
                customer.movement.walk_to(self.route.exit);
            }
        }
    }

    fn exit(customer: &mut Customer, state: CustomerStateName, ctx: &mut LifecycleContext<'_>) {
        match state {
            CustomerStateName::MovingToLine | CustomerStateName::MovingToSeat => {
                customer.movement.stop();
            }
            CustomerStateName::WaitingInLine => {
                customer.patience_visible = false;
                customer.movement.stop();
            }
            CustomerStateName::Ordering => {
                if !customer.order_served
                    && let Some(order) = customer.order.take()
                {
                    debug!(customer = %customer.id, order = %order.id, "Order withdrawn");
                    ctx.outbox.emit(LifecycleEvent::OrderWithdrawn {
                        customer: customer.id,
                        order: order.id,
                    });
                }
            }
            CustomerStateName::MovingToEntrance
            | CustomerStateName::Eating
            | CustomerStateName::Paying
            | CustomerStateName::Leaving
            | CustomerStateName::AngryLeaving => {}
        }
    }

    // -----------------------------------------------------------------------
    // State actions
    // -----------------------------------------------------------------------

    fn resolve_arrival(&self, customer: &mut Customer, ctx: &mut LifecycleContext<'_>) {
        match ctx.allocator.try_assign(customer.id) {
            AssignOutcome::SeatedDirectly { seat } => {
                customer.seat = Some(seat);
                ctx.outbox.emit(LifecycleEvent::CustomerSeated {
                    customer: customer.id,
                    seat,
                });
                self.transition(customer, CustomerStateName::MovingToSeat, ctx);
            }
            AssignOutcome::Queued { slot } => {
                ctx.outbox.emit(LifecycleEvent::CustomerQueued {
                    customer: customer.id,
                    position: slot.position,
                    waypoint: slot.waypoint,
                });
                self.transition(customer, CustomerStateName::MovingToLine, ctx);
            }
            AssignOutcome::Rejected => {
                info!(customer = %customer.id, "No seat and no room in line");
                ctx.outbox.fault(FaultKind::ResourceExhausted);
                ctx.outbox.emit(LifecycleEvent::CustomerRejected {
                    customer: customer.id,
                });
                self.transition(customer, CustomerStateName::AngryLeaving, ctx);
            }
        }
    }

    fn enter_ordering(customer: &mut Customer, ctx: &mut LifecycleContext<'_>) {
        customer.movement.stop();
        customer.patience.reset();
        customer.order_served = false;

        let Some(seat) = customer.seat else {
            warn!(customer = %customer.id, "Ordering without a seat");
            ctx.outbox.fault(FaultKind::StaleReference);
            return;
        };
        if let Some(bound) = ctx.allocator.seat(seat) {
            customer.position = bound.seat_point();
        }
        let Some(dish) = ctx.menu.random_dish(&mut *ctx.rng) else {
            ctx.outbox.fault(FaultKind::ConfigurationMissing);
            return;
        };
        let order = Order::for_dish(dish);
        debug!(customer = %customer.id, %seat, dish = %order.dish, "Order placed");
        ctx.outbox.emit(LifecycleEvent::OrderPlaced {
            customer: customer.id,
            seat,
            order: order.clone(),
        });
        customer.order = Some(order);
    }

    fn release_bindings(customer: &mut Customer, ctx: &mut LifecycleContext<'_>) {
        if customer.seat.take().is_some() {
            match ctx.allocator.release(customer.id) {
                Some(outcome) => ctx.outbox.push_release(outcome),
                None => {
                    warn!(customer = %customer.id, "Released a seat that was already free");
                    ctx.outbox.fault(FaultKind::StaleReference);
                }
            }
        } else if let Some(moved) = ctx.allocator.remove_from_queue(customer.id) {
            ctx.outbox.push_moves(moved);
        }
    }

    fn depart(&self, customer: &mut Customer, ctx: &mut LifecycleContext<'_>) {
        let kind = if customer.state == CustomerStateName::AngryLeaving {
            DepartureKind::Angry
        } else {
            DepartureKind::Satisfied
        };
        customer.departed = true;
        customer.position = self.route.exit;
        info!(customer = %customer.id, ?kind, "Customer departed");
        ctx.outbox.emit(LifecycleEvent::CustomerDeparted {
            customer: customer.id,
            kind,
        });
    }

    fn walk(&self, customer: &mut Customer, dt: f64) -> Step {
        customer.movement.step(
            &mut customer.position,
            customer.profile.speed,
            dt,
            self.config.arrival_tolerance,
        )
    }

    // -----------------------------------------------------------------------
    // Directives
    // -----------------------------------------------------------------------

    fn apply_directives(&self, pool: &mut CustomerPool, ctx: &mut LifecycleContext<'_>) {
        while let Some(directive) = ctx.outbox.directives.pop_front() {
            match directive {
                Directive::Promote(promotion) => self.promote(pool, promotion, ctx),
                Directive::Reposition(slot) => match pool.get_mut(slot.customer) {
                    Some(customer)
                        if matches!(
                            customer.state,
                            CustomerStateName::MovingToLine | CustomerStateName::WaitingInLine
                        ) =>
                    {
                        customer.movement.walk_to(slot.waypoint);
                    }
                    Some(_) => {}
                    None => ctx.outbox.fault(FaultKind::StaleReference),
                },
            }
        }
    }

    fn promote(&self, pool: &mut CustomerPool, promotion: Promotion, ctx: &mut LifecycleContext<'_>) {
        let Promotion { customer: id, seat } = promotion;
        let Some(customer) = pool.get_mut(id) else {
            warn!(customer = %id, %seat, "Promoted a customer with no record, freeing the seat");
            ctx.outbox.fault(FaultKind::StaleReference);
            if let Some(outcome) = ctx.allocator.release(id) {
                ctx.outbox.push_release(outcome);
            }
            return;
        };

        customer.seat = Some(seat);
        debug!(customer = %id, %seat, "Promoted from the line");
        ctx.outbox.emit(LifecycleEvent::CustomerPromoted { customer: id, seat });
        let next = if customer.patience.is_exhausted() {
            CustomerStateName::AngryLeaving
        } else {
            CustomerStateName::MovingToSeat
        };
        self.transition(customer, next, ctx);
    }
}

/// Remove every customer immediately, clearing the line and their seats.
///
/// No departure events are emitted. Returns the removed ids, oldest first.
pub fn despawn_all(pool: &mut CustomerPool, allocator: &mut SeatAllocator) -> Vec<CustomerId> {
    allocator.release_all_queued();
    for customer in pool.iter_mut() {
        if customer.seat.take().is_some() {
            allocator.release(customer.id);
        }
        customer.movement.stop();
    }
    let removed = pool.despawn_all();
    info!(count = removed.len(), "Despawned every customer");
    removed
}

/// Check that every customer's seat binding agrees with the allocator.
///
/// # Errors
///
/// Returns [`CustomerError::SeatMismatch`] for the first disagreement.
pub fn verify_bindings(pool: &CustomerPool, allocator: &SeatAllocator) -> Result<(), CustomerError> {
    for customer in pool.iter() {
        if allocator.seat_of(customer.id) != customer.seat {
            return Err(CustomerError::SeatMismatch {
                customer: customer.id,
                seat: customer.seat,
            });
        }
    }
    for seat in allocator.seats() {
        if let Some(occupant) = seat.occupant()
            && pool.get(occupant).and_then(Customer::seat) != Some(seat.index())
        {
            return Err(CustomerError::SeatMismatch {
                customer: occupant,
                seat: Some(seat.index()),
            });
        }
    }
    Ok(())
}
