//! The restaurant facade: one instance of every component, wired together.
//!
//! [`Restaurant::run_tick`] advances the simulation in a fixed order:
//!
//! 1. Admission counts down and may admit one arrival.
//! 2. Every customer runs one lifecycle update (promotions and line shifts
//!    are applied to the affected customers in the same pass).
//! 3. Lifecycle events update the round counters; faults are tallied.
//! 4. The round advances its timer or polls its drain.
//!
//! Phase changes, deliveries, and operator commands are whole calls made
//! between ticks. Their events are returned with the next tick summary.

use std::collections::BTreeMap;

use bistro_customers::{
    Customer, CustomerPool, CustomerStateMachine, LifecycleContext, Menu, Outbox, Route,
    ServeOutcome, despawn_all, validate_profile, verify_bindings,
};
use bistro_floor::SeatAllocator;
use bistro_types::{
    CustomerId, CustomerStateName, FaultKind, LifecycleEvent, OrderId, ServicePhase,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::admission::{AdmissionController, AdmissionTick};
use crate::clock::{ClockError, TickCounter, check_step};
use crate::config::BistroConfig;
use crate::error::CoreError;
use crate::kitchen::PendingOrder;
use crate::operator::OperatorCommand;
use crate::round::{RoundController, RoundCounters};

/// Offset separating the order stream from the arrival stream.
const ORDER_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Phase the tick ran in.
    pub phase: Option<ServicePhase>,
    /// Events since the previous summary, in emission order.
    pub events: Vec<LifecycleEvent>,
    /// Customers who walked out this tick.
    pub departed: Vec<CustomerId>,
    /// Active customers after the tick.
    pub active_customers: usize,
    /// Line length after the tick.
    pub queue_len: usize,
    /// Round time elapsed after the tick.
    pub elapsed_secs: f64,
}

/// The simulation core.
#[derive(Debug)]
pub struct Restaurant {
    allocator: SeatAllocator,
    pool: CustomerPool,
    machine: CustomerStateMachine,
    menu: Menu,
    admission: AdmissionController,
    round: RoundController,
    order_rng: StdRng,
    outbox: Outbox,
    ticks: TickCounter,
    faults: BTreeMap<FaultKind, u64>,
    pending_events: Vec<LifecycleEvent>,
}

impl Restaurant {
    /// Build a restaurant from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the config is invalid, a profile has bad
    /// tunables, the menu is unusable, or the floor has no seats.
    pub fn new(config: &BistroConfig) -> Result<Self, CoreError> {
        config.validate()?;
        for profile in &config.profiles {
            validate_profile(profile)?;
        }
        let menu = Menu::new(config.menu.clone())?;
        let allocator = SeatAllocator::new(&config.floor.seats, config.floor.queue)?;
        let round = RoundController::new(config.round.time_limit_secs)?;
        let route = Route {
            entrance: config.floor.entrance,
            exit: config.floor.exit,
        };
        let seed = config.simulation.seed;
        let admission = AdmissionController::new(
            config.admission.clone(),
            config.floor.spawn_points.clone(),
            &config.profiles,
            seed,
        );

        info!(
            seed,
            seats = allocator.seat_count(),
            max_queue_len = allocator.max_queue_len(),
            profiles = config.profiles.len(),
            dishes = menu.dishes().len(),
            "Restaurant built"
        );

        Ok(Self {
            allocator,
            pool: CustomerPool::new(config.customers.pool_capacity, config.customers.pool_max_retained),
            machine: CustomerStateMachine::new(config.customers.clone(), route),
            menu,
            admission,
            round,
            order_rng: StdRng::seed_from_u64(seed ^ ORDER_SEED_OFFSET),
            outbox: Outbox::default(),
            ticks: TickCounter::default(),
            faults: BTreeMap::new(),
            pending_events: Vec::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Phase signal
    // -----------------------------------------------------------------------

    /// Follow the outer phase signal. Returns whether the change applied.
    ///
    /// Re-entering the current phase is ignored. Leaving Closing before
    /// every customer has departed is refused.
    pub fn set_phase(&mut self, phase: ServicePhase) -> bool {
        let current = self.round.phase();
        if current == Some(phase) {
            debug!(?phase, "Phase unchanged");
            return false;
        }
        if current == Some(ServicePhase::Closing) && self.round.is_draining() {
            warn!(requested = ?phase, active = self.pool.len(), "Refusing to leave Closing before the floor is empty");
            return false;
        }

        match phase {
            ServicePhase::Opening => {
                let shown = self.round.begin_opening();
                self.pending_events.push(shown);
            }
            ServicePhase::Operating => {
                self.round.begin_operating();
                self.admission.start();
            }
            ServicePhase::Closing => {
                self.admission.stop();
                let mut ctx = LifecycleContext {
                    allocator: &mut self.allocator,
                    menu: &self.menu,
                    rng: &mut self.order_rng,
                    outbox: &mut self.outbox,
                };
                let evicted = self.machine.release_all_queued(&mut self.pool, &mut ctx);
                if !evicted.is_empty() {
                    info!(count = evicted.len(), "Evicted the waiting line at closing");
                }
                self.absorb();
                self.round.begin_closing();
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the whole simulation by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] for a negative or non-finite step, or if the
    /// tick counter overflows.
    pub fn run_tick(&mut self, dt: f64) -> Result<TickSummary, ClockError> {
        let dt = check_step(dt)?;
        let tick = self.ticks.advance()?;

        match self.admission.tick(dt, &self.allocator, self.pool.len()) {
            AdmissionTick::Spawn(request) => {
                self.machine.admit(
                    &mut self.pool,
                    request.profile,
                    request.spawn_point,
                    false,
                    &mut self.outbox,
                );
            }
            AdmissionTick::Skipped(reason) if reason.is_configuration_gap() => {
                self.record_fault(FaultKind::ConfigurationMissing);
            }
            AdmissionTick::Skipped(_) | AdmissionTick::Waiting | AdmissionTick::Inactive => {}
        }

        let mut ctx = LifecycleContext {
            allocator: &mut self.allocator,
            menu: &self.menu,
            rng: &mut self.order_rng,
            outbox: &mut self.outbox,
        };
        let departed = self.machine.update_all(&mut self.pool, dt, &mut ctx);
        self.absorb();

        let round_events = self
            .round
            .tick(dt, self.admission.is_reduced_mode(), self.pool.len());
        self.pending_events.extend(round_events);

        Ok(TickSummary {
            tick,
            phase: self.round.phase(),
            events: std::mem::take(&mut self.pending_events),
            departed,
            active_customers: self.pool.len(),
            queue_len: self.allocator.queue_len(),
            elapsed_secs: self.round.clock().elapsed(),
        })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Deliver `order` to `customer`.
    pub fn serve(&mut self, customer: CustomerId, order: OrderId) -> ServeOutcome {
        let mut ctx = LifecycleContext {
            allocator: &mut self.allocator,
            menu: &self.menu,
            rng: &mut self.order_rng,
            outbox: &mut self.outbox,
        };
        let outcome = self.machine.serve(&mut self.pool, customer, order, &mut ctx);
        self.absorb();
        outcome
    }

    /// Admit one customer now, bypassing the arrival timer and gates.
    ///
    /// Returns `None` when spawn points or profiles are missing.
    pub fn spawn_now(&mut self, scripted: bool) -> Option<CustomerId> {
        match self.admission.spawn_now() {
            Ok(request) => {
                let id = self.machine.admit(
                    &mut self.pool,
                    request.profile,
                    request.spawn_point,
                    scripted,
                    &mut self.outbox,
                );
                self.absorb();
                Some(id)
            }
            Err(reason) => {
                warn!(?reason, "Direct spawn skipped");
                self.record_fault(FaultKind::ConfigurationMissing);
                None
            }
        }
    }

    /// Apply an operator command.
    pub fn apply(&mut self, command: OperatorCommand) {
        info!(?command, "Operator command");
        match command {
            OperatorCommand::EmptyAllPatience => self.pool.empty_all_patience(),
            OperatorCommand::SpawnNow => {
                self.spawn_now(false);
            }
            OperatorCommand::SpawnScripted => {
                self.spawn_now(true);
            }
            OperatorCommand::StartAdmission => self.admission.start(),
            OperatorCommand::StopAdmission => self.admission.stop(),
            OperatorCommand::SetReducedMode(reduced) => self.admission.set_reduced_mode(reduced),
            OperatorCommand::RestartRound => {
                self.round.restart();
                self.admission.stop();
                self.admission.start();
            }
            OperatorCommand::DespawnAll => {
                despawn_all(&mut self.pool, &mut self.allocator);
            }
            OperatorCommand::ForceEndRound => self.round.force_end(),
            OperatorCommand::ForceClose => {
                self.round.force_end();
                self.pool.empty_all_patience();
            }
            OperatorCommand::RestoreEarnings => self.round.restore_earnings_before_round(),
        }
    }

    /// Overwrite the earnings wallet, e.g. after loading a save.
    pub const fn set_total_earnings(&mut self, total: u64) {
        self.round.set_total_earnings(total);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Number of customers in the restaurant, including those leaving.
    pub fn active_count(&self) -> usize {
        self.pool.len()
    }

    /// Round time elapsed.
    pub const fn elapsed_secs(&self) -> f64 {
        self.round.clock().elapsed()
    }

    /// Round time limit.
    pub const fn limit_secs(&self) -> f64 {
        self.round.clock().limit()
    }

    /// Today's visited, served, and earnings tallies.
    pub const fn counters(&self) -> RoundCounters {
        self.round.counters()
    }

    /// Earnings across all rounds.
    pub const fn total_earnings(&self) -> u64 {
        self.round.total_earnings()
    }

    /// Current line length.
    pub fn queue_len(&self) -> usize {
        self.allocator.queue_len()
    }

    /// Configured line maximum.
    pub const fn max_queue_len(&self) -> usize {
        self.allocator.max_queue_len()
    }

    /// Current phase, `None` before the first opening.
    pub const fn phase(&self) -> Option<ServicePhase> {
        self.round.phase()
    }

    /// Whether the arrival loop is running.
    pub const fn is_admitting(&self) -> bool {
        self.admission.is_active()
    }

    /// Whether Closing is waiting for customers to leave.
    pub const fn is_draining(&self) -> bool {
        self.round.is_draining()
    }

    /// Whether the oldest customer is eating.
    pub fn is_first_customer_eating(&self) -> bool {
        self.pool.is_first_customer_eating()
    }

    /// Last tick number.
    pub const fn tick(&self) -> u64 {
        self.ticks.tick()
    }

    /// Absorbed faults by kind.
    pub const fn fault_counts(&self) -> &BTreeMap<FaultKind, u64> {
        &self.faults
    }

    /// Look up a customer.
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.pool.get(id)
    }

    /// Active customers, oldest first.
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.pool.iter()
    }

    /// The seat and line owner.
    pub const fn floor(&self) -> &SeatAllocator {
        &self.allocator
    }

    /// Orders placed and not yet served.
    pub fn pending_orders(&self) -> Vec<PendingOrder> {
        self.pool
            .iter()
            .filter(|customer| customer.state() == CustomerStateName::Ordering)
            .filter(|customer| !customer.is_order_served())
            .filter_map(|customer| {
                customer.order().map(|order| PendingOrder {
                    customer: customer.id(),
                    order: order.clone(),
                })
            })
            .collect()
    }

    /// Take events produced by commands since the last tick.
    pub fn take_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check floor invariants and customer-seat agreement.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant.
    pub fn audit(&self) -> Result<(), CoreError> {
        self.allocator.audit()?;
        verify_bindings(&self.pool, &self.allocator)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn absorb(&mut self) {
        for event in self.outbox.take_events() {
            match &event {
                LifecycleEvent::OrderPlaced { .. } => self.round.record_visit(),
                LifecycleEvent::PaymentCompleted { amount, .. } => self.round.record_payment(*amount),
                _ => {}
            }
            self.pending_events.push(event);
        }
        for fault in self.outbox.take_faults() {
            self.record_fault(fault);
        }
    }

    fn record_fault(&mut self, kind: FaultKind) {
        debug!(%kind, "Fault absorbed");
        let count = self.faults.entry(kind).or_default();
        *count = count.saturating_add(1);
    }
}
