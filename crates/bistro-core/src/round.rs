//! Service round orchestration: counters, the round timer, and the drain.
//!
//! The [`RoundController`] follows the outer phase signal:
//!
//! - **Opening** resets counters and the timer and shows the timer.
//! - **Operating** accumulates elapsed time and reports expiry once.
//! - **Closing** waits, checking once per tick, until no customer is left.
//!
//! Counters only change through explicit calls from the lifecycle, so they
//! stay correct when customers are removed mid-visit.

use bistro_types::{LifecycleEvent, ServicePhase};
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{ClockError, RoundClock};
use crate::schedule::DrainWait;

/// Per-round tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundCounters {
    /// Customers who sat down and ordered.
    pub visited: u32,
    /// Customers who paid.
    pub served: u32,
    /// Money taken this round.
    pub earnings: u64,
}

/// Owner of the round state.
#[derive(Debug, Clone)]
pub struct RoundController {
    clock: RoundClock,
    phase: Option<ServicePhase>,
    counters: RoundCounters,
    total_earnings: u64,
    earnings_backup: u64,
    drain: DrainWait,
}

impl RoundController {
    /// Create a controller for rounds of `limit_secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidLimit`] for a non-positive limit.
    pub fn new(limit_secs: f64) -> Result<Self, ClockError> {
        Ok(Self {
            clock: RoundClock::new(limit_secs)?,
            phase: None,
            counters: RoundCounters::default(),
            total_earnings: 0,
            earnings_backup: 0,
            drain: DrainWait::Idle,
        })
    }

    // -----------------------------------------------------------------------
    // Phase handling
    // -----------------------------------------------------------------------

    /// Enter Opening: reset the round and show the timer.
    pub fn begin_opening(&mut self) -> LifecycleEvent {
        self.phase = Some(ServicePhase::Opening);
        self.reset_round();
        info!(limit_secs = self.clock.limit(), "Round opening");
        LifecycleEvent::RoundTimerShown {
            limit_secs: self.clock.limit(),
        }
    }

    /// Enter Operating.
    pub fn begin_operating(&mut self) {
        self.phase = Some(ServicePhase::Operating);
        info!("Round operating");
    }

    /// Enter Closing and start waiting for the floor to empty.
    pub fn begin_closing(&mut self) {
        self.phase = Some(ServicePhase::Closing);
        self.drain.arm();
        info!(
            visited = self.counters.visited,
            served = self.counters.served,
            earnings = self.counters.earnings,
            "Round closing, waiting for customers to leave"
        );
    }

    /// Advance the round by `dt` seconds.
    ///
    /// The timer only runs while Operating and not paused. The drain check
    /// only runs while Closing.
    pub fn tick(&mut self, dt: f64, timer_paused: bool, active_customers: usize) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();
        if self.phase == Some(ServicePhase::Operating) && !timer_paused && self.clock.advance(dt) {
            info!(elapsed_secs = self.clock.elapsed(), "Round timer expired");
            events.push(LifecycleEvent::RoundTimerExpired {
                elapsed_secs: self.clock.elapsed(),
            });
        }
        if self.phase == Some(ServicePhase::Closing) && self.drain.poll(active_customers) {
            info!(
                served = self.counters.served,
                visited = self.counters.visited,
                "All customers have departed"
            );
            events.push(LifecycleEvent::AllCustomersDeparted {
                served: self.counters.served,
                visited: self.counters.visited,
            });
        }
        events
    }

    /// Reinitialize the round in place, counting the customer already
    /// present as the first visit.
    pub fn restart(&mut self) {
        self.reset_round();
        self.counters.visited = 1;
        info!("Round restarted");
    }

    /// Jump the timer to its limit; it expires on the next Operating tick.
    pub const fn force_end(&mut self) {
        self.clock.force_end();
    }

    fn reset_round(&mut self) {
        self.counters = RoundCounters::default();
        self.clock.start();
        self.drain.reset();
        self.earnings_backup = self.total_earnings;
    }

    // -----------------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------------

    /// A customer sat down and ordered.
    pub const fn record_visit(&mut self) {
        self.counters.visited = self.counters.visited.saturating_add(1);
    }

    /// A customer paid `amount`.
    pub fn record_payment(&mut self, amount: u32) {
        let amount = u64::from(amount);
        self.counters.served = self.counters.served.saturating_add(1);
        self.counters.earnings = self.counters.earnings.saturating_add(amount);
        self.total_earnings = self.total_earnings.saturating_add(amount);
        debug!(amount, total = self.total_earnings, "Earnings credited");
    }

    /// Overwrite the wallet, e.g. after loading a save.
    pub const fn set_total_earnings(&mut self, total: u64) {
        self.total_earnings = total;
    }

    /// Roll the wallet back to its value when the round opened.
    pub fn restore_earnings_before_round(&mut self) {
        info!(
            from = self.total_earnings,
            to = self.earnings_backup,
            "Restoring earnings to round start"
        );
        self.total_earnings = self.earnings_backup;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current service phase, `None` before the first opening.
    pub const fn phase(&self) -> Option<ServicePhase> {
        self.phase
    }

    /// This round's tallies.
    pub const fn counters(&self) -> RoundCounters {
        self.counters
    }

    /// Earnings across all rounds.
    pub const fn total_earnings(&self) -> u64 {
        self.total_earnings
    }

    /// The round timer.
    pub const fn clock(&self) -> &RoundClock {
        &self.clock
    }

    /// Whether Closing is still waiting for customers to leave.
    pub const fn is_draining(&self) -> bool {
        self.drain.is_pending()
    }

    /// Whether this round's drain has completed.
    pub const fn is_drained(&self) -> bool {
        matches!(self.drain, DrainWait::Complete)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn expired(events: &[LifecycleEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::RoundTimerExpired { .. }))
            .count()
    }

    #[test]
    fn timer_expires_once_at_limit() {
        let mut round = RoundController::new(300.0).unwrap();
        round.begin_opening();
        round.begin_operating();

        let total: usize = (0..650).map(|_| expired(&round.tick(0.5, false, 0))).sum();
        assert_eq!(total, 1);
        assert_eq!(round.clock().elapsed(), 300.0);
        assert!(!round.clock().is_running());
    }

    #[test]
    fn timer_does_not_run_outside_operating_or_when_paused() {
        let mut round = RoundController::new(10.0).unwrap();
        round.begin_opening();
        round.tick(5.0, false, 0);
        assert_eq!(round.clock().elapsed(), 0.0);

        round.begin_operating();
        round.tick(5.0, true, 0);
        assert_eq!(round.clock().elapsed(), 0.0);
        round.tick(5.0, false, 0);
        assert_eq!(round.clock().elapsed(), 5.0);
    }

    #[test]
    fn drain_waits_for_empty_floor_and_signals_once() {
        let mut round = RoundController::new(10.0).unwrap();
        round.begin_opening();
        round.begin_operating();
        round.begin_closing();
        assert!(round.tick(0.5, false, 2).is_empty());
        assert!(round.is_draining());

        let events = round.tick(0.5, false, 0);
        assert!(matches!(events.as_slice(), [LifecycleEvent::AllCustomersDeparted { .. }]));
        assert!(round.tick(0.5, false, 0).is_empty());
        assert!(round.is_drained());
    }

    #[test]
    fn counters_reset_at_opening_but_wallet_persists() {
        let mut round = RoundController::new(10.0).unwrap();
        round.begin_opening();
        round.record_visit();
        round.record_payment(12);
        assert_eq!(
            round.counters(),
            RoundCounters {
                visited: 1,
                served: 1,
                earnings: 12
            }
        );

        round.begin_opening();
        assert_eq!(round.counters(), RoundCounters::default());
        assert_eq!(round.total_earnings(), 12);
    }

    #[test]
    fn restore_rolls_wallet_back_to_round_start() {
        let mut round = RoundController::new(10.0).unwrap();
        round.set_total_earnings(100);
        round.begin_opening();
        round.record_payment(30);
        assert_eq!(round.total_earnings(), 130);
        round.restore_earnings_before_round();
        assert_eq!(round.total_earnings(), 100);
    }

    #[test]
    fn restart_counts_present_customer() {
        let mut round = RoundController::new(10.0).unwrap();
        round.begin_opening();
        round.begin_operating();
        round.tick(4.0, false, 0);
        round.record_visit();
        round.record_visit();

        round.restart();
        assert_eq!(round.counters().visited, 1);
        assert_eq!(round.clock().elapsed(), 0.0);
        assert_eq!(round.phase(), Some(ServicePhase::Operating));
    }

    #[test]
    fn force_end_expires_next_operating_tick() {
        let mut round = RoundController::new(300.0).unwrap();
        round.begin_opening();
        round.begin_operating();
        round.force_end();
        assert_eq!(expired(&round.tick(0.25, false, 0)), 1);
    }
}
