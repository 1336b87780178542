//! Service-day loop with operator controls.
//!
//! [`run_service_day`] drives one day of service on top of
//! [`Restaurant::run_tick`]:
//!
//! - **Phase flow**: Opening, then Operating until the round timer
//!   expires, then Closing until the last customer leaves.
//! - **Kitchen**: after each tick the [`Kitchen`] sees the pending orders
//!   and its deliveries are served.
//! - **Pause/resume** and **operator stop** via [`OperatorState`].
//! - **Operator commands** are applied between ticks, in submission order.
//! - **Tick cap**: a day that has not drained after the configured number
//!   of ticks is wound down so the next day can open.

use std::collections::BTreeMap;
use std::sync::Arc;

use bistro_types::{FaultKind, LifecycleEvent, ServicePhase};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::ClockError;
use crate::kitchen::Kitchen;
use crate::operator::{DayEndReason, OperatorCommand, OperatorState};
use crate::restaurant::{Restaurant, TickSummary};
use crate::round::RoundCounters;

/// Errors that can occur during a service day.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick could not run.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Outcome of one service day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    /// Day number, starting at 1.
    pub day: u32,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end.
    pub ended_at: DateTime<Utc>,
    /// Why the day ended.
    pub end_reason: DayEndReason,
    /// Ticks run during the day.
    pub ticks: u64,
    /// The round's visited, served, and earnings tallies.
    pub counters: RoundCounters,
    /// Wallet balance after the day.
    pub total_earnings: u64,
    /// Absorbed faults so far, by kind.
    pub faults: BTreeMap<FaultKind, u64>,
}

/// Callback invoked after each tick completes.
///
/// Implementations can log summaries, feed a presentation layer, or
/// record traces for tests.
pub trait TickCallback: Send {
    /// Called after a tick and its deliveries.
    fn on_tick(&mut self, summary: &TickSummary, restaurant: &Restaurant);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _restaurant: &Restaurant) {}
}

/// Run one service day until the floor drains, the tick cap hits, or the
/// operator stops the run.
///
/// # Errors
///
/// Returns [`RunnerError`] if `dt` is not a valid step or the tick
/// counter overflows.
pub async fn run_service_day(
    day: u32,
    restaurant: &mut Restaurant,
    kitchen: &mut dyn Kitchen,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
    dt: f64,
) -> Result<DayReport, RunnerError> {
    let started_at = Utc::now();
    let mut ticks: u64 = 0;

    restaurant.set_phase(ServicePhase::Opening);
    restaurant.set_phase(ServicePhase::Operating);
    info!(
        day,
        limit_secs = restaurant.limit_secs(),
        max_ticks_per_day = operator.max_ticks_per_day(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Service day starting"
    );

    let end_reason = loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Service paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Service resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!(day, "Operator stop requested");
            break DayEndReason::OperatorStop;
        }

        for command in operator.drain_commands().await {
            restaurant.apply(command);
        }

        // --- Execute tick ---
        let summary = restaurant.run_tick(dt)?;
        ticks = ticks.saturating_add(1);

        // --- Kitchen ---
        for delivery in kitchen.prepare(dt, &restaurant.pending_orders()) {
            let outcome = restaurant.serve(delivery.customer, delivery.order);
            debug!(customer = %delivery.customer, order = %delivery.order, ?outcome, "Delivery");
        }

        callback.on_tick(&summary, restaurant);

        if summary
            .events
            .iter()
            .any(|event| matches!(event, LifecycleEvent::RoundTimerExpired { .. }))
        {
            restaurant.set_phase(ServicePhase::Closing);
        }

        if summary
            .events
            .iter()
            .any(|event| matches!(event, LifecycleEvent::AllCustomersDeparted { .. }))
        {
            break DayEndReason::Drained;
        }

        // --- Check tick cap (after tick) ---
        if operator.tick_cap_reached(ticks) {
            warn!(day, ticks, active = restaurant.active_count(), "Tick cap reached, winding the day down");
            if let Some(last) = wind_down(restaurant, dt)? {
                callback.on_tick(&last, restaurant);
            }
            break DayEndReason::TickCapReached;
        }

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    };

    let report = DayReport {
        day,
        started_at,
        ended_at: Utc::now(),
        end_reason,
        ticks,
        counters: restaurant.counters(),
        total_earnings: restaurant.total_earnings(),
        faults: restaurant.fault_counts().clone(),
    };
    log_day_end(&report);
    Ok(report)
}

/// Empty the floor and finish Closing so the next day can open.
fn wind_down(restaurant: &mut Restaurant, dt: f64) -> Result<Option<TickSummary>, RunnerError> {
    restaurant.apply(OperatorCommand::StopAdmission);
    restaurant.apply(OperatorCommand::DespawnAll);
    restaurant.set_phase(ServicePhase::Closing);
    if restaurant.is_draining() {
        return Ok(Some(restaurant.run_tick(dt)?));
    }
    Ok(None)
}

/// Log the end-of-day summary.
pub fn log_day_end(report: &DayReport) {
    info!(
        day = report.day,
        reason = ?report.end_reason,
        ticks = report.ticks,
        visited = report.counters.visited,
        served = report.counters.served,
        earnings = report.counters.earnings,
        total_earnings = report.total_earnings,
        "Service day ended"
    );
    if !report.faults.is_empty() {
        warn!(faults = ?report.faults, "Faults absorbed during the run");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BistroConfig;
    use crate::kitchen::StubKitchen;

    fn quick_config() -> BistroConfig {
        let mut config = BistroConfig::default();
        config.round.time_limit_secs = 20.0;
        config.admission.initial_delay_secs = 0.5;
        config.admission.min_interval_secs = 1.0;
        config.admission.max_interval_secs = 2.0;
        config.admission.max_customers = 4;
        config
    }

    struct Recorder {
        ticks: Vec<u64>,
        max_active: usize,
    }

    impl TickCallback for Recorder {
        fn on_tick(&mut self, summary: &TickSummary, restaurant: &Restaurant) {
            self.ticks.push(summary.tick);
            self.max_active = self.max_active.max(summary.active_customers);
            restaurant.audit().unwrap();
        }
    }

    #[tokio::test]
    async fn day_runs_to_drain() {
        let config = quick_config();
        let mut restaurant = Restaurant::new(&config).unwrap();
        let mut kitchen = StubKitchen::new(1.0);
        let operator = Arc::new(OperatorState::new(0, 100_000));
        let mut recorder = Recorder {
            ticks: Vec::new(),
            max_active: 0,
        };

        let report = run_service_day(1, &mut restaurant, &mut kitchen, &operator, &mut recorder, 0.25)
            .await
            .unwrap();

        assert_eq!(report.end_reason, DayEndReason::Drained);
        assert_eq!(restaurant.active_count(), 0);
        assert_eq!(restaurant.phase(), Some(ServicePhase::Closing));
        assert!(!restaurant.is_draining());
        assert!(report.counters.visited > 0);
        assert!(report.counters.served <= report.counters.visited);
        assert!(recorder.max_active <= 4);
        assert_eq!(u64::try_from(recorder.ticks.len()).unwrap(), report.ticks);
    }

    #[tokio::test]
    async fn tick_cap_winds_the_day_down() {
        let config = quick_config();
        let mut restaurant = Restaurant::new(&config).unwrap();
        let mut kitchen = StubKitchen::new(1.0);
        let operator = Arc::new(OperatorState::new(0, 10));

        let report = run_service_day(1, &mut restaurant, &mut kitchen, &operator, &mut NoOpCallback, 0.25)
            .await
            .unwrap();

        assert_eq!(report.end_reason, DayEndReason::TickCapReached);
        assert_eq!(report.ticks, 10);
        assert_eq!(restaurant.active_count(), 0);
        assert!(!restaurant.is_draining());

        // The next day opens cleanly.
        assert!(restaurant.set_phase(ServicePhase::Opening));
    }

    #[tokio::test]
    async fn stop_before_first_tick() {
        let config = quick_config();
        let mut restaurant = Restaurant::new(&config).unwrap();
        let mut kitchen = StubKitchen::new(1.0);
        let operator = Arc::new(OperatorState::new(0, 100));
        operator.request_stop();

        let report = run_service_day(1, &mut restaurant, &mut kitchen, &operator, &mut NoOpCallback, 0.25)
            .await
            .unwrap();

        assert_eq!(report.end_reason, DayEndReason::OperatorStop);
        assert_eq!(report.ticks, 0);
    }

    #[tokio::test]
    async fn queued_commands_apply_before_the_tick() {
        let mut config = quick_config();
        config.admission.initial_delay_secs = 1000.0;
        let mut restaurant = Restaurant::new(&config).unwrap();
        let mut kitchen = StubKitchen::new(1.0);
        let operator = Arc::new(OperatorState::new(0, 1));
        operator.submit(OperatorCommand::SpawnNow).await;
        operator.submit(OperatorCommand::SpawnNow).await;

        let report = run_service_day(1, &mut restaurant, &mut kitchen, &operator, &mut NoOpCallback, 0.25)
            .await
            .unwrap();

        // Both spawned customers were cleared by the wind-down.
        assert_eq!(report.end_reason, DayEndReason::TickCapReached);
        assert_eq!(restaurant.active_count(), 0);
        assert!(operator.drain_commands().await.is_empty());
    }

    #[test]
    fn report_serializes_faults_by_name() {
        let mut faults = BTreeMap::new();
        faults.insert(FaultKind::ResourceExhausted, 2);
        let report = DayReport {
            day: 1,
            started_at: Utc::now(),
            ended_at: Utc::now(),
            end_reason: DayEndReason::Drained,
            ticks: 5,
            counters: RoundCounters::default(),
            total_earnings: 0,
            faults,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["faults"]["resource_exhausted"], 2);
        assert_eq!(json["end_reason"], "drained");
    }
}
