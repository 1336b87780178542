//! Tick callback that writes lifecycle events to the log.
//!
//! Every event is emitted as one JSON line at debug level, so
//! `RUST_LOG=bistro_engine=debug` yields a replayable trace. Round
//! boundaries and drains are also logged at info.

use bistro_core::runner::TickCallback;
use bistro_core::{Restaurant, TickSummary};
use bistro_types::LifecycleEvent;
use tracing::{debug, info, warn};

/// Callback that logs each tick's events.
pub struct EventLogCallback {
    /// Log a floor summary every this many ticks (0 = never).
    summary_every: u64,
}

impl EventLogCallback {
    /// Create a callback that also logs a floor summary every
    /// `summary_every` ticks.
    pub const fn new(summary_every: u64) -> Self {
        Self { summary_every }
    }
}

impl TickCallback for EventLogCallback {
    fn on_tick(&mut self, summary: &TickSummary, restaurant: &Restaurant) {
        for event in &summary.events {
            match serde_json::to_string(event) {
                Ok(json) => debug!(tick = summary.tick, event = %json, "Lifecycle event"),
                Err(e) => warn!(tick = summary.tick, error = %e, "failed to serialize event"),
            }
            match event {
                LifecycleEvent::RoundTimerExpired { elapsed_secs } => {
                    info!(tick = summary.tick, elapsed_secs, "Round over, closing");
                }
                LifecycleEvent::AllCustomersDeparted { served, visited } => {
                    info!(tick = summary.tick, served, visited, "Floor drained");
                }
                _ => {}
            }
        }

        if summary.tick.checked_rem(self.summary_every) == Some(0) {
            let counters = restaurant.counters();
            info!(
                tick = summary.tick,
                phase = ?summary.phase,
                active = summary.active_customers,
                queue_len = summary.queue_len,
                elapsed_secs = summary.elapsed_secs,
                visited = counters.visited,
                served = counters.served,
                earnings = counters.earnings,
                "Floor summary"
            );
        }
    }
}
