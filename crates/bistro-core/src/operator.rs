//! Operator control state and commands.
//!
//! An operator (debug console, test harness, tutorial script) steers a
//! running service day through [`OperatorCommand`]s. Commands are queued on
//! the shared [`OperatorState`] and applied by the runner at the start of
//! the next tick, so they never interleave with a tick in progress.
//!
//! [`LoopCommand`]s steer the loop itself (pause, resume, pacing, stop) and
//! take effect immediately. They use atomics so the tick loop can check
//! them without taking a lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};
use tracing::info;

/// A command an operator can issue to the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum OperatorCommand {
    /// Drop every customer's patience to zero.
    EmptyAllPatience,
    /// Spawn one customer now, bypassing the arrival timer.
    SpawnNow,
    /// Spawn one scripted (tutorial) customer whose patience never decays.
    SpawnScripted,
    /// Start the arrival loop.
    StartAdmission,
    /// Stop the arrival loop.
    StopAdmission,
    /// Enable or disable reduced (tutorial) admission mode.
    SetReducedMode(bool),
    /// Reinitialize the round and restart admission.
    RestartRound,
    /// Remove every customer immediately.
    DespawnAll,
    /// Jump the round timer to its limit.
    ForceEndRound,
    /// Jump the round timer to its limit and empty all patience.
    ForceClose,
    /// Roll total earnings back to their value at round start.
    RestoreEarnings,
}

/// A command that steers the tick loop rather than the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum LoopCommand {
    /// Hold the loop before its next tick.
    Pause,
    /// Let a paused loop continue.
    Resume,
    /// Change the real-time pause between ticks.
    SetTickIntervalMs(u64),
    /// End the run cleanly, waking the loop if it is paused.
    Stop,
}

/// Reason a service day ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayEndReason {
    /// Closing finished and every customer left.
    Drained,
    /// The per-day tick cap was reached first.
    TickCapReached,
    /// An operator issued a stop.
    OperatorStop,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the loop is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Real-time milliseconds slept between ticks.
    tick_interval_ms: AtomicU64,

    /// Wall-clock time the state was created.
    started_at: DateTime<Utc>,

    /// Safety cap on ticks per day (0 = unlimited).
    max_ticks_per_day: u64,

    /// Commands waiting for the next tick.
    commands: Mutex<Vec<OperatorCommand>>,
}

impl OperatorState {
    /// Create a new operator state.
    pub fn new(tick_interval_ms: u64, max_ticks_per_day: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            started_at: Utc::now(),
            max_ticks_per_day,
            commands: Mutex::new(Vec::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop. It sleeps until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the loop and wake it.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the loop is no longer paused.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Pacing and bounds
    // -----------------------------------------------------------------------

    /// Current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval, returning the previous one.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    /// Whether `ticks_today` has reached the per-day cap.
    pub const fn tick_cap_reached(&self, ticks_today: u64) -> bool {
        self.max_ticks_per_day > 0 && ticks_today >= self.max_ticks_per_day
    }

    /// Configured per-day tick cap.
    pub const fn max_ticks_per_day(&self) -> u64 {
        self.max_ticks_per_day
    }

    /// Wall-clock creation time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock seconds since creation.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Apply a loop command immediately.
    pub fn control(&self, command: LoopCommand) {
        info!(?command, "Loop command");
        match command {
            LoopCommand::Pause => self.pause(),
            LoopCommand::Resume => self.resume(),
            LoopCommand::SetTickIntervalMs(ms) => {
                let previous = self.set_tick_interval_ms(ms);
                info!(previous, ms, "Tick interval changed");
            }
            LoopCommand::Stop => {
                self.request_stop();
                self.resume();
            }
        }
    }

    /// Queue a command for the next tick.
    pub async fn submit(&self, command: OperatorCommand) {
        self.commands.lock().await.push(command);
    }

    /// Take every queued command in submission order.
    pub async fn drain_commands(&self) -> Vec<OperatorCommand> {
        let mut queue = self.commands.lock().await;
        std::mem::take(&mut *queue)
    }
}
