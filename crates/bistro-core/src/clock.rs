//! Round clock and tick counter.
//!
//! The [`RoundClock`] measures one operating window against its limit.
//! Elapsed time only moves while the clock is running, is clamped to the
//! limit, and the expiry is reported exactly once per start. The
//! [`TickCounter`] numbers ticks across the whole run.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// A tick was requested with a negative or non-finite step.
    #[error("invalid tick step: {dt}")]
    InvalidStep {
        /// The rejected step in seconds.
        dt: f64,
    },

    /// The round limit is not a positive finite number.
    #[error("invalid round limit: {limit_secs}")]
    InvalidLimit {
        /// The rejected limit in seconds.
        limit_secs: f64,
    },
}

/// Timer for one service round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundClock {
    elapsed: f64,
    limit: f64,
    running: bool,
}

impl RoundClock {
    /// Create a stopped clock with the given limit.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidLimit`] unless `limit_secs` is positive
    /// and finite.
    pub fn new(limit_secs: f64) -> Result<Self, ClockError> {
        if !limit_secs.is_finite() || limit_secs <= 0.0 {
            return Err(ClockError::InvalidLimit { limit_secs });
        }
        Ok(Self {
            elapsed: 0.0,
            limit: limit_secs,
            running: false,
        })
    }

    /// Reset elapsed time and start running.
    pub const fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Accumulate `dt` seconds.
    ///
    /// Returns `true` on the tick the limit is reached; the clock stops
    /// there, so later calls return `false` until the next [`start`].
    ///
    /// [`start`]: RoundClock::start
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.limit {
            self.elapsed = self.limit;
            self.running = false;
            return true;
        }
        false
    }

    /// Jump elapsed time to the limit. A running clock expires on its next
    /// advance.
    pub const fn force_end(&mut self) {
        self.elapsed = self.limit;
    }

    /// Seconds elapsed in this round.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Configured round length.
    pub const fn limit(&self) -> f64 {
        self.limit
    }

    /// Seconds left before expiry.
    pub fn remaining(&self) -> f64 {
        (self.limit - self.elapsed).max(0.0)
    }

    /// Whether the clock is counting.
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounter {
    tick: u64,
}

impl TickCounter {
    /// Advance by one tick and return the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// The last tick number (0 before the first tick).
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}

/// Reject negative or non-finite steps.
///
/// # Errors
///
/// Returns [`ClockError::InvalidStep`] for a bad step.
pub fn check_step(dt: f64) -> Result<f64, ClockError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(dt)
    } else {
        Err(ClockError::InvalidStep { dt })
    }
}
