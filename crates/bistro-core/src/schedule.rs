//! Cooperative waits, expressed as task states re-armed each tick.
//!
//! Neither wait ever completes on the call that arms it: the earliest
//! resumption is the next tick boundary.

/// The admission loop's pending wait.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ArrivalTask {
    /// The loop is not running.
    #[default]
    Stopped,
    /// Waiting out the delay before the first attempt.
    InitialDelay {
        /// Seconds left.
        remaining: f64,
    },
    /// Waiting between attempts.
    Interval {
        /// Seconds left.
        remaining: f64,
    },
}

impl ArrivalTask {
    /// Whether the loop is running.
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Stopped)
    }

    /// Count down `dt` seconds. Returns `true` when the wait is over.
    pub fn tick(&mut self, dt: f64) -> bool {
        match self {
            Self::Stopped => false,
            Self::InitialDelay { remaining } | Self::Interval { remaining } => {
                *remaining -= dt;
                *remaining <= 0.0
            }
        }
    }

    /// Start waiting `secs` before the next attempt.
    pub const fn rearm(&mut self, secs: f64) {
        *self = Self::Interval { remaining: secs };
    }
}

/// The closing sequence's wait for the floor to empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainWait {
    /// Not closing.
    #[default]
    Idle,
    /// Closing; checked once per tick.
    Pending,
    /// Everyone left and the signal went out.
    Complete,
}

impl DrainWait {
    /// Begin waiting.
    pub const fn arm(&mut self) {
        *self = Self::Pending;
    }

    /// Check the condition. Returns `true` exactly once, on the first poll
    /// that sees an empty floor.
    pub const fn poll(&mut self, active_customers: usize) -> bool {
        if matches!(self, Self::Pending) && active_customers == 0 {
            *self = Self::Complete;
            return true;
        }
        false
    }

    /// Whether the wait is still running.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Forget any previous round's wait.
    pub const fn reset(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_task_never_fires() {
        let mut task = ArrivalTask::Stopped;
        assert!(!task.tick(100.0));
        assert!(!task.is_active());
    }

    #[test]
    fn zero_delay_fires_on_first_tick() {
        let mut task = ArrivalTask::InitialDelay { remaining: 0.0 };
        assert!(task.tick(0.25));
    }

    #[test]
    fn interval_counts_down() {
        let mut task = ArrivalTask::Stopped;
        task.rearm(1.0);
        assert!(!task.tick(0.5));
        assert!(task.tick(0.5));
    }

    #[test]
    fn drain_signals_once() {
        let mut drain = DrainWait::default();
        assert!(!drain.poll(0));
        drain.arm();
        assert!(!drain.poll(2));
        assert!(drain.poll(0));
        assert!(!drain.poll(0));
        assert_eq!(drain, DrainWait::Complete);
    }
}
