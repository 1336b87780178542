//! Patience: a customer's countdown of tolerance.
//!
//! Patience only ever moves down, by elapsed time, and is clamped at zero.
//! The single way back up is [`Patience::reset`], which the state machine
//! calls when a customer sits down to order. Scripted arrivals carry a
//! frozen meter that ignores decay but still honors an explicit empty.

/// Patience meter for one customer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patience {
    remaining: f64,
    max: f64,
    frozen: bool,
}

impl Patience {
    /// A full meter of `max` seconds.
    pub const fn full(max: f64) -> Self {
        Self {
            remaining: max,
            max,
            frozen: false,
        }
    }

    /// A full meter that does not decay with time.
    pub const fn frozen(max: f64) -> Self {
        Self {
            remaining: max,
            max,
            frozen: true,
        }
    }

    /// Seconds of patience left.
    pub const fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Configured maximum.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Whether time decay is suppressed.
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Remaining patience as a fraction of the maximum, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.max).clamp(0.0, 1.0)
    }

    /// Whether patience has run out.
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Drain `dt` seconds. Returns `true` if the meter is empty afterwards.
    pub fn decay(&mut self, dt: f64) -> bool {
        if !self.frozen && dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
        self.is_exhausted()
    }

    /// Refill to the maximum.
    pub const fn reset(&mut self) {
        self.remaining = self.max;
    }

    /// Drop straight to zero, frozen or not.
    pub const fn empty(&mut self) {
        self.remaining = 0.0;
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn decay_clamps_at_zero() {
        let mut patience = Patience::full(1.0);
        assert!(!patience.decay(0.5));
        assert_eq!(patience.remaining(), 0.5);
        assert!(patience.decay(2.0));
        assert_eq!(patience.remaining(), 0.0);
        assert!(patience.decay(0.5));
        assert_eq!(patience.remaining(), 0.0);
    }

    #[test]
    fn decay_never_increases() {
        let mut patience = Patience::full(3.0);
        let mut last = patience.remaining();
        for dt in [0.25, 0.0, -1.0, 0.5, 1.0, 4.0] {
            patience.decay(dt);
            assert!(patience.remaining() <= last);
            assert!(patience.remaining() >= 0.0);
            last = patience.remaining();
        }
    }

    #[test]
    fn frozen_meter_ignores_time_but_not_empty() {
        let mut patience = Patience::frozen(2.0);
        assert!(!patience.decay(100.0));
        assert_eq!(patience.remaining(), 2.0);
        patience.empty();
        assert!(patience.is_exhausted());
    }

    #[test]
    fn reset_refills() {
        let mut patience = Patience::full(4.0);
        patience.decay(3.0);
        patience.reset();
        assert_eq!(patience.remaining(), 4.0);
        assert_eq!(patience.fraction(), 1.0);
    }
}
