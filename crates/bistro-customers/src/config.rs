//! Tunables for customer behavior.
//!
//! These values live under the `customers` key of `bistro-config.yaml`.
//! Per-profile values (speed, patience, eating time) come from the profile
//! catalog instead; this struct only holds what is shared by every
//! customer.

use serde::{Deserialize, Serialize};

/// Shared customer tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerConfig {
    /// Seconds a customer spends paying before leaving (default: 1.0).
    #[serde(default = "default_payment_secs")]
    pub payment_secs: f64,

    /// Distance at which a walking customer counts as arrived (default: 0.1).
    #[serde(default = "default_arrival_tolerance")]
    pub arrival_tolerance: f64,

    /// Spare records pre-allocated by the pool (default: 10).
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,

    /// Maximum spare records the pool keeps after despawns (default: 30).
    #[serde(default = "default_pool_max_retained")]
    pub pool_max_retained: usize,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            payment_secs: default_payment_secs(),
            arrival_tolerance: default_arrival_tolerance(),
            pool_capacity: default_pool_capacity(),
            pool_max_retained: default_pool_max_retained(),
        }
    }
}

const fn default_payment_secs() -> f64 {
    1.0
}

const fn default_arrival_tolerance() -> f64 {
    0.1
}

const fn default_pool_capacity() -> usize {
    10
}

const fn default_pool_max_retained() -> usize {
    30
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: CustomerConfig = serde_json::from_str(r#"{"payment_secs": 2.5}"#).unwrap();
        assert_eq!(config.payment_secs, 2.5);
        assert_eq!(config.arrival_tolerance, 0.1);
        assert_eq!(config.pool_capacity, 10);
        assert_eq!(config.pool_max_retained, 30);
    }
}
