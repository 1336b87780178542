//! Error types for the `bistro-core` crate.
//!
//! Construction is the only fallible step of a restaurant's life. Once
//! built, every runtime problem is absorbed and counted as a
//! [`FaultKind`](bistro_types::FaultKind); only a malformed tick step or a
//! tick counter overflow surfaces as a [`ClockError`].

use bistro_customers::CustomerError;
use bistro_floor::FloorError;

use crate::clock::ClockError;
use crate::config::ConfigError;

/// Errors raised while building or auditing a restaurant.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The configuration is unusable.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The floor layout is invalid or its invariants broke.
    #[error("floor error: {source}")]
    Floor {
        /// The underlying floor error.
        #[from]
        source: FloorError,
    },

    /// A catalog entry is invalid or a seat binding broke.
    #[error("customer error: {source}")]
    Customer {
        /// The underlying customer error.
        #[from]
        source: CustomerError,
    },

    /// The round clock could not be built or advanced.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}
