//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the service
//! loop so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: bistro_core::config::ConfigError,
    },

    /// The restaurant could not be built from the configuration.
    #[error("restaurant error: {source}")]
    Restaurant {
        /// The underlying core error.
        #[from]
        source: bistro_core::CoreError,
    },

    /// A service day failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: bistro_core::runner::RunnerError,
    },
}
