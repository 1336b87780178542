//! Round clock, admission, and orchestration for the bistro simulation.
//!
//! This crate ties the floor and the customers together into a
//! [`Restaurant`] that advances in fixed ticks, and wraps it in an async
//! service-day loop with operator controls.
//!
//! # Modules
//!
//! - [`admission`] -- Arrival timer, capacity gates, and profile draws.
//! - [`clock`] -- Round timer, tick counter, and step validation.
//! - [`config`] -- Configuration loading from `bistro-config.yaml` into
//!   strongly-typed structs.
//! - [`kitchen`] -- [`Kitchen`] trait and [`StubKitchen`].
//! - [`operator`] -- Operator commands and shared pause/stop state.
//! - [`restaurant`] -- The [`Restaurant`] facade and its tick order.
//! - [`round`] -- Phase tracking, round counters, and the closing drain.
//! - [`runner`] -- The service-day loop.
//! - [`schedule`] -- Resumable timed waits.
//!
//! [`Kitchen`]: kitchen::Kitchen
//! [`StubKitchen`]: kitchen::StubKitchen
//! [`Restaurant`]: restaurant::Restaurant

pub mod admission;
pub mod clock;
pub mod config;
pub mod error;
pub mod kitchen;
pub mod operator;
pub mod restaurant;
pub mod round;
pub mod runner;
pub mod schedule;

pub use error::CoreError;
pub use restaurant::{Restaurant, TickSummary};
