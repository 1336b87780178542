//! Customer records and lifecycle for the Bistro simulation.
//!
//! This crate owns everything about an individual customer: the record
//! itself, its patience meter and walking movement, the pool that recycles
//! records, the menu orders are drawn from, and the state machine that
//! moves a customer from the door to a seat and back out again.
//!
//! # Architecture
//!
//! - [`customer`]: the per-customer record and profile validation.
//! - [`patience`]: the decaying tolerance meter.
//! - [`movement`]: kinematic walking toward one destination.
//! - [`pool`]: arena of active records plus bounded spares.
//! - [`menu`]: the dish catalog.
//! - [`machine`]: per-state enter/update/exit dispatch.
//! - [`config`]: shared customer tunables.
//! - [`error`]: catalog and binding errors.

pub mod config;
pub mod customer;
pub mod error;
pub mod machine;
pub mod menu;
pub mod movement;
pub mod patience;
pub mod pool;

pub use config::CustomerConfig;
pub use customer::{Customer, validate_profile};
pub use error::CustomerError;
pub use machine::{
    CustomerStateMachine, LifecycleContext, Outbox, Route, ServeOutcome, despawn_all,
    verify_bindings,
};
pub use menu::Menu;
pub use movement::{Movement, Step};
pub use patience::Patience;
pub use pool::CustomerPool;
