//! Throttled generation of arrivals.
//!
//! While active, the [`AdmissionController`] waits an initial delay, then
//! repeatedly attempts one arrival and waits a uniformly sampled interval.
//! An attempt spawns only if timer-driven arrivals are allowed, the floor
//! has capacity, and the active count is below the configured maximum.
//! Configuration gaps (no spawn points, no profiles) skip the attempt.

use bistro_floor::SeatAllocator;
use bistro_types::{CustomerProfile, CustomerRarity, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::AdmissionConfig;
use crate::schedule::ArrivalTask;

/// Everything needed to spawn one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalRequest {
    /// Profile drawn for the arrival.
    pub profile: CustomerProfile,
    /// Where the arrival appears.
    pub spawn_point: Point,
}

/// Why an attempt did not produce an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Reduced (tutorial) mode suppresses timer-driven arrivals.
    ReducedMode,
    /// No free seat and no room in line.
    FloorFull,
    /// Active customers are at the configured maximum.
    AtMaxCustomers,
    /// No spawn points are configured.
    NoSpawnPoints,
    /// Neither tier has a profile.
    NoProfiles,
}

impl SkipReason {
    /// Whether the skip is caused by missing configuration.
    pub const fn is_configuration_gap(self) -> bool {
        matches!(self, Self::NoSpawnPoints | Self::NoProfiles)
    }
}

/// Outcome of one admission tick.
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionTick {
    /// The loop is stopped.
    Inactive,
    /// Still waiting.
    Waiting,
    /// An attempt ran and produced an arrival.
    Spawn(ArrivalRequest),
    /// An attempt ran and was skipped.
    Skipped(SkipReason),
}

/// Periodic arrival generator.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    config: AdmissionConfig,
    spawn_points: Vec<Point>,
    common: Vec<CustomerProfile>,
    rare: Vec<CustomerProfile>,
    task: ArrivalTask,
    reduced_mode: bool,
    rng: StdRng,
}

impl AdmissionController {
    /// Create a stopped controller.
    ///
    /// Profiles are sorted into the common tier (`Normal`) and the rare
    /// tier (`Rare`). `Special` profiles are never drawn.
    pub fn new(
        config: AdmissionConfig,
        spawn_points: Vec<Point>,
        profiles: &[CustomerProfile],
        seed: u64,
    ) -> Self {
        let tier = |rarity: CustomerRarity| -> Vec<CustomerProfile> {
            profiles
                .iter()
                .filter(|profile| profile.rarity == rarity)
                .cloned()
                .collect()
        };
        let common = tier(CustomerRarity::Normal);
        let rare = tier(CustomerRarity::Rare);
        info!(
            common = common.len(),
            rare = rare.len(),
            spawn_points = spawn_points.len(),
            "Admission controller initialized"
        );
        Self {
            config,
            spawn_points,
            common,
            rare,
            task: ArrivalTask::Stopped,
            reduced_mode: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Start the arrival loop from its initial delay. A running loop is
    /// left alone.
    pub fn start(&mut self) {
        if self.task.is_active() {
            debug!("Admission already running");
            return;
        }
        self.task = ArrivalTask::InitialDelay {
            remaining: self.config.initial_delay_secs,
        };
        info!(initial_delay_secs = self.config.initial_delay_secs, "Admission started");
    }

    /// Stop the loop, cancelling any pending wait without spawning.
    pub fn stop(&mut self) {
        if self.task.is_active() {
            info!("Admission stopped");
        }
        self.task = ArrivalTask::Stopped;
    }

    /// Whether the loop is running.
    pub const fn is_active(&self) -> bool {
        self.task.is_active()
    }

    /// Current wait state.
    pub const fn task(&self) -> ArrivalTask {
        self.task
    }

    /// Suppress or allow timer-driven arrivals.
    pub const fn set_reduced_mode(&mut self, reduced: bool) {
        self.reduced_mode = reduced;
    }

    /// Whether timer-driven arrivals are suppressed.
    pub const fn is_reduced_mode(&self) -> bool {
        self.reduced_mode
    }

    /// Configured maximum of concurrent customers.
    pub const fn max_customers(&self) -> usize {
        self.config.max_customers
    }

    /// Advance the loop by `dt` seconds.
    pub fn tick(&mut self, dt: f64, floor: &SeatAllocator, active_customers: usize) -> AdmissionTick {
        if !self.task.is_active() {
            return AdmissionTick::Inactive;
        }
        if !self.task.tick(dt) {
            return AdmissionTick::Waiting;
        }

        let outcome = self.attempt(floor, active_customers);
        let wait = self.sample_interval();
        self.task.rearm(wait);
        match outcome {
            Ok(request) => {
                debug!(profile = %request.profile.id, next_in = wait, "Arrival scheduled");
                AdmissionTick::Spawn(request)
            }
            Err(reason) => {
                debug!(?reason, next_in = wait, "Arrival attempt skipped");
                AdmissionTick::Skipped(reason)
            }
        }
    }

    /// Draw an arrival immediately, bypassing the timer and every gate.
    ///
    /// # Errors
    ///
    /// Returns the configuration gap when no spawn point or profile exists.
    pub fn spawn_now(&mut self) -> Result<ArrivalRequest, SkipReason> {
        self.draw()
    }

    fn attempt(&mut self, floor: &SeatAllocator, active_customers: usize) -> Result<ArrivalRequest, SkipReason> {
        if self.reduced_mode {
            return Err(SkipReason::ReducedMode);
        }
        if active_customers >= self.config.max_customers {
            return Err(SkipReason::AtMaxCustomers);
        }
        if !floor.has_capacity() {
            return Err(SkipReason::FloorFull);
        }
        self.draw()
    }

    fn draw(&mut self) -> Result<ArrivalRequest, SkipReason> {
        if self.spawn_points.is_empty() {
            warn!("No spawn points configured, skipping arrival");
            return Err(SkipReason::NoSpawnPoints);
        }
        let profile = self.select_profile().ok_or_else(|| {
            warn!("No customer profiles in either tier, skipping arrival");
            SkipReason::NoProfiles
        })?;
        let index = self.rng.random_range(0..self.spawn_points.len());
        let spawn_point = self
            .spawn_points
            .get(index)
            .copied()
            .ok_or(SkipReason::NoSpawnPoints)?;
        Ok(ArrivalRequest {
            profile,
            spawn_point,
        })
    }

    fn select_profile(&mut self) -> Option<CustomerProfile> {
        let roll: f64 = self.rng.random();
        let (preferred, fallback) = if roll < self.config.common_probability {
            (&self.common, &self.rare)
        } else {
            (&self.rare, &self.common)
        };
        let tier = if preferred.is_empty() { fallback } else { preferred };
        if tier.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..tier.len());
        tier.get(index).cloned()
    }

    fn sample_interval(&mut self) -> f64 {
        let (min, max) = (self.config.min_interval_secs, self.config.max_interval_secs);
        if max > min {
            self.rng.random_range(min..=max)
        } else {
            min
        }
    }
}
