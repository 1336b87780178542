//! Configuration loading and typed config structures for the Bistro
//! simulation.
//!
//! The canonical configuration lives in `bistro-config.yaml` at the project
//! root. Every section and field has a default, so an empty document (or a
//! missing file) yields a small but playable restaurant. [`BistroConfig::validate`]
//! rejects combinations the simulation cannot run with.

use std::path::Path;

use bistro_customers::CustomerConfig;
use bistro_floor::{QueueLayout, SeatDefinition};
use bistro_types::{CustomerProfile, CustomerRarity, Dish, DishId, Point};
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but cannot run a simulation.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `bistro-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BistroConfig {
    /// Seed, step size, and run bounds.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Round timer settings.
    #[serde(default)]
    pub round: RoundConfig,

    /// Arrival throttling.
    #[serde(default)]
    pub admission: AdmissionConfig,

    /// Floor plan: route, spawn points, seats, and the waiting line.
    #[serde(default)]
    pub floor: FloorConfig,

    /// Shared customer tunables.
    #[serde(default)]
    pub customers: CustomerConfig,

    /// Customer profile catalog.
    #[serde(default = "default_profiles")]
    pub profiles: Vec<CustomerProfile>,

    /// Dish catalog.
    #[serde(default = "default_menu")]
    pub menu: Vec<Dish>,

    /// Stub kitchen settings used by the engine binary.
    #[serde(default)]
    pub kitchen: KitchenConfig,
}

impl BistroConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check the values for combinations the simulation cannot run with.
    ///
    /// Missing spawn points or an empty profile catalog are *not* errors:
    /// admission skips its attempts and reports the gap as a fault.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.simulation.tick_secs) {
            return Err(invalid("simulation.tick_secs must be positive"));
        }
        if !is_positive(self.round.time_limit_secs) {
            return Err(invalid("round.time_limit_secs must be positive"));
        }
        let admission = &self.admission;
        if !admission.initial_delay_secs.is_finite() || admission.initial_delay_secs < 0.0 {
            return Err(invalid("admission.initial_delay_secs must be non-negative"));
        }
        if !admission.min_interval_secs.is_finite() || admission.min_interval_secs < 0.0 {
            return Err(invalid("admission.min_interval_secs must be non-negative"));
        }
        if !admission.max_interval_secs.is_finite()
            || admission.min_interval_secs > admission.max_interval_secs
        {
            return Err(invalid(
                "admission.min_interval_secs must not exceed admission.max_interval_secs",
            ));
        }
        if !(0.0..=1.0).contains(&admission.common_probability) {
            return Err(invalid("admission.common_probability must be within [0, 1]"));
        }
        if self.floor.seats.is_empty() {
            return Err(invalid("floor.seats must define at least one seat"));
        }
        if !self.floor.queue.spacing.is_finite() {
            return Err(invalid("floor.queue.spacing must be finite"));
        }
        if !self.customers.payment_secs.is_finite() || self.customers.payment_secs < 0.0 {
            return Err(invalid("customers.payment_secs must be non-negative"));
        }
        if !self.customers.arrival_tolerance.is_finite() || self.customers.arrival_tolerance < 0.0 {
            return Err(invalid("customers.arrival_tolerance must be non-negative"));
        }
        if self.menu.is_empty() {
            return Err(invalid("menu must list at least one dish"));
        }
        if !self.kitchen.cook_secs.is_finite() || self.kitchen.cook_secs < 0.0 {
            return Err(invalid("kitchen.cook_secs must be non-negative"));
        }
        Ok(())
    }
}

/// Seed, step size, and run bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Simulated seconds advanced per tick.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: f64,

    /// Real-time milliseconds slept between ticks (0 = as fast as possible).
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// Safety cap on ticks per service day (0 = unlimited).
    #[serde(default = "default_max_ticks_per_day")]
    pub max_ticks_per_day: u64,

    /// Number of service days the engine runs.
    #[serde(default = "default_days")]
    pub days: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_secs: default_tick_secs(),
            tick_interval_ms: 0,
            max_ticks_per_day: default_max_ticks_per_day(),
            days: default_days(),
        }
    }
}

/// Round timer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Length of the operating window in seconds (default: 300).
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit_secs(),
        }
    }
}

/// Arrival throttling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Delay before the first arrival attempt after activation.
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: f64,

    /// Lower bound of the randomized wait between attempts.
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: f64,

    /// Upper bound of the randomized wait between attempts.
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: f64,

    /// Maximum concurrent customers, counting those on their way out.
    #[serde(default = "default_max_customers")]
    pub max_customers: usize,

    /// Probability of drawing from the common tier.
    #[serde(default = "default_common_probability")]
    pub common_probability: f64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            min_interval_secs: default_min_interval_secs(),
            max_interval_secs: default_max_interval_secs(),
            max_customers: default_max_customers(),
            common_probability: default_common_probability(),
        }
    }
}

/// Floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Where arrivals head first.
    #[serde(default = "default_entrance")]
    pub entrance: Point,

    /// Where departing customers walk to.
    #[serde(default = "default_exit")]
    pub exit: Point,

    /// Points new arrivals appear at, chosen uniformly.
    #[serde(default = "default_spawn_points")]
    pub spawn_points: Vec<Point>,

    /// Seat bank, in index order.
    #[serde(default = "default_seats")]
    pub seats: Vec<SeatDefinition>,

    /// Waiting line geometry and capacity.
    #[serde(default)]
    pub queue: QueueLayout,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            entrance: default_entrance(),
            exit: default_exit(),
            spawn_points: default_spawn_points(),
            seats: default_seats(),
            queue: QueueLayout::default(),
        }
    }
}

/// Stub kitchen settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Seconds from order placement to delivery.
    #[serde(default = "default_cook_secs")]
    pub cook_secs: f64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            cook_secs: default_cook_secs(),
        }
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_tick_secs() -> f64 {
    0.25
}

const fn default_max_ticks_per_day() -> u64 {
    100_000
}

const fn default_days() -> u32 {
    1
}

const fn default_time_limit_secs() -> f64 {
    300.0
}

const fn default_initial_delay_secs() -> f64 {
    3.0
}

const fn default_min_interval_secs() -> f64 {
    4.0
}

const fn default_max_interval_secs() -> f64 {
    8.0
}

const fn default_max_customers() -> usize {
    10
}

const fn default_common_probability() -> f64 {
    0.8
}

const fn default_entrance() -> Point {
    Point::new(0.0, 0.0)
}

const fn default_exit() -> Point {
    Point::new(-6.0, 0.0)
}

fn default_spawn_points() -> Vec<Point> {
    vec![Point::new(-8.0, 1.0), Point::new(-8.0, -1.0)]
}

fn default_seats() -> Vec<SeatDefinition> {
    [2.0, 4.0, 6.0]
        .into_iter()
        .map(|x| SeatDefinition {
            stop_point: Point::new(x, 2.0),
            seat_point: Point::new(x, 3.0),
        })
        .collect()
}

const fn default_cook_secs() -> f64 {
    4.0
}

fn default_profiles() -> Vec<CustomerProfile> {
    vec![
        CustomerProfile {
            id: "regular".to_owned(),
            display_name: "Regular".to_owned(),
            rarity: CustomerRarity::Normal,
            speed: 3.0,
            patience_secs: 20.0,
            eat_secs: 6.0,
        },
        CustomerProfile {
            id: "student".to_owned(),
            display_name: "Student".to_owned(),
            rarity: CustomerRarity::Normal,
            speed: 4.0,
            patience_secs: 12.0,
            eat_secs: 4.0,
        },
        CustomerProfile {
            id: "critic".to_owned(),
            display_name: "Food Critic".to_owned(),
            rarity: CustomerRarity::Rare,
            speed: 2.0,
            patience_secs: 30.0,
            eat_secs: 10.0,
        },
    ]
}

fn default_menu() -> Vec<Dish> {
    vec![
        Dish {
            id: DishId::new("omelette"),
            name: "Omelette".to_owned(),
            cost: 12,
        },
        Dish {
            id: DishId::new("soup"),
            name: "Soup of the Day".to_owned(),
            cost: 8,
        },
        Dish {
            id: DishId::new("steak"),
            name: "Steak Frites".to_owned(),
            cost: 25,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BistroConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.round.time_limit_secs, 300.0);
        assert_eq!(config.admission.max_customers, 10);
        assert_eq!(config.floor.queue.max_len, 6);
        assert_eq!(config.customers.payment_secs, 1.0);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  seed: 7
  tick_secs: 0.5
  tick_interval_ms: 0
  max_ticks_per_day: 5000
  days: 2

round:
  time_limit_secs: 120.0

admission:
  initial_delay_secs: 1.0
  min_interval_secs: 2.0
  max_interval_secs: 3.0
  max_customers: 4
  common_probability: 0.5

floor:
  entrance: { x: 0.0, y: 0.0 }
  exit: { x: -4.0, y: 0.0 }
  spawn_points:
    - { x: -5.0, y: 0.0 }
  seats:
    - stop_point: { x: 1.0, y: 1.0 }
      seat_point: { x: 1.0, y: 2.0 }
  queue:
    start: { x: 0.0, y: -1.0 }
    spacing: -0.5
    max_len: 2

customers:
  payment_secs: 2.0

profiles:
  - id: "kid"
    display_name: "Kid"
    rarity: normal
    speed: 5.0
    patience_secs: 8.0
    eat_secs: 2.0

menu:
  - id: "pancakes"
    name: "Pancakes"
    cost: 6

kitchen:
  cook_secs: 1.5
"#;

        let config = BistroConfig::parse(yaml).unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.days, 2);
        assert_eq!(config.round.time_limit_secs, 120.0);
        assert_eq!(config.admission.max_customers, 4);
        assert_eq!(config.floor.seats.len(), 1);
        assert_eq!(config.floor.queue.max_len, 2);
        assert_eq!(config.floor.queue.direction, Point::new(1.0, 0.0));
        assert_eq!(config.customers.payment_secs, 2.0);
        assert_eq!(config.customers.arrival_tolerance, 0.1);
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.menu[0].cost, 6);
        assert_eq!(config.kitchen.cook_secs, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = BistroConfig::parse("round:\n  time_limit_secs: 60.0\n").unwrap();
        assert_eq!(config.round.time_limit_secs, 60.0);
        assert_eq!(config.floor.seats.len(), 3);
        assert_eq!(config.profiles.len(), 3);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(BistroConfig::parse("").is_ok());
    }

    #[test]
    fn inverted_interval_is_invalid() {
        let mut config = BistroConfig::default();
        config.admission.min_interval_secs = 9.0;
        config.admission.max_interval_secs = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_seats_is_invalid() {
        let mut config = BistroConfig::default();
        config.floor.seats.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn probability_outside_unit_range_is_invalid() {
        let mut config = BistroConfig::default();
        config.admission.common_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_time_limit_is_invalid() {
        let mut config = BistroConfig::default();
        config.round.time_limit_secs = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("bistro-config.yaml");
        if path.exists() {
            let config = BistroConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert!(config.unwrap().validate().is_ok());
        }
    }
}
