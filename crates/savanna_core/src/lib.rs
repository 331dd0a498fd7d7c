//! # Savanna Core
//!
//! The engine of a grid-based predator, prey and plant ecosystem.
//!
//! This crate contains the deterministic simulation logic, including:
//! - The double-buffered occupancy grid and its neighborhood queries
//! - A data-driven species table (breeding, diet, activity windows)
//! - Animal, plant and disease behavior systems
//! - Clock and weather
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! Organisms are `hecs` entities; a [`field::Field`] holds only their handles.
//! During a step the committed field is read-only and every placement goes
//! into a fresh field, which replaces it when the step ends. All randomness
//! comes from one seeded `ChaCha8Rng` owned by the [`simulation::Simulation`].
//!
//! ## Example
//!
//! ```
//! use savanna_core::config::AppConfig;
//! use savanna_core::simulation::Simulation;
//!
//! let mut config = AppConfig::default();
//! config.world.depth = 20;
//! config.world.width = 30;
//! config.world.seed = Some(42);
//!
//! let mut sim = Simulation::from_config(config).unwrap();
//! sim.reset();
//! let report = sim.step();
//! assert_eq!(report.step, 1);
//! ```

/// Configuration loading and validation
pub mod config;
/// Clock and weather
pub mod environment;
pub mod error;
/// Grid occupancy and neighborhood queries
pub mod field;
/// Organism construction
pub mod lifecycle;
/// Run statistics and logging setup
pub mod metrics;
pub mod organism;
/// The simulation driver
pub mod simulation;
/// Per-species trait table
pub mod species;
/// Animal, plant and disease behavior
pub mod systems;
/// View notification contract
pub mod view;

pub use config::AppConfig;
pub use error::{Result, SimError};
pub use field::{Field, PopulationCounts};
pub use lifecycle::OrganismSeed;
pub use simulation::{Phase, Simulation, StepReport, TerminationReason};
pub use view::{FieldSnapshot, NullView, SimulationView};
