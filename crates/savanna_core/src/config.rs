//! Configuration management for simulation parameters.
//!
//! Every section has a `Default` and is marked `#[serde(default)]`, so a
//! `config.toml` only needs to name the values it changes.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! depth = 60
//! width = 90
//! seed = 42
//! required_roles = ["predator", "prey"]
//!
//! [weather]
//! rain_probability = 0.3
//!
//! [disease]
//! infection_steps = 4
//! ```

use crate::error::{Result, SimError};
use crate::species::{self, SpeciesTable};
use savanna_data::{Role, Species};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DEPTH: usize = 80;
pub const DEFAULT_WIDTH: usize = 120;

/// Grid and run-level settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub depth: usize,
    pub width: usize,
    pub seed: Option<u64>,
    /// Fixes the hour the clock starts at on reset; random when absent.
    pub start_hour: Option<u8>,
    /// Roles that must each keep one live member for the run to continue.
    pub required_roles: Vec<Role>,
    /// Steps between info-level population summaries.
    pub log_interval: u64,
    pub long_run_steps: u64,
    /// Pause between steps for interactive views. The engine ignores it.
    pub step_delay_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            width: DEFAULT_WIDTH,
            seed: None,
            start_hour: None,
            required_roles: vec![Role::Predator, Role::Prey, Role::Plant],
            log_interval: 100,
            long_run_steps: 700,
            step_delay_ms: 50,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    pub min_temp: i32,
    pub max_temp: i32,
    pub min_visibility: i32,
    pub max_visibility: i32,
    pub rain_probability: f64,
    /// Factor applied to a plant's breeding probability while it rains.
    pub rain_breeding_multiplier: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            min_temp: 20,
            max_temp: 30,
            min_visibility: -1,
            max_visibility: 1,
            rain_probability: 0.2,
            rain_breeding_multiplier: 1.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DiseaseConfig {
    /// Steps an infected animal survives without a cure.
    pub infection_steps: u32,
    /// Per-step chance of a spontaneous infection at `reference_temp`.
    pub base_probability: f64,
    /// Per-neighbor chance of contagion at `reference_temp`.
    pub base_neighbor_probability: f64,
    pub reference_temp: i32,
    pub cure_temp_threshold: i32,
    pub cure_energy_threshold: f64,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            infection_steps: 3,
            base_probability: 0.01,
            base_neighbor_probability: 0.15,
            reference_temp: 20,
            cure_temp_threshold: 25,
            cure_energy_threshold: 0.5,
        }
    }
}

impl DiseaseConfig {
    /// Spontaneous infection chance; hotter weather lowers it.
    #[must_use]
    pub fn infection_probability(&self, temperature: i32) -> f64 {
        self.temperature_adjusted(self.base_probability, temperature)
    }

    /// Contagion chance per neighbor; hotter weather lowers it.
    #[must_use]
    pub fn neighbor_infection_probability(&self, temperature: i32) -> f64 {
        self.temperature_adjusted(self.base_neighbor_probability, temperature)
    }

    fn temperature_adjusted(&self, base: f64, temperature: i32) -> f64 {
        let shift = f64::from(temperature - self.reference_temp) / 100.0;
        (base - shift).clamp(0.0, 1.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub weather: WeatherConfig,
    pub disease: DiseaseConfig,
    pub species: SpeciesTable,
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SimError::validation(message))
    }
}

fn ensure_probability(value: f64, name: &str) -> Result<()> {
    ensure(
        (0.0..=1.0).contains(&value),
        format!("{name} must be in [0.0, 1.0], got {value}"),
    )
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Grid dimensions are not checked here: the driver corrects them.
    pub fn validate(&self) -> Result<()> {
        if let Some(hour) = self.world.start_hour {
            ensure(hour < 24, format!("start_hour must be below 24, got {hour}"))?;
        }
        ensure(self.world.log_interval > 0, "log_interval must be positive")?;

        let w = &self.weather;
        ensure(w.min_temp <= w.max_temp, "min_temp must not exceed max_temp")?;
        ensure(
            w.min_visibility <= w.max_visibility,
            "min_visibility must not exceed max_visibility",
        )?;
        ensure_probability(w.rain_probability, "rain_probability")?;
        ensure(
            w.rain_breeding_multiplier >= 0.0,
            "rain_breeding_multiplier must be non-negative",
        )?;

        let d = &self.disease;
        ensure(d.infection_steps > 0, "infection_steps must be positive")?;
        ensure_probability(d.base_probability, "base_probability")?;
        ensure_probability(d.base_neighbor_probability, "base_neighbor_probability")?;
        ensure_probability(d.cure_energy_threshold, "cure_energy_threshold")?;

        for (species, traits) in self.species.iter() {
            ensure(
                species::kingdom_matches(*species, traits),
                format!("{species}: animal traits must be present exactly for animals"),
            )?;
            ensure_probability(
                traits.breeding_probability,
                &format!("{species}.breeding_probability"),
            )?;
            ensure_probability(
                traits.creation_probability,
                &format!("{species}.creation_probability"),
            )?;
            ensure(
                traits.max_litter_size > 0,
                format!("{species}.max_litter_size must be positive"),
            )?;
            if let Some(animal) = &traits.animal {
                ensure(
                    animal.max_energy > 0,
                    format!("{species}.max_energy must be positive"),
                )?;
                ensure(
                    !animal.diet.contains(species),
                    format!("{species} cannot eat its own kind"),
                )?;
                for hour_window in [animal.active, animal.sleep].into_iter().flatten() {
                    ensure(
                        hour_window.start < 24 && hour_window.end < 24,
                        format!("{species}: window hours must be below 24"),
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[must_use]
    pub fn traits(&self, species: Species) -> &species::SpeciesTraits {
        self.species.get(species)
    }
}
