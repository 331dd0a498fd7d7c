pub mod macros;

use savanna_core::config::AppConfig;
use savanna_core::lifecycle::OrganismSeed;
use savanna_core::simulation::Simulation;
use savanna_core::species::SpeciesTraits;
use savanna_data::{Location, Sex, Species};

/// Builds an idle simulation with hand-placed organisms and pinned weather.
///
/// By default the grid is 10x10, the seed is fixed, weather is held at 20°C
/// with zero visibility and no rain, and spontaneous or contagious infection
/// is switched off.
#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    organisms: Vec<OrganismSeed>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.depth = 10;
        config.world.width = 10;
        config.world.seed = Some(42);
        config.world.start_hour = Some(11);
        config.disease.base_probability = 0.0;
        config.disease.base_neighbor_probability = 0.0;
        Self {
            config,
            organisms: Vec::new(),
        }
        .with_weather(20, 0, false)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, depth: usize, width: usize) -> Self {
        self.config.world.depth = depth;
        self.config.world.width = width;
        self
    }

    /// Organisms act at `hour` during the first step.
    pub fn acting_at(mut self, hour: u8) -> Self {
        self.config.world.start_hour = Some((hour + 23) % 24);
        self
    }

    /// Pins the weather: every change keeps these exact values.
    pub fn with_weather(mut self, temperature: i32, visibility: i32, rain: bool) -> Self {
        let weather = &mut self.config.weather;
        weather.min_temp = temperature;
        weather.max_temp = temperature;
        weather.min_visibility = visibility;
        weather.max_visibility = visibility;
        weather.rain_probability = if rain { 1.0 } else { 0.0 };
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_traits<F>(mut self, species: Species, modifier: F) -> Self
    where
        F: FnOnce(&mut SpeciesTraits),
    {
        let mut traits = self.config.traits(species).clone();
        modifier(&mut traits);
        self.config.species.set(species, traits);
        self
    }

    /// Organisms act in the order they are added.
    pub fn with_organism(mut self, seed: OrganismSeed) -> Self {
        self.organisms.push(seed);
        self
    }

    pub fn build(self) -> Simulation {
        let mut sim =
            Simulation::from_config(self.config).expect("test builder config must validate");
        for seed in self.organisms {
            sim.spawn(seed);
        }
        sim
    }
}

/// An adult of `species` at (`row`, `col`).
#[allow(dead_code)]
pub fn adult(species: Species, sex: Sex, row: usize, col: usize) -> OrganismSeed {
    let age = match species {
        Species::Lion => 30,
        Species::Hyena | Species::Cheetah => 20,
        Species::Zebra | Species::Elephant => 10,
        Species::Grass => 10,
        Species::Fruit => 5,
    };
    OrganismSeed::new(species, sex, Location::new(row, col)).age(age)
}
