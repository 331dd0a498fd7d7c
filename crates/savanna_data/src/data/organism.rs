use super::location::Location;
use super::species::{Sex, Species};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who an organism is. Fixed for life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub species: Species,
    pub sex: Sex,
}

/// Life state shared by animals and plants.
///
/// A dead organism has no location and is never placed in a field again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub alive: bool,
    pub location: Option<Location>,
    pub age: u32,
}

impl Vitals {
    #[must_use]
    pub fn new(location: Location, age: u32) -> Self {
        Self {
            alive: true,
            location: Some(location),
            age,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn set_dead(&mut self) {
        self.alive = false;
        self.location = None;
    }
}

/// Stamina or food level of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metabolism {
    pub energy: u32,
    pub max_energy: u32,
}

impl Metabolism {
    /// Burns one unit. Returns `true` when the counter is exhausted.
    pub fn decay(&mut self) -> bool {
        self.energy = self.energy.saturating_sub(1);
        self.energy == 0
    }

    /// Energy as a fraction of the species maximum, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.max_energy == 0 {
            return 0.0;
        }
        f64::from(self.energy) / f64::from(self.max_energy)
    }
}

/// Infection state of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Health {
    pub infected: bool,
    pub infection_steps: u32,
}

impl Health {
    pub fn infect(&mut self, steps: u32) {
        self.infected = true;
        self.infection_steps = steps;
    }

    pub fn cure(&mut self) {
        self.infected = false;
        self.infection_steps = 0;
    }

    /// Advances the countdown. Returns `true` when it has run out.
    pub fn tick(&mut self) -> bool {
        if !self.infected {
            return false;
        }
        self.infection_steps = self.infection_steps.saturating_sub(1);
        self.infection_steps == 0
    }
}

/// Plant-only state: what a grazer gains from eating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flora {
    pub nutrition: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Starvation,
    Disease,
    Overcrowding,
    Predation,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeathCause::OldAge => "old age",
            DeathCause::Starvation => "starvation",
            DeathCause::Disease => "disease",
            DeathCause::Overcrowding => "overcrowding",
            DeathCause::Predation => "predation",
        };
        f.write_str(label)
    }
}
