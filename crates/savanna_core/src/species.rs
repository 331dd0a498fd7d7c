//! Per-species trait table.
//!
//! Species are data, not types: every behavior system reads the parameters it
//! needs from a [`SpeciesTraits`] row. The built-in rows live in
//! [`default_traits`]; a config file may replace individual rows.

use crate::environment::HourWindow;
use savanna_data::{Kingdom, Species};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Cell-by-cell creation order used when populating a fresh field.
/// The first species whose roll succeeds claims the cell.
pub const POPULATE_ORDER: [Species; 7] = [
    Species::Lion,
    Species::Hyena,
    Species::Cheetah,
    Species::Fruit,
    Species::Grass,
    Species::Zebra,
    Species::Elephant,
];

/// How a meal changes an animal's energy counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPolicy {
    /// Stamina: the meal's nutrition is added, capped at `max_energy`.
    CappedAdditive,
    /// Food level: the counter is reset to the meal's nutrition, capped at `max_energy`.
    Reset,
}

impl EnergyPolicy {
    #[must_use]
    pub fn credit(&self, energy: u32, nutrition: u32, max_energy: u32) -> u32 {
        match self {
            EnergyPolicy::CappedAdditive => energy.saturating_add(nutrition).min(max_energy),
            EnergyPolicy::Reset => nutrition.min(max_energy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalTraits {
    pub energy_policy: EnergyPolicy,
    pub max_energy: u32,
    /// Hours during which the animal hunts over `active_range`.
    pub active: Option<HourWindow>,
    pub active_range: usize,
    /// Hours during which the animal neither moves, feeds nor breeds.
    pub sleep: Option<HourWindow>,
    /// Species this animal may eat. Order carries no priority.
    pub diet: Vec<Species>,
}

impl AnimalTraits {
    #[must_use]
    pub fn is_active(&self, hour: u8) -> bool {
        self.active.is_some_and(|w| w.contains(hour))
    }

    #[must_use]
    pub fn is_asleep(&self, hour: u8) -> bool {
        self.sleep.is_some_and(|w| w.contains(hour))
    }

    #[must_use]
    pub fn search_range(&self, hour: u8) -> usize {
        if self.is_active(hour) {
            self.active_range.max(1)
        } else {
            1
        }
    }

    #[must_use]
    pub fn eats(&self, species: Species) -> bool {
        self.diet.contains(&species)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    pub breeding_age: u32,
    pub max_age: u32,
    pub breeding_probability: f64,
    pub max_litter_size: u32,
    pub mate_range: usize,
    /// Energy a consumer gains from eating one of these.
    pub nutrition: u32,
    /// Chance that a cell is seeded with this species on reset.
    pub creation_probability: f64,
    /// Present for animals, absent for plants.
    pub animal: Option<AnimalTraits>,
}

impl SpeciesTraits {
    /// Mate search radius under the given visibility; never below one cell.
    #[must_use]
    pub fn effective_mate_range(&self, visibility: i32) -> usize {
        effective_mate_range(self.mate_range, visibility)
    }
}

/// `max(1, base + visibility)`.
#[must_use]
pub fn effective_mate_range(base: usize, visibility: i32) -> usize {
    let base = i64::try_from(base).unwrap_or(i64::MAX);
    let widened = base.saturating_add(i64::from(visibility)).max(1);
    usize::try_from(widened).unwrap_or(usize::MAX)
}

fn window(start: u8, end: u8) -> Option<HourWindow> {
    Some(HourWindow::new(start, end))
}

/// The built-in table row for `species`.
#[must_use]
pub fn default_traits(species: Species) -> SpeciesTraits {
    match species {
        Species::Lion => SpeciesTraits {
            breeding_age: 25,
            max_age: 200,
            breeding_probability: 0.05,
            max_litter_size: 2,
            mate_range: 6,
            nutrition: 10,
            creation_probability: 0.01,
            animal: Some(AnimalTraits {
                energy_policy: EnergyPolicy::CappedAdditive,
                max_energy: 15,
                active: window(22, 8),
                active_range: 3,
                sleep: window(10, 20),
                diet: vec![Species::Hyena, Species::Zebra, Species::Elephant],
            }),
        },
        Species::Hyena => SpeciesTraits {
            breeding_age: 15,
            max_age: 150,
            breeding_probability: 0.08,
            max_litter_size: 2,
            mate_range: 3,
            nutrition: 8,
            creation_probability: 0.02,
            animal: Some(AnimalTraits {
                energy_policy: EnergyPolicy::Reset,
                max_energy: 9,
                active: None,
                active_range: 1,
                sleep: None,
                diet: vec![Species::Zebra],
            }),
        },
        Species::Cheetah => SpeciesTraits {
            breeding_age: 15,
            max_age: 150,
            breeding_probability: 0.08,
            max_litter_size: 2,
            mate_range: 3,
            nutrition: 8,
            creation_probability: 0.01,
            animal: Some(AnimalTraits {
                energy_policy: EnergyPolicy::Reset,
                max_energy: 9,
                active: None,
                active_range: 1,
                sleep: None,
                diet: vec![Species::Zebra],
            }),
        },
        Species::Zebra => SpeciesTraits {
            breeding_age: 5,
            max_age: 40,
            breeding_probability: 0.08,
            max_litter_size: 4,
            mate_range: 3,
            nutrition: 10,
            creation_probability: 0.08,
            animal: Some(AnimalTraits {
                energy_policy: EnergyPolicy::Reset,
                max_energy: 15,
                active: window(10, 20),
                active_range: 2,
                sleep: window(23, 5),
                diet: vec![Species::Grass, Species::Fruit],
            }),
        },
        Species::Elephant => SpeciesTraits {
            breeding_age: 5,
            max_age: 40,
            breeding_probability: 0.12,
            max_litter_size: 4,
            mate_range: 3,
            nutrition: 12,
            creation_probability: 0.04,
            animal: Some(AnimalTraits {
                energy_policy: EnergyPolicy::Reset,
                max_energy: 12,
                active: None,
                active_range: 1,
                sleep: None,
                diet: vec![Species::Grass, Species::Fruit],
            }),
        },
        Species::Grass => SpeciesTraits {
            breeding_age: 10,
            max_age: 20,
            breeding_probability: 0.12,
            max_litter_size: 8,
            mate_range: 2,
            nutrition: 1,
            creation_probability: 0.04,
            animal: None,
        },
        Species::Fruit => SpeciesTraits {
            breeding_age: 5,
            max_age: 10,
            breeding_probability: 0.14,
            max_litter_size: 6,
            mate_range: 2,
            nutrition: 4,
            creation_probability: 0.03,
            animal: None,
        },
    }
}

/// Lookup table from species to traits, always complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpeciesTable(BTreeMap<Species, SpeciesTraits>);

impl Default for SpeciesTable {
    fn default() -> Self {
        Self(
            Species::ALL
                .iter()
                .map(|&s| (s, default_traits(s)))
                .collect(),
        )
    }
}

impl SpeciesTable {
    #[must_use]
    pub fn get(&self, species: Species) -> &SpeciesTraits {
        // The table is built complete and overrides only replace rows.
        &self.0[&species]
    }

    pub fn set(&mut self, species: Species, traits: SpeciesTraits) {
        self.0.insert(species, traits);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Species, &SpeciesTraits)> {
        self.0.iter()
    }
}

/// Rows named in a config file replace the built-in rows; the rest stay.
impl<'de> Deserialize<'de> for SpeciesTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<Species, SpeciesTraits>::deserialize(deserializer)?;
        let mut table = SpeciesTable::default();
        for (species, traits) in overrides {
            table.set(species, traits);
        }
        Ok(table)
    }
}

/// Checks that a row agrees with the species' kingdom.
pub(crate) fn kingdom_matches(species: Species, traits: &SpeciesTraits) -> bool {
    match species.kingdom() {
        Kingdom::Animal => traits.animal.is_some(),
        Kingdom::Plant => traits.animal.is_none(),
    }
}
