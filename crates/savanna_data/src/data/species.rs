use serde::{Deserialize, Serialize};
use std::fmt;

/// Every species the savanna knows about.
///
/// The roster is closed: behavior is driven by the per-species trait table in
/// the engine, not by extending this enum from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Lion,
    Hyena,
    Cheetah,
    Zebra,
    Elephant,
    Grass,
    Fruit,
}

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Lion,
        Species::Hyena,
        Species::Cheetah,
        Species::Zebra,
        Species::Elephant,
        Species::Grass,
        Species::Fruit,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Species::Lion => "Lion",
            Species::Hyena => "Hyena",
            Species::Cheetah => "Cheetah",
            Species::Zebra => "Zebra",
            Species::Elephant => "Elephant",
            Species::Grass => "Grass",
            Species::Fruit => "Fruit",
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Species::Lion | Species::Hyena | Species::Cheetah => Role::Predator,
            Species::Zebra | Species::Elephant => Role::Prey,
            Species::Grass | Species::Fruit => Role::Plant,
        }
    }

    #[must_use]
    pub fn kingdom(&self) -> Kingdom {
        match self.role() {
            Role::Predator | Role::Prey => Kingdom::Animal,
            Role::Plant => Kingdom::Plant,
        }
    }

    /// Single-character glyph used by text renderers.
    #[must_use]
    pub fn symbol(&self) -> char {
        match self {
            Species::Lion => 'L',
            Species::Hyena => 'H',
            Species::Cheetah => 'C',
            Species::Zebra => 'Z',
            Species::Elephant => 'E',
            Species::Grass => ',',
            Species::Fruit => '*',
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ecological role, used for viability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Predator,
    Prey,
    Plant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kingdom {
    Animal,
    Plant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    #[must_use]
    pub fn opposite(&self) -> Sex {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_partition_roster() {
        let predators = Species::ALL
            .iter()
            .filter(|s| s.role() == Role::Predator)
            .count();
        let prey = Species::ALL.iter().filter(|s| s.role() == Role::Prey).count();
        let plants = Species::ALL
            .iter()
            .filter(|s| s.kingdom() == Kingdom::Plant)
            .count();
        assert_eq!(predators + prey + plants, Species::ALL.len());
        assert_eq!(plants, 2);
    }

    #[test]
    fn test_species_serializes_lowercase() {
        let json = serde_json::to_string(&Species::Elephant).unwrap();
        assert_eq!(json, "\"elephant\"");
    }

    #[test]
    fn test_opposite_sex() {
        assert_eq!(Sex::Male.opposite(), Sex::Female);
        assert_eq!(Sex::Female.opposite().opposite(), Sex::Female);
    }
}
