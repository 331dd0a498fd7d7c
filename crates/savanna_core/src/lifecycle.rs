use crate::species::SpeciesTraits;
use rand::Rng;
use savanna_data::{Flora, Health, Identity, Location, Metabolism, Sex, Species, Vitals};

/// Everything needed to bring one organism into the arena.
///
/// `energy` and `infection_steps` are ignored for plants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganismSeed {
    pub species: Species,
    pub sex: Sex,
    pub location: Location,
    pub age: u32,
    pub energy: Option<u32>,
    pub infection_steps: Option<u32>,
}

impl OrganismSeed {
    #[must_use]
    pub fn new(species: Species, sex: Sex, location: Location) -> Self {
        Self {
            species,
            sex,
            location,
            age: 0,
            energy: None,
            infection_steps: None,
        }
    }

    #[must_use]
    pub fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    #[must_use]
    pub fn energy(mut self, energy: u32) -> Self {
        self.energy = Some(energy);
        self
    }

    #[must_use]
    pub fn infected(mut self, steps: u32) -> Self {
        self.infection_steps = Some(steps);
        self
    }
}

pub fn random_sex<R: Rng>(rng: &mut R) -> Sex {
    if rng.gen_bool(0.5) {
        Sex::Male
    } else {
        Sex::Female
    }
}

/// Spawns an organism from an explicit seed. Missing energy means full.
pub fn spawn(ecs: &mut hecs::World, seed: OrganismSeed, traits: &SpeciesTraits) -> hecs::Entity {
    let identity = Identity {
        species: seed.species,
        sex: seed.sex,
    };
    let vitals = Vitals::new(seed.location, seed.age);
    match &traits.animal {
        Some(animal) => {
            let metabolism = Metabolism {
                energy: seed
                    .energy
                    .unwrap_or(animal.max_energy)
                    .min(animal.max_energy),
                max_energy: animal.max_energy,
            };
            let mut health = Health::default();
            if let Some(steps) = seed.infection_steps {
                health.infect(steps);
            }
            ecs.spawn((identity, vitals, metabolism, health))
        }
        None => ecs.spawn((
            identity,
            vitals,
            Flora {
                nutrition: traits.nutrition,
            },
        )),
    }
}

/// A newborn: age zero, full energy, random sex.
pub fn spawn_newborn<R: Rng>(
    ecs: &mut hecs::World,
    species: Species,
    location: Location,
    traits: &SpeciesTraits,
    rng: &mut R,
) -> hecs::Entity {
    let seed = OrganismSeed::new(species, random_sex(rng), location);
    spawn(ecs, seed, traits)
}

/// An organism for a freshly populated field: random sex, random age below
/// the species maximum, and (animals) random energy in `[1, max_energy]`.
pub fn spawn_random<R: Rng>(
    ecs: &mut hecs::World,
    species: Species,
    location: Location,
    traits: &SpeciesTraits,
    rng: &mut R,
) -> hecs::Entity {
    let sex = random_sex(rng);
    let age = rng.gen_range(0..traits.max_age.max(1));
    let mut seed = OrganismSeed::new(species, sex, location).age(age);
    if let Some(animal) = &traits.animal {
        seed = seed.energy(rng.gen_range(1..=animal.max_energy.max(1)));
    }
    spawn(ecs, seed, traits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::default_traits;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_newborn_animal_has_full_energy() {
        let mut ecs = hecs::World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let traits = default_traits(Species::Lion);
        let handle = spawn_newborn(&mut ecs, Species::Lion, Location::new(0, 0), &traits, &mut rng);
        let met = ecs.get::<&Metabolism>(handle).unwrap();
        assert_eq!(met.energy, 15);
        assert_eq!(ecs.get::<&Vitals>(handle).unwrap().age, 0);
        assert!(!ecs.get::<&Health>(handle).unwrap().infected);
    }

    #[test]
    fn test_plant_gets_flora_not_metabolism() {
        let mut ecs = hecs::World::new();
        let traits = default_traits(Species::Fruit);
        let seed = OrganismSeed::new(Species::Fruit, Sex::Male, Location::new(1, 1)).energy(3);
        let handle = spawn(&mut ecs, seed, &traits);
        assert_eq!(ecs.get::<&Flora>(handle).unwrap().nutrition, 4);
        assert!(ecs.get::<&Metabolism>(handle).is_err());
        assert!(ecs.get::<&Health>(handle).is_err());
    }

    #[test]
    fn test_random_organisms_respect_bounds() {
        let mut ecs = hecs::World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let traits = default_traits(Species::Zebra);
        for _ in 0..200 {
            let h = spawn_random(&mut ecs, Species::Zebra, Location::new(0, 0), &traits, &mut rng);
            let age = ecs.get::<&Vitals>(h).unwrap().age;
            let energy = ecs.get::<&Metabolism>(h).unwrap().energy;
            assert!(age < traits.max_age);
            assert!((1..=15).contains(&energy));
        }
    }

    #[test]
    fn test_seed_energy_is_capped() {
        let mut ecs = hecs::World::new();
        let traits = default_traits(Species::Hyena);
        let seed = OrganismSeed::new(Species::Hyena, Sex::Female, Location::new(0, 0))
            .energy(50)
            .infected(2);
        let h = spawn(&mut ecs, seed, &traits);
        assert_eq!(ecs.get::<&Metabolism>(h).unwrap().energy, 9);
        assert_eq!(ecs.get::<&Health>(h).unwrap().infection_steps, 2);
    }
}
