//! Grid occupancy for one generation.
//!
//! A [`Field`] maps each [`Location`] to at most one organism handle and keeps
//! the handles in placement order. The driver builds a fresh field every step;
//! organisms read the current one and write only into the next one.
//!
//! Range queries come back shuffled. Every directional choice in the model
//! (food, mates, free cells) takes the first match, so the shuffle is what
//! makes movement random while staying reproducible under a seeded generator.

use crate::organism;
use rand::seq::SliceRandom;
use rand::Rng;
use savanna_data::{Location, Role, Species};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    depth: usize,
    width: usize,
    occupants: HashMap<Location, hecs::Entity>,
    organisms: Vec<hecs::Entity>,
}

impl Field {
    #[must_use]
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            occupants: HashMap::new(),
            organisms: Vec::new(),
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn in_bounds(&self, location: Location) -> bool {
        location.row < self.depth && location.col < self.width
    }

    /// Puts `handle` at `location`.
    ///
    /// Whatever was there is dropped from the field without being killed.
    ///
    /// # Panics
    /// If `location` lies outside the grid.
    pub fn place(&mut self, handle: hecs::Entity, location: Location) {
        assert!(
            self.in_bounds(location),
            "placement at {location} outside {}x{} field",
            self.depth,
            self.width
        );
        if let Some(previous) = self.occupants.insert(location, handle) {
            if let Some(pos) = self.organisms.iter().position(|h| *h == previous) {
                self.organisms.remove(pos);
            }
        }
        self.organisms.push(handle);
    }

    #[must_use]
    pub fn occupant_at(&self, location: Location) -> Option<hecs::Entity> {
        self.occupants.get(&location).copied()
    }

    /// Handles in placement order. This is the order organisms act in.
    #[must_use]
    pub fn organisms(&self) -> &[hecs::Entity] {
        &self.organisms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn clear(&mut self) {
        self.occupants.clear();
        self.organisms.clear();
    }

    /// The up to eight neighbors of `location`, shuffled.
    pub fn adjacent_locations<R: Rng>(&self, location: Location, rng: &mut R) -> Vec<Location> {
        self.locations_in_range(location, 1, rng)
    }

    /// Every cell within Chebyshev distance `range` of `location`, excluding
    /// the location itself and clipped to the grid, shuffled.
    pub fn locations_in_range<R: Rng>(
        &self,
        location: Location,
        range: usize,
        rng: &mut R,
    ) -> Vec<Location> {
        let mut locations = self.enumerate_range(location, range);
        locations.shuffle(rng);
        locations
    }

    fn enumerate_range(&self, location: Location, range: usize) -> Vec<Location> {
        if self.depth == 0 || self.width == 0 {
            return Vec::new();
        }
        let row_lo = location.row.saturating_sub(range);
        let row_hi = location.row.saturating_add(range).min(self.depth - 1);
        let col_lo = location.col.saturating_sub(range);
        let col_hi = location.col.saturating_add(range).min(self.width - 1);

        let mut locations = Vec::new();
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let next = Location::new(row, col);
                if next != location {
                    locations.push(next);
                }
            }
        }
        locations
    }

    /// Neighbors that are empty or hold a dead organism, shuffled.
    pub fn free_adjacent_locations<R: Rng>(
        &self,
        location: Location,
        ecs: &hecs::World,
        rng: &mut R,
    ) -> Vec<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .filter(|loc| match self.occupant_at(*loc) {
                None => true,
                Some(handle) => !organism::is_alive(ecs, handle),
            })
            .collect()
    }

    /// Live organisms per species. Every species appears, possibly with zero.
    #[must_use]
    pub fn population_counts(&self, ecs: &hecs::World) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for &handle in &self.organisms {
            if !organism::is_alive(ecs, handle) {
                continue;
            }
            if let Some(species) = organism::species(ecs, handle) {
                counts.increment(species);
            }
        }
        counts
    }

    /// True while every required role has at least one live member.
    #[must_use]
    pub fn is_viable(&self, ecs: &hecs::World, required_roles: &[Role]) -> bool {
        let mut missing: Vec<Role> = required_roles.to_vec();
        for &handle in &self.organisms {
            if missing.is_empty() {
                break;
            }
            if !organism::is_alive(ecs, handle) {
                continue;
            }
            if let Some(species) = organism::species(ecs, handle) {
                let role = species.role();
                missing.retain(|r| *r != role);
            }
        }
        missing.is_empty()
    }

    /// Drops occupants that died after being placed.
    pub fn purge_dead(&mut self, ecs: &hecs::World) -> usize {
        let before = self.organisms.len();
        self.organisms.retain(|h| organism::is_alive(ecs, *h));
        self.occupants.retain(|_, h| organism::is_alive(ecs, *h));
        before - self.organisms.len()
    }
}

/// Live organism counts keyed by species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationCounts(BTreeMap<Species, usize>);

impl Default for PopulationCounts {
    fn default() -> Self {
        Self(Species::ALL.iter().map(|&s| (s, 0)).collect())
    }
}

impl PopulationCounts {
    pub fn increment(&mut self, species: Species) {
        *self.0.entry(species).or_insert(0) += 1;
    }

    #[must_use]
    pub fn get(&self, species: Species) -> usize {
        self.0.get(&species).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn by_role(&self, role: Role) -> usize {
        self.0
            .iter()
            .filter(|(s, _)| s.role() == role)
            .map(|(_, n)| n)
            .sum()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Counts keyed by species display name.
    #[must_use]
    pub fn by_name(&self) -> BTreeMap<&'static str, usize> {
        self.0.iter().map(|(s, n)| (s.name(), *n)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, usize)> + '_ {
        self.0.iter().map(|(s, n)| (*s, *n))
    }
}

impl fmt::Display for PopulationCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (species, count) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{species}: {count}")?;
            first = false;
        }
        Ok(())
    }
}
