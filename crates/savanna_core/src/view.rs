//! One-way notification contract between the driver and whatever displays it.

use crate::field::{Field, PopulationCounts};
use crate::organism;
use savanna_data::{Location, Species};
use serde::{Deserialize, Serialize};

/// Owned picture of a committed field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
    pub depth: usize,
    pub width: usize,
    pub occupants: Vec<(Location, Species)>,
    pub counts: PopulationCounts,
}

impl FieldSnapshot {
    /// Captures the live occupants of `field`, in acting order.
    #[must_use]
    pub fn from_field(field: &Field, ecs: &hecs::World) -> Self {
        let occupants = field
            .organisms()
            .iter()
            .filter(|h| organism::is_alive(ecs, **h))
            .filter_map(|&h| Some((organism::location(ecs, h)?, organism::species(ecs, h)?)))
            .collect();
        Self {
            depth: field.depth(),
            width: field.width(),
            occupants,
            counts: field.population_counts(ecs),
        }
    }

    #[must_use]
    pub fn species_at(&self, location: Location) -> Option<Species> {
        self.occupants
            .iter()
            .find(|(loc, _)| *loc == location)
            .map(|(_, s)| *s)
    }
}

/// Receives a snapshot after every reset and every step. The driver never
/// reads anything back.
pub trait SimulationView {
    fn on_step(&mut self, step: u64, snapshot: &FieldSnapshot);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl SimulationView for NullView {
    fn on_step(&mut self, _step: u64, _snapshot: &FieldSnapshot) {}
}
