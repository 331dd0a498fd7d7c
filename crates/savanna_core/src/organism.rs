//! Read access to organisms stored in the entity arena.
//!
//! Organisms are `hecs` entities carrying `Identity` and `Vitals`, plus
//! `Metabolism` and `Health` for animals or `Flora` for plants. Fields refer
//! to them only by handle.

use savanna_data::{Flora, Health, Identity, Location, Metabolism, Species, Vitals};
use serde::{Deserialize, Serialize};

/// Liveness of `handle`. Despawned handles count as dead.
#[must_use]
pub fn is_alive(ecs: &hecs::World, handle: hecs::Entity) -> bool {
    ecs.get::<&Vitals>(handle).is_ok_and(|v| v.alive)
}

#[must_use]
pub fn identity(ecs: &hecs::World, handle: hecs::Entity) -> Option<Identity> {
    ecs.get::<&Identity>(handle).ok().map(|i| *i)
}

#[must_use]
pub fn species(ecs: &hecs::World, handle: hecs::Entity) -> Option<Species> {
    identity(ecs, handle).map(|i| i.species)
}

#[must_use]
pub fn location(ecs: &hecs::World, handle: hecs::Entity) -> Option<Location> {
    ecs.get::<&Vitals>(handle).ok().and_then(|v| v.location)
}

/// Owned copy of one organism's state, for reports, views and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismState {
    pub identity: Identity,
    pub vitals: Vitals,
    pub metabolism: Option<Metabolism>,
    pub health: Option<Health>,
    pub flora: Option<Flora>,
}

impl OrganismState {
    #[must_use]
    pub fn capture(ecs: &hecs::World, handle: hecs::Entity) -> Option<Self> {
        let identity = identity(ecs, handle)?;
        let vitals = (*ecs.get::<&Vitals>(handle).ok()?).clone();
        Some(Self {
            identity,
            vitals,
            metabolism: ecs.get::<&Metabolism>(handle).ok().map(|m| *m),
            health: ecs.get::<&Health>(handle).ok().map(|h| *h),
            flora: ecs.get::<&Flora>(handle).ok().map(|f| *f),
        })
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.vitals.alive
    }

    #[must_use]
    pub fn species(&self) -> Species {
        self.identity.species
    }

    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.vitals.location
    }

    #[must_use]
    pub fn energy(&self) -> Option<u32> {
        self.metabolism.map(|m| m.energy)
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.health.is_some_and(|h| h.infected)
    }
}
