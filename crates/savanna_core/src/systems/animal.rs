//! The shared step for every carnivore and herbivore.
//!
//! Order within a step: age, energy decay, disease, sleep gate, breeding,
//! then feeding and movement. Each stage may end the animal's step.

use super::{disease, give_birth, grow_older, is_free_in_next, kill, relocate, StepContext};
use crate::organism;
use crate::species::{AnimalTraits, SpeciesTraits};
use rand::Rng;
use savanna_data::{DeathCause, Flora, Identity, Location, Metabolism, Vitals};

pub fn act<R: Rng>(ctx: &mut StepContext<'_, R>, handle: hecs::Entity, identity: Identity) {
    let config = ctx.config;
    let traits = config.traits(identity.species);
    let Some(animal) = traits.animal.as_ref() else {
        return;
    };

    if !grow_older(ctx, handle, traits) {
        return;
    }
    if !burn_energy(ctx, handle) {
        return;
    }
    let Some(location) = organism::location(ctx.ecs, handle) else {
        return;
    };
    if disease::progress(ctx, handle, location) {
        return;
    }

    if animal.is_asleep(ctx.hour) {
        rest(ctx, handle, location);
        return;
    }

    let mut free = ctx.next.free_adjacent_locations(location, ctx.ecs, ctx.rng);
    if !free.is_empty() {
        let age = ctx.ecs.get::<&Vitals>(handle).map(|v| v.age).unwrap_or(0);
        give_birth(
            ctx,
            (identity, location, age),
            traits,
            traits.breeding_probability,
            &mut free,
        );
    }

    let range = animal.search_range(ctx.hour);
    let destination = find_food(ctx, handle, location, animal, range).or_else(|| {
        if free.is_empty() {
            None
        } else {
            Some(free.remove(0))
        }
    });
    match destination {
        Some(next_location) => relocate(ctx, handle, next_location),
        None => kill(ctx.ecs, ctx.tally, handle, DeathCause::Overcrowding),
    }
}

/// One unit of stamina or food level. Returns `false` if the animal starved.
fn burn_energy<R: Rng>(ctx: &mut StepContext<'_, R>, handle: hecs::Entity) -> bool {
    let starved = match ctx.ecs.get::<&mut Metabolism>(handle) {
        Ok(mut metabolism) => metabolism.decay(),
        Err(_) => return false,
    };
    if starved {
        kill(ctx.ecs, ctx.tally, handle, DeathCause::Starvation);
        return false;
    }
    true
}

/// A sleeping animal keeps its cell if nobody has claimed it in the next
/// field, otherwise shuffles to a free neighbor, otherwise is crowded out.
fn rest<R: Rng>(ctx: &mut StepContext<'_, R>, handle: hecs::Entity, location: Location) {
    if is_free_in_next(ctx, location) {
        relocate(ctx, handle, location);
        return;
    }
    let free = ctx.next.free_adjacent_locations(location, ctx.ecs, ctx.rng);
    match free.first() {
        Some(&next_location) => relocate(ctx, handle, next_location),
        None => kill(ctx.ecs, ctx.tally, handle, DeathCause::Overcrowding),
    }
}

/// Scans the shuffled search range once and eats the first live organism the
/// diet allows, whatever its species. Prey whose cell is already claimed in
/// the next field is passed over. Returns where the meal was.
pub(crate) fn find_food<R: Rng>(
    ctx: &mut StepContext<'_, R>,
    handle: hecs::Entity,
    location: Location,
    animal: &AnimalTraits,
    range: usize,
) -> Option<Location> {
    let candidates = ctx.current.locations_in_range(location, range, ctx.rng);
    for loc in candidates {
        let Some(victim) = ctx.current.occupant_at(loc) else {
            continue;
        };
        if victim == handle || !organism::is_alive(ctx.ecs, victim) {
            continue;
        }
        let Some(prey) = organism::species(ctx.ecs, victim) else {
            continue;
        };
        if !animal.eats(prey) {
            continue;
        }
        // Someone else already moved into the victim's cell.
        if ctx
            .next
            .occupant_at(loc)
            .is_some_and(|claimed| claimed != victim && organism::is_alive(ctx.ecs, claimed))
        {
            continue;
        }

        let nutrition = meal_value(ctx, victim, ctx.config.traits(prey));
        kill(ctx.ecs, ctx.tally, victim, DeathCause::Predation);
        if let Ok(mut metabolism) = ctx.ecs.get::<&mut Metabolism>(handle) {
            metabolism.energy =
                animal
                    .energy_policy
                    .credit(metabolism.energy, nutrition, metabolism.max_energy);
        }
        tracing::trace!(%prey, %loc, nutrition, "meal");
        return Some(loc);
    }
    None
}

/// Plants carry their own nutrition; animals are worth their species value.
fn meal_value<R: Rng>(
    ctx: &StepContext<'_, R>,
    victim: hecs::Entity,
    victim_traits: &SpeciesTraits,
) -> u32 {
    ctx.ecs
        .get::<&Flora>(victim)
        .map(|f| f.nutrition)
        .unwrap_or(victim_traits.nutrition)
}
