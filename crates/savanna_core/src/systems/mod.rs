//! Per-step behavior of organisms.
//!
//! Each system reads the current field, mutates organism components in the
//! arena, and writes placements into the next field only.

pub mod animal;
pub mod disease;
pub mod plant;

use crate::config::AppConfig;
use crate::environment::Weather;
use crate::field::Field;
use crate::lifecycle;
use crate::metrics::StepTally;
use crate::organism;
use crate::species::SpeciesTraits;
use rand::Rng;
use savanna_data::{DeathCause, Identity, Kingdom, Location, Vitals};

/// Everything an organism may see or touch while it acts.
pub struct StepContext<'a, R: Rng> {
    pub config: &'a AppConfig,
    pub current: &'a Field,
    pub next: &'a mut Field,
    pub ecs: &'a mut hecs::World,
    pub hour: u8,
    pub weather: &'a Weather,
    pub rng: &'a mut R,
    pub tally: &'a mut StepTally,
}

/// Runs one organism's step. Dead or despawned handles are skipped.
pub fn act<R: Rng>(ctx: &mut StepContext<'_, R>, handle: hecs::Entity) {
    if !organism::is_alive(ctx.ecs, handle) {
        return;
    }
    let Some(identity) = organism::identity(ctx.ecs, handle) else {
        return;
    };
    match identity.species.kingdom() {
        Kingdom::Animal => animal::act(ctx, handle, identity),
        Kingdom::Plant => plant::act(ctx, handle, identity),
    }
}

/// Marks `handle` dead and records why. Already-dead organisms are left alone.
pub(crate) fn kill(
    ecs: &mut hecs::World,
    tally: &mut StepTally,
    handle: hecs::Entity,
    cause: DeathCause,
) {
    if let Ok(mut vitals) = ecs.get::<&mut Vitals>(handle) {
        if !vitals.alive {
            return;
        }
        tracing::trace!(?handle, location = ?vitals.location, %cause, "organism died");
        vitals.set_dead();
        tally.record_death(cause);
    }
}

/// Ages the organism by one step. Returns `false` if it died of old age.
pub(crate) fn grow_older<R: Rng>(
    ctx: &mut StepContext<'_, R>,
    handle: hecs::Entity,
    traits: &SpeciesTraits,
) -> bool {
    let too_old = match ctx.ecs.get::<&mut Vitals>(handle) {
        Ok(mut vitals) => {
            vitals.age += 1;
            vitals.age > traits.max_age
        }
        Err(_) => return false,
    };
    if too_old {
        kill(ctx.ecs, ctx.tally, handle, DeathCause::OldAge);
        return false;
    }
    true
}

/// Number of offspring this step: zero unless old enough and the roll succeeds.
pub(crate) fn breed<R: Rng>(rng: &mut R, age: u32, traits: &SpeciesTraits, probability: f64) -> u32 {
    if age >= traits.breeding_age && rng.gen::<f64>() <= probability {
        rng.gen_range(1..=traits.max_litter_size.max(1))
    } else {
        0
    }
}

/// True when a live conspecific of the opposite sex sits within the
/// visibility-adjusted mate range in the current field.
pub(crate) fn has_mate<R: Rng>(
    ctx: &mut StepContext<'_, R>,
    location: Location,
    identity: Identity,
    traits: &SpeciesTraits,
) -> bool {
    let range = traits.effective_mate_range(ctx.weather.visibility);
    let candidates = ctx.current.locations_in_range(location, range, ctx.rng);
    candidates.into_iter().any(|loc| {
        ctx.current.occupant_at(loc).is_some_and(|other| {
            organism::is_alive(ctx.ecs, other)
                && organism::identity(ctx.ecs, other).is_some_and(|i| {
                    i.species == identity.species && i.sex == identity.sex.opposite()
                })
        })
    })
}

/// Rolls for a litter and places newborns into `free`, consuming cells from
/// the front. Returns how many were born.
pub(crate) fn give_birth<R: Rng>(
    ctx: &mut StepContext<'_, R>,
    parent: (Identity, Location, u32),
    traits: &SpeciesTraits,
    probability: f64,
    free: &mut Vec<Location>,
) -> usize {
    let (identity, location, age) = parent;
    let births = breed(ctx.rng, age, traits, probability);
    if births == 0 || !has_mate(ctx, location, identity, traits) {
        return 0;
    }
    let count = (births as usize).min(free.len());
    for loc in free.drain(..count) {
        let young = lifecycle::spawn_newborn(ctx.ecs, identity.species, loc, traits, ctx.rng);
        ctx.next.place(young, loc);
    }
    ctx.tally.births += count;
    tracing::trace!(species = %identity.species, %location, count, "births");
    count
}

/// Whether a cell of the next field can still be claimed.
pub(crate) fn is_free_in_next<R: Rng>(ctx: &StepContext<'_, R>, location: Location) -> bool {
    match ctx.next.occupant_at(location) {
        None => true,
        Some(other) => !organism::is_alive(ctx.ecs, other),
    }
}

/// Moves `handle` to `location` in the next field.
pub(crate) fn relocate<R: Rng>(
    ctx: &mut StepContext<'_, R>,
    handle: hecs::Entity,
    location: Location,
) {
    if let Ok(mut vitals) = ctx.ecs.get::<&mut Vitals>(handle) {
        vitals.location = Some(location);
    }
    ctx.next.place(handle, location);
}
