//! Plants age, seed neighboring cells and stay where they are.

use super::{give_birth, grow_older, is_free_in_next, kill, relocate, StepContext};
use crate::organism;
use rand::Rng;
use savanna_data::{DeathCause, Identity, Vitals};

pub fn act<R: Rng>(ctx: &mut StepContext<'_, R>, handle: hecs::Entity, identity: Identity) {
    let config = ctx.config;
    let traits = config.traits(identity.species);

    if !grow_older(ctx, handle, traits) {
        return;
    }
    let Some(location) = organism::location(ctx.ecs, handle) else {
        return;
    };

    let mut free = ctx.next.free_adjacent_locations(location, ctx.ecs, ctx.rng);
    if !free.is_empty() {
        let mut probability = traits.breeding_probability;
        if ctx.weather.rain {
            probability = (probability * config.weather.rain_breeding_multiplier).min(1.0);
        }
        let age = ctx.ecs.get::<&Vitals>(handle).map(|v| v.age).unwrap_or(0);
        give_birth(ctx, (identity, location, age), traits, probability, &mut free);
    }

    // Something that moved in first crowds the plant out.
    if is_free_in_next(ctx, location) {
        relocate(ctx, handle, location);
    } else {
        kill(ctx.ecs, ctx.tally, handle, DeathCause::Overcrowding);
    }
}
