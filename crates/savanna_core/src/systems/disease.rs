//! Infection: spontaneous outbreaks, contagion between neighbors, cures and
//! death by countdown. Any live animal can carry it; plants never do.
//!
//! Every probability here drops by one point per degree above the reference
//! temperature.

use super::{kill, StepContext};
use crate::config::DiseaseConfig;
use crate::environment::Weather;
use crate::metrics::StepTally;
use crate::organism;
use rand::Rng;
use savanna_data::{DeathCause, Health, Location, Metabolism};

/// Advances an infection carried by `handle`: try a cure, spread to
/// neighbors, then count down. Returns `true` if the animal died.
pub fn progress<R: Rng>(ctx: &mut StepContext<'_, R>, handle: hecs::Entity, location: Location) -> bool {
    let infected = ctx
        .ecs
        .get::<&Health>(handle)
        .is_ok_and(|h| h.infected);
    if !infected {
        return false;
    }

    let config = ctx.config;
    let disease = &config.disease;
    let fraction = ctx
        .ecs
        .get::<&Metabolism>(handle)
        .map(|m| m.fraction())
        .unwrap_or(0.0);
    if can_cure(disease, ctx.weather.temperature, fraction) {
        if let Ok(mut health) = ctx.ecs.get::<&mut Health>(handle) {
            health.cure();
        }
        ctx.tally.cures += 1;
        tracing::trace!(?handle, "infection cured");
        return false;
    }

    spread(ctx, location);

    let expired = ctx
        .ecs
        .get::<&mut Health>(handle)
        .map(|mut h| h.tick())
        .unwrap_or(false);
    if expired {
        kill(ctx.ecs, ctx.tally, handle, DeathCause::Disease);
        return true;
    }
    false
}

#[must_use]
pub fn can_cure(disease: &DiseaseConfig, temperature: i32, energy_fraction: f64) -> bool {
    temperature > disease.cure_temp_threshold && energy_fraction > disease.cure_energy_threshold
}

/// Gives every live, healthy animal next to `location` an independent chance
/// of catching the infection.
fn spread<R: Rng>(ctx: &mut StepContext<'_, R>, location: Location) {
    let config = ctx.config;
    let disease = &config.disease;
    let probability = disease.neighbor_infection_probability(ctx.weather.temperature);
    let neighbors = ctx.current.adjacent_locations(location, ctx.rng);
    for loc in neighbors {
        let Some(other) = ctx.current.occupant_at(loc) else {
            continue;
        };
        if !organism::is_alive(ctx.ecs, other) {
            continue;
        }
        let Ok(mut health) = ctx.ecs.get::<&mut Health>(other) else {
            continue;
        };
        if health.infected {
            continue;
        }
        if ctx.rng.gen_bool(probability) {
            health.infect(disease.infection_steps);
            ctx.tally.infections += 1;
        }
    }
}

/// The driver's per-organism outbreak roll, made right after the organism
/// has acted. Returns `true` if a new infection started.
pub fn outbreak_roll<R: Rng>(
    ecs: &hecs::World,
    handle: hecs::Entity,
    disease: &DiseaseConfig,
    weather: &Weather,
    rng: &mut R,
    tally: &mut StepTally,
) -> bool {
    if !organism::is_alive(ecs, handle) {
        return false;
    }
    let Ok(mut health) = ecs.get::<&mut Health>(handle) else {
        return false;
    };
    if health.infected {
        return false;
    }
    if rng.gen_bool(disease.infection_probability(weather.temperature)) {
        health.infect(disease.infection_steps);
        tally.infections += 1;
        return true;
    }
    false
}
