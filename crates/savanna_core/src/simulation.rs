//! The simulation driver.
//!
//! Owns the organism arena, the committed field, the clock, the weather and
//! the single random stream. Each step builds a fresh field, lets every
//! organism of the committed field act into it in placement order, then
//! commits it.

use crate::config::{AppConfig, DEFAULT_DEPTH, DEFAULT_WIDTH};
use crate::environment::{Clock, Weather};
use crate::error::Result;
use crate::field::{Field, PopulationCounts};
use crate::lifecycle::{self, OrganismSeed};
use crate::metrics::{Metrics, StepTally};
use crate::organism::{self, OrganismState};
use crate::species::POPULATE_ORDER;
use crate::systems::{self, disease, StepContext};
use crate::view::{FieldSnapshot, SimulationView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use savanna_data::{DeathCause, Health, Location};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// A required role died out.
    NotViable,
    StepBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Populated,
    Stepping,
    Terminated(TerminationReason),
}

/// Outcome of one [`Simulation::step`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: u64,
    pub hour: u8,
    pub weather: Weather,
    pub counts: PopulationCounts,
    pub births: usize,
    pub deaths: BTreeMap<DeathCause, usize>,
    pub new_infections: usize,
    pub cures: usize,
    /// Live infected animals after the step.
    pub infected: usize,
}

impl StepReport {
    #[must_use]
    pub fn total_deaths(&self) -> usize {
        self.deaths.values().sum()
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step: {} {:02}:00 {} | {} | births {} deaths {} infected {}",
            self.step,
            self.hour,
            self.weather,
            self.counts,
            self.births,
            self.total_deaths(),
            self.infected
        )
    }
}

pub struct Simulation {
    config: AppConfig,
    ecs: hecs::World,
    field: Field,
    clock: Clock,
    weather: Weather,
    rng: ChaCha8Rng,
    step: u64,
    phase: Phase,
    metrics: Metrics,
    view: Option<Box<dyn SimulationView>>,
}

impl Simulation {
    /// A populated simulation on a `depth` x `width` grid with default
    /// settings. Zero dimensions fall back to the defaults.
    #[must_use]
    pub fn new(depth: usize, width: usize) -> Self {
        let mut config = AppConfig::default();
        config.world.depth = depth;
        config.world.width = width;
        let mut sim = Self::build(config);
        sim.reset();
        sim
    }

    /// An idle simulation with an empty field. Call [`Simulation::reset`] to
    /// populate it, or [`Simulation::spawn`] to place organisms by hand.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(mut config: AppConfig) -> Self {
        if config.world.depth == 0 || config.world.width == 0 {
            tracing::warn!(
                depth = config.world.depth,
                width = config.world.width,
                "grid dimensions must be positive, using {DEFAULT_DEPTH}x{DEFAULT_WIDTH}"
            );
            config.world.depth = DEFAULT_DEPTH;
            config.world.width = DEFAULT_WIDTH;
        }

        let mut rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let weather = Weather::new(config.weather.clone(), &mut rng);
        let mut clock = Clock::default();
        clock.reset(config.world.start_hour, &mut rng);

        Self {
            field: Field::new(config.world.depth, config.world.width),
            ecs: hecs::World::new(),
            clock,
            weather,
            rng,
            step: 0,
            phase: Phase::Idle,
            metrics: Metrics::new(config.world.log_interval),
            view: None,
            config,
        }
    }

    /// Clears the field and repopulates it at random, then restarts the clock.
    pub fn reset(&mut self) {
        self.field.clear();
        self.ecs.clear();
        self.step = 0;
        self.metrics.reset();
        self.populate();
        self.clock.reset(self.config.world.start_hour, &mut self.rng);
        self.phase = Phase::Populated;

        tracing::info!(
            depth = self.field.depth(),
            width = self.field.width(),
            population = self.field.len(),
            hour = self.clock.hour(),
            "field populated"
        );
        self.notify();
    }

    /// Each cell rolls for each species in turn; the first success takes it.
    fn populate(&mut self) {
        for row in 0..self.field.depth() {
            for col in 0..self.field.width() {
                let location = Location::new(row, col);
                for species in POPULATE_ORDER {
                    let traits = self.config.traits(species);
                    if self.rng.gen::<f64>() < traits.creation_probability {
                        let handle = lifecycle::spawn_random(
                            &mut self.ecs,
                            species,
                            location,
                            traits,
                            &mut self.rng,
                        );
                        self.field.place(handle, location);
                        break;
                    }
                }
            }
        }
    }

    /// Places a hand-built organism into the committed field, replacing any
    /// occupant of that cell.
    ///
    /// # Panics
    /// If the seed's location lies outside the grid.
    pub fn spawn(&mut self, seed: OrganismSeed) -> hecs::Entity {
        let traits = self.config.traits(seed.species);
        let handle = lifecycle::spawn(&mut self.ecs, seed, traits);
        if let Some(previous) = self.field.occupant_at(seed.location) {
            self.ecs.despawn(previous).ok();
        }
        self.field.place(handle, seed.location);
        if self.phase == Phase::Idle {
            self.phase = Phase::Populated;
        }
        handle
    }

    /// Advances the world by one step.
    pub fn step(&mut self) -> StepReport {
        let started = Instant::now();
        self.phase = Phase::Stepping;
        self.step += 1;
        self.clock.tick();
        self.weather.change(&mut self.rng);

        let mut next = Field::new(self.field.depth(), self.field.width());
        let mut tally = StepTally::default();
        {
            let mut ctx = StepContext {
                config: &self.config,
                current: &self.field,
                next: &mut next,
                ecs: &mut self.ecs,
                hour: self.clock.hour(),
                weather: &self.weather,
                rng: &mut self.rng,
                tally: &mut tally,
            };
            for &handle in self.field.organisms() {
                systems::act(&mut ctx, handle);
                disease::outbreak_roll(
                    ctx.ecs,
                    handle,
                    &self.config.disease,
                    ctx.weather,
                    &mut *ctx.rng,
                    &mut *ctx.tally,
                );
            }
        }

        next.purge_dead(&self.ecs);
        self.field = next;
        self.despawn_unreferenced();

        let counts = self.field.population_counts(&self.ecs);
        self.metrics.record_step(&tally, &counts, started.elapsed());
        let report = StepReport {
            step: self.step,
            hour: self.clock.hour(),
            weather: self.weather.clone(),
            counts,
            births: tally.births,
            deaths: tally.deaths,
            new_infections: tally.infections,
            cures: tally.cures,
            infected: self.infected_count(),
        };
        tracing::debug!(
            new_infections = report.new_infections,
            cures = report.cures,
            "{report}"
        );
        self.notify();
        report
    }

    /// Steps while the field stays viable, at most `max_steps` times.
    /// Returns how many steps ran.
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let mut taken = 0;
        while taken < max_steps && self.is_viable() {
            self.step();
            taken += 1;
        }
        let reason = if self.is_viable() {
            TerminationReason::StepBudget
        } else {
            TerminationReason::NotViable
        };
        self.phase = Phase::Terminated(reason);
        tracing::info!(steps = taken, ?reason, "run finished");
        taken
    }

    pub fn run_long(&mut self) -> u64 {
        self.run(self.config.world.long_run_steps)
    }

    /// Drops every arena entity the committed field no longer refers to.
    fn despawn_unreferenced(&mut self) {
        let kept: HashSet<hecs::Entity> = self.field.organisms().iter().copied().collect();
        let stale: Vec<hecs::Entity> = self
            .ecs
            .iter()
            .map(|e| e.entity())
            .filter(|h| !kept.contains(h))
            .collect();
        for handle in stale {
            self.ecs.despawn(handle).ok();
        }
    }

    fn infected_count(&self) -> usize {
        self.field
            .organisms()
            .iter()
            .filter(|&&h| {
                organism::is_alive(&self.ecs, h)
                    && self.ecs.get::<&Health>(h).is_ok_and(|health| health.infected)
            })
            .count()
    }

    fn notify(&mut self) {
        if self.view.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(view) = self.view.as_mut() {
            view.on_step(self.step, &snapshot);
        }
    }

    pub fn set_view(&mut self, view: Box<dyn SimulationView>) {
        self.view = Some(view);
    }

    #[must_use]
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot::from_field(&self.field, &self.ecs)
    }

    #[must_use]
    pub fn population_counts(&self) -> PopulationCounts {
        self.field.population_counts(&self.ecs)
    }

    #[must_use]
    pub fn is_viable(&self) -> bool {
        self.field
            .is_viable(&self.ecs, &self.config.world.required_roles)
    }

    #[must_use]
    pub fn organism(&self, handle: hecs::Entity) -> Option<OrganismState> {
        OrganismState::capture(&self.ecs, handle)
    }

    #[must_use]
    pub fn organism_at(&self, location: Location) -> Option<OrganismState> {
        self.field
            .occupant_at(location)
            .and_then(|h| self.organism(h))
    }

    /// Live organisms of the committed field, in acting order.
    #[must_use]
    pub fn organisms(&self) -> Vec<(hecs::Entity, OrganismState)> {
        self.field
            .organisms()
            .iter()
            .filter_map(|&h| Some((h, self.organism(h)?)))
            .collect()
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn weather_mut(&mut self) -> &mut Weather {
        &mut self.weather
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savanna_data::{Role, Sex, Species};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seeded(depth: usize, width: usize, seed: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.world.depth = depth;
        config.world.width = width;
        config.world.seed = Some(seed);
        config.world.start_hour = Some(23);
        config
    }

    #[test]
    fn test_zero_dimensions_fall_back() {
        let sim = Simulation::new(0, 50);
        assert_eq!(sim.field().depth(), DEFAULT_DEPTH);
        assert_eq!(sim.field().width(), DEFAULT_WIDTH);
        assert_eq!(sim.phase(), Phase::Populated);
    }

    #[test]
    fn test_reset_is_reproducible() {
        let mut a = Simulation::from_config(seeded(30, 40, 7)).unwrap();
        let mut b = Simulation::from_config(seeded(30, 40, 7)).unwrap();
        a.reset();
        b.reset();
        assert!(!a.field().is_empty());
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.step(), b.step());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_populated_cells_hold_one_organism() {
        let mut sim = Simulation::from_config(seeded(20, 20, 3)).unwrap();
        sim.reset();
        let snapshot = sim.snapshot();
        let cells: HashSet<_> = snapshot.occupants.iter().map(|(l, _)| *l).collect();
        assert_eq!(cells.len(), snapshot.occupants.len());
        assert_eq!(snapshot.counts.total(), snapshot.occupants.len());
    }

    #[test]
    fn test_run_on_empty_field_terminates_immediately() {
        let mut sim = Simulation::from_config(seeded(5, 5, 1)).unwrap();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.run(10), 0);
        assert_eq!(
            sim.phase(),
            Phase::Terminated(TerminationReason::NotViable)
        );
    }

    #[test]
    fn test_run_respects_step_budget() {
        let mut config = seeded(5, 5, 2);
        config.world.required_roles = vec![Role::Plant];
        let mut sim = Simulation::from_config(config).unwrap();
        sim.spawn(OrganismSeed::new(Species::Grass, Sex::Male, Location::new(2, 2)).age(0));
        assert_eq!(sim.run(3), 3);
        assert_eq!(sim.step_count(), 3);
        assert_eq!(
            sim.phase(),
            Phase::Terminated(TerminationReason::StepBudget)
        );
    }

    #[test]
    fn test_starving_predator_dies() {
        let mut sim = Simulation::from_config(seeded(3, 3, 4)).unwrap();
        sim.spawn(
            OrganismSeed::new(Species::Lion, Sex::Male, Location::new(1, 1))
                .age(30)
                .energy(1),
        );
        let report = sim.step();
        assert_eq!(report.deaths.get(&DeathCause::Starvation), Some(&1));
        assert!(sim.field().is_empty());
        assert_eq!(sim.metrics().deaths_by(DeathCause::Starvation), 1);
    }

    #[test]
    fn test_step_report_line() {
        let mut sim = Simulation::from_config(seeded(3, 3, 4)).unwrap();
        sim.spawn(
            OrganismSeed::new(Species::Lion, Sex::Male, Location::new(1, 1))
                .age(30)
                .energy(1),
        );
        let line = sim.step().to_string();
        assert!(line.starts_with("Step: 1 00:00 "), "{line}");
        assert!(line.ends_with("births 0 deaths 1 infected 0"), "{line}");
    }

    #[test]
    fn test_dead_are_despawned() {
        let mut sim = Simulation::from_config(seeded(3, 3, 4)).unwrap();
        let lion = sim.spawn(
            OrganismSeed::new(Species::Lion, Sex::Male, Location::new(1, 1))
                .age(30)
                .energy(1),
        );
        sim.step();
        assert!(sim.organism(lion).is_none());
    }

    struct Recorder(Rc<RefCell<Vec<u64>>>);

    impl SimulationView for Recorder {
        fn on_step(&mut self, step: u64, _snapshot: &FieldSnapshot) {
            self.0.borrow_mut().push(step);
        }
    }

    #[test]
    fn test_view_notified_after_reset_and_steps() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sim = Simulation::from_config(seeded(10, 10, 5)).unwrap();
        sim.set_view(Box::new(Recorder(Rc::clone(&seen))));
        sim.reset();
        sim.step();
        sim.step();
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }
}
