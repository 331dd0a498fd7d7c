pub mod state;

pub use state::{App, AppOptions};

use savanna_core::field::PopulationCounts;
use savanna_core::simulation::Phase;
use savanna_data::DeathCause;
use std::fmt;
use std::time::Duration;

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: u64,
    pub phase: Phase,
    pub counts: PopulationCounts,
    pub births: u64,
    pub deaths: Vec<(DeathCause, u64)>,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ran {} steps ({:?}) in {:.2?}", self.steps, self.phase, self.elapsed)?;
        writeln!(f, "Final population: {}", self.counts)?;
        write!(f, "Births: {}", self.births)?;
        for (cause, n) in &self.deaths {
            write!(f, ", {cause}: {n}")?;
        }
        Ok(())
    }
}

impl App {
    /// Runs until the step budget is spent or the field stops being viable.
    pub fn run(&mut self) -> RunSummary {
        tracing::info!(steps = self.steps, "starting run");
        let steps = self.simulation.run(self.steps);
        let metrics = self.simulation.metrics();
        let deaths = [
            DeathCause::OldAge,
            DeathCause::Starvation,
            DeathCause::Disease,
            DeathCause::Overcrowding,
            DeathCause::Predation,
        ]
        .into_iter()
        .map(|cause| (cause, metrics.deaths_by(cause)))
        .collect();

        RunSummary {
            steps,
            phase: self.simulation.phase(),
            counts: self.simulation.population_counts(),
            births: metrics.births(),
            deaths,
            elapsed: metrics.elapsed(),
        }
    }
}
