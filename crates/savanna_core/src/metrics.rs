//! Run statistics and logging setup.
//!
//! Per-step tallies roll up into a run-wide [`Metrics`] collector that logs a
//! population summary every `log_interval` steps.

use crate::field::PopulationCounts;
use savanna_data::DeathCause;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// What happened during a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTally {
    pub births: usize,
    pub deaths: BTreeMap<DeathCause, usize>,
    pub infections: usize,
    pub cures: usize,
}

impl StepTally {
    pub fn record_death(&mut self, cause: DeathCause) {
        *self.deaths.entry(cause).or_insert(0) += 1;
    }

    #[must_use]
    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.deaths.get(&cause).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_deaths(&self) -> usize {
        self.deaths.values().sum()
    }
}

/// Totals across a whole run.
pub struct Metrics {
    steps: u64,
    births: u64,
    deaths: BTreeMap<DeathCause, u64>,
    infections: u64,
    cures: u64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            steps: 0,
            births: 0,
            deaths: BTreeMap::new(),
            infections: 0,
            cures: 0,
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Folds a finished step into the totals.
    pub fn record_step(&mut self, tally: &StepTally, counts: &PopulationCounts, duration: Duration) {
        self.steps += 1;
        self.births += tally.births as u64;
        self.infections += tally.infections as u64;
        self.cures += tally.cures as u64;
        for (cause, n) in &tally.deaths {
            *self.deaths.entry(*cause).or_insert(0) += *n as u64;
        }

        if self.steps % self.log_interval == 0 {
            tracing::info!(
                step = self.steps,
                population = counts.total(),
                births = self.births,
                deaths = self.total_deaths(),
                duration_us = duration.as_micros() as u64,
                "{counts}"
            );
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.log_interval);
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births
    }

    #[must_use]
    pub fn deaths_by(&self, cause: DeathCause) -> u64 {
        self.deaths.get(&cause).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_deaths(&self) -> u64 {
        self.deaths.values().sum()
    }

    #[must_use]
    pub fn infections(&self) -> u64 {
        self.infections
    }

    #[must_use]
    pub fn cures(&self) -> u64 {
        self.cures
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = info, 1 = debug, 2+ = trace).
pub fn init_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
