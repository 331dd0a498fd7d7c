use anyhow::{Context, Result};
use savanna_core::config::AppConfig;
use savanna_core::simulation::Simulation;
use std::path::PathBuf;
use std::time::Duration;

use crate::ui::console::ConsoleView;

/// Command-line choices layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub config: Option<PathBuf>,
    pub depth: Option<usize>,
    pub width: Option<usize>,
    pub seed: Option<u64>,
    /// `None` runs the long simulation.
    pub steps: Option<u64>,
    pub render: bool,
}

pub struct App {
    pub simulation: Simulation,
    pub config: AppConfig,
    pub steps: u64,
}

impl App {
    pub fn new(options: AppOptions) -> Result<Self> {
        let mut config = match &options.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(depth) = options.depth {
            config.world.depth = depth;
        }
        if let Some(width) = options.width {
            config.world.width = width;
        }
        if options.seed.is_some() {
            config.world.seed = options.seed;
        }

        let steps = options.steps.unwrap_or(config.world.long_run_steps);
        let delay = if options.render {
            Duration::from_millis(config.world.step_delay_ms)
        } else {
            Duration::ZERO
        };

        let mut simulation =
            Simulation::from_config(config.clone()).context("invalid simulation config")?;
        simulation.set_view(Box::new(ConsoleView::stdout(options.render, delay)));
        simulation.reset();

        Ok(Self {
            simulation,
            config,
            steps,
        })
    }
}
