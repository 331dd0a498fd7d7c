use savanna_core::view::{FieldSnapshot, SimulationView};
use std::io::{self, Write};
use std::time::Duration;

use super::renderer;

/// Prints a population line per step and, when rendering, the grid itself.
pub struct ConsoleView<W: Write> {
    out: W,
    render: bool,
    delay: Duration,
}

impl ConsoleView<io::Stdout> {
    #[must_use]
    pub fn stdout(render: bool, delay: Duration) -> Self {
        Self::new(io::stdout(), render, delay)
    }
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W, render: bool, delay: Duration) -> Self {
        Self { out, render, delay }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, step: u64, snapshot: &FieldSnapshot) -> io::Result<()> {
        writeln!(self.out, "Step: {step} Population: {}", snapshot.counts)?;
        if self.render {
            write!(self.out, "{}", renderer::render_grid(snapshot))?;
            writeln!(self.out, "{}", renderer::legend())?;
        }
        self.out.flush()
    }
}

impl<W: Write> SimulationView for ConsoleView<W> {
    fn on_step(&mut self, step: u64, snapshot: &FieldSnapshot) {
        if let Err(e) = self.draw(step, snapshot) {
            tracing::warn!("failed to write step {step}: {e}");
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}
