use anyhow::Result;
use clap::Parser;
use savanna_lib::app::{App, AppOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid rows
    #[arg(long)]
    depth: Option<usize>,

    /// Grid columns
    #[arg(long)]
    width: Option<usize>,

    /// Number of steps to run
    #[arg(short, long, conflicts_with = "long")]
    steps: Option<u64>,

    /// Run the long simulation (the default when no step count is given)
    #[arg(long)]
    long: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Custom config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw the grid after every step
    #[arg(short, long)]
    render: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    savanna_core::metrics::init_logging(args.verbose);

    let mut app = App::new(AppOptions {
        config: args.config,
        depth: args.depth,
        width: args.width,
        seed: args.seed,
        steps: if args.long { None } else { args.steps },
        render: args.render,
    })?;

    let summary = app.run();
    println!("{summary}");
    Ok(())
}
