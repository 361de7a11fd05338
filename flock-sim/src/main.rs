use anyhow::{Context, Result};
use clap::Parser;
use flock_shared::UpdateOrderSetting;
use flock_sim::{IndexKind, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boids flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file; defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the population size from the settings
    #[arg(short, long)]
    population: Option<usize>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Spawn seed; a random one is drawn and logged when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Neighbor index
    #[arg(long, value_enum, default_value_t = IndexKind::BruteForce)]
    index: IndexKind,

    /// Read a start-of-tick snapshot instead of stepping agents in place
    #[arg(long)]
    simultaneous: bool,

    /// Write a JSON report to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also snapshot every N ticks into the report
    #[arg(long)]
    snapshot_every: Option<u64>,

    /// Log a status line every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Flock simulation starting...");

    let mut settings = flock_sim::load_settings(args.config.as_deref())?;
    if let Some(population) = args.population {
        settings.population_size = population;
    }
    if args.simultaneous {
        settings.update_order = UpdateOrderSetting::Simultaneous;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    if args.seed.is_none() {
        log::info!("Using random seed {}", seed);
    }

    let options = RunOptions {
        ticks: args.ticks,
        dt: args.dt,
        seed,
        index: args.index,
        snapshot_every: args.snapshot_every,
        report_every: args.report_every,
    };

    let report = flock_sim::run(&settings, &options).context("Simulation failed")?;

    let status = report.last.status;
    log::info!(
        "Finished after {} ticks: centroid=({:.2}, {:.2}) mean speed {:.2}, polarization {:.3}",
        report.last.tick,
        status.centroid.x,
        status.centroid.y,
        status.mean_speed,
        status.polarization
    );

    if let Some(path) = args.output {
        flock_sim::write_report(&path, &report)?;
    }

    Ok(())
}
