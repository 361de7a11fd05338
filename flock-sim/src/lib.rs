//! Headless flock runner: loads settings, ticks a flock and collects
//! snapshots.

use anyhow::{Context, Result};
use flock_core::{Flock, NeighborIndex};
use flock_shared::{FlockSettings, FlockSnapshot};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Which neighbor index the flock uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IndexKind {
    /// Scan every agent on every query
    #[default]
    BruteForce,
    /// Uniform grid with cells the size of the detection range
    Grid,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub ticks: u64,
    pub dt: f32,
    pub seed: u64,
    pub index: IndexKind,
    /// Capture a snapshot every this many ticks, in addition to the final one
    pub snapshot_every: Option<u64>,
    /// Log a status line every this many ticks
    pub report_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            seed: 0,
            index: IndexKind::BruteForce,
            snapshot_every: None,
            report_every: 60,
        }
    }
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub settings: FlockSettings,
    pub snapshots: Vec<FlockSnapshot>,
    pub last: FlockSnapshot,
}

/// Reads settings from a JSON file, or returns the defaults when no path is
/// given.
pub fn load_settings(path: Option<&Path>) -> Result<FlockSettings> {
    let Some(path) = path else {
        log::info!("No settings file given, using defaults");
        return Ok(FlockSettings::default());
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open settings file {}", path.display()))?;
    let settings: FlockSettings = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

pub fn run(settings: &FlockSettings, options: &RunOptions) -> Result<RunReport> {
    if !(options.dt.is_finite() && options.dt > 0.0) {
        anyhow::bail!("Time step must be a positive number, got {}", options.dt);
    }

    let config = settings.to_config().context("Invalid flock settings")?;

    log::info!(
        "Running {} agents for {} ticks (dt {}, seed {}, {:?} index, {:?} update order)",
        settings.population_size,
        options.ticks,
        options.dt,
        options.seed,
        options.index,
        settings.update_order
    );

    let (snapshots, last) = match options.index {
        IndexKind::BruteForce => drive(Flock::initialize(config, options.seed), options),
        IndexKind::Grid => drive(Flock::initialize_with_grid(config, options.seed), options),
    };

    Ok(RunReport {
        seed: options.seed,
        settings: settings.clone(),
        snapshots,
        last,
    })
}

fn drive<I: NeighborIndex>(
    mut flock: Flock<I>,
    options: &RunOptions,
) -> (Vec<FlockSnapshot>, FlockSnapshot) {
    let mut snapshots = Vec::new();

    for _ in 0..options.ticks {
        flock.tick(options.dt);
        let tick = flock.ticks();

        if let Some(every) = options.snapshot_every.filter(|&n| n > 0) {
            if tick % every == 0 {
                snapshots.push(FlockSnapshot::capture(&flock));
            }
        }

        if options.report_every > 0 && tick % options.report_every == 0 {
            let stats = flock.stats();
            log::info!(
                "tick {:>6}  t={:>8.2}s  centroid=({:.2}, {:.2})  speed={:.2}  neighbors={:.1}  polarization={:.3}",
                tick,
                flock.elapsed(),
                stats.centroid.x,
                stats.centroid.y,
                stats.mean_speed,
                stats.mean_neighbors,
                stats.polarization
            );
        }
    }

    (snapshots, FlockSnapshot::capture(&flock))
}

/// Writes the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush report to {}", path.display()))?;

    log::info!("Report written to {}", path.display());
    Ok(())
}
