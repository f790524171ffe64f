use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use player_motion_rs::{load_samples, replay, EstimatorConfig};

#[derive(Parser, Debug)]
#[command(name = "player_motion")]
#[command(about = "Replay a recorded player track through the motion estimator", long_about = None)]
struct Args {
    /// Path to a sample log (.json or .json.gz)
    #[arg(long)]
    log: PathBuf,

    /// JSON file overriding filter thresholds and speed bands
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full report (summary + snapshots) here
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print every snapshot as a JSON line
    #[arg(long, default_value_t = false)]
    per_sample: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => EstimatorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EstimatorConfig::default(),
    };
    let samples = load_samples(&args.log)
        .with_context(|| format!("loading samples {}", args.log.display()))?;

    let outcome = replay(&samples, config).context("replaying samples")?;

    if args.per_sample {
        for snapshot in &outcome.snapshots {
            println!("{}", serde_json::to_string(snapshot)?);
        }
    }

    if let Some(path) = args.output.as_ref() {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    let s = &outcome.summary;
    println!("\n=== Session {} ===", s.session_id);
    println!(
        "Samples: {} ({} accepted, {} glitch, {} overspeed, {} reordered)",
        s.sample_count, s.accepted_count, s.glitch_count, s.overspeed_count, s.reordered_count
    );
    println!("Distance: {:.1} m over {} s", s.total_distance_meters, s.elapsed_seconds);
    println!(
        "Band 4: {:.1} m / {} s, Band 5: {:.1} m / {} s",
        s.band4_distance_meters, s.band4_seconds, s.band5_distance_meters, s.band5_seconds
    );
    println!("Peak speed: {:.2} m/s ({:.1} km/h)", s.peak_speed_ms, s.peak_speed_kmh);

    Ok(())
}
