use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use taxi_core::{campaign, SimConfig};
use taxi_runner::scheduler::{run_script, RunConfig};
use taxi_runner::script::FlightScript;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "taxi-runner")]
#[command(about = "Deterministic headless driver for the gravity-taxi campaign")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fly the campaign under a thrust script and report the outcome
    Fly {
        /// Level-stocking seed (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0xDEADBEEF")]
        seed: String,
        /// JSON flight script; an absent script flies hands-off
        #[arg(long)]
        script: Option<PathBuf>,
        #[arg(long, default_value_t = 90_000)]
        max_frames: u64,
        /// Campaign index to start from
        #[arg(long, default_value_t = 0)]
        level: usize,
        /// Gravity scale override
        #[arg(long)]
        gravity_factor: Option<f64>,
        /// Pace frames at the simulation tick rate instead of flat out
        #[arg(long, default_value_t = false)]
        realtime: bool,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the campaign levels in play order
    ListLevels,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Fly {
            seed,
            script,
            max_frames,
            level,
            gravity_factor,
            realtime,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let script = match script {
                Some(path) => FlightScript::load(&path)?,
                None => FlightScript::default(),
            };

            let mut sim = SimConfig::default();
            if let Some(factor) = gravity_factor {
                sim.gravity_factor = factor;
            }

            let report = run_script(
                RunConfig {
                    seed,
                    max_frames,
                    start_level: level,
                    realtime,
                    sim,
                },
                &script,
            )?;

            info!(
                cause = %report.end_cause,
                credits = report.credits,
                frames = report.frame_count,
                "flight over"
            );

            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Commands::ListLevels => {
            for (index, blueprint) in campaign().iter().enumerate() {
                println!(
                    "{index}  {:10}  {} bodies, {} credits to clear",
                    blueprint.name,
                    blueprint.placements.len(),
                    blueprint.required_credits
                );
            }
        }
    }

    Ok(())
}

/// Accepts plain decimal or 0x-prefixed hex.
fn parse_seed(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|_| anyhow!("invalid hex seed '{raw}'"))
    } else {
        raw.parse()
            .map_err(|_| anyhow!("invalid decimal seed '{raw}'"))
    }
}
