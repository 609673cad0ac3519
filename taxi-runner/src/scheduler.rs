//! Fixed-rate driver around the engine: feeds scripted intents through the
//! control queue, paces frames in real time when asked, and collects a
//! serializable report of the run.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use serde::Serialize;
use taxi_core::{campaign, ControlIntent, GameEngine, GameEvent, SimConfig};
use tracing::{debug, info};

use crate::script::FlightScript;

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub seed: u32,
    pub max_frames: u64,
    pub frame_count: u64,
    /// End cause name, or `ABORTED` when the frame budget ran out first.
    pub end_cause: String,
    /// Stable numeric end code; absent for aborted runs.
    pub end_code: Option<u8>,
    pub credits: u64,
    pub level_index: usize,
    pub shields_left: u32,
    pub battery: f64,
    pub fares_collected: u32,
    pub shield_impacts: u32,
}

pub struct RunConfig {
    pub seed: u32,
    pub max_frames: u64,
    pub start_level: usize,
    pub realtime: bool,
    pub sim: SimConfig,
}

/// Fly the campaign under a script. Returns once the run ends or the frame
/// budget is spent.
pub fn run_script(config: RunConfig, script: &FlightScript) -> Result<RunReport> {
    if config.max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }
    script.validate()?;

    let tick = Duration::from_millis(1_000 / u64::from(config.sim.tick_rate_hz.max(1)));
    let frames_per_batch = scheduled_batch_limit(&config.sim);

    let mut engine = GameEngine::starting_at(
        config.sim,
        campaign(),
        config.seed,
        config.start_level,
    );
    let handle = engine.control_handle();

    let mut fares_collected = 0u32;
    let mut shield_impacts = 0u32;
    let mut outcome = None;
    let mut next_tick = Instant::now() + tick;

    'run: while engine.frame_count() < config.max_frames {
        // the scheduled update plus any catch-ups due this tick
        for _ in 0..frames_per_batch {
            if let Some((left, right)) = script.thrust_at(engine.frame_count()) {
                handle.send(ControlIntent::Thrust { left, right });
            }

            let result = engine.update();
            for event in engine.take_events() {
                match event {
                    GameEvent::FareCollected { fare } => {
                        fares_collected += 1;
                        info!(fare, "fare collected");
                    }
                    GameEvent::ShieldAbsorbed => {
                        shield_impacts += 1;
                        info!("shield absorbed an impact");
                    }
                    GameEvent::SunCollision => info!("flew into a sun"),
                }
            }

            if let Some(end) = result {
                outcome = Some(end);
                break 'run;
            }
            if engine.frame_count() >= config.max_frames {
                break 'run;
            }

            if !config.realtime || Instant::now() < next_tick {
                break;
            }
            // behind schedule: fold the missed tick into this batch
            next_tick += tick;
        }

        if config.realtime {
            let now = Instant::now();
            if now < next_tick {
                thread::sleep(next_tick - now);
            }
            next_tick += tick;
        }
    }

    let snapshot = engine.snapshot();
    let report = match outcome {
        Some(end) => RunReport {
            seed: config.seed,
            max_frames: config.max_frames,
            frame_count: end.frames,
            end_cause: end.cause.to_string(),
            end_code: Some(end.cause.code()),
            credits: end.credits,
            level_index: end.level_index,
            shields_left: snapshot.shields,
            battery: snapshot.battery,
            fares_collected,
            shield_impacts,
        },
        None => RunReport {
            seed: config.seed,
            max_frames: config.max_frames,
            frame_count: snapshot.frame,
            end_cause: "ABORTED".to_string(),
            end_code: None,
            credits: snapshot.credits,
            level_index: snapshot.level_index,
            shields_left: snapshot.shields,
            battery: snapshot.battery,
            fares_collected,
            shield_impacts,
        },
    };

    debug!(
        frames = report.frame_count,
        cause = %report.end_cause,
        credits = report.credits,
        "run finished"
    );
    Ok(report)
}

/// Updates allowed per tick: the scheduled one plus the catch-up allowance
/// for a loop that has fallen behind.
fn scheduled_batch_limit(sim: &SimConfig) -> u32 {
    sim.max_catchup_ticks + 1
}
