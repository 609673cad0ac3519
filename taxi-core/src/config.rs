//! Per-simulation configuration, threaded into the physics step instead of
//! living in mutable statics.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRAVITY_FACTOR, MAX_CATCHUP_TICKS, TICK_RATE_HZ};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Scale applied to every body's gravity pull.
    pub gravity_factor: f64,
    /// Target simulation ticks per second.
    pub tick_rate_hz: u32,
    /// Catch-up updates allowed per frame when the loop falls behind.
    pub max_catchup_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity_factor: DEFAULT_GRAVITY_FACTOR,
            tick_rate_hz: TICK_RATE_HZ,
            max_catchup_ticks: MAX_CATCHUP_TICKS,
        }
    }
}
