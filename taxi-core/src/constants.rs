//! Tuning constants for the flight model. All per-call rates are applied
//! once per simulated frame at the fixed tick rate, so changing the tick
//! rate changes the feel of everything below.

use core::f64::consts::{FRAC_PI_8, PI};

/// Simulation ticks per second driven by the scheduler.
pub const TICK_RATE_HZ: u32 = 50;
/// Back-to-back catch-up updates allowed when a tick overruns its budget.
pub const MAX_CATCHUP_TICKS: u32 = 5;

/// Forward acceleration per unit of combined thrust input.
pub const THRUST_TRANSLATION_FACTOR: f64 = 0.4;
/// Angular acceleration per unit of differential thrust input.
pub const THRUST_ROTATION_FACTOR: f64 = 0.015;
/// Multiplicative per-frame damping of forward speed.
pub const SPEED_DAMPING: f64 = 0.99;
/// Multiplicative per-frame damping of angular speed.
pub const ANGULAR_SPEED_DAMPING: f64 = 0.95;

/// Bodies pull (and suns charge) only within this multiple of their radius.
pub const GRAVITY_RANGE_COEFF: f64 = 3.0;
/// Default gravity scale, overridable through `SimConfig`.
pub const DEFAULT_GRAVITY_FACTOR: f64 = 120.0;

/// Maximum frame displacement that still counts as a safe landing.
pub const MAX_LANDING_SPEED: f64 = 5.0;
/// Maximum deviation from the surface normal that still counts as a safe
/// landing.
pub const MAX_LANDING_TILT: f64 = FRAC_PI_8;
/// Effective craft radius for all collision math, independent of sprite size.
pub const COLLISION_RADIUS: f64 = 42.0;

/// Extra thrust granted to both thrusters while fighting gravity on the pad.
pub const LANDED_THRUST_BONUS: f64 = 0.5;
/// Extra battery fraction drained for the landed thrust bonus.
pub const LANDED_EXTRA_DRAIN: f64 = 0.02;
/// Below this displacement speed the craft is drawn idle.
pub const IDLE_SPEED_THRESHOLD: f64 = 0.99;

/// Default battery capacity.
pub const BATTERY_CAPACITY: f64 = 100.0;
/// Fraction of capacity lost per `drain()` call.
pub const BATTERY_DRAIN_STEP: f64 = 0.002;
/// Fraction of capacity gained per `recharge()` call.
pub const BATTERY_RECHARGE_STEP: f64 = 0.001;
/// Charge fraction below which the shield-for-charge bailout triggers.
pub const LOW_BATTERY_THRESHOLD: f64 = 0.05;
/// Battery fraction restored when a shield is burned as an emergency cell.
pub const SHIELD_BAILOUT_RECHARGE: f64 = 0.30;
/// Battery fraction drained when a shield absorbs an impact.
pub const SHIELD_IMPACT_DRAIN: f64 = 0.15;

/// Suns charge the panels within this multiple of their radius.
pub const CHARGE_RANGE_COEFF: f64 = 2.0;
/// Minimum |cos| of the panel-to-sun deviation for charging to engage.
pub const CHARGE_ALIGNMENT_COS: f64 = 0.8;

pub const STARTING_SHIELDS: u32 = 3;
pub const PASSENGER_CAPACITY: usize = 3;

/// Celestial body radii are clamped into this range; gravity and tint are
/// interpolated linearly across it.
pub const MIN_BODY_RADIUS: f64 = 80.0;
pub const MAX_BODY_RADIUS: f64 = 800.0;
pub const MIN_BODY_GRAVITY: f64 = 0.5;
pub const MAX_BODY_GRAVITY: f64 = 1.0;

pub const TAU: f64 = 2.0 * PI;
