//! Craft battery. Drain and recharge are multiplicative-rate, per-call
//! adjustments: the flight model invokes them once per simulated frame, so
//! holding the thrusters open yields exponential-style depletion rather than
//! a linear burn.

use serde::{Deserialize, Serialize};

use crate::constants::{BATTERY_CAPACITY, BATTERY_DRAIN_STEP, BATTERY_RECHARGE_STEP};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxiBattery {
    max_capacity: f64,
    charge: f64,
}

impl TaxiBattery {
    /// Full battery at the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(BATTERY_CAPACITY)
    }

    /// Full battery at a custom capacity.
    pub fn with_capacity(max_capacity: f64) -> Self {
        Self {
            max_capacity,
            charge: max_capacity,
        }
    }

    /// Current charge as a fraction of capacity, always in [0, 1].
    pub fn load_percentage(&self) -> f64 {
        self.charge / self.max_capacity
    }

    /// Subtract the standard per-frame fraction of capacity, clamped at 0.
    pub fn drain(&mut self) {
        self.drain_pct(BATTERY_DRAIN_STEP);
    }

    /// Subtract `pct` of capacity, clamped at 0.
    pub fn drain_pct(&mut self, pct: f64) {
        self.charge = (self.charge - self.max_capacity * pct).max(0.0);
    }

    /// Add the standard per-frame fraction of capacity, clamped at capacity.
    pub fn recharge(&mut self) {
        self.recharge_pct(BATTERY_RECHARGE_STEP);
    }

    /// Add `pct` of capacity, clamped at capacity.
    pub fn recharge_pct(&mut self, pct: f64) {
        self.charge = (self.charge + self.max_capacity * pct).min(self.max_capacity);
    }
}

impl Default for TaxiBattery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    #[test]
    fn standard_steps_use_the_fixed_rates() {
        let mut battery = TaxiBattery::new();
        battery.drain();
        assert!((battery.load_percentage() - 0.998).abs() < 1e-12);
        battery.recharge();
        assert!((battery.load_percentage() - 0.999).abs() < 1e-12);
    }

    #[test]
    fn drain_clamps_at_zero() {
        let mut battery = TaxiBattery::new();
        battery.drain_pct(2.0);
        assert_eq!(battery.load_percentage(), 0.0);
        battery.drain();
        assert_eq!(battery.load_percentage(), 0.0);
    }

    #[test]
    fn recharge_clamps_at_capacity() {
        let mut battery = TaxiBattery::new();
        battery.recharge_pct(0.5);
        assert_eq!(battery.load_percentage(), 1.0);
    }

    #[test]
    fn charge_stays_bounded_under_random_call_sequences() {
        let mut rng = SeededRng::new(0xBA77_E21);
        let mut battery = TaxiBattery::new();
        for _ in 0..10_000 {
            match rng.next_int(4) {
                0 => battery.drain(),
                1 => battery.drain_pct(rng.next_f64()),
                2 => battery.recharge(),
                _ => battery.recharge_pct(rng.next_f64()),
            }
            let pct = battery.load_percentage();
            assert!((0.0..=1.0).contains(&pct), "load escaped bounds: {pct}");
        }
    }
}
