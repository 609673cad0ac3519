//! The player craft: physics integrator, landing/crash/charge state machine,
//! resource model, and passenger manifest.
//!
//! Movement is deliberately non-physical: the speed accumulator always acts
//! along the current look direction, so changing orientation instantly
//! redirects thrust-built momentum. Gravity therefore bypasses the speed
//! accumulator entirely and translates the craft directly, otherwise a quick
//! turn could steer gravitational drift.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::battery::TaxiBattery;
use crate::body::{BodyId, CelestialBody, Passenger};
use crate::config::SimConfig;
use crate::constants::{
    ANGULAR_SPEED_DAMPING, CHARGE_ALIGNMENT_COS, CHARGE_RANGE_COEFF, COLLISION_RADIUS,
    GRAVITY_RANGE_COEFF, IDLE_SPEED_THRESHOLD, LANDED_EXTRA_DRAIN, LANDED_THRUST_BONUS,
    LOW_BATTERY_THRESHOLD, MAX_LANDING_SPEED, MAX_LANDING_TILT, PASSENGER_CAPACITY,
    SHIELD_BAILOUT_RECHARGE, SHIELD_IMPACT_DRAIN, SPEED_DAMPING, STARTING_SHIELDS,
    THRUST_ROTATION_FACTOR, THRUST_TRANSLATION_FACTOR,
};
use crate::geom;
use crate::level::WorldBounds;

/// Discrete sprite selector recomputed every frame.
/// Priority: shield > crashed > landed > thrust combo > idle; the thrust
/// variants are set only inside thrust application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteState {
    Idle,
    RightThrust,
    LeftThrust,
    BothThrust,
    Landed,
    LandedShield,
    Exploded,
}

/// Which solar panel is facing the charging sun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingSide {
    None,
    Right,
    Left,
}

/// Fire-and-forget telemetry notifications, drained by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SunCollision,
    ShieldAbsorbed,
    FareCollected { fare: u32 },
}

pub struct Spaceship {
    x: f64,
    y: f64,
    // Previous-frame position; displacement against it is the real speed,
    // since the look-direction accumulator excludes gravitational drift.
    last_x: f64,
    last_y: f64,
    speed: f64,
    orientation: f64,
    angular_speed: f64,
    sprite: SpriteState,
    closest_surface: Option<BodyId>,
    dist_to_closest: f64,
    battery: TaxiBattery,
    landed: bool,
    crashed: bool,
    ikarused: bool,
    shield_on: bool,
    out_of_battery: bool,
    charging: bool,
    charging_side: ChargingSide,
    shields: u32,
    credits: u64,
    passengers: Vec<Passenger>,
    events: Vec<GameEvent>,
}

impl Spaceship {
    /// New craft at the given pose, fully fueled and shielded.
    pub fn new(x: f64, y: f64, orientation: f64) -> Self {
        Self {
            x,
            y,
            last_x: x,
            last_y: y,
            speed: 0.0,
            orientation,
            angular_speed: 0.0,
            sprite: SpriteState::Idle,
            closest_surface: None,
            dist_to_closest: f64::INFINITY,
            battery: TaxiBattery::new(),
            landed: false,
            crashed: false,
            ikarused: false,
            shield_on: false,
            out_of_battery: false,
            charging: false,
            charging_side: ChargingSide::None,
            shields: STARTING_SHIELDS,
            credits: 0,
            passengers: Vec::with_capacity(PASSENGER_CAPACITY),
            events: Vec::new(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Look direction in [0, 2pi).
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Speed accumulator acting along the look direction.
    pub fn look_speed(&self) -> f64 {
        self.speed
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    /// Actual displacement over the last frame, gravity included.
    pub fn displacement_speed(&self) -> f64 {
        geom::dist(self.x, self.y, self.last_x, self.last_y)
    }

    pub fn sprite(&self) -> SpriteState {
        self.sprite
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    /// Hand the earned credits over for banking, zeroing the meter so they
    /// cannot be counted again.
    pub(crate) fn take_credits(&mut self) -> u64 {
        std::mem::take(&mut self.credits)
    }

    pub fn shields(&self) -> u32 {
        self.shields
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    /// Target planets of the onboard manifest, for indicator overlays.
    pub fn target_planets(&self) -> Vec<BodyId> {
        self.passengers.iter().map(|p| p.target()).collect()
    }

    /// Battery charge as a fraction in [0, 1].
    pub fn battery_percentage(&self) -> f64 {
        self.battery.load_percentage()
    }

    /// Gap between the craft boundary and the nearest body surface found in
    /// the last update.
    pub fn dist_to_closest(&self) -> f64 {
        self.dist_to_closest
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub fn is_ikarused(&self) -> bool {
        self.ikarused
    }

    pub fn is_out_of_battery(&self) -> bool {
        self.out_of_battery
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn charging_side(&self) -> ChargingSide {
        self.charging_side
    }

    /// Drain telemetry events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply thrust; left and right thrusters are independent so their sum
    /// translates and their difference rotates. Rejected entirely once the
    /// battery is out. Any nonzero input costs one standard drain.
    pub fn apply_thrust(&mut self, mut left: f64, mut right: f64) {
        if self.out_of_battery {
            return;
        }

        if self.landed {
            // extra thrust to get off the pad, paid for separately
            left += LANDED_THRUST_BONUS;
            right += LANDED_THRUST_BONUS;
            self.battery.drain_pct(LANDED_EXTRA_DRAIN);
        }

        self.sprite = if left == 0.0 {
            SpriteState::RightThrust
        } else if right == 0.0 {
            SpriteState::LeftThrust
        } else {
            SpriteState::BothThrust
        };

        self.speed += (left + right) * THRUST_TRANSLATION_FACTOR;
        self.angular_speed += (left - right) * THRUST_ROTATION_FACTOR;
        self.battery.drain();
    }

    /// Advance the craft one frame against the level's body catalogue.
    pub fn update(&mut self, bodies: &mut [CelestialBody], config: &SimConfig) {
        if self.crashed {
            return;
        }

        if self.battery.load_percentage() < LOW_BATTERY_THRESHOLD {
            self.handle_empty_battery();
            if self.out_of_battery {
                // no shield to bail out with; the craft freezes here
                return;
            }
        }

        if self.landed && self.dist_to_closest > COLLISION_RADIUS / 2.0 {
            // far enough off the pad to count as airborne again
            self.landed = false;
        }

        if self.speed >= 0.0 {
            self.shield_on = false;
        }

        self.last_x = self.x;
        self.last_y = self.y;

        self.dist_to_closest = f64::INFINITY;
        self.closest_surface = None;
        // reset each frame so only one sun can feed the panels
        self.charging = false;

        for index in 0..bodies.len() {
            let body = &bodies[index];
            let distance = geom::dist(body.x(), body.y(), self.x, self.y);
            if distance > body.radius() * GRAVITY_RANGE_COEFF {
                continue;
            }

            let dist_to_surface = distance - body.radius() - COLLISION_RADIUS;
            if dist_to_surface < self.dist_to_closest {
                self.dist_to_closest = dist_to_surface;
                self.closest_surface = Some(BodyId(index));
            }

            if body.is_sun() && !self.charging {
                self.charge_from_sun(body, dist_to_surface);
            }
            self.apply_gravity(body, distance, config.gravity_factor);
        }

        if let Some(id) = self.closest_surface {
            self.resolve_collision(bodies, id);
        }

        self.translate(
            self.orientation.cos() * self.speed,
            self.orientation.sin() * self.speed,
        );

        if self.dist_to_closest > COLLISION_RADIUS / 4.0 {
            self.rotate(self.angular_speed);
        }

        self.speed *= SPEED_DAMPING;
        self.angular_speed *= ANGULAR_SPEED_DAMPING;

        self.refresh_sprite();
    }

    /// Toroidal wrap, independent per axis.
    pub fn wrap_at_bounds(&mut self, bounds: WorldBounds) {
        if self.x < bounds.min_x {
            self.x = bounds.max_x;
        } else if self.x > bounds.max_x {
            self.x = bounds.min_x;
        }

        if self.y < bounds.min_y {
            self.y = bounds.max_y;
        } else if self.y > bounds.max_y {
            self.y = bounds.min_y;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn rotate(&mut self, delta: f64) {
        self.orientation = geom::wrap_angle(self.orientation + delta);
    }

    /// Shield-for-charge bailout: burn a shield as an emergency cell, or
    /// freeze for good if none are left.
    fn handle_empty_battery(&mut self) {
        if self.shields > 0 {
            self.shields -= 1;
            self.battery.recharge_pct(SHIELD_BAILOUT_RECHARGE);
            self.shield_on = true;
        } else {
            self.out_of_battery = true;
        }
    }

    fn charge_from_sun(&mut self, sun: &CelestialBody, dist_to_surface: f64) {
        if dist_to_surface >= sun.radius() * CHARGE_RANGE_COEFF || self.out_of_battery {
            return;
        }

        // Deviation between the bearing around the sun and the craft's side
        // direction; |cos| near 1 means the sun is abeam of a panel.
        let bearing = geom::angle(self.x, self.y, sun.x(), sun.y());
        let deviation_cos = (bearing - (self.orientation - PI / 2.0)).abs().cos();

        if deviation_cos.abs() > CHARGE_ALIGNMENT_COS && !self.crashed {
            self.battery.recharge();
            self.charging = true;
            self.charging_side = if deviation_cos > 0.0 {
                ChargingSide::Right
            } else {
                ChargingSide::Left
            };
        } else {
            self.charging = false;
        }
    }

    fn apply_gravity(&mut self, body: &CelestialBody, distance: f64, gravity_factor: f64) {
        if self.landed || distance >= body.radius() * GRAVITY_RANGE_COEFF {
            return;
        }

        let normal = geom::angle(self.x, self.y, body.x(), body.y());
        let pull = body.gravity() * gravity_factor / (distance - body.radius());
        self.translate(normal.cos() * -pull, normal.sin() * -pull);
    }

    fn resolve_collision(&mut self, bodies: &mut [CelestialBody], id: BodyId) {
        let (bx, by, radius, is_sun) = {
            let body = &bodies[id.0];
            (body.x(), body.y(), body.radius(), body.is_sun())
        };

        let distance = geom::dist(bx, by, self.x, self.y);
        if distance >= radius + COLLISION_RADIUS {
            return;
        }

        if is_sun {
            // shields are no help against a sun
            self.events.push(GameEvent::SunCollision);
            self.ikarused = true;
            return;
        }

        let normal = geom::angle(self.x, self.y, bx, by);

        if self.displacement_speed() <= MAX_LANDING_SPEED
            && (normal - self.orientation).abs() <= MAX_LANDING_TILT
        {
            self.landed = true;
            self.speed = 0.0;
            // nudge outward so the collision doesn't re-trigger next frame
            self.translate(normal.cos(), normal.sin());
            self.orientation = normal;
            self.exchange_passengers(bodies, id);
        } else if self.shields > 0 {
            self.events.push(GameEvent::ShieldAbsorbed);
            self.shields -= 1;
            self.speed = -1.0;
            self.translate(normal.cos() * COLLISION_RADIUS, normal.sin() * COLLISION_RADIUS);
            self.orientation = normal;
            self.battery.drain_pct(SHIELD_IMPACT_DRAIN);
            self.shield_on = true;
        } else {
            self.crashed = true;
        }
    }

    /// Drop off every passenger bound for this planet, then fill free seats
    /// from the planet's queue in FIFO order.
    fn exchange_passengers(&mut self, bodies: &mut [CelestialBody], planet: BodyId) {
        let manifest = std::mem::take(&mut self.passengers);
        for passenger in manifest {
            if passenger.target() == planet {
                self.credits += u64::from(passenger.fare());
                self.events.push(GameEvent::FareCollected {
                    fare: passenger.fare(),
                });
            } else {
                self.passengers.push(passenger);
            }
        }

        while self.passengers.len() < PASSENGER_CAPACITY {
            match bodies[planet.0].pick_up_passenger() {
                Some(passenger) => self.passengers.push(passenger),
                None => break,
            }
        }
    }

    fn refresh_sprite(&mut self) {
        if self.shield_on {
            self.sprite = SpriteState::LandedShield;
        } else if self.crashed {
            self.sprite = SpriteState::Exploded;
        } else if self.landed {
            self.sprite = SpriteState::Landed;
        } else if self.displacement_speed() < IDLE_SPEED_THRESHOLD {
            self.sprite = SpriteState::Idle;
        }
    }
}

#[cfg(test)]
impl Spaceship {
    pub(crate) fn set_credits(&mut self, credits: u64) {
        self.credits = credits;
    }

    pub(crate) fn set_crashed(&mut self, crashed: bool) {
        self.crashed = crashed;
    }
}
