//! Celestial bodies and the passengers waiting on them.
//!
//! A body is a closed tagged variant over {planet, sun} sharing one geometry
//! record; planets additionally own a FIFO queue of waiting passengers.
//! Bodies are immutable after construction apart from that queue, and are
//! referenced by index (`BodyId`) within their level's catalogue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BODY_GRAVITY, MAX_BODY_RADIUS, MIN_BODY_GRAVITY, MIN_BODY_RADIUS};

/// Index of a body within its level's catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub usize);

/// A booking from a source planet to a target planet. The fare is fixed at
/// creation as the source-target center distance and never recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    source: BodyId,
    target: BodyId,
    fare: u32,
    surface_angle: f64,
}

impl Passenger {
    pub(crate) fn new(source: BodyId, target: BodyId, fare: u32, surface_angle: f64) -> Self {
        Self {
            source,
            target,
            fare,
            surface_angle,
        }
    }

    pub fn source(&self) -> BodyId {
        self.source
    }

    pub fn target(&self) -> BodyId {
        self.target
    }

    /// Credits paid when the target planet is reached.
    pub fn fare(&self) -> u32 {
        self.fare
    }

    /// Placement angle on the source planet's surface, for rendering only.
    pub fn surface_angle(&self) -> f64 {
        self.surface_angle
    }
}

#[derive(Clone, Debug)]
pub enum BodyKind {
    Planet { waiting: VecDeque<Passenger> },
    Sun,
}

#[derive(Clone, Debug)]
pub struct CelestialBody {
    x: f64,
    y: f64,
    radius: f64,
    gravity: f64,
    tint: f64,
    kind: BodyKind,
}

impl CelestialBody {
    pub fn planet(x: f64, y: f64, radius: f64) -> Self {
        Self::new(
            x,
            y,
            radius,
            BodyKind::Planet {
                waiting: VecDeque::new(),
            },
        )
    }

    pub fn sun(x: f64, y: f64, radius: f64) -> Self {
        Self::new(x, y, radius, BodyKind::Sun)
    }

    fn new(x: f64, y: f64, radius: f64, kind: BodyKind) -> Self {
        let radius = radius.clamp(MIN_BODY_RADIUS, MAX_BODY_RADIUS);
        let frac = (radius - MIN_BODY_RADIUS) / (MAX_BODY_RADIUS - MIN_BODY_RADIUS);
        Self {
            x,
            y,
            radius,
            gravity: MIN_BODY_GRAVITY + frac * (MAX_BODY_GRAVITY - MIN_BODY_GRAVITY),
            tint: frac,
            kind,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Gravity-strength scalar in [0.5, 1.0], derived from the radius.
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Display tint scalar in [0, 1], derived the same way as gravity.
    pub fn tint(&self) -> f64 {
        self.tint
    }

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    pub fn is_sun(&self) -> bool {
        matches!(self.kind, BodyKind::Sun)
    }

    pub fn is_planet(&self) -> bool {
        matches!(self.kind, BodyKind::Planet { .. })
    }

    /// Passengers waiting on this body, empty for suns.
    pub fn waiting_passengers(&self) -> usize {
        match &self.kind {
            BodyKind::Planet { waiting } => waiting.len(),
            BodyKind::Sun => 0,
        }
    }

    /// Queue a passenger on this planet. No-op for suns.
    pub(crate) fn enqueue_passenger(&mut self, passenger: Passenger) {
        if let BodyKind::Planet { waiting } = &mut self.kind {
            waiting.push_back(passenger);
        }
    }

    /// Remove the passenger waiting longest, if any. Always `None` for suns.
    pub(crate) fn pick_up_passenger(&mut self) -> Option<Passenger> {
        match &mut self.kind {
            BodyKind::Planet { waiting } => waiting.pop_front(),
            BodyKind::Sun => None,
        }
    }
}

// Equality is structural over geometry and variant; the waiting queue is
// runtime state and does not participate.
impl PartialEq for CelestialBody {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.radius == other.radius
            && core::mem::discriminant(&self.kind) == core::mem::discriminant(&other.kind)
    }
}
