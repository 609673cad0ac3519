//! Level catalogue and authoring.
//!
//! A level is instantiated from a serializable blueprint: fixed body
//! placements, hand-authored bookings, and per-planet randomized stocking
//! driven by the injected RNG. Once instantiated, everything except the
//! waiting-passenger queues is immutable for the level's lifetime.

use serde::{Deserialize, Serialize};

use crate::body::{BodyId, CelestialBody, Passenger};
use crate::constants::TAU;
use crate::geom;
use crate::rng::SeededRng;

// Authoring dimensions shared by the hand-built galaxies.
const SMALL_PLANET_RADIUS: f64 = 90.0;
const MEDIUM_PLANET_RADIUS: f64 = 160.0;
const LARGE_PLANET_RADIUS: f64 = 320.0;
const SPACING: f64 = 1000.0;
const GALAXY_HALF_EXTENT: f64 = 8000.0;

// Star-field scatter parameters; presentation data only.
const STAR_MARGIN: f64 = 200.0;

/// Axis-aligned world boundary; crossing any edge wraps to the opposite one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WorldBounds {
    pub fn square(half_extent: f64) -> Self {
        Self {
            min_x: -half_extent,
            min_y: -half_extent,
            max_x: half_extent,
            max_y: half_extent,
        }
    }
}

/// Craft pose at level start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartPose {
    pub x: f64,
    pub y: f64,
    /// Orientation in [0, 2pi).
    pub orientation: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementKind {
    Planet,
    Sun,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyPlacement {
    pub kind: PlacementKind,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Whether this planet receives a randomized passenger stock on
    /// instantiation. Ignored for suns.
    pub stock: bool,
}

impl BodyPlacement {
    fn planet(x: f64, y: f64, radius: f64) -> Self {
        Self {
            kind: PlacementKind::Planet,
            x,
            y,
            radius,
            stock: true,
        }
    }

    fn quiet_planet(x: f64, y: f64, radius: f64) -> Self {
        Self {
            stock: false,
            ..Self::planet(x, y, radius)
        }
    }

    fn sun(x: f64, y: f64, radius: f64) -> Self {
        Self {
            kind: PlacementKind::Sun,
            x,
            y,
            radius,
            stock: false,
        }
    }
}

/// A hand-authored booking between two placement indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub from: usize,
    pub to: usize,
}

/// Static description of a level; `instantiate` turns it into a populated
/// [`Level`] using the injected RNG.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    pub name: String,
    pub bounds: WorldBounds,
    pub start: StartPose,
    pub required_credits: u64,
    pub placements: Vec<BodyPlacement>,
    pub bookings: Vec<Booking>,
}

impl LevelBlueprint {
    pub fn instantiate(&self, rng: &mut SeededRng) -> Level {
        let mut bodies: Vec<CelestialBody> = self
            .placements
            .iter()
            .map(|p| match p.kind {
                PlacementKind::Planet => CelestialBody::planet(p.x, p.y, p.radius),
                PlacementKind::Sun => CelestialBody::sun(p.x, p.y, p.radius),
            })
            .collect();

        let planet_ids: Vec<BodyId> = bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_planet())
            .map(|(i, _)| BodyId(i))
            .collect();

        // Randomized stocking pass: count scales with the planet's radius
        // tier, targets drawn uniformly over the level's planets.
        for (index, placement) in self.placements.iter().enumerate() {
            if placement.kind != PlacementKind::Planet || !placement.stock {
                continue;
            }
            let count = stocked_count(bodies[index].radius(), rng);
            for _ in 0..count {
                let target = planet_ids[rng.next_int(planet_ids.len() as u32) as usize];
                add_booking(&mut bodies, BodyId(index), target, rng);
            }
        }

        for booking in &self.bookings {
            add_booking(&mut bodies, BodyId(booking.from), BodyId(booking.to), rng);
        }

        Level {
            name: self.name.clone(),
            stars: scatter_stars(self.bounds, rng),
            bodies,
            bounds: self.bounds,
            start: self.start,
            required_credits: self.required_credits,
        }
    }
}

/// A fully populated level: the immutable body catalogue (with its runtime
/// passenger queues), world bounds, start pose, and credit goal.
#[derive(Clone, Debug)]
pub struct Level {
    name: String,
    bodies: Vec<CelestialBody>,
    bounds: WorldBounds,
    start: StartPose,
    required_credits: u64,
    stars: Vec<[f64; 2]>,
}

impl Level {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [CelestialBody] {
        &mut self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn start(&self) -> StartPose {
        self.start
    }

    pub fn required_credits(&self) -> u64 {
        self.required_credits
    }

    /// Background star positions, for rendering only.
    pub fn stars(&self) -> &[[f64; 2]] {
        &self.stars
    }
}

/// Queue a passenger on `source` travelling to `target`. Bookings with a
/// missing body on either end, a non-planet on either end, or target equal
/// to source are silently dropped.
fn add_booking(bodies: &mut [CelestialBody], source: BodyId, target: BodyId, rng: &mut SeededRng) {
    if source == target {
        return;
    }
    let Some(src) = bodies.get(source.0) else {
        return;
    };
    let Some(dst) = bodies.get(target.0) else {
        return;
    };
    if !src.is_planet() || !dst.is_planet() {
        return;
    }

    let fare = geom::dist(src.x(), src.y(), dst.x(), dst.y()) as u32;
    let surface_angle = rng.next_f64() * TAU;
    bodies[source.0].enqueue_passenger(Passenger::new(source, target, fare, surface_angle));
}

fn stocked_count(radius: f64, rng: &mut SeededRng) -> u32 {
    let count = if radius >= LARGE_PLANET_RADIUS {
        rng.next_range(2, 6)
    } else if radius >= MEDIUM_PLANET_RADIUS {
        rng.next_range(1, 4)
    } else if radius >= SMALL_PLANET_RADIUS {
        rng.next_range(1, 3)
    } else {
        rng.next_range(0, 2)
    };
    count as u32
}

fn scatter_stars(bounds: WorldBounds, rng: &mut SeededRng) -> Vec<[f64; 2]> {
    let mut stars = Vec::new();
    let mut x = bounds.min_x - STAR_MARGIN;
    while x < bounds.max_x + STAR_MARGIN {
        let mut y = bounds.min_y - STAR_MARGIN;
        while y < bounds.max_y + STAR_MARGIN {
            stars.push([x, y]);
            y += rng.next_range_f64(40.0, 250.0);
        }
        x += rng.next_range_f64(20.0, 190.0);
    }
    stars
}

/// The hand-authored campaign, in play order. Clearing the last level ends
/// the run victoriously.
pub fn campaign() -> Vec<LevelBlueprint> {
    vec![galaxy_one(), galaxy_two()]
}

fn galaxy_one() -> LevelBlueprint {
    let s = SMALL_PLANET_RADIUS;
    let m = MEDIUM_PLANET_RADIUS;
    let l = LARGE_PLANET_RADIUS;
    let d = SPACING;

    let mut placements = vec![
        BodyPlacement::sun(-d * 4.6, -d * 0.75, m),
        BodyPlacement::sun(-d * 3.3, -d * 3.6, l),
        BodyPlacement::sun(-d * 3.0, d * 1.9, l * 0.75),
        BodyPlacement::sun(-d * 1.2, -d * 1.2, m * 0.9),
        BodyPlacement::sun(-d, d * 2.4, m * 1.1),
        BodyPlacement::sun(d, -d * 3.0, m * 1.3),
        BodyPlacement::sun(d * 2.4, d * 1.7, m * 1.7),
    ];
    // The home planet (index 7) keeps a fixed manifest instead of a
    // randomized stock.
    placements.extend([
        BodyPlacement::quiet_planet(0.0, l * 0.75, l * 0.5),
        BodyPlacement::planet(-d * 4.5, d * 2.0, s * 1.2),
        BodyPlacement::planet(-d * 4.2, -d * 3.4, m * 1.1),
        BodyPlacement::planet(-d * 3.5, d * 1.4, m * 0.9),
        BodyPlacement::planet(-d * 2.8, -d * 2.7, m * 1.2),
        BodyPlacement::planet(-d * 27.0, -d * 0.8, m * 1.1),
        BodyPlacement::planet(-d * 3.0 + l + s, d * 1.6, s * 1.2),
        BodyPlacement::planet(-d * 1.7, -d * 3.4, l * 0.75),
        BodyPlacement::planet(-d * 1.4, d * 3.1, l * 0.6),
        BodyPlacement::planet(-d * 0.7, -d * 0.8, s * 1.1),
        BodyPlacement::planet(d * 0.55, d * 1.8, m * 1.2),
        BodyPlacement::planet(d * 1.3, d * 0.3, s * 1.3),
        BodyPlacement::planet(d * 1.4, -d * 1.2, m * 1.5),
        BodyPlacement::planet(d * 1.2, d * 3.75, l * 0.9),
        BodyPlacement::planet(d * 3.5, d * 3.0, l),
    ]);

    LevelBlueprint {
        name: "GALAXY I".to_string(),
        bounds: WorldBounds::square(GALAXY_HALF_EXTENT),
        start: StartPose {
            x: 0.0,
            y: 0.0,
            orientation: 3.0 * core::f64::consts::FRAC_PI_2,
        },
        required_credits: 50_000,
        placements,
        bookings: vec![
            Booking { from: 7, to: 9 },
            Booking { from: 7, to: 21 },
            Booking { from: 7, to: 8 },
        ],
    }
}

fn galaxy_two() -> LevelBlueprint {
    let s = SMALL_PLANET_RADIUS;
    let m = MEDIUM_PLANET_RADIUS;
    let l = LARGE_PLANET_RADIUS;

    let placements = vec![
        BodyPlacement::quiet_planet(500.0, -200.0, m),
        BodyPlacement::quiet_planet(0.0, -700.0, s),
        BodyPlacement::quiet_planet(-1000.0, 300.0, l),
        BodyPlacement::sun(0.0, -1900.0, l),
        BodyPlacement::sun(-300.0, 800.0, m),
        BodyPlacement::sun(-500.0, -300.0, s),
        BodyPlacement::sun(-500.0, -300.0, s),
        BodyPlacement::sun(6000.0, 4800.0, l),
        BodyPlacement::sun(3000.0, -4000.0, s),
        BodyPlacement::quiet_planet(0.0, 400.0, m),
        BodyPlacement::quiet_planet(1000.0, -400.0, s),
        BodyPlacement::quiet_planet(2200.0, -800.0, s),
        BodyPlacement::quiet_planet(-3000.0, -4000.0, l),
        BodyPlacement::quiet_planet(7000.0, 5000.0, m),
        BodyPlacement::quiet_planet(5000.0, -6000.0, l),
    ];

    LevelBlueprint {
        name: "GALAXY II".to_string(),
        bounds: WorldBounds::square(GALAXY_HALF_EXTENT),
        start: StartPose {
            x: 0.0,
            y: 0.0,
            orientation: core::f64::consts::FRAC_PI_3,
        },
        required_credits: 20_000,
        placements,
        bookings: vec![
            Booking { from: 9, to: 10 },
            Booking { from: 9, to: 11 },
            Booking { from: 9, to: 10 },
            // from == to, silently dropped on instantiation
            Booking { from: 10, to: 10 },
            Booking { from: 10, to: 11 },
            Booking { from: 10, to: 13 },
            Booking { from: 11, to: 12 },
            Booking { from: 11, to: 9 },
            Booking { from: 12, to: 13 },
            Booking { from: 12, to: 14 },
            Booking { from: 12, to: 9 },
            Booking { from: 13, to: 12 },
            Booking { from: 13, to: 11 },
            Booking { from: 13, to: 10 },
            Booking { from: 14, to: 12 },
            Booking { from: 14, to: 10 },
        ],
    }
}
