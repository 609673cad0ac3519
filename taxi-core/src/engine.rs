//! Campaign driver: owns the craft, the live level, and the control intent
//! queue, and advances the whole simulation one deterministic frame at a
//! time. Drivers call [`GameEngine::update`] at a fixed rate and stop once it
//! reports a [`RunOutcome`].

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::config::SimConfig;
use crate::craft::{ChargingSide, GameEvent, Spaceship, SpriteState};
use crate::level::{Level, LevelBlueprint};
use crate::rng::SeededRng;

/// Player input, produced by any thread and consumed only at the top of a
/// frame. Everything the outside world may do to the simulation goes through
/// this queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlIntent {
    /// Thruster levers, each in [0, 1].
    Thrust { left: f64, right: f64 },
    TogglePause,
}

/// Cloneable sending half of the intent queue.
#[derive(Clone)]
pub struct ControlHandle {
    tx: Sender<ControlIntent>,
}

impl ControlHandle {
    /// Queue an intent for the next frame. Returns false once the engine has
    /// been dropped.
    pub fn send(&self, intent: ControlIntent) -> bool {
        self.tx.send(intent).is_ok()
    }
}

/// Why a run ended. The numeric code is stable across releases and is what
/// drivers persist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    CrashedPlanet,
    CrashedSun,
    OutOfBattery,
    Cleared,
}

impl EndCause {
    pub fn code(self) -> u8 {
        match self {
            EndCause::CrashedPlanet => 0,
            EndCause::CrashedSun => 1,
            EndCause::OutOfBattery => 2,
            EndCause::Cleared => 3,
        }
    }
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndCause::CrashedPlanet => "CRASHED_PLANET",
            EndCause::CrashedSun => "CRASHED_SUN",
            EndCause::OutOfBattery => "OUT_OF_BATTERY",
            EndCause::Cleared => "CLEARED",
        };
        write!(f, "{name}")
    }
}

/// Terminal report for a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub cause: EndCause,
    /// Credits banked across all levels, including the level in progress.
    pub credits: u64,
    /// Simulated frames elapsed, pause time excluded.
    pub frames: u64,
    /// Index of the level the run ended on, one past the last for a clear.
    pub level_index: usize,
}

/// Value snapshot of the observable per-frame state, for recording and for
/// comparing two runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub level_index: usize,
    pub x: f64,
    pub y: f64,
    pub orientation: f64,
    pub displacement_speed: f64,
    pub battery: f64,
    pub shields: u32,
    pub credits: u64,
    pub passengers: usize,
    pub landed: bool,
    pub charging: bool,
    pub charging_side: ChargingSide,
    pub paused: bool,
    pub sprite: SpriteState,
    /// Target planets of the onboard manifest, for indicator overlays.
    pub targets: Vec<BodyId>,
}

/// Borrowed view over everything a renderer needs for one frame.
pub struct WorldView<'a> {
    pub level: &'a Level,
    pub taxi: &'a Spaceship,
    pub banked_credits: u64,
}

pub struct GameEngine {
    config: SimConfig,
    campaign: Vec<LevelBlueprint>,
    level_index: usize,
    level: Option<Level>,
    taxi: Spaceship,
    banked_credits: u64,
    paused: bool,
    frame_count: u64,
    rng: SeededRng,
    intents: Receiver<ControlIntent>,
    handle_tx: Sender<ControlIntent>,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Engine over the given campaign, starting at its first level.
    pub fn new(config: SimConfig, campaign: Vec<LevelBlueprint>, seed: u32) -> Self {
        Self::starting_at(config, campaign, seed, 0)
    }

    /// Engine starting at an arbitrary campaign index; earlier levels are
    /// skipped without banking anything.
    pub fn starting_at(
        config: SimConfig,
        campaign: Vec<LevelBlueprint>,
        seed: u32,
        start_index: usize,
    ) -> Self {
        let (handle_tx, intents) = mpsc::channel();
        let mut rng = SeededRng::new(seed);
        let level = campaign.get(start_index).map(|b| b.instantiate(&mut rng));
        let taxi = match &level {
            Some(level) => {
                let pose = level.start();
                Spaceship::new(pose.x, pose.y, pose.orientation)
            }
            None => Spaceship::new(0.0, 0.0, 0.0),
        };
        Self {
            config,
            campaign,
            level_index: start_index,
            level,
            taxi,
            banked_credits: 0,
            paused: false,
            frame_count: 0,
            rng,
            intents,
            handle_tx,
            events: Vec::new(),
        }
    }

    /// New sending handle onto the intent queue.
    pub fn control_handle(&self) -> ControlHandle {
        ControlHandle {
            tx: self.handle_tx.clone(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Credits banked plus the in-progress level's earnings.
    pub fn total_credits(&self) -> u64 {
        self.banked_credits + self.taxi.credits()
    }

    /// Renderer view of the live level, `None` once the campaign is over.
    pub fn world(&self) -> Option<WorldView<'_>> {
        self.level.as_ref().map(|level| WorldView {
            level,
            taxi: &self.taxi,
            banked_credits: self.banked_credits,
        })
    }

    /// Telemetry events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame_count,
            level_index: self.level_index,
            x: self.taxi.x(),
            y: self.taxi.y(),
            orientation: self.taxi.orientation(),
            displacement_speed: self.taxi.displacement_speed(),
            battery: self.taxi.battery_percentage(),
            shields: self.taxi.shields(),
            credits: self.total_credits(),
            passengers: self.taxi.passenger_count(),
            landed: self.taxi.is_landed(),
            charging: self.taxi.is_charging(),
            charging_side: self.taxi.charging_side(),
            paused: self.paused,
            sprite: self.taxi.sprite(),
            targets: self.taxi.target_planets(),
        }
    }

    /// Advance one frame. Returns the terminal outcome once the run is over;
    /// paused frames drain intents but simulate nothing.
    pub fn update(&mut self) -> Option<RunOutcome> {
        let mut thrust = None;
        while let Ok(intent) = self.intents.try_recv() {
            match intent {
                ControlIntent::TogglePause => self.paused = !self.paused,
                // thrust queued during a pause is dropped, not deferred
                ControlIntent::Thrust { left, right } if !self.paused => {
                    thrust = Some((left, right));
                }
                ControlIntent::Thrust { .. } => {}
            }
        }

        if self.paused {
            return None;
        }

        let required = match self.level.as_ref() {
            Some(level) => level.required_credits(),
            None => return Some(self.outcome(EndCause::Cleared)),
        };

        self.frame_count += 1;

        if let Some((left, right)) = thrust {
            self.taxi.apply_thrust(left, right);
        }

        // the craft mutates the planets' passenger queues in place
        if let Some(level) = self.level.as_mut() {
            self.taxi.update(level.bodies_mut(), &self.config);
            let bounds = level.bounds();
            self.taxi.wrap_at_bounds(bounds);
        }

        self.events.extend(self.taxi.take_events());

        if self.taxi.is_crashed() {
            return Some(self.outcome(EndCause::CrashedPlanet));
        }
        if self.taxi.is_ikarused() {
            return Some(self.outcome(EndCause::CrashedSun));
        }
        if self.taxi.is_out_of_battery() {
            return Some(self.outcome(EndCause::OutOfBattery));
        }
        if self.taxi.credits() > required {
            return self.advance();
        }

        None
    }

    /// Bank the cleared level's earnings and move on, or finish the campaign.
    fn advance(&mut self) -> Option<RunOutcome> {
        self.banked_credits += self.taxi.take_credits();
        self.level_index += 1;

        match self.campaign.get(self.level_index) {
            Some(blueprint) => {
                let level = blueprint.instantiate(&mut self.rng);
                let pose = level.start();
                self.taxi = Spaceship::new(pose.x, pose.y, pose.orientation);
                self.level = Some(level);
                None
            }
            None => {
                // the finishing craft stays readable for end-of-run reports;
                // its credits were just moved to the bank
                self.level = None;
                Some(RunOutcome {
                    cause: EndCause::Cleared,
                    credits: self.banked_credits,
                    frames: self.frame_count,
                    level_index: self.level_index,
                })
            }
        }
    }

    fn outcome(&self, cause: EndCause) -> RunOutcome {
        RunOutcome {
            cause,
            credits: self.total_credits(),
            frames: self.frame_count,
            level_index: self.level_index,
        }
    }

    /// Last charging side, for the panel glow overlay.
    pub fn charging_side(&self) -> ChargingSide {
        self.taxi.charging_side()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{
        campaign, BodyPlacement, Booking, LevelBlueprint, PlacementKind, StartPose, WorldBounds,
    };

    /// Empty space with a credit goal; nothing to hit and nothing to earn.
    fn empty_blueprint(required: u64) -> LevelBlueprint {
        LevelBlueprint {
            name: "EMPTY".to_string(),
            bounds: WorldBounds::square(8_000.0),
            start: StartPose {
                x: 0.0,
                y: 0.0,
                orientation: 0.0,
            },
            required_credits: required,
            placements: Vec::new(),
            bookings: Vec::new(),
        }
    }

    #[test]
    fn end_cause_codes_are_stable() {
        assert_eq!(EndCause::CrashedPlanet.code(), 0);
        assert_eq!(EndCause::CrashedSun.code(), 1);
        assert_eq!(EndCause::OutOfBattery.code(), 2);
        assert_eq!(EndCause::Cleared.code(), 3);
        assert_eq!(EndCause::CrashedSun.to_string(), "CRASHED_SUN");
    }

    #[test]
    fn empty_campaign_reports_cleared_immediately() {
        let mut engine = GameEngine::new(SimConfig::default(), Vec::new(), 1);
        let outcome = engine.update().expect("no levels means nothing to fly");
        assert_eq!(outcome.cause, EndCause::Cleared);
        assert_eq!(outcome.credits, 0);
        assert_eq!(outcome.frames, 0);
    }

    #[test]
    fn pause_halts_simulation_and_drops_thrust() {
        let mut engine = GameEngine::new(SimConfig::default(), vec![empty_blueprint(100)], 1);
        let handle = engine.control_handle();

        handle.send(ControlIntent::TogglePause);
        handle.send(ControlIntent::Thrust {
            left: 1.0,
            right: 1.0,
        });
        assert!(engine.update().is_none());
        assert!(engine.is_paused());
        assert_eq!(engine.frame_count(), 0);

        // unpause: the earlier thrust must not have been deferred
        handle.send(ControlIntent::TogglePause);
        assert!(engine.update().is_none());
        assert!(!engine.is_paused());
        assert_eq!(engine.frame_count(), 1);
        let snap = engine.snapshot();
        assert_eq!(snap.battery, 1.0, "dropped thrust must not drain");
    }

    #[test]
    fn last_thrust_intent_per_frame_wins() {
        let mut engine = GameEngine::new(SimConfig::default(), vec![empty_blueprint(100)], 1);
        let handle = engine.control_handle();
        handle.send(ControlIntent::Thrust {
            left: 1.0,
            right: 0.0,
        });
        handle.send(ControlIntent::Thrust {
            left: 0.0,
            right: 1.0,
        });
        engine.update();
        let snap = engine.snapshot();
        // right thrust alone turns the nose negative, wrapping below 2pi
        assert!(snap.orientation > std::f64::consts::PI);
        // exactly one thrust application was paid for
        assert!((snap.battery - 0.998).abs() < 1e-12);
    }

    #[test]
    fn reaching_the_threshold_exactly_does_not_clear() {
        // required == 0 still demands strictly more than zero credits
        let mut engine = GameEngine::new(SimConfig::default(), vec![empty_blueprint(0)], 1);
        for _ in 0..10 {
            assert!(engine.update().is_none());
        }
        assert_eq!(engine.level_index(), 0);
    }

    /// Two planets stacked on the y axis. The craft boards below the upper
    /// one, burns straight down, bounces once off the lower planet (the
    /// bounce snaps its nose to the surface normal) and settles back onto it
    /// to deliver the fare.
    fn stacked_delivery_blueprint() -> LevelBlueprint {
        LevelBlueprint {
            name: "STACKED".to_string(),
            bounds: WorldBounds::square(8_000.0),
            start: StartPose {
                x: 0.0,
                y: 0.0,
                orientation: 3.0 * std::f64::consts::FRAC_PI_2,
            },
            required_credits: 500,
            placements: vec![
                BodyPlacement {
                    kind: PlacementKind::Planet,
                    x: 0.0,
                    y: 240.0,
                    radius: 160.0,
                    stock: false,
                },
                BodyPlacement {
                    kind: PlacementKind::Planet,
                    x: 0.0,
                    y: -800.0,
                    radius: 200.0,
                    stock: false,
                },
            ],
            bookings: vec![Booking { from: 0, to: 1 }],
        }
    }

    #[test]
    fn delivering_a_fare_clears_the_level_and_banks_the_credits() {
        let campaign = vec![stacked_delivery_blueprint(), empty_blueprint(1_000_000)];
        let mut engine = GameEngine::new(SimConfig::default(), campaign, 1);
        let handle = engine.control_handle();

        for frame in 0..2_000u64 {
            if (60..90).contains(&frame) {
                handle.send(ControlIntent::Thrust {
                    left: 1.0,
                    right: 1.0,
                });
            }
            assert!(engine.update().is_none(), "run must not end mid-delivery");
            if engine.level_index() == 1 {
                break;
            }
        }

        // the fare is the center distance between the two planets
        assert_eq!(engine.level_index(), 1);
        assert_eq!(engine.total_credits(), 1_040);
        let snap = engine.snapshot();
        assert_eq!(snap.credits, 1_040);
        assert_eq!(snap.shields, 3, "the next level starts with a fresh craft");
        assert_eq!(snap.passengers, 0);
    }

    #[test]
    fn a_crash_outranks_the_credit_threshold_in_the_same_frame() {
        let mut engine = GameEngine::new(SimConfig::default(), vec![empty_blueprint(0)], 1);
        engine.taxi.set_credits(10);
        engine.taxi.set_crashed(true);

        let outcome = engine.update().expect("a crashed craft ends the run");
        assert_eq!(outcome.cause, EndCause::CrashedPlanet);
        assert_eq!(outcome.cause.code(), 0);
        assert_eq!(outcome.credits, 10);
    }

    #[test]
    fn level_carry_over_banks_earnings_and_sums_on_the_final_clear() {
        let mut engine = GameEngine::new(
            SimConfig::default(),
            vec![empty_blueprint(100), empty_blueprint(1_000)],
            1,
        );
        let handle = engine.control_handle();

        engine.taxi.set_credits(250);
        assert!(engine.update().is_none(), "mid-campaign clears keep flying");
        assert_eq!(engine.level_index(), 1);
        assert_eq!(engine.total_credits(), 250);
        let snap = engine.snapshot();
        assert_eq!(snap.credits, 250);
        assert_eq!(snap.battery, 1.0, "the next level starts with a fresh craft");

        // drain a little battery so the finishing craft is distinguishable
        handle.send(ControlIntent::Thrust {
            left: 0.2,
            right: 0.2,
        });
        assert!(engine.update().is_none());
        engine.taxi.set_credits(2_000);
        let outcome = engine
            .update()
            .expect("clearing the last level ends the run");
        assert_eq!(outcome.cause, EndCause::Cleared);
        assert_eq!(outcome.credits, 2_250);
        assert_eq!(outcome.level_index, 2);

        // end-of-run reports read the craft that finished, not a reset one
        let snap = engine.snapshot();
        assert!(snap.battery < 1.0);
        assert_eq!(snap.credits, 2_250);
    }

    #[test]
    fn same_seed_and_inputs_replay_identically() {
        let run = |seed: u32| -> Vec<FrameSnapshot> {
            let mut engine = GameEngine::new(SimConfig::default(), campaign(), seed);
            let handle = engine.control_handle();
            let mut frames = Vec::new();
            for frame in 0..400u64 {
                if frame % 7 == 0 {
                    handle.send(ControlIntent::Thrust {
                        left: 0.6,
                        right: 0.4,
                    });
                }
                if engine.update().is_some() {
                    break;
                }
                frames.push(engine.snapshot());
            }
            frames
        };

        let first = run(42);
        assert!(!first.is_empty());
        assert_eq!(first, run(42));
    }

    #[test]
    fn snapshot_reflects_engine_counters() {
        let mut engine = GameEngine::new(SimConfig::default(), vec![empty_blueprint(100)], 1);
        engine.update();
        engine.update();
        let snap = engine.snapshot();
        assert_eq!(snap.frame, 2);
        assert_eq!(snap.level_index, 0);
        assert!(!snap.paused);
    }
}
