pub mod battery;
pub mod body;
pub mod config;
pub mod constants;
pub mod craft;
pub mod engine;
pub mod geom;
pub mod level;
pub mod rng;

pub use battery::TaxiBattery;
pub use body::{BodyId, BodyKind, CelestialBody, Passenger};
pub use config::SimConfig;
pub use craft::{ChargingSide, GameEvent, Spaceship, SpriteState};
pub use engine::{
    ControlHandle, ControlIntent, EndCause, FrameSnapshot, GameEngine, RunOutcome, WorldView,
};
pub use level::{campaign, Level, LevelBlueprint, StartPose, WorldBounds};
pub use rng::SeededRng;
