//! Scripted flight plans: frame-indexed thruster segments loaded from JSON,
//! replayed through the engine's intent queue.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Hold both levers at the given levels for a frame range. `to_frame` is
/// exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrustSegment {
    pub from_frame: u64,
    pub to_frame: u64,
    pub left: f64,
    pub right: f64,
}

/// An ordered list of segments. Segments may overlap; the last matching one
/// wins, so later entries act as overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightScript {
    pub segments: Vec<ThrustSegment>,
}

impl FlightScript {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading script {}", path.display()))?;
        let script: FlightScript = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing script {}", path.display()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.to_frame <= segment.from_frame {
                bail!(
                    "segment {index}: empty frame range {}..{}",
                    segment.from_frame,
                    segment.to_frame
                );
            }
            for lever in [segment.left, segment.right] {
                if !(0.0..=1.0).contains(&lever) {
                    bail!("segment {index}: lever {lever} outside [0, 1]");
                }
            }
        }
        Ok(())
    }

    /// Lever levels for a frame, if any segment covers it.
    pub fn thrust_at(&self, frame: u64) -> Option<(f64, f64)> {
        self.segments
            .iter()
            .rev()
            .find(|s| (s.from_frame..s.to_frame).contains(&frame))
            .map(|s| (s.left, s.right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn script() -> FlightScript {
        FlightScript {
            segments: vec![
                ThrustSegment {
                    from_frame: 0,
                    to_frame: 100,
                    left: 1.0,
                    right: 1.0,
                },
                ThrustSegment {
                    from_frame: 50,
                    to_frame: 60,
                    left: 0.0,
                    right: 0.5,
                },
            ],
        }
    }

    #[test]
    fn later_segments_override_earlier_ones() {
        let script = script();
        assert_eq!(script.thrust_at(10), Some((1.0, 1.0)));
        assert_eq!(script.thrust_at(55), Some((0.0, 0.5)));
        assert_eq!(script.thrust_at(60), Some((1.0, 1.0)));
        assert_eq!(script.thrust_at(100), None);
    }

    #[test]
    fn load_round_trips_through_json() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        let json = serde_json::to_string(&script()).expect("serialize");
        file.write_all(json.as_bytes()).expect("write");

        let loaded = FlightScript::load(file.path()).expect("load");
        assert_eq!(loaded, script());
    }

    #[test]
    fn validation_rejects_bad_segments() {
        let empty_range = FlightScript {
            segments: vec![ThrustSegment {
                from_frame: 10,
                to_frame: 10,
                left: 0.5,
                right: 0.5,
            }],
        };
        assert!(empty_range.validate().is_err());

        let wild_lever = FlightScript {
            segments: vec![ThrustSegment {
                from_frame: 0,
                to_frame: 10,
                left: 1.5,
                right: 0.0,
            }],
        };
        assert!(wild_lever.validate().is_err());
    }
}
