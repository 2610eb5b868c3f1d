//! Fatigue engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::DmsError;

/// Raw-metric cutoffs that decide whether a channel's condition holds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    /// Eye aspect ratio below this counts as closed
    pub ear: f32,
    /// Mouth aspect ratio above this counts as yawning
    pub mar: f32,
    /// Head pitch (degrees) below this counts as nodding down
    pub pitch: f32,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            ear: 0.25,
            mar: 0.5,
            pitch: -10.0,
        }
    }
}

/// How a channel maps its frame counter to a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationShape {
    /// Counts up to `ignore_frames` are treated as noise (blinks)
    NoiseFiltered,
    /// Plain warn/crit boundaries
    Simple,
}

/// Frame-count rule for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRule {
    pub shape: ClassificationShape,
    /// Only consulted by the noise-filtered shape
    #[serde(default)]
    pub ignore_frames: u32,
    pub warn_frames: u32,
    pub crit_frames: u32,
}

impl ChannelRule {
    pub fn noise_filtered(ignore_frames: u32, warn_frames: u32, crit_frames: u32) -> Self {
        Self {
            shape: ClassificationShape::NoiseFiltered,
            ignore_frames,
            warn_frames,
            crit_frames,
        }
    }

    pub fn simple(warn_frames: u32, crit_frames: u32) -> Self {
        Self {
            shape: ClassificationShape::Simple,
            ignore_frames: 0,
            warn_frames,
            crit_frames,
        }
    }

    fn validate(&self, channel: &str) -> Result<(), DmsError> {
        if self.crit_frames == 0 {
            return Err(DmsError::Config(format!(
                "{channel}: crit_frames must be greater than zero"
            )));
        }
        match self.shape {
            ClassificationShape::NoiseFiltered if self.ignore_frames >= self.crit_frames => {
                Err(DmsError::Config(format!(
                    "{channel}: ignore_frames ({}) must be below crit_frames ({})",
                    self.ignore_frames, self.crit_frames
                )))
            }
            ClassificationShape::Simple if self.warn_frames > self.crit_frames => {
                Err(DmsError::Config(format!(
                    "{channel}: warn_frames ({}) must not exceed crit_frames ({})",
                    self.warn_frames, self.crit_frames
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Fatigue engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Raw-metric cutoffs
    pub thresholds: MetricThresholds,

    /// Eye closure rule
    pub eye: ChannelRule,

    /// Yawning rule
    pub yawn: ChannelRule,

    /// Head nodding rule
    pub nod: ChannelRule,

    /// Minimum seconds between repeated alarms
    pub cooldown_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: MetricThresholds::default(),
            // warn_frames is carried for the eye but the noise-filtered shape ignores it
            eye: ChannelRule::noise_filtered(20, 75, 110),
            yawn: ChannelRule::simple(50, 200),
            nod: ChannelRule::simple(8, 32),
            cooldown_secs: 2.0,
        }
    }
}

impl EngineConfig {
    /// Create strict config (shorter debounce windows)
    pub fn strict() -> Self {
        Self {
            eye: ChannelRule::noise_filtered(12, 45, 70),
            yawn: ChannelRule::simple(30, 120),
            nod: ChannelRule::simple(6, 20),
            ..Default::default()
        }
    }

    /// Create lenient config (longer debounce windows)
    pub fn lenient() -> Self {
        Self {
            eye: ChannelRule::noise_filtered(30, 110, 160),
            yawn: ChannelRule::simple(75, 300),
            nod: ChannelRule::simple(12, 48),
            cooldown_secs: 4.0,
            ..Default::default()
        }
    }

    /// Cooldown as a duration, saturating for values `validate` rejects
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.cooldown_secs).unwrap_or(Duration::MAX)
    }

    /// Reject configurations the trackers cannot classify against
    pub fn validate(&self) -> Result<(), DmsError> {
        let MetricThresholds { ear, mar, pitch } = self.thresholds;
        if !(ear.is_finite() && mar.is_finite() && pitch.is_finite()) {
            return Err(DmsError::Config("metric thresholds must be finite".into()));
        }
        if Duration::try_from_secs_f64(self.cooldown_secs).is_err() {
            return Err(DmsError::Config(format!(
                "cooldown_secs must be a non-negative number of seconds within range, got {}",
                self.cooldown_secs
            )));
        }
        self.eye.validate("eye")?;
        self.yawn.validate("yawn")?;
        self.nod.validate("nod")?;
        Ok(())
    }
}
