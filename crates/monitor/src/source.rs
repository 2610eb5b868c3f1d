//! Metric source: one JSON object per frame from the perception layer

use dms::MetricSample;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Raw frame as delivered by the perception pipeline.
///
/// All metrics absent means no face was found in the frame. A single absent
/// or null metric is treated as undefined for that frame only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrameInput {
    #[serde(default)]
    pub ear: Option<f32>,
    #[serde(default)]
    pub mar: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
    /// Capture time relative to session start, for replayed streams
    #[serde(default)]
    pub t_ms: Option<u64>,
}

impl FrameInput {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn face_detected(&self) -> bool {
        self.ear.is_some() || self.mar.is_some() || self.pitch.is_some()
    }

    /// Metrics for the engine, `None` when no face was detected
    pub fn sample(&self) -> Option<MetricSample> {
        self.face_detected()
            .then(|| MetricSample::from_ratios(self.ear, self.mar, self.pitch.unwrap_or(f32::NAN)))
    }
}

/// Maps frame timestamps onto the monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Replayed frames use their own timestamp, live frames use now
    pub fn at(&self, t_ms: Option<u64>) -> Instant {
        match t_ms {
            Some(ms) => self.start + Duration::from_millis(ms),
            None => Instant::now(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
