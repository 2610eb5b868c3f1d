//! Driver Monitoring System (DMS)
//!
//! Real-time drowsiness state analysis from per-frame driver metrics:
//! - Eye closure, yawning and head-nod debouncing
//! - Severity fusion across channels
//! - Alarm scheduling with cooldown

pub mod analysis;
pub mod channel;
pub mod config;
pub mod fusion;
pub mod metrics;
pub mod scheduler;
pub mod state;

pub use analysis::{AlertRequest, StatusRecord};
pub use channel::{Channel, ChannelTracker};
pub use config::{ChannelRule, ClassificationShape, EngineConfig, MetricThresholds};
pub use fusion::fuse;
pub use metrics::{ChannelConditions, MetricSample};
pub use scheduler::AlarmScheduler;
pub use state::{ChannelSeverity, OverallSeverity};

use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Drowsiness engine: trackers, fusion and alarm scheduling for one driver
pub struct FatigueEngine {
    config: EngineConfig,
    eye: ChannelTracker,
    yawn: ChannelTracker,
    nod: ChannelTracker,
    scheduler: AlarmScheduler,
}

impl FatigueEngine {
    /// Create a new engine with configuration
    pub fn new(config: EngineConfig) -> Result<Self, DmsError> {
        config.validate()?;
        info!(
            cooldown_secs = config.cooldown_secs,
            "Creating fatigue engine with thresholds: {:?}", config.thresholds
        );
        Ok(Self {
            eye: ChannelTracker::new(Channel::Eye, config.eye),
            yawn: ChannelTracker::new(Channel::Yawn, config.yawn),
            nod: ChannelTracker::new(Channel::Nod, config.nod),
            scheduler: AlarmScheduler::new(config.cooldown()),
            config,
        })
    }

    /// Process one frame of metrics and return the status for that frame
    pub fn process(&mut self, sample: &MetricSample, now: Instant) -> StatusRecord {
        let conditions = sample.conditions(&self.config.thresholds);
        self.step(conditions, now)
    }

    /// Advance the trackers with already-evaluated conditions
    pub fn step(&mut self, conditions: ChannelConditions, now: Instant) -> StatusRecord {
        let eye = self.eye.update(conditions.eyes_closed);
        let yawn = self.yawn.update(conditions.yawning);
        let nod = self.nod.update(conditions.nodding);

        let overall = fuse(eye, yawn, nod);
        let action = self.scheduler.decide(overall, now);

        StatusRecord {
            overall,
            eye,
            yawn,
            nod,
            action,
        }
    }

    /// Reset all state (on driver change)
    pub fn reset(&mut self) {
        self.eye.reset();
        self.yawn.reset();
        self.nod.reset();
        self.scheduler.reset();
    }
}
