//! Alarm scheduling
//!
//! Decides, once per frame, whether the overall severity warrants an alert.
//! Warnings alert only on entry from `Normal` and respect the cooldown.
//! Critical always alerts on entry and repeats every cooldown while it lasts.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::analysis::AlertRequest;
use crate::state::OverallSeverity;

/// Alarm scheduler state
#[derive(Debug, Clone)]
pub struct AlarmScheduler {
    /// Minimum time between alarms
    cooldown: Duration,
    /// Overall severity seen on the previous frame
    previous: OverallSeverity,
    /// When the last alarm fired, `None` before the first one
    last_alarm: Option<Instant>,
}

impl AlarmScheduler {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            previous: OverallSeverity::Normal,
            last_alarm: None,
        }
    }

    /// Decide which alert (if any) to fire for this frame
    pub fn decide(&mut self, overall: OverallSeverity, now: Instant) -> AlertRequest {
        let cooled_down = self.cooldown_elapsed(now);

        let request = match overall {
            OverallSeverity::Warning if self.previous == OverallSeverity::Normal => {
                if cooled_down {
                    AlertRequest::DriverShort
                } else {
                    debug!("Warning alarm suppressed: in cooldown period");
                    AlertRequest::None
                }
            }
            OverallSeverity::Critical
                if self.previous != OverallSeverity::Critical || cooled_down =>
            {
                AlertRequest::DriverPassengerLong
            }
            _ => AlertRequest::None,
        };

        if !request.is_none() {
            info!(
                previous = %self.previous,
                overall = %overall,
                "Alarm fired: {:?}",
                request
            );
            self.last_alarm = Some(now);
        }

        self.previous = overall;
        request
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.last_alarm {
            Some(last) => now.saturating_duration_since(last) > self.cooldown,
            None => true,
        }
    }

    /// Overall severity seen on the last frame
    pub fn previous(&self) -> OverallSeverity {
        self.previous
    }

    pub fn last_alarm(&self) -> Option<Instant> {
        self.last_alarm
    }

    pub fn reset(&mut self) {
        self.previous = OverallSeverity::Normal;
        self.last_alarm = None;
    }
}
