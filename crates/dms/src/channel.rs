//! Per-channel debounce tracker
//!
//! Counts consecutive frames on which a channel's condition holds and maps
//! the count to a severity. The count drops to zero on the first frame the
//! condition fails, so severity never decays gradually.

use tracing::debug;

use crate::config::{ChannelRule, ClassificationShape};
use crate::state::ChannelSeverity;

/// Physiological channel identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Eye,
    Yawn,
    Nod,
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Eye => "eye",
            Channel::Yawn => "yawn",
            Channel::Nod => "nod",
        }
    }
}

/// Debounces one boolean signal into a three-level severity
#[derive(Debug, Clone)]
pub struct ChannelTracker {
    channel: Channel,
    rule: ChannelRule,
    counter: u32,
    severity: ChannelSeverity,
}

impl ChannelTracker {
    pub fn new(channel: Channel, rule: ChannelRule) -> Self {
        Self {
            channel,
            rule,
            counter: 0,
            severity: ChannelSeverity::None,
        }
    }

    /// Feed one frame's condition and return the resulting severity
    pub fn update(&mut self, condition_held: bool) -> ChannelSeverity {
        let next = if condition_held {
            self.counter = self.counter.saturating_add(1);
            classify(&self.rule, self.counter)
        } else {
            self.counter = 0;
            ChannelSeverity::None
        };

        if next != self.severity {
            debug!(
                channel = self.channel.name(),
                frames = self.counter,
                "{} -> {}",
                self.severity,
                next
            );
        }
        self.severity = next;
        next
    }

    /// Consecutive frames the condition has held
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn severity(&self) -> ChannelSeverity {
        self.severity
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.severity = ChannelSeverity::None;
    }
}

/// Map a positive frame count to a severity under `rule`
pub fn classify(rule: &ChannelRule, counter: u32) -> ChannelSeverity {
    if counter == 0 {
        return ChannelSeverity::None;
    }
    match rule.shape {
        ClassificationShape::NoiseFiltered => {
            if counter <= rule.ignore_frames {
                ChannelSeverity::None
            } else if counter < rule.crit_frames {
                ChannelSeverity::Warning
            } else {
                ChannelSeverity::Critical
            }
        }
        ClassificationShape::Simple => {
            if counter < rule.warn_frames {
                ChannelSeverity::None
            } else if counter < rule.crit_frames {
                ChannelSeverity::Warning
            } else {
                ChannelSeverity::Critical
            }
        }
    }
}
