//! Per-frame analysis results and alert requests

use serde::{Deserialize, Serialize};

use crate::state::{ChannelSeverity, OverallSeverity};

/// Alert the scheduler asks the dispatcher to sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertRequest {
    /// Nothing to sound this frame
    #[default]
    None,

    /// Short chime for the driver on entering a warning state
    DriverShort,

    /// Long alarm for both driver and passengers on a critical state
    DriverPassengerLong,
}

impl AlertRequest {
    pub fn is_none(&self) -> bool {
        matches!(self, AlertRequest::None)
    }
}

/// Status record published every frame for the overlay layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusRecord {
    pub overall: OverallSeverity,
    pub eye: ChannelSeverity,
    pub yawn: ChannelSeverity,
    pub nod: ChannelSeverity,
    pub action: AlertRequest,
}

impl StatusRecord {
    /// Status for a frame with no face in view
    pub fn idle() -> Self {
        Self::default()
    }

    /// Check if this frame asks for an alert
    pub fn has_action(&self) -> bool {
        !self.action.is_none()
    }
}
