//! Severity levels tracked per channel and overall

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single physiological channel (eye, yawn, nod)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelSeverity {
    #[default]
    None,
    Warning,
    Critical,
}

/// Fused driver severity across all channels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallSeverity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl From<ChannelSeverity> for OverallSeverity {
    fn from(severity: ChannelSeverity) -> Self {
        match severity {
            ChannelSeverity::None => OverallSeverity::Normal,
            ChannelSeverity::Warning => OverallSeverity::Warning,
            ChannelSeverity::Critical => OverallSeverity::Critical,
        }
    }
}

impl fmt::Display for ChannelSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelSeverity::None => "NONE",
            ChannelSeverity::Warning => "WARNING",
            ChannelSeverity::Critical => "CRITICAL",
        })
    }
}

impl fmt::Display for OverallSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverallSeverity::Normal => "NORMAL",
            OverallSeverity::Warning => "WARNING",
            OverallSeverity::Critical => "CRITICAL",
        })
    }
}
