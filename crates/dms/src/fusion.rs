//! Channel severity fusion

use crate::state::{ChannelSeverity, OverallSeverity};

/// Reduce the three channel severities to the overall driver severity.
///
/// The result is the highest of the inputs under `Critical > Warning > None`,
/// with `None` mapping to `Normal`.
pub fn fuse(eye: ChannelSeverity, yawn: ChannelSeverity, nod: ChannelSeverity) -> OverallSeverity {
    eye.max(yawn).max(nod).into()
}
