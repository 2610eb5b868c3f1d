//! Audio output seam
//!
//! A sink blocks the playback worker while a clip sounds and returns early
//! once the request's [`StopFlag`] is raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::clip::PcmClip;
use crate::tone::{Tone, TONE_SAMPLE_RATE};
use crate::AlertError;

#[cfg(feature = "device")]
mod device;

#[cfg(feature = "device")]
pub use device::CpalSink;

/// Cancellation flag shared between the dispatcher and one playback request
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Something that can sound PCM clips
pub trait AudioSink: Send + Sync {
    /// Play `clip` to completion or until `stop` is raised
    fn play(&self, clip: &PcmClip, stop: &StopFlag) -> Result<(), AlertError>;

    /// Sound a synthesized beep. Sinks without tone support return
    /// [`AlertError::ToneUnsupported`].
    fn tone(&self, tone: Tone, stop: &StopFlag) -> Result<(), AlertError> {
        self.play(&tone.synthesize(TONE_SAMPLE_RATE), stop)
    }

    fn name(&self) -> &str;
}

/// Sink used when no output device could be opened
#[derive(Debug, Default)]
pub struct MutedSink;

impl AudioSink for MutedSink {
    fn play(&self, clip: &PcmClip, _stop: &StopFlag) -> Result<(), AlertError> {
        debug!("Muted: dropping {:?} clip", clip.duration());
        Ok(())
    }

    fn tone(&self, _tone: Tone, _stop: &StopFlag) -> Result<(), AlertError> {
        Err(AlertError::ToneUnsupported)
    }

    fn name(&self) -> &str {
        "muted"
    }
}
