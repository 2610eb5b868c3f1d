//! Alerting System
//!
//! Sounds driver and passenger alerts without blocking the detection loop:
//! clip loading, tone fallback, and a preempting playback dispatcher.

pub mod clip;
pub mod dispatcher;
pub mod sink;
pub mod tone;

pub use clip::{ClipId, ClipLibrary, PcmClip};
pub use dispatcher::{AlertDispatcher, AlertKind};
pub use sink::{AudioSink, MutedSink, StopFlag};
pub use tone::{generate_assets, write_beep, Tone};

#[cfg(feature = "device")]
pub use sink::CpalSink;

use std::path::PathBuf;
use thiserror::Error;

/// Alerting error types
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Audio device initialization failed: {0}")]
    DeviceInit(String),

    #[error("Failed to load sound asset {}: {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Tone synthesis not supported by this audio sink")]
    ToneUnsupported,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}
