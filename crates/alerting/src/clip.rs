//! Alert sound clips and the on-disk asset library

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::tone::Tone;
use crate::AlertError;

/// Logical sound identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipId {
    Short,
    Long,
}

impl ClipId {
    pub const ALL: [ClipId; 2] = [ClipId::Short, ClipId::Long];

    pub fn name(&self) -> &'static str {
        match self {
            ClipId::Short => "short",
            ClipId::Long => "long",
        }
    }

    /// Asset file name under the sound directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ClipId::Short => "alert_short.wav",
            ClipId::Long => "alert_long.wav",
        }
    }

    /// Beep played when the clip is missing
    pub fn fallback_tone(&self) -> Tone {
        match self {
            ClipId::Short => Tone::new(1000.0, Duration::from_millis(500)),
            ClipId::Long => Tone::new(2000.0, Duration::from_millis(1500)),
        }
    }

    /// Beep written by asset generation
    pub fn asset_tone(&self) -> Tone {
        match self {
            ClipId::Short => Tone::new(1000.0, Duration::from_millis(500)),
            ClipId::Long => Tone::new(1500.0, Duration::from_secs(2)),
        }
    }
}

/// Decoded mono PCM audio
#[derive(Debug, Clone, PartialEq)]
pub struct PcmClip {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl PcmClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate: sample_rate.max(1),
        }
    }

    /// Decode a WAV file, downmixing to mono
    pub fn from_wav(path: &Path) -> Result<Self, AlertError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Ok(Self::new(samples, spec.sample_rate))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Shared handle to the sample data
    pub fn shared_samples(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Clips available for playback, keyed by logical id
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: HashMap<ClipId, Arc<PcmClip>>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every known clip from `dir`. Missing or unreadable files are
    /// logged and left out so playback falls back to a tone.
    pub fn load(dir: &Path) -> Self {
        let mut library = Self::new();

        for id in ClipId::ALL {
            match Self::load_clip(dir, id) {
                Ok(clip) => {
                    info!("Loaded {} alert ({:?})", id.name(), clip.duration());
                    library.insert(id, clip);
                }
                Err(e) => warn!("{}", e),
            }
        }

        library
    }

    /// Decode the asset for `id` from `dir`
    pub fn load_clip(dir: &Path, id: ClipId) -> Result<PcmClip, AlertError> {
        let path: PathBuf = dir.join(id.file_name());
        if !path.is_file() {
            return Err(AlertError::AssetLoad {
                path,
                reason: "file not found".into(),
            });
        }
        PcmClip::from_wav(&path).map_err(|e| AlertError::AssetLoad {
            reason: e.to_string(),
            path,
        })
    }

    pub fn insert(&mut self, id: ClipId, clip: PcmClip) {
        self.clips.insert(id, Arc::new(clip));
    }

    pub fn get(&self, id: ClipId) -> Option<Arc<PcmClip>> {
        self.clips.get(&id).cloned()
    }

    pub fn contains(&self, id: ClipId) -> bool {
        self.clips.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
