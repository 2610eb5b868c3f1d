//! Sine tone synthesis for fallback beeps and generated assets

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::clip::{ClipId, PcmClip};
use crate::AlertError;

/// Sample rate used for synthesized tones and generated assets
pub const TONE_SAMPLE_RATE: u32 = 44_100;

/// Peak amplitude of generated 16-bit assets
pub const ASSET_AMPLITUDE: i16 = 16_000;

/// A fixed-frequency beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
}

impl Tone {
    pub const fn new(frequency_hz: f32, duration: Duration) -> Self {
        Self {
            frequency_hz,
            duration,
        }
    }

    /// Number of samples the tone spans at `sample_rate`
    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration.as_secs_f64() * sample_rate as f64) as usize
    }

    /// Render the tone as a unit-amplitude mono clip
    pub fn synthesize(&self, sample_rate: u32) -> PcmClip {
        let step = 2.0 * PI * self.frequency_hz / sample_rate as f32;
        let samples = (0..self.sample_count(sample_rate))
            .map(|i| (step * i as f32).sin())
            .collect();
        PcmClip::new(samples, sample_rate)
    }
}

/// Write the tone to `path` as 16-bit mono PCM
pub fn write_beep(path: &Path, tone: Tone, amplitude: i16) -> Result<(), AlertError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TONE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let clip = tone.synthesize(TONE_SAMPLE_RATE);
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in clip.samples() {
        writer.write_sample((sample * amplitude as f32) as i16)?;
    }
    writer.finalize()?;

    info!(
        "Wrote {} ({} Hz, {:?})",
        path.display(),
        tone.frequency_hz,
        tone.duration
    );
    Ok(())
}

/// Write the beep asset for every clip into `dir`
pub fn generate_assets(dir: &Path) -> Result<Vec<PathBuf>, AlertError> {
    std::fs::create_dir_all(dir)?;
    ClipId::ALL
        .iter()
        .map(|id| {
            let path = dir.join(id.file_name());
            write_beep(&path, id.asset_tone(), ASSET_AMPLITUDE)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipLibrary;

    #[test]
    fn test_generated_assets_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate_assets(&dir.path().join("sounds")).unwrap();
        assert_eq!(written.len(), 2);

        let library = ClipLibrary::load(&dir.path().join("sounds"));
        assert_eq!(library.len(), 2);
        let long = library.get(ClipId::Long).unwrap();
        assert_eq!(long.duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_synthesize_length_and_range() {
        let tone = Tone::new(1000.0, Duration::from_millis(500));
        let clip = tone.synthesize(TONE_SAMPLE_RATE);

        assert_eq!(clip.len(), 22_050);
        assert_eq!(clip.sample_rate(), TONE_SAMPLE_RATE);
        assert!(clip.samples().iter().all(|s| s.abs() <= 1.0));
        assert_eq!(clip.samples()[0], 0.0);
    }

    #[test]
    fn test_write_beep_roundtrips_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beep.wav");
        let tone = Tone::new(1000.0, Duration::from_millis(100));

        write_beep(&path, tone, ASSET_AMPLITUDE).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, TONE_SAMPLE_RATE);
        assert_eq!(reader.len(), 4_410);

        let peak = reader
            .into_samples::<i16>()
            .map(|s| s.unwrap().unsigned_abs())
            .max()
            .unwrap();
        assert!(peak <= ASSET_AMPLITUDE as u16);
        assert!(u32::from(peak) > (ASSET_AMPLITUDE as u32) * 9 / 10);
    }
}
