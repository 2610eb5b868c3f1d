//! Platform output device via cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use super::{AudioSink, StopFlag};
use crate::clip::PcmClip;
use crate::AlertError;

/// How often the worker checks for completion or preemption
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default output device of the default host
pub struct CpalSink {
    device: cpal::Device,
    config: cpal::StreamConfig,
    format: cpal::SampleFormat,
    name: String,
}

impl CpalSink {
    pub fn open_default() -> Result<Self, AlertError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AlertError::DeviceInit("No output device available".into()))?;
        let name = device.name().unwrap_or_default();

        let supported = device
            .default_output_config()
            .map_err(|e| AlertError::DeviceInit(e.to_string()))?;
        let format = supported.sample_format();
        if !matches!(format, cpal::SampleFormat::F32 | cpal::SampleFormat::I16) {
            return Err(AlertError::DeviceInit(format!(
                "Unsupported sample format: {format:?}"
            )));
        }
        let config: cpal::StreamConfig = supported.into();

        info!(
            "Audio Output Device: {} (Rate={}Hz, Channels={})",
            name, config.sample_rate.0, config.channels
        );

        Ok(Self {
            device,
            config,
            format,
            name,
        })
    }

    fn build_stream<T>(
        &self,
        mut cursor: ClipCursor,
        stop: StopFlag,
        done: Arc<AtomicBool>,
        failure: Arc<Mutex<Option<String>>>,
    ) -> Result<cpal::Stream, AlertError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = self.config.channels.max(1) as usize;
        let stream_done = Arc::clone(&done);

        self.device
            .build_output_stream(
                &self.config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    // The device only asks for more once the buffer holding the
                    // clip's tail has been consumed
                    if !fill_buffer(data, channels, &mut cursor, &stop) {
                        stream_done.store(true, Ordering::SeqCst);
                    }
                },
                move |err| {
                    error!("An error occurred on output stream: {}", err);
                    if let Ok(mut slot) = failure.lock() {
                        *slot = Some(err.to_string());
                    }
                    done.store(true, Ordering::SeqCst);
                },
                None,
            )
            .map_err(|e| AlertError::Playback(e.to_string()))
    }
}

impl AudioSink for CpalSink {
    fn play(&self, clip: &PcmClip, stop: &StopFlag) -> Result<(), AlertError> {
        let cursor = ClipCursor::new(clip, self.config.sample_rate.0);
        let done = Arc::new(AtomicBool::new(false));
        let failure = Arc::new(Mutex::new(None));

        let stream = match self.format {
            cpal::SampleFormat::I16 => self.build_stream::<i16>(
                cursor,
                stop.clone(),
                Arc::clone(&done),
                Arc::clone(&failure),
            )?,
            _ => self.build_stream::<f32>(
                cursor,
                stop.clone(),
                Arc::clone(&done),
                Arc::clone(&failure),
            )?,
        };
        stream
            .play()
            .map_err(|e| AlertError::Playback(e.to_string()))?;

        while !done.load(Ordering::SeqCst) && !stop.is_raised() {
            thread::sleep(POLL_INTERVAL);
        }
        drop(stream);

        let failed = failure.lock().ok().and_then(|mut slot| slot.take());
        match failed {
            Some(reason) => Err(AlertError::Playback(reason)),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fill an interleaved device buffer from `cursor`, padding with silence.
/// Returns false when the buffer holds no clip audio at all.
fn fill_buffer<T>(data: &mut [T], channels: usize, cursor: &mut ClipCursor, stop: &StopFlag) -> bool
where
    T: SizedSample + FromSample<f32>,
{
    let mut wrote_audio = false;
    for frame in data.chunks_mut(channels) {
        let value = if stop.is_raised() {
            None
        } else {
            cursor.next_sample()
        };
        wrote_audio |= value.is_some();
        frame.fill(T::from_sample(value.unwrap_or(0.0)));
    }
    wrote_audio
}

/// Reads a mono clip at the device rate using nearest-sample conversion
struct ClipCursor {
    samples: Arc<[f32]>,
    step: f64,
    position: f64,
}

impl ClipCursor {
    fn new(clip: &PcmClip, device_rate: u32) -> Self {
        Self {
            samples: clip.shared_samples(),
            step: clip.sample_rate() as f64 / device_rate.max(1) as f64,
            position: 0.0,
        }
    }

    fn next_sample(&mut self) -> Option<f32> {
        let value = self.samples.get(self.position as usize).copied();
        self.position += self.step;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_upsamples() {
        let clip = PcmClip::new(vec![0.1, 0.2], 8_000);
        let mut cursor = ClipCursor::new(&clip, 16_000);
        let out: Vec<_> = std::iter::from_fn(|| cursor.next_sample()).collect();
        assert_eq!(out, vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn test_cursor_downsamples() {
        let clip = PcmClip::new(vec![0.1, 0.2, 0.3, 0.4], 16_000);
        let mut cursor = ClipCursor::new(&clip, 8_000);
        let out: Vec<_> = std::iter::from_fn(|| cursor.next_sample()).collect();
        assert_eq!(out, vec![0.1, 0.3]);
    }

    #[test]
    fn test_tail_buffer_is_not_the_last() {
        let clip = PcmClip::new(vec![0.5; 3], 8_000);
        let mut cursor = ClipCursor::new(&clip, 8_000);
        let stop = StopFlag::new();
        let mut buffer = [1.0f32; 8];

        // Stereo, four frames: three carry the clip, one is padding
        assert!(fill_buffer(&mut buffer, 2, &mut cursor, &stop));
        assert_eq!(buffer, [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.0, 0.0]);

        assert!(!fill_buffer(&mut buffer, 2, &mut cursor, &stop));
        assert_eq!(buffer, [0.0; 8]);
    }

    #[test]
    fn test_stop_silences_buffer() {
        let clip = PcmClip::new(vec![0.5; 16], 8_000);
        let mut cursor = ClipCursor::new(&clip, 8_000);
        let stop = StopFlag::new();
        stop.raise();
        let mut buffer = [1i16; 4];

        assert!(!fill_buffer(&mut buffer, 1, &mut cursor, &stop));
        assert_eq!(buffer, [0; 4]);
    }
}
