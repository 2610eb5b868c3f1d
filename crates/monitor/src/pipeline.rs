//! Frame loop: metrics in, status records out, alerts to the dispatcher

use alerting::AlertDispatcher;
use dms::{AlertRequest, FatigueEngine, StatusRecord};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::source::{FrameClock, FrameInput};

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub no_face_frames: u64,
    pub skipped_lines: u64,
    pub alerts: u64,
}

/// Route a scheduler decision to the dispatcher
pub fn sound_alert(alerts: &AlertDispatcher, request: AlertRequest) {
    match request {
        AlertRequest::None => {}
        AlertRequest::DriverShort => alerts.play_driver_short(),
        AlertRequest::DriverPassengerLong => {
            alerts.play_driver_long();
            alerts.play_passenger_long();
        }
    }
}

/// Drowsiness monitor for one driving session
pub struct Monitor {
    engine: FatigueEngine,
    alerts: AlertDispatcher,
    clock: FrameClock,
    summary: RunSummary,
}

impl Monitor {
    pub fn new(engine: FatigueEngine, alerts: AlertDispatcher) -> Self {
        Self {
            engine,
            alerts,
            clock: FrameClock::new(),
            summary: RunSummary::default(),
        }
    }

    /// Process one frame synchronously and return its status
    pub fn handle(&mut self, frame: &FrameInput) -> StatusRecord {
        self.summary.frames += 1;

        let Some(sample) = frame.sample() else {
            self.summary.no_face_frames += 1;
            return StatusRecord::idle();
        };

        let status = self.engine.process(&sample, self.clock.at(frame.t_ms));
        if status.has_action() {
            self.summary.alerts += 1;
            sound_alert(&self.alerts, status.action);
        }
        status
    }

    /// Read frames from `reader` until EOF or `shutdown` resolves, writing
    /// one status line per frame to `writer`
    pub async fn run<R, W, S>(
        &mut self,
        reader: R,
        mut writer: W,
        shutdown: S,
    ) -> anyhow::Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        tokio::pin!(shutdown);

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            };
            let Some(line) = line else {
                debug!("Metric stream ended");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let frame = match FrameInput::parse(&line) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Skipping malformed frame: {}", e);
                    self.summary.skipped_lines += 1;
                    continue;
                }
            };

            let status = self.handle(&frame);
            let mut record = serde_json::to_vec(&status)?;
            record.push(b'\n');
            writer.write_all(&record).await?;
            writer.flush().await?;
        }

        Ok(self.summary)
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn alerts(&self) -> &AlertDispatcher {
        &self.alerts
    }

    /// Silence any alert still sounding
    pub fn shutdown(&self) {
        self.alerts.stop();
    }
}
