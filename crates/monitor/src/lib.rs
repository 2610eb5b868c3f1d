//! Drowsiness Monitor
//!
//! Wires the fatigue engine to the alert dispatcher: reads per-frame driver
//! metrics, publishes a status record per frame and sounds alerts.

pub mod pipeline;
pub mod settings;
pub mod source;

pub use pipeline::{sound_alert, Monitor, RunSummary};
pub use settings::{AppConfig, AudioConfig, Preset};
pub use source::{FrameClock, FrameInput};

use alerting::{AudioSink, MutedSink};
use std::future::Future;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging on stderr; stdout carries the status records
pub fn init_logging(verbose: bool, json: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Open the platform output device, muting alerts if it is unavailable
#[cfg(feature = "device")]
pub fn open_sink() -> Arc<dyn AudioSink> {
    match alerting::CpalSink::open_default() {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            tracing::error!("{}. Alerts are muted for this session", e);
            Arc::new(MutedSink)
        }
    }
}

/// Open the platform output device, muting alerts if it is unavailable
#[cfg(not(feature = "device"))]
pub fn open_sink() -> Arc<dyn AudioSink> {
    tracing::warn!("Built without the `device` feature. Alerts are muted for this session");
    Arc::new(MutedSink)
}

/// Resolve once `signal` fires. A signal that cannot be installed never
/// resolves, so the session runs until its input ends.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(
            "Failed to listen for Ctrl-C, running until input ends: {}",
            e
        );
        std::future::pending::<()>().await;
    }
}
