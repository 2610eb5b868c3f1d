//! Drowsiness Monitor - Main Entry Point

use alerting::{AlertDispatcher, ClipLibrary};
use anyhow::Context;
use clap::{Parser, Subcommand};
use dms::FatigueEngine;
use monitor::{init_logging, open_sink, shutdown_on, AppConfig, Monitor, Preset};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "drowsiness-monitor",
    version,
    about = "Driver drowsiness alerting"
)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Engine tuning the configuration file and environment are layered over
    #[arg(long, value_enum, global = true, default_value_t = Preset::Standard)]
    preset: Preset,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read JSON metric frames and emit a status record per frame
    Run {
        /// Read frames from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Write the default alert sounds
    GenerateAssets {
        /// Target directory (defaults to the configured sound directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = AppConfig::load(cli.preset, cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Run { input: None }) {
        Command::Run { input } => run(settings, input).await,
        Command::GenerateAssets { out_dir } => {
            let dir = out_dir.unwrap_or(settings.audio.sound_dir);
            let written = alerting::generate_assets(&dir)
                .with_context(|| format!("failed to write assets to {}", dir.display()))?;
            info!(
                "Generated {} alert sounds in {}",
                written.len(),
                dir.display()
            );
            Ok(())
        }
    }
}

async fn run(settings: AppConfig, input: Option<PathBuf>) -> anyhow::Result<()> {
    let engine = FatigueEngine::new(settings.engine)?;
    let library = ClipLibrary::load(&settings.audio.sound_dir);
    let alerts = AlertDispatcher::new(library, open_sink())?;
    let mut monitor = Monitor::new(engine, alerts);

    let shutdown = shutdown_on(tokio::signal::ctrl_c());
    let stdout = tokio::io::stdout();

    let result = match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            monitor.run(BufReader::new(file), stdout, shutdown).await
        }
        None => {
            monitor
                .run(BufReader::new(tokio::io::stdin()), stdout, shutdown)
                .await
        }
    };

    monitor.shutdown();
    let summary = result?;
    info!(
        frames = summary.frames,
        no_face = summary.no_face_frames,
        skipped = summary.skipped_lines,
        alerts = summary.alerts,
        "Session finished"
    );
    Ok(())
}
