//! Application settings
//!
//! Layered with the `config` crate: built-in defaults (from the selected
//! preset), then an optional file, then `DROWSY__SECTION__KEY` environment
//! variables. Every key is optional at every layer.

use clap::ValueEnum;
use dms::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const ENV_PREFIX: &str = "DROWSY";

/// Base engine tuning that file and environment values are layered over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    #[default]
    Standard,
    /// Shorter debounce windows
    Strict,
    /// Longer debounce windows and cooldown
    Lenient,
}

impl Preset {
    pub fn engine(self) -> EngineConfig {
        match self {
            Preset::Standard => EngineConfig::default(),
            Preset::Strict => EngineConfig::strict(),
            Preset::Lenient => EngineConfig::lenient(),
        }
    }
}

/// Audio asset settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory holding `alert_short.wav` and `alert_long.wav`
    pub sound_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_dir: PathBuf::from("sounds"),
        }
    }
}

/// Top-level settings, fixed for the lifetime of the process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub audio: AudioConfig,
}

impl AppConfig {
    /// Load settings over `preset`, from `path` (if any) and the environment
    pub fn load(preset: Preset, path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(preset, path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(
        preset: Preset,
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let base = AppConfig {
            engine: preset.engine(),
            ..Default::default()
        };
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&base)?);
        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(env.separator("__").try_parsing(true));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms::ClassificationShape;

    #[test]
    fn test_defaults_without_file() {
        let settings = AppConfig::load(Preset::Standard, None).unwrap();
        assert_eq!(settings.engine.cooldown_secs, 2.0);
        assert_eq!(settings.audio.sound_dir, PathBuf::from("sounds"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(
            &path,
            r#"
[engine]
cooldown_secs = 3.5

[engine.thresholds]
ear = 0.2
mar = 0.6
pitch = -12.0

[engine.nod]
shape = "simple"
warn_frames = 10
crit_frames = 40

[audio]
sound_dir = "/opt/alerts"
"#,
        )
        .unwrap();

        let settings = AppConfig::load(Preset::Standard, Some(&path)).unwrap();
        assert_eq!(settings.engine.cooldown_secs, 3.5);
        assert_eq!(settings.engine.thresholds.ear, 0.2);
        assert_eq!(settings.engine.nod.shape, ClassificationShape::Simple);
        assert_eq!(settings.engine.nod.crit_frames, 40);
        // Untouched sections keep their defaults
        assert_eq!(settings.engine.eye, EngineConfig::default().eye);
        assert_eq!(settings.audio.sound_dir, PathBuf::from("/opt/alerts"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Preset::Standard, Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_partial_channel_section_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(&path, "[engine.eye]\ncrit_frames = 120\n").unwrap();

        let settings = AppConfig::load(Preset::Standard, Some(&path)).unwrap();
        let defaults = EngineConfig::default();
        assert_eq!(settings.engine.eye.crit_frames, 120);
        assert_eq!(
            settings.engine.eye.shape,
            ClassificationShape::NoiseFiltered
        );
        assert_eq!(
            settings.engine.eye.ignore_frames,
            defaults.eye.ignore_frames
        );
        assert_eq!(settings.engine.eye.warn_frames, defaults.eye.warn_frames);
        assert_eq!(settings.engine.thresholds, defaults.thresholds);
    }

    #[test]
    fn test_env_overrides_single_key() {
        let vars = config::Map::from([
            (
                "DROWSY__ENGINE__NOD__CRIT_FRAMES".to_string(),
                "40".to_string(),
            ),
            (
                "DROWSY__ENGINE__COOLDOWN_SECS".to_string(),
                "3.5".to_string(),
            ),
        ]);
        let env = config::Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let settings = AppConfig::load_with_env(Preset::Standard, None, env).unwrap();
        assert_eq!(settings.engine.nod.crit_frames, 40);
        assert_eq!(settings.engine.nod.warn_frames, 8);
        assert_eq!(settings.engine.nod.shape, ClassificationShape::Simple);
        assert_eq!(settings.engine.cooldown_secs, 3.5);
        assert_eq!(settings.engine.eye, EngineConfig::default().eye);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(
            &path,
            "[engine.yawn]\nwarn_frames = 60\ncrit_frames = 250\n",
        )
        .unwrap();
        let vars = config::Map::from([(
            "DROWSY__ENGINE__YAWN__CRIT_FRAMES".to_string(),
            "220".to_string(),
        )]);
        let env = config::Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let settings = AppConfig::load_with_env(Preset::Standard, Some(&path), env).unwrap();
        assert_eq!(settings.engine.yawn.warn_frames, 60);
        assert_eq!(settings.engine.yawn.crit_frames, 220);
    }

    #[test]
    fn test_preset_is_the_base_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(&path, "[engine]\ncooldown_secs = 1.0\n").unwrap();

        let settings = AppConfig::load(Preset::Lenient, Some(&path)).unwrap();
        let lenient = EngineConfig::lenient();
        assert_eq!(settings.engine.cooldown_secs, 1.0);
        assert_eq!(settings.engine.eye, lenient.eye);
        assert_eq!(settings.engine.nod, lenient.nod);
        assert!(settings.engine.validate().is_ok());

        let strict = AppConfig::load(Preset::Strict, None).unwrap();
        assert_eq!(strict.engine.yawn, EngineConfig::strict().yawn);
    }
}
